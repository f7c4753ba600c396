// ==========================================
// 熟料供应网络 - 数据集结构契约
// ==========================================
// 职责: 声明必需/可选数据表、表名别名、列名及其别名
// 说明: 纯数据，无行为；列名比较前统一 TRIM + 大写
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// TableKind - 逻辑数据表
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TableKind {
    PlantType,
    Logistics,
    Demand,
    Capacity,
    ProductionCost,
    OpeningStock,
    ClosingStock,
    Constraints,
    HubOpeningStock,
}

impl TableKind {
    pub const ALL: [TableKind; 9] = [
        TableKind::PlantType,
        TableKind::Logistics,
        TableKind::Demand,
        TableKind::Capacity,
        TableKind::ProductionCost,
        TableKind::OpeningStock,
        TableKind::ClosingStock,
        TableKind::Constraints,
        TableKind::HubOpeningStock,
    ];

    /// 对应的结构契约条目
    pub fn spec(&self) -> &'static TableSpec {
        match self {
            TableKind::PlantType => &PLANT_TYPE,
            TableKind::Logistics => &LOGISTICS,
            TableKind::Demand => &DEMAND,
            TableKind::Capacity => &CAPACITY,
            TableKind::ProductionCost => &PRODUCTION_COST,
            TableKind::OpeningStock => &OPENING_STOCK,
            TableKind::ClosingStock => &CLOSING_STOCK,
            TableKind::Constraints => &CONSTRAINTS,
            TableKind::HubOpeningStock => &HUB_OPENING_STOCK,
        }
    }

    pub fn name(&self) -> &'static str {
        self.spec().name
    }

    /// 按表名 / 文件名 / 别名解析逻辑表（大小写不敏感）
    pub fn resolve(raw_name: &str) -> Option<TableKind> {
        let key = normalize_table_name(raw_name);
        TableKind::ALL.into_iter().find(|kind| {
            let spec = kind.spec();
            normalize_table_name(spec.name) == key
                || normalize_table_name(spec.file_stem) == key
                || spec.aliases.iter().any(|a| normalize_table_name(a) == key)
        })
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ==========================================
// Column - 逻辑列
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    PlantCode,
    PlantType,
    SourceCount,
    FromPlant,
    ToPlant,
    TransportCode,
    TimePeriod,
    FreightCost,
    HandlingCost,
    QuantityMultiplier,
    Demand,
    MinFulfillmentPct,
    Capacity,
    ProductionCost,
    OpeningStock,
    MinCloseStock,
    MaxCloseStock,
    ConstraintPlant,
    ConstraintTarget,
    BoundType,
    ValueType,
    Value,
    HubPlant,
    HubTarget,
}

/// 列契约：规范列名 + 可接受的别名
#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub column: Column,
    pub header: &'static str,
    pub aliases: &'static [&'static str],
    pub required: bool,
}

impl ColumnSpec {
    /// 表头是否匹配本列（TRIM + 大写比较）
    pub fn matches(&self, header: &str) -> bool {
        self.is_canonical(header) || self.is_alias(header)
    }

    /// 表头是否为规范列名
    pub fn is_canonical(&self, header: &str) -> bool {
        normalize_header(self.header) == normalize_header(header)
    }

    /// 表头是否为别名
    pub fn is_alias(&self, header: &str) -> bool {
        let h = normalize_header(header);
        self.aliases.iter().any(|a| normalize_header(a) == h)
    }
}

/// 表契约
#[derive(Debug, Clone, Copy)]
pub struct TableSpec {
    pub kind: TableKind,
    pub name: &'static str,
    pub file_stem: &'static str,
    pub aliases: &'static [&'static str],
    pub required: bool,
    pub columns: &'static [ColumnSpec],
}

impl TableSpec {
    pub fn file_name(&self) -> String {
        format!("{}.csv", self.file_stem)
    }

    pub fn required_columns(&self) -> impl Iterator<Item = &ColumnSpec> {
        self.columns.iter().filter(|c| c.required)
    }
}

/// 表头规范化: TRIM + 大写
pub fn normalize_header(header: &str) -> String {
    header.trim().to_uppercase()
}

/// 表名规范化: 去空白/下划线/连字符 + 小写
pub fn normalize_table_name(name: &str) -> String {
    let trimmed = name.trim();
    let stem = trimmed
        .strip_suffix(".csv")
        .or_else(|| trimmed.strip_suffix(".CSV"))
        .unwrap_or(trimmed);
    stem.chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .collect::<String>()
        .to_lowercase()
}

const fn req(column: Column, header: &'static str) -> ColumnSpec {
    ColumnSpec { column, header, aliases: &[], required: true }
}

const fn opt(column: Column, header: &'static str) -> ColumnSpec {
    ColumnSpec { column, header, aliases: &[], required: false }
}

// ==========================================
// 契约定义
// ==========================================

pub static PLANT_TYPE: TableSpec = TableSpec {
    kind: TableKind::PlantType,
    name: "IUGUType",
    file_stem: "IUGUType",
    aliases: &["plant_type", "planttype"],
    required: true,
    columns: &[
        req(Column::PlantCode, "IUGU CODE"),
        req(Column::PlantType, "PLANT TYPE"),
        opt(Column::SourceCount, "# Source"),
    ],
};

pub static LOGISTICS: TableSpec = TableSpec {
    kind: TableKind::Logistics,
    name: "Logistics",
    file_stem: "LogisticsIUGU",
    aliases: &["routes"],
    required: true,
    columns: &[
        req(Column::FromPlant, "FROM IU CODE"),
        req(Column::ToPlant, "TO IUGU CODE"),
        req(Column::TransportCode, "TRANSPORT CODE"),
        req(Column::TimePeriod, "TIME PERIOD"),
        req(Column::FreightCost, "FREIGHT COST"),
        req(Column::HandlingCost, "HANDLING COST"),
        req(Column::QuantityMultiplier, "QUANTITY MULTIPLIER"),
    ],
};

pub static DEMAND: TableSpec = TableSpec {
    kind: TableKind::Demand,
    name: "Demand",
    file_stem: "ClinkerDemand",
    aliases: &[],
    required: true,
    columns: &[
        req(Column::PlantCode, "IUGU CODE"),
        req(Column::TimePeriod, "TIME PERIOD"),
        req(Column::Demand, "DEMAND"),
        opt(Column::MinFulfillmentPct, "MIN FULFILLMENT (%)"),
    ],
};

pub static CAPACITY: TableSpec = TableSpec {
    kind: TableKind::Capacity,
    name: "Capacity",
    file_stem: "ClinkerCapacity",
    aliases: &[],
    required: true,
    columns: &[
        ColumnSpec {
            column: Column::PlantCode,
            header: "IU CODE",
            aliases: &["IUGU CODE"],
            required: true,
        },
        req(Column::TimePeriod, "TIME PERIOD"),
        req(Column::Capacity, "CAPACITY"),
    ],
};

pub static PRODUCTION_COST: TableSpec = TableSpec {
    kind: TableKind::ProductionCost,
    name: "ProductionCost",
    file_stem: "ProductionCost",
    aliases: &[],
    required: true,
    columns: &[
        ColumnSpec {
            column: Column::PlantCode,
            header: "IU CODE",
            aliases: &["IUGU CODE"],
            required: true,
        },
        req(Column::TimePeriod, "TIME PERIOD"),
        req(Column::ProductionCost, "PRODUCTION COST"),
    ],
};

pub static OPENING_STOCK: TableSpec = TableSpec {
    kind: TableKind::OpeningStock,
    name: "OpeningStock",
    file_stem: "IUGUOpeningStock",
    aliases: &[],
    required: true,
    columns: &[
        req(Column::PlantCode, "IUGU CODE"),
        req(Column::OpeningStock, "OPENING STOCK"),
    ],
};

pub static CLOSING_STOCK: TableSpec = TableSpec {
    kind: TableKind::ClosingStock,
    name: "ClosingStock",
    file_stem: "IUGUClosingStock",
    aliases: &[],
    required: true,
    columns: &[
        req(Column::PlantCode, "IUGU CODE"),
        req(Column::TimePeriod, "TIME PERIOD"),
        req(Column::MinCloseStock, "MIN CLOSE STOCK"),
        req(Column::MaxCloseStock, "MAX CLOSE STOCK"),
    ],
};

pub static CONSTRAINTS: TableSpec = TableSpec {
    kind: TableKind::Constraints,
    name: "Constraints",
    file_stem: "IUGUConstraint",
    aliases: &["constraint"],
    required: false,
    columns: &[
        req(Column::ConstraintPlant, "IU CODE"),
        req(Column::TransportCode, "TRANSPORT CODE"),
        req(Column::ConstraintTarget, "IUGU CODE"),
        req(Column::TimePeriod, "TIME PERIOD"),
        req(Column::BoundType, "BOUND TYPEID"),
        req(Column::ValueType, "VALUE TYPEID"),
        req(Column::Value, "VALUE"),
    ],
};

pub static HUB_OPENING_STOCK: TableSpec = TableSpec {
    kind: TableKind::HubOpeningStock,
    name: "HubOpeningStock",
    file_stem: "HubOpeningStock",
    aliases: &[],
    required: false,
    columns: &[
        req(Column::HubPlant, "IU"),
        req(Column::HubTarget, "IUGU"),
        req(Column::OpeningStock, "OPENING STOCK"),
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_table_by_name_and_file_stem() {
        assert_eq!(TableKind::resolve("Logistics"), Some(TableKind::Logistics));
        assert_eq!(TableKind::resolve("logisticsiugu"), Some(TableKind::Logistics));
        assert_eq!(TableKind::resolve("LogisticsIUGU.csv"), Some(TableKind::Logistics));
        assert_eq!(TableKind::resolve(" ClinkerDemand "), Some(TableKind::Demand));
        assert_eq!(TableKind::resolve("Opening_Stock"), Some(TableKind::OpeningStock));
        assert_eq!(TableKind::resolve("Unknown"), None);
    }

    #[test]
    fn test_column_matches_alias_case_insensitive() {
        let plant = CAPACITY.columns[0];
        assert!(plant.matches(" iu code "));
        assert!(plant.matches("IUGU CODE"));
        assert!(!plant.matches("PLANT"));
    }

    #[test]
    fn test_required_tables() {
        let required: Vec<_> = TableKind::ALL
            .iter()
            .filter(|k| k.spec().required)
            .collect();
        assert_eq!(required.len(), 7);
        assert!(!TableKind::Constraints.spec().required);
        assert!(!TableKind::HubOpeningStock.spec().required);
    }
}
