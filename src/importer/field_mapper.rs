// ==========================================
// 熟料供应网络 - 字段映射器实现
// ==========================================
// 职责: 源列名 → 逻辑列（别名一次性解析）+ 类型转换
// 规则: 数值无法解析/非有限 → 缺失（不报错）；主键缺失的行跳过并计数
// ==========================================

use crate::domain::records::{
    CapacityRecord, ClosingStockRecord, DemandRecord, HubOpeningStockRecord, LogisticsRecord,
    OpeningStockRecord, PlantTypeRecord, ProductionCostRecord, StrategicConstraintRecord,
};
use crate::domain::schema::{normalize_header, Column, TableSpec};
use crate::domain::table::RawTable;
use crate::domain::types::{BoundType, Period, ValueType};
use std::collections::HashMap;

// ==========================================
// ColumnMap - 逻辑列 → 实际表头
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ColumnMap {
    headers: HashMap<Column, String>,
}

impl ColumnMap {
    /// 按表契约解析列（TRIM + 大写比较）
    ///
    /// 规范列名优先；表中不存在规范列名时才使用别名
    pub fn resolve(spec: &TableSpec, table: &RawTable) -> Self {
        let mut headers = HashMap::new();
        for column in spec.columns {
            let found = table
                .headers
                .iter()
                .find(|h| column.is_canonical(h))
                .or_else(|| table.headers.iter().find(|h| column.is_alias(h)));
            if let Some(header) = found {
                headers.insert(column.column, header.clone());
            }
        }
        Self { headers }
    }

    /// 缺失的必需列（返回规范列名）
    pub fn missing_required(&self, spec: &TableSpec) -> Vec<&'static str> {
        spec.required_columns()
            .filter(|c| !self.headers.contains_key(&c.column))
            .map(|c| c.header)
            .collect()
    }

    pub fn header(&self, column: Column) -> Option<&str> {
        self.headers.get(&column).map(String::as_str)
    }
}

/// 映射结果：记录 + 跳过行数
#[derive(Debug, Clone)]
pub struct MappedTable<R> {
    pub records: Vec<R>,
    pub skipped_rows: usize,
}

// ==========================================
// FieldMapper
// ==========================================
pub struct FieldMapper<'a> {
    columns: &'a ColumnMap,
}

impl<'a> FieldMapper<'a> {
    pub fn new(columns: &'a ColumnMap) -> Self {
        Self { columns }
    }

    /// 提取字符串字段（空串视为缺失）
    fn get_string(&self, row: &HashMap<String, String>, column: Column) -> Option<String> {
        let header = self.columns.header(column)?;
        let value = row.get(header)?.trim();
        if value.is_empty() || is_null_token(value) {
            None
        } else {
            Some(value.to_string())
        }
    }

    /// 解析浮点数（失败即缺失）
    fn parse_f64(&self, row: &HashMap<String, String>, column: Column) -> Option<f64> {
        self.get_string(row, column).and_then(|v| parse_number(&v))
    }

    /// 解析周期（整数；"3.0" 视为 3）
    fn parse_period(&self, row: &HashMap<String, String>, column: Column) -> Option<Period> {
        self.get_string(row, column).and_then(|v| parse_period(&v))
    }

    /// 逐行映射；`map_row` 返回 None 表示主键缺失，计入跳过
    fn map_rows<R>(
        &self,
        table: &RawTable,
        mut map_row: impl FnMut(&Self, &HashMap<String, String>) -> Option<R>,
    ) -> MappedTable<R> {
        let mut records = Vec::with_capacity(table.row_count());
        let mut skipped_rows = 0;
        for row in &table.rows {
            match map_row(self, row) {
                Some(record) => records.push(record),
                None => skipped_rows += 1,
            }
        }
        MappedTable {
            records,
            skipped_rows,
        }
    }

    pub fn map_plant_types(&self, table: &RawTable) -> MappedTable<PlantTypeRecord> {
        self.map_rows(table, |m, row| {
            Some(PlantTypeRecord {
                plant: m.get_string(row, Column::PlantCode)?,
                plant_type: m.get_string(row, Column::PlantType),
                source_count: m.parse_f64(row, Column::SourceCount),
            })
        })
    }

    pub fn map_logistics(&self, table: &RawTable) -> MappedTable<LogisticsRecord> {
        self.map_rows(table, |m, row| {
            Some(LogisticsRecord {
                source: m.get_string(row, Column::FromPlant)?,
                destination: m.get_string(row, Column::ToPlant)?,
                mode: m.get_string(row, Column::TransportCode)?,
                period: m.parse_period(row, Column::TimePeriod),
                freight_cost: m.parse_f64(row, Column::FreightCost),
                handling_cost: m.parse_f64(row, Column::HandlingCost),
                quantity_multiplier: m.parse_f64(row, Column::QuantityMultiplier),
            })
        })
    }

    pub fn map_demand(&self, table: &RawTable) -> MappedTable<DemandRecord> {
        self.map_rows(table, |m, row| {
            Some(DemandRecord {
                plant: m.get_string(row, Column::PlantCode)?,
                period: m.parse_period(row, Column::TimePeriod),
                demand: m.parse_f64(row, Column::Demand),
                min_fulfillment_pct: m.parse_f64(row, Column::MinFulfillmentPct),
            })
        })
    }

    pub fn map_capacity(&self, table: &RawTable) -> MappedTable<CapacityRecord> {
        self.map_rows(table, |m, row| {
            Some(CapacityRecord {
                plant: m.get_string(row, Column::PlantCode)?,
                period: m.parse_period(row, Column::TimePeriod),
                capacity: m.parse_f64(row, Column::Capacity),
            })
        })
    }

    pub fn map_production_cost(&self, table: &RawTable) -> MappedTable<ProductionCostRecord> {
        self.map_rows(table, |m, row| {
            Some(ProductionCostRecord {
                plant: m.get_string(row, Column::PlantCode)?,
                period: m.parse_period(row, Column::TimePeriod),
                cost: m.parse_f64(row, Column::ProductionCost),
            })
        })
    }

    pub fn map_opening_stock(&self, table: &RawTable) -> MappedTable<OpeningStockRecord> {
        self.map_rows(table, |m, row| {
            Some(OpeningStockRecord {
                plant: m.get_string(row, Column::PlantCode)?,
                opening_stock: m.parse_f64(row, Column::OpeningStock),
            })
        })
    }

    pub fn map_closing_stock(&self, table: &RawTable) -> MappedTable<ClosingStockRecord> {
        self.map_rows(table, |m, row| {
            Some(ClosingStockRecord {
                plant: m.get_string(row, Column::PlantCode)?,
                period: m.parse_period(row, Column::TimePeriod),
                min_close_stock: m.parse_f64(row, Column::MinCloseStock),
                max_close_stock: m.parse_f64(row, Column::MaxCloseStock),
            })
        })
    }

    /// 战略约束：全部键分量可缺失（通配），不跳过任何行
    pub fn map_constraints(&self, table: &RawTable) -> MappedTable<StrategicConstraintRecord> {
        self.map_rows(table, |m, row| {
            Some(StrategicConstraintRecord {
                plant: m.get_string(row, Column::ConstraintPlant),
                mode: m.get_string(row, Column::TransportCode),
                target_plant: m.get_string(row, Column::ConstraintTarget),
                period: m.parse_period(row, Column::TimePeriod),
                bound_type: m.get_string(row, Column::BoundType).map(|v| BoundType::parse(&v)),
                value_type: m.get_string(row, Column::ValueType).map(|v| ValueType::parse(&v)),
                value: m.parse_f64(row, Column::Value),
            })
        })
    }

    pub fn map_hub_opening_stock(&self, table: &RawTable) -> MappedTable<HubOpeningStockRecord> {
        self.map_rows(table, |m, row| {
            Some(HubOpeningStockRecord {
                plant: m.get_string(row, Column::HubPlant)?,
                hub: m.get_string(row, Column::HubTarget),
                opening_stock: m.parse_f64(row, Column::OpeningStock),
            })
        })
    }
}

fn is_null_token(value: &str) -> bool {
    matches!(
        normalize_header(value).as_str(),
        "NAN" | "N/A" | "NA" | "NULL" | "NONE" | "#N/A"
    )
}

/// 数值解析：非数值或非有限值视为缺失
pub fn parse_number(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// 周期解析：整数或小数部分为 0 的浮点数
pub fn parse_period(value: &str) -> Option<Period> {
    let trimmed = value.trim();
    if let Ok(p) = trimmed.parse::<Period>() {
        return Some(p);
    }
    parse_number(trimmed)
        .filter(|v| v.fract() == 0.0 && v.abs() < i64::MAX as f64)
        .map(|v| v as Period)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schema::{CAPACITY, CLOSING_STOCK, CONSTRAINTS, LOGISTICS};

    #[test]
    fn test_column_map_resolves_alias_and_case() {
        let table = RawTable::from_rows(&["iugu code", " Time Period ", "CAPACITY"], &[]);
        let columns = ColumnMap::resolve(&CAPACITY, &table);

        assert_eq!(columns.header(Column::PlantCode), Some("iugu code"));
        assert_eq!(columns.header(Column::TimePeriod), Some(" Time Period "));
        assert!(columns.missing_required(&CAPACITY).is_empty());
    }

    #[test]
    fn test_column_map_prefers_canonical_over_alias() {
        let table = RawTable::from_rows(
            &["IUGU CODE", "IU CODE", "TIME PERIOD", "CAPACITY"],
            &[&["GU1", "IU1", "1", "1000"]],
        );
        let columns = ColumnMap::resolve(&CAPACITY, &table);
        assert_eq!(columns.header(Column::PlantCode), Some("IU CODE"));

        let mapped = FieldMapper::new(&columns).map_capacity(&table);
        assert_eq!(mapped.records.len(), 1);
        assert_eq!(mapped.records[0].plant, "IU1");
    }

    #[test]
    fn test_column_map_reports_missing_required() {
        let table = RawTable::from_rows(&["IUGU CODE", "TIME PERIOD", "MIN CLOSE STOCK"], &[]);
        let columns = ColumnMap::resolve(&CLOSING_STOCK, &table);

        assert_eq!(columns.missing_required(&CLOSING_STOCK), vec!["MAX CLOSE STOCK"]);
    }

    #[test]
    fn test_numbers_coerce_to_missing() {
        assert_eq!(parse_number("12.5"), Some(12.5));
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_period("3"), Some(3));
        assert_eq!(parse_period("3.0"), Some(3));
        assert_eq!(parse_period("3.5"), None);
    }

    #[test]
    fn test_map_logistics_skips_rows_without_keys() {
        let table = RawTable::from_rows(
            &[
                "FROM IU CODE", "TO IUGU CODE", "TRANSPORT CODE", "TIME PERIOD",
                "FREIGHT COST", "HANDLING COST", "QUANTITY MULTIPLIER",
            ],
            &[
                &["IU1", "GU1", "T1", "1", "5", "1", "30"],
                &["", "GU1", "T1", "1", "5", "1", "30"],
                &["IU1", "GU2", "T2", "1", "nan", "", "x"],
            ],
        );
        let columns = ColumnMap::resolve(&LOGISTICS, &table);
        let mapped = FieldMapper::new(&columns).map_logistics(&table);

        assert_eq!(mapped.records.len(), 2);
        assert_eq!(mapped.skipped_rows, 1);
        assert_eq!(mapped.records[0].freight_cost, Some(5.0));
        assert_eq!(mapped.records[1].freight_cost, None);
        assert_eq!(mapped.records[1].handling_cost, None);
        assert_eq!(mapped.records[1].quantity_multiplier, None);
    }

    #[test]
    fn test_map_constraints_keeps_wildcards() {
        let table = RawTable::from_rows(
            &[
                "IU CODE", "TRANSPORT CODE", "IUGU CODE", "TIME PERIOD",
                "BOUND TYPEID", "VALUE TYPEID", "Value",
            ],
            &[&["IU1", "", "", "", "L", "C", "500"]],
        );
        let columns = ColumnMap::resolve(&CONSTRAINTS, &table);
        let mapped = FieldMapper::new(&columns).map_constraints(&table);

        let record = &mapped.records[0];
        assert_eq!(record.plant.as_deref(), Some("IU1"));
        assert_eq!(record.mode, None);
        assert_eq!(record.period, None);
        assert_eq!(record.bound_type, Some(BoundType::LessEqual));
        assert_eq!(record.value, Some(500.0));
    }
}
