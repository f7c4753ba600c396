// ==========================================
// 熟料供应网络 - 数据集一致性校验器
// ==========================================
// 职责: 必需表存在 + 必需列齐全 → 报告 {complete, present, missing}
// 规则: 任一必需表缺失/缺列 → 整体加载失败；可选表缺列仅忽略并告警
// ==========================================

use crate::domain::schema::TableKind;
use crate::domain::table::RawTable;
use crate::i18n::t_with_args;
use crate::importer::field_mapper::ColumnMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

// ==========================================
// SchemaIssue - 结构问题
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SchemaIssue {
    /// 必需表不存在
    MissingTable { table: String },
    /// 表存在但缺少必需列
    MissingColumns {
        table: String,
        source_name: String,
        columns: Vec<String>,
        required_table: bool,
    },
}

impl SchemaIssue {
    /// 是否导致加载失败
    pub fn is_fatal(&self) -> bool {
        match self {
            SchemaIssue::MissingTable { .. } => true,
            SchemaIssue::MissingColumns { required_table, .. } => *required_table,
        }
    }

    /// 本地化消息
    pub fn message(&self) -> String {
        match self {
            SchemaIssue::MissingTable { table } => {
                t_with_args("schema.missing_table", &[("table", table)])
            }
            SchemaIssue::MissingColumns {
                table,
                columns,
                required_table: true,
                ..
            } => t_with_args(
                "schema.missing_columns",
                &[("table", table), ("columns", &columns.join(", "))],
            ),
            SchemaIssue::MissingColumns { table, columns, .. } => t_with_args(
                "schema.optional_table_ignored",
                &[("table", table), ("columns", &columns.join(", "))],
            ),
        }
    }
}

// ==========================================
// ConsistencyReport - 校验报告
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyReport {
    pub complete: bool,
    /// 存在且列齐全的逻辑表（含可选表）
    pub present: Vec<String>,
    /// 缺失或缺列的必需表
    pub missing: Vec<String>,
    pub issues: Vec<SchemaIssue>,
    /// 未能识别为任何逻辑表的输入表名
    pub unrecognized: Vec<String>,
    /// 逻辑表 → 实际输入表名（仅 present）
    #[serde(skip)]
    pub resolved: BTreeMap<TableKind, String>,
}

impl ConsistencyReport {
    /// 致命问题的本地化消息列表
    pub fn errors(&self) -> Vec<String> {
        self.issues
            .iter()
            .filter(|i| i.is_fatal())
            .map(SchemaIssue::message)
            .collect()
    }

    pub fn is_present(&self, kind: TableKind) -> bool {
        self.resolved.contains_key(&kind)
    }
}

// ==========================================
// ConsistencyValidator
// ==========================================
pub struct ConsistencyValidator;

impl ConsistencyValidator {
    /// 校验候选表集合
    pub fn validate(&self, tables: &HashMap<String, RawTable>) -> ConsistencyReport {
        let mut report = ConsistencyReport::default();

        // 输入表名 → 逻辑表；同一逻辑表多次出现时按名称排序取第一个
        let mut names: Vec<&String> = tables.keys().collect();
        names.sort();
        let mut candidates: BTreeMap<TableKind, &String> = BTreeMap::new();
        for name in names {
            match TableKind::resolve(name) {
                Some(kind) => {
                    if let Some(existing) = candidates.get(&kind) {
                        tracing::warn!(table = %kind, kept = %existing, ignored = %name, "重复的数据表，忽略后者");
                    } else {
                        candidates.insert(kind, name);
                    }
                }
                None => {
                    tracing::debug!(table = %name, "未识别的数据表，忽略");
                    report.unrecognized.push(name.clone());
                }
            }
        }

        for kind in TableKind::ALL {
            let spec = kind.spec();
            let Some(name) = candidates.get(&kind) else {
                if spec.required {
                    report.missing.push(spec.name.to_string());
                    report.issues.push(SchemaIssue::MissingTable {
                        table: spec.name.to_string(),
                    });
                }
                continue;
            };

            let table = &tables[*name];
            let missing_columns = ColumnMap::resolve(spec, table).missing_required(spec);
            if missing_columns.is_empty() {
                report.present.push(spec.name.to_string());
                report.resolved.insert(kind, (*name).clone());
                continue;
            }

            if spec.required {
                report.missing.push(spec.name.to_string());
            } else {
                tracing::warn!(table = %kind, columns = ?missing_columns, "可选数据表缺少列，已忽略");
            }
            report.issues.push(SchemaIssue::MissingColumns {
                table: spec.name.to_string(),
                source_name: (*name).clone(),
                columns: missing_columns.iter().map(|c| c.to_string()).collect(),
                required_table: spec.required,
            });
        }

        report.complete = report.missing.is_empty();
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schema::normalize_header;

    fn table_with_headers(headers: &[&str]) -> RawTable {
        RawTable::from_rows(headers, &[])
    }

    fn full_dataset() -> HashMap<String, RawTable> {
        let mut tables = HashMap::new();
        for kind in TableKind::ALL {
            let spec = kind.spec();
            if !spec.required {
                continue;
            }
            let headers: Vec<&str> = spec.columns.iter().map(|c| c.header).collect();
            tables.insert(spec.file_stem.to_string(), table_with_headers(&headers));
        }
        tables
    }

    #[test]
    fn test_full_dataset_is_complete() {
        let report = ConsistencyValidator.validate(&full_dataset());

        assert!(report.complete);
        assert_eq!(report.present.len(), 7);
        assert!(report.missing.is_empty());
        assert!(report.errors().is_empty());
    }

    #[test]
    fn test_missing_required_table_fails() {
        let mut tables = full_dataset();
        tables.remove("ClinkerDemand");

        let report = ConsistencyValidator.validate(&tables);

        assert!(!report.complete);
        assert_eq!(report.missing, vec!["Demand".to_string()]);
        assert_eq!(report.errors().len(), 1);
    }

    #[test]
    fn test_missing_required_column_fails() {
        let mut tables = full_dataset();
        tables.insert(
            "IUGUClosingStock".to_string(),
            table_with_headers(&["IUGU CODE", "TIME PERIOD", "MIN CLOSE STOCK"]),
        );

        let report = ConsistencyValidator.validate(&tables);

        assert!(!report.complete);
        assert!(report.issues.iter().any(|i| matches!(
            i,
            SchemaIssue::MissingColumns { table, columns, .. }
                if table == "ClosingStock" && columns == &vec!["MAX CLOSE STOCK".to_string()]
        )));
    }

    #[test]
    fn test_headers_compared_case_insensitively() {
        let mut tables = full_dataset();
        tables.insert(
            "IUGUOpeningStock".to_string(),
            table_with_headers(&[" iugu code ", "Opening Stock"]),
        );

        let report = ConsistencyValidator.validate(&tables);
        assert!(report.complete);
        assert_eq!(normalize_header(" iugu code "), "IUGU CODE");
    }

    #[test]
    fn test_optional_table_with_missing_columns_is_ignored() {
        let mut tables = full_dataset();
        tables.insert("IUGUConstraint".to_string(), table_with_headers(&["IU CODE"]));

        let report = ConsistencyValidator.validate(&tables);

        assert!(report.complete);
        assert!(!report.is_present(TableKind::Constraints));
        assert!(report.issues.iter().any(|i| !i.is_fatal()));
    }

    #[test]
    fn test_unrecognized_tables_are_listed() {
        let mut tables = full_dataset();
        tables.insert("Notes".to_string(), RawTable::default());

        let report = ConsistencyValidator.validate(&tables);
        assert_eq!(report.unrecognized, vec!["Notes".to_string()]);
    }
}
