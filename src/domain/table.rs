// ==========================================
// 熟料供应网络 - 原始数据表
// ==========================================
// 职责: 承载导入层解析出的原始行（列名 → 文本值）
// 说明: 不做任何类型转换，类型化由字段映射器完成
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 原始数据表（表头 + 行记录）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<HashMap<String, String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// 由表头与按列顺序排列的行构建（测试与内存导入使用）
    pub fn from_rows(headers: &[&str], rows: &[&[&str]]) -> Self {
        let mut table = RawTable::new(headers.iter().map(|h| h.to_string()).collect());
        for row in rows {
            table.push_row(row);
        }
        table
    }

    /// 追加一行，超出表头的单元格丢弃
    pub fn push_row(&mut self, values: &[&str]) {
        let row = self
            .headers
            .iter()
            .zip(values.iter())
            .map(|(h, v)| (h.clone(), v.to_string()))
            .collect();
        self.rows.push(row);
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_keeps_header_order() {
        let table = RawTable::from_rows(&["A", "B"], &[&["1", "2"], &["3"]]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows[0].get("B"), Some(&"2".to_string()));
        assert_eq!(table.rows[1].get("B"), None);
    }
}
