// ==========================================
// 熟料供应网络 - 导入层
// ==========================================
// 职责: 文件/目录 → 原始表；原始表 → 类型化记录
// 支持: CSV 目录、单个 CSV、Excel 工作簿
// ==========================================

pub mod error;
pub mod field_mapper;
pub mod file_parser;

// 重导出
pub use error::{ImportError, ImportResult};
pub use field_mapper::{ColumnMap, FieldMapper, MappedTable};
pub use file_parser::{CsvParser, ExcelParser, TableParser, UniversalFileParser};
