// ==========================================
// 熟料供应网络 - 文件解析器实现
// ==========================================
// 职责: 文件/目录 → 原始数据表（表名 → RawTable）
// 支持: CSV 目录 / 单个 CSV / Excel 工作簿（.xlsx/.xls，每个工作表一张表）
// ==========================================

use crate::domain::table::RawTable;
use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto, Reader};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

// ==========================================
// TableParser Trait
// ==========================================
// 用途: 文件解析接口
// 实现者: CsvParser, ExcelParser, UniversalFileParser
pub trait TableParser: Send + Sync {
    /// 解析为 (表名, 原始表) 列表
    ///
    /// # 返回
    /// - Ok: 表列表（表名为文件名主干或工作表名，尚未解析为逻辑表）
    /// - Err: 文件读取错误、格式错误
    fn parse_tables(&self, path: &Path) -> ImportResult<Vec<(String, RawTable)>>;
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl CsvParser {
    /// 解析单个 CSV 文件
    pub fn parse_table(&self, path: &Path) -> ImportResult<RawTable> {
        // 检查文件存在
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        let file = File::open(path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .trim(csv::Trim::All)
            .from_reader(file);

        // 读取表头（去掉 BOM 与首尾空白）
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect();

        let mut table = RawTable::new(headers);
        for result in reader.records() {
            let record = result?;
            let values: Vec<&str> = record.iter().collect();

            // 跳过完全空白的行
            if values.iter().all(|v| v.trim().is_empty()) {
                continue;
            }
            table.push_row(&values);
        }

        Ok(table)
    }
}

impl TableParser for CsvParser {
    fn parse_tables(&self, path: &Path) -> ImportResult<Vec<(String, RawTable)>> {
        let ext = extension_of(path);
        if ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        Ok(vec![(name, self.parse_table(path)?)])
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl TableParser for ExcelParser {
    fn parse_tables(&self, path: &Path) -> ImportResult<Vec<(String, RawTable)>> {
        // 检查文件存在
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        // 检查扩展名
        let ext = extension_of(path);
        if ext != "xlsx" && ext != "xls" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let mut workbook = open_workbook_auto(path)?;
        let sheet_names = workbook.sheet_names().to_vec();
        if sheet_names.is_empty() {
            return Err(ImportError::ExcelParseError("Excel 文件无工作表".to_string()));
        }

        let mut tables = Vec::with_capacity(sheet_names.len());
        for sheet_name in sheet_names {
            let range = workbook
                .worksheet_range(&sheet_name)
                .map_err(|e| ImportError::ExcelParseError(format!("{}: {}", sheet_name, e)))?;

            // 提取表头（第一行）；空工作表跳过
            let mut rows = range.rows();
            let header_row = match rows.next() {
                Some(row) => row,
                None => {
                    tracing::debug!(sheet = %sheet_name, "空工作表，跳过");
                    continue;
                }
            };
            let headers: Vec<String> = header_row
                .iter()
                .map(|cell| cell.to_string().trim().to_string())
                .collect();

            let mut table = RawTable::new(headers);
            for data_row in rows {
                let values: Vec<String> = data_row
                    .iter()
                    .map(|cell| cell.to_string().trim().to_string())
                    .collect();

                // 跳过完全空白的行
                if values.iter().all(|v| v.is_empty()) {
                    continue;
                }
                let refs: Vec<&str> = values.iter().map(String::as_str).collect();
                table.push_row(&refs);
            }

            tables.push((sheet_name, table));
        }

        Ok(tables)
    }
}

// ==========================================
// 通用解析器（目录 / 扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    /// 读取数据集，返回 表名 → 原始表
    ///
    /// - 目录: 读取其中全部 .csv 文件，表名为文件名主干
    /// - .csv: 单表
    /// - .xlsx/.xls: 每个工作表一张表
    pub fn read_dataset<P: AsRef<Path>>(&self, path: P) -> ImportResult<HashMap<String, RawTable>> {
        let tables = self.parse_tables(path.as_ref())?;
        Ok(tables.into_iter().collect())
    }
}

impl TableParser for UniversalFileParser {
    fn parse_tables(&self, path: &Path) -> ImportResult<Vec<(String, RawTable)>> {
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        if path.is_dir() {
            let mut entries: Vec<_> = std::fs::read_dir(path)?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.is_file() && extension_of(p) == "csv")
                .collect();
            // 目录遍历顺序不稳定，按文件名排序保证确定性
            entries.sort();

            let mut tables = Vec::with_capacity(entries.len());
            for file in entries {
                tables.extend(CsvParser.parse_tables(&file)?);
            }
            tracing::debug!(dir = %path.display(), tables = tables.len(), "CSV 目录读取完成");
            return Ok(tables);
        }

        match extension_of(path).as_str() {
            "csv" => CsvParser.parse_tables(path),
            "xlsx" | "xls" => ExcelParser.parse_tables(path),
            other => Err(ImportError::UnsupportedFormat(other.to_string())),
        }
    }
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn test_csv_parser_trims_headers_and_skips_blank_rows() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, " IUGU CODE , OPENING STOCK ").unwrap();
        writeln!(temp_file, "IU1,100").unwrap();
        writeln!(temp_file, ",").unwrap(); // 空行
        writeln!(temp_file, "GU1, 20 ").unwrap();

        let table = CsvParser.parse_table(temp_file.path()).unwrap();

        assert_eq!(table.headers, vec!["IUGU CODE", "OPENING STOCK"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows[1].get("OPENING STOCK"), Some(&"20".to_string()));
    }

    #[test]
    fn test_csv_parser_file_not_found() {
        let result = CsvParser.parse_table(Path::new("non_existent.csv"));
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }

    #[test]
    fn test_universal_parser_reads_csv_directory() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("IUGUOpeningStock.csv"), "IUGU CODE,OPENING STOCK\nIU1,100\n").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let tables = UniversalFileParser.read_dataset(dir.path()).unwrap();

        assert_eq!(tables.len(), 1);
        assert_eq!(tables["IUGUOpeningStock"].row_count(), 1);
    }

    #[test]
    fn test_universal_parser_rejects_unknown_extension() {
        let temp_file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        let result = UniversalFileParser.read_dataset(temp_file.path());
        assert!(matches!(result, Err(ImportError::UnsupportedFormat(_))));
    }
}
