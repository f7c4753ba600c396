// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 构建测试数据集（按表追加行）、写出 CSV 目录
// ==========================================

#![allow(dead_code)]

use route_balance::RawTable;
use std::collections::HashMap;
use std::error::Error;
use std::path::Path;

const PLANT_TYPE_HEADERS: &[&str] = &["IUGU CODE", "PLANT TYPE"];
const LOGISTICS_HEADERS: &[&str] = &[
    "FROM IU CODE",
    "TO IUGU CODE",
    "TRANSPORT CODE",
    "TIME PERIOD",
    "FREIGHT COST",
    "HANDLING COST",
    "QUANTITY MULTIPLIER",
];
const DEMAND_HEADERS: &[&str] = &["IUGU CODE", "TIME PERIOD", "DEMAND"];
const CAPACITY_HEADERS: &[&str] = &["IU CODE", "TIME PERIOD", "CAPACITY"];
const PRODUCTION_COST_HEADERS: &[&str] = &["IU CODE", "TIME PERIOD", "PRODUCTION COST"];
const OPENING_STOCK_HEADERS: &[&str] = &["IUGU CODE", "OPENING STOCK"];
const CLOSING_STOCK_HEADERS: &[&str] = &["IUGU CODE", "TIME PERIOD", "MIN CLOSE STOCK", "MAX CLOSE STOCK"];
const CONSTRAINT_HEADERS: &[&str] = &[
    "IU CODE",
    "TRANSPORT CODE",
    "IUGU CODE",
    "TIME PERIOD",
    "BOUND TYPEID",
    "VALUE TYPEID",
    "Value",
];

/// 测试数据集构建器（取值以文本给出，空串表示缺失）
#[derive(Debug, Clone, Default)]
pub struct DatasetBuilder {
    plant_types: Vec<Vec<String>>,
    logistics: Vec<Vec<String>>,
    demand: Vec<Vec<String>>,
    capacity: Vec<Vec<String>>,
    production_cost: Vec<Vec<String>>,
    opening_stock: Vec<Vec<String>>,
    closing_stock: Vec<Vec<String>>,
    constraints: Vec<Vec<String>>,
}

fn row(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn table(headers: &[&str], rows: &[Vec<String>]) -> RawTable {
    let mut table = RawTable::new(headers.iter().map(|h| h.to_string()).collect());
    for r in rows {
        let refs: Vec<&str> = r.iter().map(String::as_str).collect();
        table.push_row(&refs);
    }
    table
}

impl DatasetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plant(mut self, code: &str, plant_type: &str) -> Self {
        self.plant_types.push(row(&[code, plant_type]));
        self
    }

    pub fn route(mut self, source: &str, destination: &str, mode: &str, period: &str, freight: &str, handling: &str) -> Self {
        self.logistics
            .push(row(&[source, destination, mode, period, freight, handling, "1"]));
        self
    }

    pub fn demand(mut self, plant: &str, period: &str, demand: &str) -> Self {
        self.demand.push(row(&[plant, period, demand]));
        self
    }

    pub fn capacity(mut self, plant: &str, period: &str, capacity: &str) -> Self {
        self.capacity.push(row(&[plant, period, capacity]));
        self
    }

    pub fn production_cost(mut self, plant: &str, period: &str, cost: &str) -> Self {
        self.production_cost.push(row(&[plant, period, cost]));
        self
    }

    pub fn opening_stock(mut self, plant: &str, stock: &str) -> Self {
        self.opening_stock.push(row(&[plant, stock]));
        self
    }

    pub fn closing_stock(mut self, plant: &str, period: &str, min: &str, max: &str) -> Self {
        self.closing_stock.push(row(&[plant, period, min, max]));
        self
    }

    pub fn constraint(mut self, plant: &str, mode: &str, target: &str, period: &str, bound: &str, value_type: &str, value: &str) -> Self {
        self.constraints
            .push(row(&[plant, mode, target, period, bound, value_type, value]));
        self
    }

    /// 生成按文件名主干命名的表集合（约束表为空时不生成）
    pub fn build(&self) -> HashMap<String, RawTable> {
        let mut tables = HashMap::new();
        tables.insert("IUGUType".to_string(), table(PLANT_TYPE_HEADERS, &self.plant_types));
        tables.insert("LogisticsIUGU".to_string(), table(LOGISTICS_HEADERS, &self.logistics));
        tables.insert("ClinkerDemand".to_string(), table(DEMAND_HEADERS, &self.demand));
        tables.insert("ClinkerCapacity".to_string(), table(CAPACITY_HEADERS, &self.capacity));
        tables.insert(
            "ProductionCost".to_string(),
            table(PRODUCTION_COST_HEADERS, &self.production_cost),
        );
        tables.insert(
            "IUGUOpeningStock".to_string(),
            table(OPENING_STOCK_HEADERS, &self.opening_stock),
        );
        tables.insert(
            "IUGUClosingStock".to_string(),
            table(CLOSING_STOCK_HEADERS, &self.closing_stock),
        );
        if !self.constraints.is_empty() {
            tables.insert("IUGUConstraint".to_string(), table(CONSTRAINT_HEADERS, &self.constraints));
        }
        tables
    }
}

/// 场景 A: IU1 → GU1 经 T1（车辆容量 30），周期 1
///
/// - IU1: 期初 100，期末下限 50，需求 0，产能 1000，生产成本 10
/// - GU1: 期初 20，期末下限 30，需求 200
/// - T1: 运费 5，装卸费 1
pub fn scenario_a() -> DatasetBuilder {
    scenario_with_capacity("1000")
}

/// 场景 B: 同场景 A，产能 100
pub fn scenario_b() -> DatasetBuilder {
    scenario_with_capacity("100")
}

fn scenario_with_capacity(capacity: &str) -> DatasetBuilder {
    DatasetBuilder::new()
        .plant("IU1", "IU")
        .plant("GU1", "GU")
        .route("IU1", "GU1", "T1", "1", "5", "1")
        .demand("IU1", "1", "0")
        .demand("GU1", "1", "200")
        .capacity("IU1", "1", capacity)
        .production_cost("IU1", "1", "10")
        .opening_stock("IU1", "100")
        .opening_stock("GU1", "20")
        .closing_stock("IU1", "1", "50", "")
        .closing_stock("GU1", "1", "30", "")
}

/// 将表集合写为 CSV 目录（文件名 = 表名.csv）
pub fn write_csv_dir(dir: &Path, tables: &HashMap<String, RawTable>) -> Result<(), Box<dyn Error>> {
    for (name, table) in tables {
        let mut writer = csv::Writer::from_path(dir.join(format!("{}.csv", name)))?;
        writer.write_record(&table.headers)?;
        for r in &table.rows {
            let values: Vec<&str> = table
                .headers
                .iter()
                .map(|h| r.get(h).map(String::as_str).unwrap_or(""))
                .collect();
            writer.write_record(&values)?;
        }
        writer.flush()?;
    }
    Ok(())
}

/// 浮点近似相等
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}
