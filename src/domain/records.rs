// ==========================================
// 熟料供应网络 - 类型化数据记录
// ==========================================
// 职责: 每张逻辑表一个记录类型，可选字段显式为 Option
// 对齐: domain::schema 中的表契约
// ==========================================

use crate::domain::types::{BoundType, Period, ValueType};
use serde::{Deserialize, Serialize};

/// 按 (工厂, 周期) 索引的记录
pub trait PlantPeriodRecord {
    fn plant(&self) -> &str;
    fn period(&self) -> Option<Period>;
}

// ==========================================
// IUGUType - 工厂类型
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantTypeRecord {
    pub plant: String,              // IUGU CODE
    pub plant_type: Option<String>, // PLANT TYPE（IU/GU/其他）
    pub source_count: Option<f64>,  // # Source
}

// ==========================================
// Logistics - 路线（起点, 终点, 运输方式, 周期）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticsRecord {
    pub source: String,
    pub destination: String,
    pub mode: String,
    pub period: Option<Period>,
    pub freight_cost: Option<f64>,
    pub handling_cost: Option<f64>,
    pub quantity_multiplier: Option<f64>,
}

// ==========================================
// Demand - 需求
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandRecord {
    pub plant: String,
    pub period: Option<Period>,
    pub demand: Option<f64>,
    pub min_fulfillment_pct: Option<f64>,
}

impl PlantPeriodRecord for DemandRecord {
    fn plant(&self) -> &str {
        &self.plant
    }
    fn period(&self) -> Option<Period> {
        self.period
    }
}

// ==========================================
// Capacity - 产能（仅生产型工厂）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityRecord {
    pub plant: String,
    pub period: Option<Period>,
    pub capacity: Option<f64>,
}

impl PlantPeriodRecord for CapacityRecord {
    fn plant(&self) -> &str {
        &self.plant
    }
    fn period(&self) -> Option<Period> {
        self.period
    }
}

// ==========================================
// ProductionCost - 单位生产成本
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionCostRecord {
    pub plant: String,
    pub period: Option<Period>,
    pub cost: Option<f64>,
}

impl PlantPeriodRecord for ProductionCostRecord {
    fn plant(&self) -> &str {
        &self.plant
    }
    fn period(&self) -> Option<Period> {
        self.period
    }
}

// ==========================================
// OpeningStock - 期初库存（每工厂一个值）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpeningStockRecord {
    pub plant: String,
    pub opening_stock: Option<f64>,
}

// ==========================================
// ClosingStock - 期末库存上下界
// ==========================================
// min 缺失视为 0，max 缺失视为无上界（仅在约束检查时展开）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosingStockRecord {
    pub plant: String,
    pub period: Option<Period>,
    pub min_close_stock: Option<f64>,
    pub max_close_stock: Option<f64>,
}

impl PlantPeriodRecord for ClosingStockRecord {
    fn plant(&self) -> &str {
        &self.plant
    }
    fn period(&self) -> Option<Period> {
        self.period
    }
}

// ==========================================
// Constraints - 战略约束（缺失的键分量为通配）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategicConstraintRecord {
    pub plant: Option<String>,
    pub mode: Option<String>,
    pub target_plant: Option<String>,
    pub period: Option<Period>,
    pub bound_type: Option<BoundType>,
    pub value_type: Option<ValueType>,
    pub value: Option<f64>,
}

impl StrategicConstraintRecord {
    /// 通配匹配：缺失分量适用于全部
    pub fn applies_to(&self, source: &str, destination: &str, mode: &str, period: Period) -> bool {
        let matches = |key: &Option<String>, value: &str| key.as_deref().map_or(true, |k| k == value);
        matches(&self.plant, source)
            && matches(&self.mode, mode)
            && matches(&self.target_plant, destination)
            && self.period.map_or(true, |p| p == period)
    }
}

// ==========================================
// HubOpeningStock - 中转库期初库存（可选表）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HubOpeningStockRecord {
    pub plant: String,
    pub hub: Option<String>,
    pub opening_stock: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constraint(plant: Option<&str>, mode: Option<&str>, period: Option<Period>) -> StrategicConstraintRecord {
        StrategicConstraintRecord {
            plant: plant.map(str::to_string),
            mode: mode.map(str::to_string),
            target_plant: None,
            period,
            bound_type: Some(BoundType::LessEqual),
            value_type: Some(ValueType::Absolute),
            value: Some(500.0),
        }
    }

    #[test]
    fn test_constraint_wildcards_apply_to_all() {
        let c = constraint(None, None, None);
        assert!(c.applies_to("IU1", "GU1", "T1", 1));
        assert!(c.applies_to("IU9", "GU4", "T2", 7));
    }

    #[test]
    fn test_constraint_keyed_components_must_match() {
        let c = constraint(Some("IU1"), Some("T2"), Some(3));
        assert!(c.applies_to("IU1", "GU1", "T2", 3));
        assert!(!c.applies_to("IU1", "GU1", "T1", 3));
        assert!(!c.applies_to("IU2", "GU1", "T2", 3));
        assert!(!c.applies_to("IU1", "GU1", "T2", 4));
    }
}
