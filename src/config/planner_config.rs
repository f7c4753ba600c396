// ==========================================
// 熟料供应网络 - 计算参数配置
// ==========================================
// 职责: 运输方式参考表 + 计算常量（持有成本率、容差等）
// 存储: JSON（由 ConfigManager 加载）
// ==========================================

use crate::domain::balance::ModeDetail;
use serde::{Deserialize, Serialize};

/// 运输方式参考表条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportModeSpec {
    pub code: String,
    pub name: String,
    pub vehicle_capacity: f64,        // 单车/单次运量
    #[serde(default)]
    pub emission_factor: Option<f64>, // 排放因子
}

/// 计算参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// 运输方式参考表（不在表中的方式仍可路由，但车辆容量为 Unavailable）
    pub transport_modes: Vec<TransportModeSpec>,
    /// 持有成本率（生产成本的百分比）
    pub holding_cost_rate: f64,
    /// 安全库存检查容差（吸收浮点舍入）
    pub safety_stock_tolerance: f64,
    /// 生产型工厂类型码
    pub producing_plant_type: String,
    /// 供应天数换算：每周期天数
    pub days_per_period: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            transport_modes: vec![
                TransportModeSpec {
                    code: "T1".to_string(),
                    name: "Road".to_string(),
                    vehicle_capacity: 30.0,
                    emission_factor: Some(0.062),
                },
                TransportModeSpec {
                    code: "T2".to_string(),
                    name: "Rail".to_string(),
                    vehicle_capacity: 3000.0,
                    emission_factor: Some(0.022),
                },
                TransportModeSpec {
                    code: "T3".to_string(),
                    name: "Sea".to_string(),
                    vehicle_capacity: 10000.0,
                    emission_factor: Some(0.010),
                },
            ],
            holding_cost_rate: 0.01,
            safety_stock_tolerance: 0.01,
            producing_plant_type: "IU".to_string(),
            days_per_period: 30.0,
        }
    }
}

impl PlannerConfig {
    /// 按运输方式代码查参考表
    pub fn transport_mode(&self, code: &str) -> Option<&TransportModeSpec> {
        self.transport_modes.iter().find(|m| m.code == code)
    }

    /// 运输方式明细；参考表中没有的方式名称/容量为 Unavailable
    pub fn mode_detail(&self, code: &str) -> ModeDetail {
        let spec = self.transport_mode(code);
        ModeDetail {
            code: code.to_string(),
            name: spec.map(|m| m.name.clone()).into(),
            vehicle_capacity: spec.map(|m| m.vehicle_capacity).into(),
            emission_factor: spec.and_then(|m| m.emission_factor).into(),
        }
    }

    /// 基本合法性检查，返回问题列表
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        for mode in &self.transport_modes {
            if !mode.vehicle_capacity.is_finite() || mode.vehicle_capacity < 0.0 {
                problems.push(format!(
                    "transport mode {} has invalid vehicle_capacity {}",
                    mode.code, mode.vehicle_capacity
                ));
            }
        }
        if !self.holding_cost_rate.is_finite() || self.holding_cost_rate < 0.0 {
            problems.push(format!("invalid holding_cost_rate {}", self.holding_cost_rate));
        }
        if !self.safety_stock_tolerance.is_finite() || self.safety_stock_tolerance < 0.0 {
            problems.push(format!(
                "invalid safety_stock_tolerance {}",
                self.safety_stock_tolerance
            ));
        }
        if self.days_per_period <= 0.0 {
            problems.push(format!("invalid days_per_period {}", self.days_per_period));
        }
        problems
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_reference_table() {
        let config = PlannerConfig::default();
        assert_eq!(config.transport_mode("T1").map(|m| m.vehicle_capacity), Some(30.0));
        assert_eq!(config.transport_mode("T2").map(|m| m.vehicle_capacity), Some(3000.0));
        assert!(config.transport_mode("T9").is_none());
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: PlannerConfig = serde_json::from_str(r#"{"holding_cost_rate": 0.02}"#).unwrap();
        assert_eq!(config.holding_cost_rate, 0.02);
        assert_eq!(config.producing_plant_type, "IU");
        assert_eq!(config.transport_modes.len(), 3);
    }

    #[test]
    fn test_mode_detail_marks_unknown_codes() {
        let config = PlannerConfig::default();
        let road = config.mode_detail("T1");
        assert_eq!(road.name.as_option().map(String::as_str), Some("Road"));
        assert_eq!(road.emission_factor.into_option(), Some(0.062));

        let unknown = config.mode_detail("T9");
        assert_eq!(unknown.code, "T9");
        assert!(!unknown.vehicle_capacity.is_available());
    }
}
