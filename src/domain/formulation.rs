// ==========================================
// 熟料供应网络 - 数学模型描述
// ==========================================
// 职责: 决策变量、目标函数、约束及其数据来源的静态说明
// 说明: 与数据集无关，仅依赖计算参数
// ==========================================

use crate::domain::balance::ModeDetail;
use serde::{Deserialize, Serialize};

/// 决策变量说明
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableSpec {
    pub symbol: String,
    pub description: String,
    pub unit: String,
    pub domain: String, // 取值域，如 "≥ 0 (Continuous)"
}

/// 公式项（目标分项 / 约束）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormulaTerm {
    pub key: String, // 稳定标识，不随语言变化
    pub name: String,
    pub formula: String,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveSpec {
    pub sense: String,
    pub formula: String,
    pub components: Vec<FormulaTerm>,
}

/// 数据表来源说明
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSourceSpec {
    pub table: String,
    pub file: String,
    pub required: bool,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelFormulation {
    pub name: String,
    pub description: String,
    pub decision_variables: Vec<VariableSpec>,
    pub objective: ObjectiveSpec,
    pub constraints: Vec<FormulaTerm>,
    pub data_sources: Vec<DataSourceSpec>,
    pub transport_modes: Vec<ModeDetail>,
}

impl ModelFormulation {
    pub fn constraint(&self, key: &str) -> Option<&FormulaTerm> {
        self.constraints.iter().find(|c| c.key == key)
    }
}
