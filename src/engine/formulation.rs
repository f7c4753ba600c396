// ==========================================
// 熟料供应网络 - 数学模型描述生成
// ==========================================
// 职责: 由计算参数生成模型说明（变量/目标/约束/数据来源/运输方式）
// 说明: 与 compute 使用同一组符号
// ==========================================

use crate::domain::formulation::{
    DataSourceSpec, FormulaTerm, ModelFormulation, ObjectiveSpec, VariableSpec,
};
use crate::domain::schema::{
    TableKind, CAPACITY, CLOSING_STOCK, CONSTRAINTS, DEMAND, LOGISTICS, OPENING_STOCK,
    PRODUCTION_COST,
};
use crate::engine::balance_calculator::{BalanceCalculator, OBJECTIVE_FORMULA};
use crate::i18n::{t, t_with_args};

fn term(key: &str, formula: String, source: String) -> FormulaTerm {
    FormulaTerm {
        key: key.to_string(),
        name: t(&format!("model.term.{}", key)),
        formula,
        source,
    }
}

fn variable(symbol: &str, key: &str, unit: &str, integer: bool) -> VariableSpec {
    VariableSpec {
        symbol: symbol.to_string(),
        description: t(&format!("model.variable.{}", key)),
        unit: unit.to_string(),
        domain: if integer { "≥ 0 (Integer)" } else { "≥ 0 (Continuous)" }.to_string(),
    }
}

impl BalanceCalculator {
    /// 模型说明（不依赖数据集）
    pub fn formulation(&self) -> ModelFormulation {
        let config = self.config();
        let holding_pct = format!("{}", config.holding_cost_rate * 100.0);

        let decision_variables = vec![
            variable("P[i,t]", "production", "tons", false),
            variable("X[i,j,m,t]", "shipment", "tons", false),
            variable("I[i,t]", "inventory", "tons", false),
            variable("T[i,j,m,t]", "trips", "trips", true),
        ];

        let objective = ObjectiveSpec {
            sense: "minimize".to_string(),
            formula: OBJECTIVE_FORMULA.to_string(),
            components: vec![
                term(
                    "production_cost",
                    "Σ C_prod[i,t] × P[i,t]".to_string(),
                    PRODUCTION_COST.file_name(),
                ),
                term(
                    "transport_cost",
                    "Σ (C_fr[r,m,t] + C_hand[r,m,t]) × X[r,m,t]".to_string(),
                    LOGISTICS.file_name(),
                ),
                term(
                    "holding_cost",
                    "Σ C_hold × max(I[i,t] - SS[i], 0)".to_string(),
                    t_with_args("model.source.holding", &[("pct", &holding_pct)]),
                ),
            ],
        };

        let constraints = vec![
            term(
                "mass_balance",
                "I[i,t] = I[i,t-1] + P[i,t] + Σ X[j,i,m,t] - Σ X[i,j,m,t] - D[i,t]".to_string(),
                format!("{}, {}", OPENING_STOCK.file_name(), DEMAND.file_name()),
            ),
            term(
                "production_capacity",
                format!("P[i,t] ≤ Cap[i,t]  ∀ i ∈ {}", config.producing_plant_type),
                CAPACITY.file_name(),
            ),
            term(
                "shipment_upper_bound",
                "X[i,j,m,t] ≤ T[i,j,m,t] × Cap_m".to_string(),
                format!("{}, {}", LOGISTICS.file_name(), t("model.source.mode_reference")),
            ),
            term(
                "safety_stock",
                "I[i,t] ≥ SS[i]  ∀ i,t".to_string(),
                format!("{} (MIN CLOSE STOCK)", CLOSING_STOCK.file_name()),
            ),
            term(
                "max_inventory",
                "I[i,t] ≤ MaxCap[i]  ∀ i,t".to_string(),
                format!("{} (MAX CLOSE STOCK)", CLOSING_STOCK.file_name()),
            ),
            term(
                "strategic",
                "BOUND TYPEID ∈ {E, L, G}, VALUE TYPEID ∈ {C, P}".to_string(),
                CONSTRAINTS.file_name(),
            ),
        ];

        let data_sources = TableKind::ALL
            .iter()
            .map(|kind| {
                let spec = kind.spec();
                DataSourceSpec {
                    table: spec.name.to_string(),
                    file: spec.file_name(),
                    required: spec.required,
                    description: t(&format!("model.table.{}", spec.name)),
                }
            })
            .collect();

        ModelFormulation {
            name: t("model.name"),
            description: t("model.description"),
            decision_variables,
            objective,
            constraints,
            data_sources,
            transport_modes: config
                .transport_modes
                .iter()
                .map(|m| config.mode_detail(&m.code))
                .collect(),
        }
    }
}
