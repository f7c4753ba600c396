// ==========================================
// 熟料供应网络 - 单路线平衡与成本计算引擎
// ==========================================
// 职责: 对一个已校验的 (起点, 终点, 运输方式, 周期) 闭式计算
//       决策变量 + 目标函数分解 + 物料平衡 + 约束检查 + 可行性
// 红线: 纯函数；缺失值仅在公式求值处展开为默认值
// ==========================================
// 计算顺序:
// 1) 所需发运 = max(终点期末下限 + 终点需求 - 终点期初, 0)
// 2) 车次 = ceil(所需发运 / 车辆容量)，发运量 = 车次 × 车辆容量
// 3) 所需产量（仅生产型起点）= max(起点期末下限 + 发运量 + 起点需求 - 起点期初, 0)
// 4) 产量超产能（产能 > 0）→ 封顶并记录缺口
// 5) 期末库存 = 期初 + 产量 + 入库 - 出库 - 需求
// 6) 约束检查 → 7) 目标函数分解 → 8) 可行性
// 各分项同时给出代入数值后的公式文本
// ==========================================

use crate::config::PlannerConfig;
use crate::dataset::store::DatasetStore;
use crate::domain::balance::{
    CapacityCheck, ConstraintChecks, CostBreakdownPct, DecisionVariables, Feasibility,
    FeasibilityIssue, HoldingCostComponent, InventoryBoundCheck, InventoryDecision, IssueKind,
    MassBalance, NodeBalance, NodeHolding, ObjectiveBreakdown, ProductionCostComponent,
    ProductionDecision, RouteBalance, RouteFacts, RouteMetrics, RouteQuery, ShipmentBoundCheck,
    ShipmentDecision, TransportCostComponent, TripDecision, UnitCosts,
};
use crate::domain::types::{FieldValue, Period};
use crate::i18n::t_with_args;
use tracing::instrument;

// ==========================================
// BalanceCalculator
// ==========================================
pub struct BalanceCalculator {
    config: PlannerConfig,
}

/// 目标函数（符号形式）
pub(crate) const OBJECTIVE_FORMULA: &str =
    "Z = Σ(C_prod × P) + Σ(C_fr + C_hand) × X + Σ(C_hold × max(I - SS, 0))";

/// 节点取值（已展开为数值）
struct NodeInputs {
    opening: f64,
    demand: f64,
    closing_min: f64,
    closing_max: Option<f64>,
}

impl BalanceCalculator {
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    // ==========================================
    // 原始取值
    // ==========================================

    /// 逐字段读取路线相关的原始值（保留缺失状态）
    pub fn facts(&self, store: &DatasetStore, query: &RouteQuery) -> RouteFacts {
        let (source, destination, period) = (query.source.as_str(), query.destination.as_str(), query.period);
        let route = store.route(source, destination, &query.mode, period);
        let mode = self.config.transport_mode(&query.mode);

        let freight_cost: FieldValue<f64> = route.and_then(|r| r.freight_cost).into();
        let handling_cost: FieldValue<f64> = route.and_then(|r| r.handling_cost).into();
        let production_cost = store.production_cost(source, period);
        let total_logistics_cost = freight_cost.combine(handling_cost, |f, h| f + h);
        let total_delivered_cost = total_logistics_cost.combine(production_cost, |l, p| l + p);

        let source_capacity = store.capacity(source, period);
        let source_opening_stock = store.opening_stock(source);
        let source_closing_min = store.closing_min(source, period);
        let destination_demand = store.demand(destination, period);
        let destination_opening_stock = store.opening_stock(destination);
        let destination_closing_min = store.closing_min(destination, period);

        let available = source_capacity.combine(source_opening_stock, |c, o| c + o);
        let needed = destination_demand.combine(destination_closing_min, |d, m| d + m);
        let can_fulfill_demand = available
            .combine(needed, |a, n| a - n)
            .map(|surplus| surplus >= 0.0)
            .value_or(false);

        RouteFacts {
            freight_cost,
            handling_cost,
            quantity_multiplier: route.and_then(|r| r.quantity_multiplier).into(),
            mode_name: mode.map(|m| m.name.clone()).into(),
            vehicle_capacity: mode.map(|m| m.vehicle_capacity).into(),

            source_type: store.plant_type(source),
            source_num_sources: store.source_count(source),
            production_cost,
            source_capacity,
            source_demand: store.demand(source, period),
            source_opening_stock,
            source_closing_min,
            source_closing_max: store.closing_max(source, period),

            destination_type: store.plant_type(destination),
            destination_num_sources: store.source_count(destination),
            destination_demand,
            min_fulfillment_pct: store.min_fulfillment_pct(destination, period),
            destination_opening_stock,
            destination_closing_min,
            destination_closing_max: store.closing_max(destination, period),

            total_logistics_cost,
            total_delivered_cost,
            stock_gap_source: source_opening_stock.combine(source_closing_min, |o, m| o - m),
            stock_gap_destination: destination_opening_stock
                .combine(destination_closing_min, |o, m| o - m),
            can_fulfill_demand,
        }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 计算单路线单周期的平衡与成本
    ///
    /// # 参数
    /// - store: 当前数据集
    /// - query: 已通过选择校验的路线查询
    ///
    /// # 返回
    /// 完整结果；约束违反体现在 feasibility 中而非错误
    #[instrument(skip(self, store), fields(
        source = %query.source,
        destination = %query.destination,
        mode = %query.mode,
        period = query.period
    ))]
    pub fn compute(&self, store: &DatasetStore, query: &RouteQuery) -> RouteBalance {
        let facts = self.facts(store, query);
        if !facts.vehicle_capacity.is_available() {
            tracing::warn!(mode = %query.mode, "运输方式不在参考表中，车次按 0 计");
        }
        let (source, destination, mode, period) = (
            query.source.as_str(),
            query.destination.as_str(),
            query.mode.as_str(),
            query.period,
        );

        let freight = facts.freight_cost.value_or(0.0);
        let handling = facts.handling_cost.value_or(0.0);
        let unit_production_cost = facts.production_cost.value_or(0.0);
        let capacity = facts.source_capacity.value_or(0.0);
        let vehicle_capacity = facts.vehicle_capacity.value_or(0.0);
        let src = NodeInputs {
            opening: facts.source_opening_stock.value_or(0.0),
            demand: facts.source_demand.value_or(0.0),
            closing_min: facts.source_closing_min.value_or(0.0),
            closing_max: facts.source_closing_max.into_option(),
        };
        let dst = NodeInputs {
            opening: facts.destination_opening_stock.value_or(0.0),
            demand: facts.destination_demand.value_or(0.0),
            closing_min: facts.destination_closing_min.value_or(0.0),
            closing_max: facts.destination_closing_max.into_option(),
        };

        // ===== 1-2. 发运与车次 =====
        let required_shipment = (dst.closing_min + dst.demand - dst.opening).max(0.0);
        let trips = trip_count(required_shipment, vehicle_capacity);
        let shipment = trips as f64 * vehicle_capacity;

        // ===== 3-4. 产量与产能 =====
        let producing_node = facts
            .source_type
            .as_option()
            .is_some_and(|t| *t == self.config.producing_plant_type);
        let required_production = if producing_node {
            (src.closing_min + shipment + src.demand - src.opening).max(0.0)
        } else {
            0.0
        };
        let (production, capacity_violation) = if producing_node && capacity > 0.0 && required_production > capacity {
            (capacity, required_production - capacity)
        } else {
            (required_production, 0.0)
        };

        // ===== 5. 物料平衡 =====
        let mass_balance = MassBalance {
            source: node_balance(source, period, &src, production, 0.0, shipment),
            destination: node_balance(destination, period, &dst, 0.0, shipment, 0.0),
        };
        let source_ending = mass_balance.source.ending;
        let destination_ending = mass_balance.destination.ending;

        // ===== 6. 约束检查 =====
        let tolerance = self.config.safety_stock_tolerance;
        let source_inventory = inventory_bounds(source, period, source_ending, &src, tolerance);
        let destination_inventory =
            inventory_bounds(destination, period, destination_ending, &dst, tolerance);
        let shipment_bound = trips as f64 * vehicle_capacity;
        let constraints = ConstraintChecks {
            production_capacity: CapacityCheck {
                production,
                capacity,
                satisfied: production <= capacity,
                slack: capacity - production,
                utilization_pct: percentage(production, capacity),
                formula: format!("P[{source},{period}] ≤ Cap[{source},{period}]"),
            },
            shipment_upper_bound: ShipmentBoundCheck {
                shipment,
                bound: shipment_bound,
                vehicle_capacity,
                satisfied: shipment <= shipment_bound,
                formula: format!("X[{source},{destination},{mode},{period}] ≤ T × Cap_m"),
            },
            strategic: store.applicable_constraints(source, destination, mode, period),
            source_inventory,
            destination_inventory,
        };

        let decisions = DecisionVariables {
            production: ProductionDecision {
                value: production,
                minimum_required: required_production,
                producing_node,
                formula: if producing_node {
                    format!(
                        "max(0, SS_src + X + D_src - I_open) = max(0, {:.0} + {:.0} + {:.0} - {:.0}) = {:.0}",
                        src.closing_min, shipment, src.demand, src.opening, required_production
                    )
                } else {
                    "N/A".to_string()
                },
            },
            shipment: ShipmentDecision {
                value: shipment,
                minimum_required: required_shipment,
                excess: (shipment - required_shipment).max(0.0),
                formula: format!("T × Cap_m = {} × {} = {:.0}", trips, vehicle_capacity, shipment),
            },
            trips: TripDecision {
                count: trips,
                vehicle_capacity,
                formula: format!("ceil({:.0} / {}) = {}", required_shipment, vehicle_capacity, trips),
            },
            source_ending_inventory: InventoryDecision {
                value: source_ending,
                safety_stock: src.closing_min,
                meets_safety_stock: constraints.source_inventory.meets_minimum,
            },
            destination_ending_inventory: InventoryDecision {
                value: destination_ending,
                safety_stock: dst.closing_min,
                meets_safety_stock: constraints.destination_inventory.meets_minimum,
            },
        };

        // ===== 7. 目标函数 =====
        let holding_rate = if unit_production_cost > 0.0 {
            unit_production_cost * self.config.holding_cost_rate
        } else {
            0.0
        };
        let source_holding = node_holding(source_ending, src.closing_min, holding_rate);
        let destination_holding = node_holding(destination_ending, dst.closing_min, holding_rate);

        let production_value = unit_production_cost * production;
        let production_cost = ProductionCostComponent {
            rate: unit_production_cost,
            quantity: production,
            value: production_value,
            formula: format!("C_prod[{source},{period}] × P[{source},{period}]"),
            calculation: format!("{:.2} × {:.0} = {:.2}", unit_production_cost, production, production_value),
        };
        let transport_value = (freight + handling) * shipment;
        let transport_cost = TransportCostComponent {
            freight_rate: freight,
            handling_rate: handling,
            freight_total: freight * shipment,
            handling_total: handling * shipment,
            value: transport_value,
            formula: format!("(C_fr + C_hand) × X[{source},{destination},{mode},{period}]"),
            calculation: format!("({:.2} + {:.2}) × {:.0} = {:.2}", freight, handling, shipment, transport_value),
        };
        let holding_value = source_holding.cost + destination_holding.cost;
        let holding_cost = HoldingCostComponent {
            rate: holding_rate,
            value: holding_value,
            formula: "h × max(I[i,t] - SS[i], 0)".to_string(),
            calculation: format!(
                "{:.2} + {:.2} = {:.2}",
                source_holding.cost, destination_holding.cost, holding_value
            ),
            source: source_holding,
            destination: destination_holding,
        };
        let total = production_cost.value + transport_cost.value + holding_cost.value;
        let cost_per_unit_demand = if dst.demand > 0.0 { total / dst.demand } else { 0.0 };

        let metrics = RouteMetrics {
            capacity_utilization_pct: percentage(production, capacity),
            demand_fulfillment_pct: if dst.demand > 0.0 {
                (shipment / dst.demand * 100.0).min(100.0)
            } else {
                100.0
            },
            inventory_turnover_source: ratio(shipment, src.opening),
            inventory_turnover_destination: ratio(dst.demand, dst.opening),
            days_of_supply_source: days_of_supply(source_ending, src.demand, self.config.days_per_period),
            days_of_supply_destination: days_of_supply(destination_ending, dst.demand, self.config.days_per_period),
            transport_efficiency_pct: percentage(shipment, shipment_bound),
            cost_breakdown_pct: CostBreakdownPct {
                production: percentage(production_cost.value, total),
                transport: percentage(transport_cost.value, total),
                holding: percentage(holding_cost.value, total),
            },
        };

        let objective = ObjectiveBreakdown {
            production_cost,
            transport_cost,
            holding_cost,
            formula: OBJECTIVE_FORMULA.to_string(),
            total,
            fulfilled_demand: dst.demand,
            cost_per_unit_demand,
            unit_costs: UnitCosts {
                production: unit_production_cost,
                transport: freight + handling,
                delivered: unit_production_cost + freight + handling,
            },
        };

        // ===== 8. 可行性 =====
        let mut issues = Vec::new();
        if capacity_violation > 0.0 {
            issues.push(FeasibilityIssue {
                kind: IssueKind::CapacityShortfall,
                message: t_with_args(
                    "feasibility.capacity_shortfall",
                    &[
                        ("required", &format!("{:.0}", required_production)),
                        ("capacity", &format!("{:.0}", capacity)),
                        ("violation", &format!("{:.0}", capacity_violation)),
                    ],
                ),
            });
        }
        if !decisions.source_ending_inventory.meets_safety_stock {
            issues.push(FeasibilityIssue {
                kind: IssueKind::SourceSafetyStock,
                message: t_with_args(
                    "feasibility.source_safety_stock",
                    &[
                        ("inventory", &format!("{:.0}", source_ending)),
                        ("safety_stock", &format!("{:.0}", src.closing_min)),
                    ],
                ),
            });
        }
        if !decisions.destination_ending_inventory.meets_safety_stock {
            issues.push(FeasibilityIssue {
                kind: IssueKind::DestinationSafetyStock,
                message: t_with_args(
                    "feasibility.destination_safety_stock",
                    &[
                        ("inventory", &format!("{:.0}", destination_ending)),
                        ("safety_stock", &format!("{:.0}", dst.closing_min)),
                    ],
                ),
            });
        }
        let feasibility = Feasibility {
            is_feasible: issues.is_empty(),
            capacity_violation,
            issues,
        };

        tracing::debug!(
            trips,
            shipment,
            production,
            total,
            feasible = feasibility.is_feasible,
            "路线平衡计算完成"
        );

        RouteBalance {
            query: query.clone(),
            facts,
            decisions,
            objective,
            mass_balance,
            constraints,
            metrics,
            feasibility,
        }
    }
}

// ==========================================
// 辅助函数
// ==========================================

/// 车次：容量与所需发运均为正时向上取整，否则为 0
fn trip_count(required_shipment: f64, vehicle_capacity: f64) -> u64 {
    if vehicle_capacity > 0.0 && required_shipment > 0.0 {
        (required_shipment / vehicle_capacity).ceil() as u64
    } else {
        0
    }
}

/// 节点物料平衡: I = 期初 + 产量 + 入库 - 出库 - 需求
fn node_balance(node: &str, period: Period, inputs: &NodeInputs, production: f64, inbound: f64, outbound: f64) -> NodeBalance {
    let ending = inputs.opening + production + inbound - outbound - inputs.demand;
    NodeBalance {
        node: node.to_string(),
        opening: inputs.opening,
        production,
        inbound,
        outbound,
        demand: inputs.demand,
        ending,
        equation: format!(
            "I[{node},{period}] = {:.0} + {:.0} + {:.0} - {:.0} - {:.0} = {:.0}",
            inputs.opening, production, inbound, outbound, inputs.demand, ending
        ),
    }
}

fn inventory_bounds(node: &str, period: Period, ending: f64, inputs: &NodeInputs, tolerance: f64) -> InventoryBoundCheck {
    let meets_minimum = ending >= inputs.closing_min - tolerance;
    let within_maximum = inputs.closing_max.map_or(true, |max| ending <= max);
    InventoryBoundCheck {
        ending,
        safety_stock: inputs.closing_min,
        maximum: inputs.closing_max,
        meets_minimum,
        within_maximum,
        satisfied: meets_minimum && within_maximum,
        formula: format!("SS[{node}] ≤ I[{node},{period}] ≤ MaxCap[{node}]"),
    }
}

/// 持有成本：仅对安全库存以上部分计费
fn node_holding(ending: f64, safety_stock: f64, rate: f64) -> NodeHolding {
    let excess_inventory = (ending - safety_stock).max(0.0);
    let cost = rate * excess_inventory;
    NodeHolding {
        ending_inventory: ending,
        safety_stock,
        excess_inventory,
        cost,
        calculation: format!(
            "{:.4} × max({:.0} - {:.0}, 0) = {:.4} × {:.0} = {:.2}",
            rate, ending, safety_stock, rate, excess_inventory, cost
        ),
    }
}

fn percentage(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

fn days_of_supply(ending: f64, demand: f64, days_per_period: f64) -> Option<f64> {
    (demand > 0.0).then(|| ending / (demand / days_per_period))
}
