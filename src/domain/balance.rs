// ==========================================
// 熟料供应网络 - 单路线平衡结果模型
// ==========================================
// 职责: 平衡计算器的输入查询与结构化输出
// 红线: 原始取值保留 FieldValue 状态，计算值为展开后的数值
// ==========================================

use crate::domain::records::StrategicConstraintRecord;
use crate::domain::types::{FieldValue, Period};
use serde::{Deserialize, Serialize};

// ==========================================
// RouteQuery - 路线查询 (起点, 终点, 运输方式, 周期)
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RouteQuery {
    pub source: String,
    pub destination: String,
    pub mode: String,
    pub period: Period,
}

impl RouteQuery {
    pub fn new(source: &str, destination: &str, mode: &str, period: Period) -> Self {
        Self {
            source: source.to_string(),
            destination: destination.to_string(),
            mode: mode.to_string(),
            period,
        }
    }
}

// ==========================================
// ModeDetail - 运输方式明细（参考表中不存在则为 Unavailable）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeDetail {
    pub code: String,
    pub name: FieldValue<String>,
    pub vehicle_capacity: FieldValue<f64>,
    pub emission_factor: FieldValue<f64>,
}

// ==========================================
// RouteFacts - 从数据集逐字段取得的原始值
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteFacts {
    // ===== 路线 (Logistics) =====
    pub freight_cost: FieldValue<f64>,
    pub handling_cost: FieldValue<f64>,
    pub quantity_multiplier: FieldValue<f64>,

    // ===== 运输方式参考表 =====
    pub mode_name: FieldValue<String>,
    pub vehicle_capacity: FieldValue<f64>,

    // ===== 起点 =====
    pub source_type: FieldValue<String>,
    pub source_num_sources: FieldValue<f64>,
    pub production_cost: FieldValue<f64>,
    pub source_capacity: FieldValue<f64>,
    pub source_demand: FieldValue<f64>,
    pub source_opening_stock: FieldValue<f64>,
    pub source_closing_min: FieldValue<f64>,
    pub source_closing_max: FieldValue<f64>,

    // ===== 终点 =====
    pub destination_type: FieldValue<String>,
    pub destination_num_sources: FieldValue<f64>,
    pub destination_demand: FieldValue<f64>,
    pub min_fulfillment_pct: FieldValue<f64>,
    pub destination_opening_stock: FieldValue<f64>,
    pub destination_closing_min: FieldValue<f64>,
    pub destination_closing_max: FieldValue<f64>,

    // ===== 派生（任一输入缺失则缺失）=====
    pub total_logistics_cost: FieldValue<f64>,
    pub total_delivered_cost: FieldValue<f64>,
    pub stock_gap_source: FieldValue<f64>,      // 期初 - 期末下限
    pub stock_gap_destination: FieldValue<f64>,
    /// 产能 + 起点期初 ≥ 终点需求 + 终点期末下限（任一缺失为 false）
    pub can_fulfill_demand: bool,
}

// ==========================================
// 决策变量
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionVariables {
    pub production: ProductionDecision,
    pub shipment: ShipmentDecision,
    pub trips: TripDecision,
    pub source_ending_inventory: InventoryDecision,
    pub destination_ending_inventory: InventoryDecision,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionDecision {
    pub value: f64,
    pub minimum_required: f64,
    pub producing_node: bool, // 起点是否为生产型工厂
    pub formula: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipmentDecision {
    pub value: f64,
    pub minimum_required: f64,
    pub excess: f64, // 车辆取整带来的超出量
    pub formula: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripDecision {
    pub count: u64,
    pub vehicle_capacity: f64,
    pub formula: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryDecision {
    pub value: f64,
    pub safety_stock: f64,
    pub meets_safety_stock: bool,
}

// ==========================================
// 目标函数分解
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveBreakdown {
    pub production_cost: ProductionCostComponent,
    pub transport_cost: TransportCostComponent,
    pub holding_cost: HoldingCostComponent,
    pub formula: String,
    pub total: f64,
    pub fulfilled_demand: f64,
    pub cost_per_unit_demand: f64,
    pub unit_costs: UnitCosts,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionCostComponent {
    pub rate: f64,
    pub quantity: f64,
    pub value: f64,
    pub formula: String,
    pub calculation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportCostComponent {
    pub freight_rate: f64,
    pub handling_rate: f64,
    pub freight_total: f64,
    pub handling_total: f64,
    pub value: f64,
    pub formula: String,
    pub calculation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingCostComponent {
    pub rate: f64,
    pub source: NodeHolding,
    pub destination: NodeHolding,
    pub value: f64,
    pub formula: String,
    pub calculation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeHolding {
    pub ending_inventory: f64,
    pub safety_stock: f64,
    pub excess_inventory: f64,
    pub cost: f64,
    pub calculation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitCosts {
    pub production: f64,
    pub transport: f64,
    pub delivered: f64,
}

// ==========================================
// 物料平衡: I[t] = I[t-1] + P + 入库 - 出库 - D
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MassBalance {
    pub source: NodeBalance,
    pub destination: NodeBalance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeBalance {
    pub node: String,
    pub opening: f64,
    pub production: f64,
    pub inbound: f64,
    pub outbound: f64,
    pub demand: f64,
    pub ending: f64,
    pub equation: String, // 代入数值后的平衡方程
}

impl NodeBalance {
    /// 平衡方程残差（应为 0）
    pub fn residual(&self) -> f64 {
        self.opening + self.production + self.inbound - self.outbound - self.demand - self.ending
    }
}

// ==========================================
// 约束检查
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintChecks {
    pub production_capacity: CapacityCheck,
    pub shipment_upper_bound: ShipmentBoundCheck,
    pub source_inventory: InventoryBoundCheck,
    pub destination_inventory: InventoryBoundCheck,
    pub strategic: Vec<StrategicConstraintRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityCheck {
    pub production: f64,
    pub capacity: f64,
    pub satisfied: bool,
    pub slack: f64,
    pub utilization_pct: f64,
    pub formula: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipmentBoundCheck {
    pub shipment: f64,
    pub bound: f64,
    pub vehicle_capacity: f64,
    pub satisfied: bool,
    pub formula: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryBoundCheck {
    pub ending: f64,
    pub safety_stock: f64,
    pub maximum: Option<f64>, // None = 无上界
    pub meets_minimum: bool,
    pub within_maximum: bool,
    pub satisfied: bool,
    pub formula: String,
}

// ==========================================
// 绩效指标
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteMetrics {
    pub capacity_utilization_pct: f64,
    pub demand_fulfillment_pct: f64,
    pub inventory_turnover_source: f64,
    pub inventory_turnover_destination: f64,
    pub days_of_supply_source: Option<f64>,
    pub days_of_supply_destination: Option<f64>,
    pub transport_efficiency_pct: f64,
    pub cost_breakdown_pct: CostBreakdownPct,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdownPct {
    pub production: f64,
    pub transport: f64,
    pub holding: f64,
}

// ==========================================
// 可行性判定
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueKind {
    CapacityShortfall,
    SourceSafetyStock,
    DestinationSafetyStock,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeasibilityIssue {
    pub kind: IssueKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feasibility {
    pub is_feasible: bool,
    pub capacity_violation: f64,
    pub issues: Vec<FeasibilityIssue>,
}

impl Feasibility {
    pub fn has_issue(&self, kind: IssueKind) -> bool {
        self.issues.iter().any(|i| i.kind == kind)
    }
}

// ==========================================
// RouteBalance - 完整输出
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteBalance {
    pub query: RouteQuery,
    pub facts: RouteFacts,
    pub decisions: DecisionVariables,
    pub objective: ObjectiveBreakdown,
    pub mass_balance: MassBalance,
    pub constraints: ConstraintChecks,
    pub metrics: RouteMetrics,
    pub feasibility: Feasibility,
}
