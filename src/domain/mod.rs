// ==========================================
// 熟料供应网络 - 领域模型层
// ==========================================
// 职责: 定义结构契约、类型化记录、计算结果模型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod balance;
pub mod formulation;
pub mod records;
pub mod schema;
pub mod table;
pub mod types;

// 重导出核心类型
pub use balance::{
    ConstraintChecks, DecisionVariables, Feasibility, FeasibilityIssue, IssueKind, MassBalance,
    ModeDetail, NodeBalance, ObjectiveBreakdown, RouteBalance, RouteFacts, RouteMetrics,
    RouteQuery,
};
pub use formulation::{DataSourceSpec, FormulaTerm, ModelFormulation, ObjectiveSpec, VariableSpec};
pub use records::{
    CapacityRecord, ClosingStockRecord, DemandRecord, HubOpeningStockRecord, LogisticsRecord,
    OpeningStockRecord, PlantPeriodRecord, PlantTypeRecord, ProductionCostRecord,
    StrategicConstraintRecord,
};
pub use schema::{Column, ColumnSpec, TableKind, TableSpec};
pub use table::RawTable;
pub use types::{BoundType, FieldValue, Period, ValueType};
