// ==========================================
// 熟料供应网络 - 引擎层
// ==========================================
// 职责: 选择校验 + 单路线平衡与成本计算 + 模型说明
// 红线: 引擎只读数据集快照，不持有状态；所有违反都输出原因
// ==========================================

pub mod balance_calculator;
pub mod formulation;
pub mod selection;

// 重导出核心引擎
pub use balance_calculator::BalanceCalculator;
pub use selection::{Selection, SelectionIssue, SelectionValidator};
