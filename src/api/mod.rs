// ==========================================
// 熟料供应网络 - API层
// ==========================================
// 职责: 面向外部请求层的查询与计算入口
// 红线: 选择错误返回原因列表，不返回部分结果
// ==========================================

pub mod error;
pub mod planner_api;

// 重导出
pub use error::{ApiError, ApiResult};
pub use planner_api::{LoadOutcome, PlannerApi, PlantDetails, SelectionCheck};
