// ==========================================
// 熟料供应网络 - 数据集层
// ==========================================
// 职责: 一致性校验 → 索引化存储 → 路线有效性索引 → 快照
// 红线: 校验失败时不产生快照，当前数据集保持不变
// ==========================================

pub mod route_index;
pub mod snapshot;
pub mod store;
pub mod validator;

// 重导出核心类型
pub use route_index::{PairCompleteness, RouteValidityIndex};
pub use snapshot::{DatasetHandle, DatasetMetadata, DatasetSnapshot, RouteModes};
pub use store::{DatasetStore, KeyedTable};
pub use validator::{ConsistencyReport, ConsistencyValidator, SchemaIssue};
