// ==========================================
// 熟料供应网络 - 核心库
// ==========================================
// 职责: 数据集一致性校验、路线有效性索引、单路线平衡与成本计算
// 系统定位: 决策支持系统 (单路线闭式计算，非全网优化)
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 结构契约、记录与结果模型
pub mod domain;

// 导入层 - 外部数据
pub mod importer;

// 数据集层 - 校验、索引、快照
pub mod dataset;

// 引擎层 - 选择校验与计算
pub mod engine;

// 配置层 - 计算参数
pub mod config;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 查询接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

pub use domain::{FieldValue, ModelFormulation, Period, RawTable, RouteBalance, RouteQuery, TableKind};
pub use dataset::{DatasetHandle, DatasetMetadata, DatasetSnapshot, RouteValidityIndex};
pub use engine::{BalanceCalculator, Selection, SelectionIssue};
pub use config::{ConfigManager, PlannerConfig};
pub use api::{ApiError, ApiResult, LoadOutcome, PlannerApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "熟料供应网络路线平衡系统";
