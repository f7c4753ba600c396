// ==========================================
// 熟料供应网络 - 配置层
// ==========================================
// 职责: 运输方式参考表与计算常量的加载与管理
// 存储: JSON 文件（可选）
// ==========================================

pub mod config_manager;
pub mod planner_config;

// 重导出核心配置
pub use config_manager::{default_config_path, ConfigManager, CONFIG_ENV_VAR};
pub use planner_config::{PlannerConfig, TransportModeSpec};
