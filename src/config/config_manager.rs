// ==========================================
// 熟料供应网络 - 配置管理器
// ==========================================
// 职责: 配置加载、覆写、快照
// 来源优先级: 显式路径 > ROUTE_BALANCE_CONFIG > 用户配置目录 > 内置默认
// ==========================================

use crate::config::planner_config::PlannerConfig;
use std::error::Error;
use std::path::{Path, PathBuf};

/// 指定配置文件的环境变量
pub const CONFIG_ENV_VAR: &str = "ROUTE_BALANCE_CONFIG";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: PlannerConfig,
    source: Option<PathBuf>,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::with_config(PlannerConfig::default())
    }
}

impl ConfigManager {
    /// 直接使用给定配置
    pub fn with_config(config: PlannerConfig) -> Self {
        Self {
            config,
            source: None,
        }
    }

    /// 从 JSON 文件加载
    ///
    /// # 参数
    /// - path: 配置文件路径
    ///
    /// # 返回
    /// - Ok(ConfigManager): 缺失字段取默认值
    /// - Err: 文件读取或 JSON 解析失败、取值非法
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| format!("配置读取失败 ({}): {}", path.display(), e))?;
        let config: PlannerConfig = serde_json::from_str(&raw)?;

        let problems = config.validate();
        if !problems.is_empty() {
            return Err(format!("配置值非法: {}", problems.join("; ")).into());
        }

        tracing::info!(path = %path.display(), modes = config.transport_modes.len(), "配置已加载");
        Ok(Self {
            config,
            source: Some(path.to_path_buf()),
        })
    }

    /// 按优先级查找配置：环境变量 > 用户配置目录 > 内置默认
    pub fn load() -> Result<Self, Box<dyn Error>> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let path = path.trim();
            if !path.is_empty() {
                return Self::from_file(path);
            }
        }

        if let Some(path) = default_config_path() {
            if path.exists() {
                return Self::from_file(path);
            }
        }

        tracing::debug!("未找到配置文件，使用内置默认配置");
        Ok(Self::default())
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// 配置来源文件（None 表示内置默认）
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// 获取配置快照（JSON）
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        Ok(serde_json::to_string(&self.config)?)
    }
}

/// 用户配置目录下的默认配置路径
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("route-balance").join("config.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_from_file_overrides_fields() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{"transport_modes":[{{"code":"T1","name":"Road","vehicle_capacity":25}}],"holding_cost_rate":0.05}}"#
        )
        .unwrap();

        let manager = ConfigManager::from_file(file.path()).unwrap();
        assert_eq!(manager.config().holding_cost_rate, 0.05);
        assert_eq!(manager.config().transport_modes.len(), 1);
        assert_eq!(manager.config().safety_stock_tolerance, 0.01);
        assert!(manager.source().is_some());
    }

    #[test]
    fn test_from_file_rejects_invalid_values() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"holding_cost_rate": -1.0}}"#).unwrap();

        assert!(ConfigManager::from_file(file.path()).is_err());
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let manager = ConfigManager::default();
        let snapshot = manager.get_config_snapshot().unwrap();
        let parsed: PlannerConfig = serde_json::from_str(&snapshot).unwrap();
        assert_eq!(&parsed, manager.config());
    }
}
