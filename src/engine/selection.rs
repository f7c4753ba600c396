// ==========================================
// 熟料供应网络 - 选择校验引擎
// ==========================================
// 职责: 在计算前按路线有效性索引复核 (起点, 终点, 运输方式, 周期)
// 红线: 任一校验失败即返回原因列表，不做部分计算
// ==========================================
// 校验顺序:
// 1) 数据集未加载
// 2) 起点未知 → 3) 路线不完整 → 4) 运输方式不可用
// 5) 周期未知
// 6) 该元组无精确路线行 → 7) 终点在该周期无需求行
// ==========================================

use crate::dataset::snapshot::DatasetSnapshot;
use crate::domain::types::Period;
use crate::i18n::{t, t_with_args};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// Selection - 部分或完整的选择
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub source: Option<String>,
    pub destination: Option<String>,
    pub mode: Option<String>,
    pub period: Option<Period>,
}

impl Selection {
    pub fn route(source: &str, destination: &str, mode: &str, period: Period) -> Self {
        Self {
            source: Some(source.to_string()),
            destination: Some(destination.to_string()),
            mode: Some(mode.to_string()),
            period: Some(period),
        }
    }
}

// ==========================================
// SelectionIssue - 选择错误
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SelectionIssue {
    NotLoaded,
    UnknownSource { source: String },
    UnknownDestination { destination: String },
    UnknownRoute { source: String, destination: String },
    ModeUnavailable { source: String, destination: String, mode: String },
    UnknownMode { mode: String },
    UnknownPeriod { period: Period },
    RouteNotFound { source: String, destination: String, mode: String, period: Period },
    DestinationDemandMissing { destination: String, period: Period },
    UnknownPlant { plant: String },
}

impl SelectionIssue {
    /// 本地化消息
    pub fn message(&self) -> String {
        match self {
            SelectionIssue::NotLoaded => t("selection.not_loaded"),
            SelectionIssue::UnknownSource { source } => {
                t_with_args("selection.unknown_source", &[("source", source)])
            }
            SelectionIssue::UnknownDestination { destination } => {
                t_with_args("selection.unknown_destination", &[("destination", destination)])
            }
            SelectionIssue::UnknownRoute { source, destination } => t_with_args(
                "selection.unknown_route",
                &[("source", source), ("destination", destination)],
            ),
            SelectionIssue::ModeUnavailable { source, destination, mode } => t_with_args(
                "selection.mode_unavailable",
                &[("source", source), ("destination", destination), ("mode", mode)],
            ),
            SelectionIssue::UnknownMode { mode } => {
                t_with_args("selection.unknown_mode", &[("mode", mode)])
            }
            SelectionIssue::UnknownPeriod { period } => {
                t_with_args("selection.unknown_period", &[("period", &period.to_string())])
            }
            SelectionIssue::RouteNotFound { source, destination, mode, period } => t_with_args(
                "selection.route_not_found",
                &[
                    ("source", source),
                    ("destination", destination),
                    ("mode", mode),
                    ("period", &period.to_string()),
                ],
            ),
            SelectionIssue::DestinationDemandMissing { destination, period } => t_with_args(
                "selection.destination_demand_missing",
                &[("destination", destination), ("period", &period.to_string())],
            ),
            SelectionIssue::UnknownPlant { plant } => {
                t_with_args("selection.unknown_plant", &[("plant", plant)])
            }
        }
    }
}

impl fmt::Display for SelectionIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

// ==========================================
// SelectionValidator
// ==========================================
pub struct SelectionValidator;

impl SelectionValidator {
    /// 校验选择，返回去重后的问题列表（空表示有效）
    pub fn validate(&self, snapshot: Option<&DatasetSnapshot>, selection: &Selection) -> Vec<SelectionIssue> {
        let Some(snapshot) = snapshot else {
            return vec![SelectionIssue::NotLoaded];
        };
        let index = &snapshot.index;
        let mut issues = Vec::new();

        // ===== 起点 / 终点 / 运输方式 =====
        let source_ok = match &selection.source {
            Some(source) if !index.is_valid_source(source) => {
                issues.push(SelectionIssue::UnknownSource { source: source.clone() });
                false
            }
            _ => true,
        };

        let mut route_ok = source_ok;
        match (&selection.source, &selection.destination) {
            (Some(source), Some(destination)) if source_ok => {
                if !index.is_complete_pair(source, destination) {
                    issues.push(SelectionIssue::UnknownRoute {
                        source: source.clone(),
                        destination: destination.clone(),
                    });
                    route_ok = false;
                }
            }
            (None, Some(destination)) => {
                if !index.all_destinations().contains(destination.as_str()) {
                    issues.push(SelectionIssue::UnknownDestination {
                        destination: destination.clone(),
                    });
                    route_ok = false;
                }
            }
            _ => {}
        }

        if let Some(mode) = &selection.mode {
            match (&selection.source, &selection.destination) {
                (Some(source), Some(destination)) => {
                    if route_ok && !index.modes(source, destination).contains(mode) {
                        issues.push(SelectionIssue::ModeUnavailable {
                            source: source.clone(),
                            destination: destination.clone(),
                            mode: mode.clone(),
                        });
                        route_ok = false;
                    }
                }
                _ => {
                    if !index.all_modes().contains(mode.as_str()) {
                        issues.push(SelectionIssue::UnknownMode { mode: mode.clone() });
                    }
                }
            }
        }

        // ===== 周期 =====
        let period_ok = match selection.period {
            Some(period) if !index.has_period(period) => {
                issues.push(SelectionIssue::UnknownPeriod { period });
                false
            }
            _ => true,
        };

        // ===== 完整元组：精确路线行 + 终点需求行 =====
        if let (Some(source), Some(destination), Some(mode), Some(period)) = (
            &selection.source,
            &selection.destination,
            &selection.mode,
            selection.period,
        ) {
            if route_ok && period_ok {
                if snapshot.store.route(source, destination, mode, period).is_none() {
                    issues.push(SelectionIssue::RouteNotFound {
                        source: source.clone(),
                        destination: destination.clone(),
                        mode: mode.clone(),
                        period,
                    });
                }
                if !snapshot.store.has_demand_row(destination, period) {
                    issues.push(SelectionIssue::DestinationDemandMissing {
                        destination: destination.clone(),
                        period,
                    });
                }
            }
        }

        let mut distinct: Vec<SelectionIssue> = Vec::with_capacity(issues.len());
        for issue in issues {
            if !distinct.contains(&issue) {
                distinct.push(issue);
            }
        }
        distinct
    }
}
