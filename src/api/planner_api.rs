// ==========================================
// 熟料供应网络 - 规划查询API
// ==========================================
// 职责: 数据集加载/替换 + 选择元数据 + 单路线计算
// 流程: 加载 → 一致性校验 → (成功) 构建快照 → 原子替换
//       查询 → 选择校验 → 计算
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::PlannerConfig;
use crate::dataset::{
    ConsistencyReport, ConsistencyValidator, DatasetHandle, DatasetMetadata, DatasetSnapshot,
    DatasetStore,
};
use crate::domain::balance::{ModeDetail, RouteBalance, RouteQuery};
use crate::domain::formulation::ModelFormulation;
use crate::domain::records::{
    CapacityRecord, ClosingStockRecord, DemandRecord, HubOpeningStockRecord,
    ProductionCostRecord,
};
use crate::domain::table::RawTable;
use crate::domain::types::{FieldValue, Period};
use crate::engine::{BalanceCalculator, Selection, SelectionIssue, SelectionValidator};
use crate::importer::UniversalFileParser;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// 加载结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadOutcome {
    pub success: bool,
    /// 致命结构问题的消息列表
    pub errors: Vec<String>,
    /// 一致性校验报告
    pub report: ConsistencyReport,
    /// 成功时的数据集元数据
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<DatasetMetadata>,
}

/// 选择校验结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionCheck {
    pub valid: bool,
    pub errors: Vec<String>,
    pub issues: Vec<SelectionIssue>,
}

/// 工厂明细
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlantDetails {
    pub plant: String,
    pub plant_type: FieldValue<String>,
    pub source_count: FieldValue<f64>,
    pub opening_stock: FieldValue<f64>,
    pub capacity: Vec<CapacityRecord>,
    pub production_cost: Vec<ProductionCostRecord>,
    pub demand: Vec<DemandRecord>,
    pub closing_stock: Vec<ClosingStockRecord>,
    /// 出向 (终点, 运输方式)
    pub outbound: Vec<(String, String)>,
    /// 入向 (起点, 运输方式)
    pub inbound: Vec<(String, String)>,
    pub hub_opening_stock: Vec<HubOpeningStockRecord>,
}

// ==========================================
// PlannerApi
// ==========================================
pub struct PlannerApi {
    config: PlannerConfig,
    dataset: DatasetHandle,
    calculator: BalanceCalculator,
}

impl Default for PlannerApi {
    fn default() -> Self {
        Self::new(PlannerConfig::default())
    }
}

impl PlannerApi {
    pub fn new(config: PlannerConfig) -> Self {
        Self {
            calculator: BalanceCalculator::new(config.clone()),
            config,
            dataset: DatasetHandle::new(),
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    fn snapshot(&self) -> Option<Arc<DatasetSnapshot>> {
        self.dataset.current()
    }

    // ==========================================
    // 加载
    // ==========================================

    /// 加载数据集（全量替换）
    ///
    /// # 参数
    /// - tables: 表名 → 原始表（表名按逻辑名/文件名/别名解析）
    ///
    /// # 返回
    /// 校验失败时 success=false，当前数据集保持不变
    #[tracing::instrument(skip(self, tables), fields(tables = tables.len()))]
    pub fn load(&self, tables: HashMap<String, RawTable>) -> LoadOutcome {
        let report = ConsistencyValidator.validate(&tables);
        if !report.complete {
            let errors = report.errors();
            tracing::warn!(missing = ?report.missing, "数据集结构不完整，拒绝加载");
            return LoadOutcome {
                success: false,
                errors,
                report,
                metadata: None,
            };
        }

        let store = DatasetStore::build(&tables, &report);
        let snapshot = DatasetSnapshot::new(store, &report, &self.config);
        let metadata = snapshot.metadata.clone();
        self.dataset.replace(snapshot);

        tracing::info!(
            dataset_id = %metadata.dataset_id,
            valid_sources = metadata.valid_source_count,
            "数据集已加载"
        );
        LoadOutcome {
            success: true,
            errors: Vec::new(),
            report,
            metadata: Some(metadata),
        }
    }

    /// 从 CSV 目录或 Excel 工作簿加载
    pub fn load_from_path<P: AsRef<Path>>(&self, path: P) -> ApiResult<LoadOutcome> {
        let tables = UniversalFileParser.read_dataset(path.as_ref())?;
        Ok(self.load(tables))
    }

    // ==========================================
    // 元数据查询
    // ==========================================

    pub fn is_loaded(&self) -> bool {
        self.dataset.is_loaded()
    }

    pub fn metadata(&self) -> Option<DatasetMetadata> {
        self.snapshot().map(|s| s.metadata.clone())
    }

    /// 有效起点（未加载时为空）
    pub fn list_sources(&self) -> Vec<String> {
        self.snapshot()
            .map(|s| s.index.valid_sources().to_vec())
            .unwrap_or_default()
    }

    /// 起点的完整终点；起点无效或未加载时为空
    pub fn list_destinations(&self, source: &str) -> Vec<String> {
        self.snapshot()
            .map(|s| s.index.destinations(source).to_vec())
            .unwrap_or_default()
    }

    /// 完整路线对的运输方式；参考表中没有的方式名称/容量为 Unavailable
    pub fn list_modes(&self, source: &str, destination: &str) -> Vec<ModeDetail> {
        let Some(snapshot) = self.snapshot() else {
            return Vec::new();
        };
        snapshot
            .index
            .modes(source, destination)
            .iter()
            .map(|code| self.config.mode_detail(code))
            .collect()
    }

    pub fn list_periods(&self) -> Vec<Period> {
        self.snapshot()
            .map(|s| s.index.periods().to_vec())
            .unwrap_or_default()
    }

    // ==========================================
    // 校验与计算
    // ==========================================

    /// 校验部分或完整的选择，不做计算
    pub fn validate_selection(&self, selection: &Selection) -> SelectionCheck {
        let snapshot = self.snapshot();
        let issues = SelectionValidator.validate(snapshot.as_deref(), selection);
        SelectionCheck {
            valid: issues.is_empty(),
            errors: issues.iter().map(SelectionIssue::message).collect(),
            issues,
        }
    }

    /// 数学模型说明（不要求已加载数据集）
    pub fn model_formulation(&self) -> ModelFormulation {
        self.calculator.formulation()
    }

    /// 计算单路线单周期的平衡与成本
    ///
    /// # 返回
    /// - Ok: 完整结果（可能不可行）
    /// - Err(ApiError::Selection): 选择无效，未做任何计算
    pub fn compute_route(&self, source: &str, destination: &str, mode: &str, period: Period) -> ApiResult<RouteBalance> {
        let snapshot = self.snapshot();
        let selection = Selection::route(source, destination, mode, period);
        let issues = SelectionValidator.validate(snapshot.as_deref(), &selection);
        let snapshot = match snapshot {
            Some(snapshot) if issues.is_empty() => snapshot,
            _ => {
                tracing::debug!(?issues, "路线选择无效");
                return Err(ApiError::Selection(issues));
            }
        };

        let query = RouteQuery::new(source, destination, mode, period);
        Ok(self.calculator.compute(&snapshot.store, &query))
    }

    /// 工厂明细
    pub fn plant_details(&self, plant: &str) -> ApiResult<PlantDetails> {
        let snapshot = self
            .snapshot()
            .ok_or_else(|| ApiError::Selection(vec![SelectionIssue::NotLoaded]))?;
        let store = &snapshot.store;
        if !store.all_plants().contains(plant) {
            return Err(ApiError::Selection(vec![SelectionIssue::UnknownPlant {
                plant: plant.to_string(),
            }]));
        }

        let mut outbound = Vec::new();
        let mut inbound = Vec::new();
        for route in store.logistics() {
            if route.source == plant {
                let key = (route.destination.clone(), route.mode.clone());
                if !outbound.contains(&key) {
                    outbound.push(key);
                }
            }
            if route.destination == plant {
                let key = (route.source.clone(), route.mode.clone());
                if !inbound.contains(&key) {
                    inbound.push(key);
                }
            }
        }

        let type_record = store.plant_type_record(plant);
        Ok(PlantDetails {
            plant: plant.to_string(),
            plant_type: store.plant_type(plant),
            source_count: type_record.and_then(|r| r.source_count).into(),
            opening_stock: store.opening_stock(plant),
            capacity: store.capacity_table().rows_for(plant).cloned().collect(),
            production_cost: store.production_cost_table().rows_for(plant).cloned().collect(),
            demand: store.demand_table().rows_for(plant).cloned().collect(),
            closing_stock: store.closing_stock_table().rows_for(plant).cloned().collect(),
            outbound,
            inbound,
            hub_opening_stock: store.hub_opening_stock_for(plant).cloned().collect(),
        })
    }
}
