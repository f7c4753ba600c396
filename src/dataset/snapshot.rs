// ==========================================
// 熟料供应网络 - 数据集快照与句柄
// ==========================================
// 职责: 快照 = 存储 + 路线索引 + 元数据（不可变）
// 并发: 读者共享 Arc 快照；加载先构建完整快照，再一次写锁替换
// ==========================================

use crate::config::PlannerConfig;
use crate::dataset::route_index::RouteValidityIndex;
use crate::dataset::store::DatasetStore;
use crate::dataset::validator::ConsistencyReport;
use crate::domain::types::Period;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// (起点, 终点) 的运输方式列表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteModes {
    pub source: String,
    pub destination: String,
    pub modes: Vec<String>,
}

// ==========================================
// DatasetMetadata - 加载成功后的元数据
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetMetadata {
    pub dataset_id: String,
    pub loaded_at: DateTime<Utc>,

    // ===== 选择用元数据 =====
    pub valid_sources: Vec<String>,
    pub destinations_by_source: BTreeMap<String, Vec<String>>,
    pub modes_by_route: Vec<RouteModes>,
    pub periods: Vec<Period>,

    // ===== 工厂概览 =====
    pub plants: Vec<String>,
    pub plants_by_type: BTreeMap<String, Vec<String>>,
    pub producing_plants: Vec<String>,
    pub raw_source_count: usize,
    pub valid_source_count: usize,
    pub transport_modes: Vec<String>,

    // ===== 表统计 =====
    pub tables_present: Vec<String>,
    pub row_counts: BTreeMap<String, usize>,
    pub skipped_rows: BTreeMap<String, usize>,
}

impl DatasetMetadata {
    fn build(
        dataset_id: Uuid,
        loaded_at: DateTime<Utc>,
        store: &DatasetStore,
        index: &RouteValidityIndex,
        report: &ConsistencyReport,
        config: &PlannerConfig,
    ) -> Self {
        let destinations_by_source = index
            .valid_sources()
            .iter()
            .map(|s| (s.clone(), index.destinations(s).to_vec()))
            .collect();

        let modes_by_route = index
            .raw_pairs()
            .iter()
            .map(|(s, d)| RouteModes {
                source: s.clone(),
                destination: d.clone(),
                modes: index.raw_modes(s, d).to_vec(),
            })
            .collect();

        let mut plants_by_type: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for record in store.plant_types() {
            if let Some(plant_type) = &record.plant_type {
                let plants = plants_by_type.entry(plant_type.clone()).or_default();
                if !plants.contains(&record.plant) {
                    plants.push(record.plant.clone());
                }
            }
        }
        let producing_plants = plants_by_type
            .get(&config.producing_plant_type)
            .cloned()
            .unwrap_or_default();

        Self {
            dataset_id: dataset_id.to_string(),
            loaded_at,
            valid_sources: index.valid_sources().to_vec(),
            destinations_by_source,
            modes_by_route,
            periods: index.periods().to_vec(),
            plants: store.all_plants().into_iter().collect(),
            plants_by_type,
            producing_plants,
            raw_source_count: index.raw_source_count(),
            valid_source_count: index.valid_sources().len(),
            transport_modes: index.all_modes().into_iter().map(str::to_string).collect(),
            tables_present: report.present.clone(),
            row_counts: store.row_counts().clone(),
            skipped_rows: store.skipped_rows().clone(),
        }
    }
}

// ==========================================
// DatasetSnapshot - 不可变快照
// ==========================================
#[derive(Debug, Clone)]
pub struct DatasetSnapshot {
    pub dataset_id: Uuid,
    pub loaded_at: DateTime<Utc>,
    pub store: DatasetStore,
    pub index: RouteValidityIndex,
    pub metadata: DatasetMetadata,
}

impl DatasetSnapshot {
    pub fn new(store: DatasetStore, report: &ConsistencyReport, config: &PlannerConfig) -> Self {
        let dataset_id = Uuid::new_v4();
        let loaded_at = Utc::now();
        let index = RouteValidityIndex::build(&store);
        let metadata = DatasetMetadata::build(dataset_id, loaded_at, &store, &index, report, config);
        Self {
            dataset_id,
            loaded_at,
            store,
            index,
            metadata,
        }
    }
}

// ==========================================
// DatasetHandle - 当前数据集（原子替换）
// ==========================================
#[derive(Debug, Default)]
pub struct DatasetHandle {
    current: RwLock<Option<Arc<DatasetSnapshot>>>,
}

impl DatasetHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前快照（未加载时为 None）
    pub fn current(&self) -> Option<Arc<DatasetSnapshot>> {
        let guard = self
            .current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.clone()
    }

    /// 以新快照替换当前快照，返回旧快照
    pub fn replace(&self, snapshot: DatasetSnapshot) -> Option<Arc<DatasetSnapshot>> {
        let mut guard = self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.replace(Arc::new(snapshot))
    }

    pub fn is_loaded(&self) -> bool {
        self.current().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_snapshot() -> DatasetSnapshot {
        DatasetSnapshot::new(
            DatasetStore::default(),
            &ConsistencyReport::default(),
            &PlannerConfig::default(),
        )
    }

    #[test]
    fn test_handle_starts_empty() {
        let handle = DatasetHandle::new();
        assert!(!handle.is_loaded());
        assert!(handle.current().is_none());
    }

    #[test]
    fn test_replace_swaps_snapshot_and_readers_keep_old_arc() {
        let handle = DatasetHandle::new();
        handle.replace(empty_snapshot());
        let first = handle.current().unwrap();

        let previous = handle.replace(empty_snapshot()).unwrap();
        let second = handle.current().unwrap();

        assert_eq!(previous.dataset_id, first.dataset_id);
        assert_ne!(first.dataset_id, second.dataset_id);
        assert_eq!(first.metadata.valid_source_count, 0);
    }
}
