// ==========================================
// 熟料供应网络 - 路线有效性索引
// ==========================================
// 职责: 由数据集推导可查询的起点、每个起点的终点、每对的运输方式、周期
// 完整性规则 (起点, 终点):
//   (a) 该对至少一条路线行的运费非缺失
//   (b) 起点至少一行生产成本
//   (c) 起点至少一行产能
//   (d) 终点至少一行需求
// ==========================================

use crate::dataset::store::DatasetStore;
use crate::domain::types::Period;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};

/// 单个 (起点, 终点) 对的完整性判定明细
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairCompleteness {
    pub has_freight_cost: bool,
    pub has_production_cost: bool,
    pub has_capacity: bool,
    pub has_demand: bool,
}

impl PairCompleteness {
    pub fn evaluate(store: &DatasetStore, source: &str, destination: &str) -> Self {
        Self {
            has_freight_cost: store
                .pair_rows(source, destination)
                .any(|r| r.freight_cost.is_some()),
            has_production_cost: store.production_cost_table().has_plant(source),
            has_capacity: store.capacity_table().has_plant(source),
            has_demand: store.demand_table().has_plant(destination),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.has_freight_cost && self.has_production_cost && self.has_capacity && self.has_demand
    }
}

// ==========================================
// RouteValidityIndex
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct RouteValidityIndex {
    /// 有效起点（按路线表首次出现顺序）
    valid_sources: Vec<String>,
    /// 起点 → 完整的终点（首次出现顺序）
    destinations: HashMap<String, Vec<String>>,
    /// 原始 (起点, 终点) 对（首次出现顺序）
    raw_pairs: Vec<(String, String)>,
    /// (起点, 终点) → 运输方式代码（不做完整性过滤）
    modes: HashMap<(String, String), Vec<String>>,
    periods: Vec<Period>,
    raw_source_count: usize,
}

impl RouteValidityIndex {
    #[tracing::instrument(skip(store))]
    pub fn build(store: &DatasetStore) -> Self {
        let mut index = RouteValidityIndex::default();

        // 1-2. 候选起点与其可达终点、运输方式
        let mut sources: Vec<String> = Vec::new();
        let mut seen_sources: HashSet<&str> = HashSet::new();
        let mut reachable: HashMap<String, Vec<String>> = HashMap::new();
        for route in store.logistics() {
            if seen_sources.insert(route.source.as_str()) {
                sources.push(route.source.clone());
            }
            let pair = (route.source.clone(), route.destination.clone());
            let modes = index.modes.entry(pair.clone()).or_insert_with(|| {
                reachable
                    .entry(route.source.clone())
                    .or_default()
                    .push(route.destination.clone());
                index.raw_pairs.push(pair);
                Vec::new()
            });
            if !modes.contains(&route.mode) {
                modes.push(route.mode.clone());
            }
        }
        index.raw_source_count = sources.len();

        // 3-4. 完整性过滤
        for source in sources {
            let complete: Vec<String> = reachable
                .remove(&source)
                .unwrap_or_default()
                .into_iter()
                .filter(|destination| PairCompleteness::evaluate(store, &source, destination).is_complete())
                .collect();
            if complete.is_empty() {
                tracing::debug!(source = %source, "起点无完整终点，已排除");
                continue;
            }
            index.valid_sources.push(source.clone());
            index.destinations.insert(source, complete);
        }

        // 6. 全局周期：路线表，无周期时回退需求表
        let route_periods: BTreeSet<Period> = store.logistics().iter().filter_map(|r| r.period).collect();
        index.periods = if route_periods.is_empty() {
            store.demand_periods()
        } else {
            route_periods.into_iter().collect()
        };

        tracing::info!(
            raw_sources = index.raw_source_count,
            valid_sources = index.valid_sources.len(),
            periods = index.periods.len(),
            "路线有效性索引构建完成"
        );
        index
    }

    pub fn valid_sources(&self) -> &[String] {
        &self.valid_sources
    }

    pub fn is_valid_source(&self, source: &str) -> bool {
        self.destinations.contains_key(source)
    }

    /// 起点的完整终点；起点无效时为空
    pub fn destinations(&self, source: &str) -> &[String] {
        self.destinations.get(source).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_complete_pair(&self, source: &str, destination: &str) -> bool {
        self.destinations(source).iter().any(|d| d == destination)
    }

    /// 该对在路线表中出现的运输方式（原样）
    pub fn raw_modes(&self, source: &str, destination: &str) -> &[String] {
        self.modes
            .get(&(source.to_string(), destination.to_string()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// 可查询的运输方式：仅完整对返回
    pub fn modes(&self, source: &str, destination: &str) -> &[String] {
        if self.is_complete_pair(source, destination) {
            self.raw_modes(source, destination)
        } else {
            &[]
        }
    }

    pub fn raw_pairs(&self) -> &[(String, String)] {
        &self.raw_pairs
    }

    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    pub fn has_period(&self, period: Period) -> bool {
        self.periods.binary_search(&period).is_ok()
    }

    pub fn raw_source_count(&self) -> usize {
        self.raw_source_count
    }

    /// 全部完整终点（去重，用于仅给出终点的选择校验）
    pub fn all_destinations(&self) -> BTreeSet<&str> {
        self.destinations
            .values()
            .flatten()
            .map(String::as_str)
            .collect()
    }

    /// 路线表中出现的全部运输方式代码（排序去重）
    pub fn all_modes(&self) -> BTreeSet<&str> {
        self.modes.values().flatten().map(String::as_str).collect()
    }
}
