// ==========================================
// 熟料供应网络 - 数据集存储
// ==========================================
// 职责: 加载时一次性建立哈希索引，提供取值原语（有值 / 缺失）
// 红线: 同键多行时首行生效；不存在的值返回 Unavailable，不默认为 0
// ==========================================

use crate::dataset::validator::ConsistencyReport;
use crate::domain::records::{
    CapacityRecord, ClosingStockRecord, DemandRecord, HubOpeningStockRecord, LogisticsRecord,
    OpeningStockRecord, PlantPeriodRecord, PlantTypeRecord, ProductionCostRecord,
    StrategicConstraintRecord,
};
use crate::domain::schema::TableKind;
use crate::domain::table::RawTable;
use crate::domain::types::{FieldValue, Period};
use crate::importer::field_mapper::{ColumnMap, FieldMapper, MappedTable};
use std::collections::{BTreeMap, BTreeSet, HashMap};

// ==========================================
// KeyedTable - (工厂, 周期) 索引表
// ==========================================
#[derive(Debug, Clone)]
pub struct KeyedTable<R> {
    rows: Vec<R>,
    by_key: HashMap<(String, Option<Period>), usize>,
    by_plant: HashMap<String, Vec<usize>>,
}

impl<R> Default for KeyedTable<R> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            by_key: HashMap::new(),
            by_plant: HashMap::new(),
        }
    }
}

impl<R: PlantPeriodRecord> KeyedTable<R> {
    pub fn from_records(rows: Vec<R>) -> Self {
        let mut by_key = HashMap::with_capacity(rows.len());
        let mut by_plant: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, row) in rows.iter().enumerate() {
            // 首行生效
            by_key
                .entry((row.plant().to_string(), row.period()))
                .or_insert(idx);
            by_plant.entry(row.plant().to_string()).or_default().push(idx);
        }
        Self {
            rows,
            by_key,
            by_plant,
        }
    }

    pub fn get(&self, plant: &str, period: Period) -> Option<&R> {
        self.by_key
            .get(&(plant.to_string(), Some(period)))
            .map(|&idx| &self.rows[idx])
    }

    /// 工厂是否至少有一行（任意周期）
    pub fn has_plant(&self, plant: &str) -> bool {
        self.by_plant.contains_key(plant)
    }

    /// 工厂的全部行（按原始顺序）
    pub fn rows_for<'a>(&'a self, plant: &str) -> impl Iterator<Item = &'a R> + 'a {
        self.by_plant
            .get(plant)
            .into_iter()
            .flatten()
            .map(move |&idx| &self.rows[idx])
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }
}

type RouteKey = (String, String, String, Period);
type PairKey = (String, String);

// ==========================================
// DatasetStore
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct DatasetStore {
    plant_types: Vec<PlantTypeRecord>,
    plant_type_by_code: HashMap<String, usize>,

    logistics: Vec<LogisticsRecord>,
    route_by_tuple: HashMap<RouteKey, usize>,
    rows_by_pair: HashMap<PairKey, Vec<usize>>,

    demand: KeyedTable<DemandRecord>,
    capacity: KeyedTable<CapacityRecord>,
    production_cost: KeyedTable<ProductionCostRecord>,
    closing_stock: KeyedTable<ClosingStockRecord>,

    opening_stock: Vec<OpeningStockRecord>,
    opening_by_plant: HashMap<String, usize>,

    constraints: Vec<StrategicConstraintRecord>,
    hub_opening_stock: Vec<HubOpeningStockRecord>,

    row_counts: BTreeMap<String, usize>,
    skipped_rows: BTreeMap<String, usize>,
}

impl DatasetStore {
    /// 由已通过一致性校验的表集合构建存储
    ///
    /// # 参数
    /// - tables: 输入表名 → 原始表
    /// - report: 一致性校验报告（提供逻辑表 → 输入表名）
    pub fn build(tables: &HashMap<String, RawTable>, report: &ConsistencyReport) -> Self {
        let mut store = DatasetStore::default();

        for (kind, name) in &report.resolved {
            let Some(table) = tables.get(name) else {
                continue;
            };
            let spec = kind.spec();
            let columns = ColumnMap::resolve(spec, table);
            let mapper = FieldMapper::new(&columns);

            store.row_counts.insert(spec.name.to_string(), table.row_count());
            let skipped = match kind {
                TableKind::PlantType => store.set_plant_types(mapper.map_plant_types(table)),
                TableKind::Logistics => store.set_logistics(mapper.map_logistics(table)),
                TableKind::Demand => {
                    let mapped = mapper.map_demand(table);
                    store.demand = KeyedTable::from_records(mapped.records);
                    mapped.skipped_rows
                }
                TableKind::Capacity => {
                    let mapped = mapper.map_capacity(table);
                    store.capacity = KeyedTable::from_records(mapped.records);
                    mapped.skipped_rows
                }
                TableKind::ProductionCost => {
                    let mapped = mapper.map_production_cost(table);
                    store.production_cost = KeyedTable::from_records(mapped.records);
                    mapped.skipped_rows
                }
                TableKind::OpeningStock => store.set_opening_stock(mapper.map_opening_stock(table)),
                TableKind::ClosingStock => {
                    let mapped = mapper.map_closing_stock(table);
                    store.closing_stock = KeyedTable::from_records(mapped.records);
                    mapped.skipped_rows
                }
                TableKind::Constraints => {
                    let mapped = mapper.map_constraints(table);
                    store.constraints = mapped.records;
                    mapped.skipped_rows
                }
                TableKind::HubOpeningStock => {
                    let mapped = mapper.map_hub_opening_stock(table);
                    store.hub_opening_stock = mapped.records;
                    mapped.skipped_rows
                }
            };

            if skipped > 0 {
                tracing::warn!(table = %kind, skipped, "主键缺失的行已跳过");
            }
            store.skipped_rows.insert(spec.name.to_string(), skipped);
        }

        tracing::debug!(
            routes = store.logistics.len(),
            pairs = store.rows_by_pair.len(),
            "数据集索引构建完成"
        );
        store
    }

    fn set_plant_types(&mut self, mapped: MappedTable<PlantTypeRecord>) -> usize {
        for (idx, record) in mapped.records.iter().enumerate() {
            self.plant_type_by_code.entry(record.plant.clone()).or_insert(idx);
        }
        self.plant_types = mapped.records;
        mapped.skipped_rows
    }

    fn set_logistics(&mut self, mapped: MappedTable<LogisticsRecord>) -> usize {
        for (idx, record) in mapped.records.iter().enumerate() {
            if let Some(period) = record.period {
                self.route_by_tuple
                    .entry((
                        record.source.clone(),
                        record.destination.clone(),
                        record.mode.clone(),
                        period,
                    ))
                    .or_insert(idx);
            }
            self.rows_by_pair
                .entry((record.source.clone(), record.destination.clone()))
                .or_default()
                .push(idx);
        }
        self.logistics = mapped.records;
        mapped.skipped_rows
    }

    fn set_opening_stock(&mut self, mapped: MappedTable<OpeningStockRecord>) -> usize {
        for (idx, record) in mapped.records.iter().enumerate() {
            self.opening_by_plant.entry(record.plant.clone()).or_insert(idx);
        }
        self.opening_stock = mapped.records;
        mapped.skipped_rows
    }

    // ==========================================
    // 路线查询
    // ==========================================

    /// 精确匹配 (起点, 终点, 运输方式, 周期) 的路线行
    pub fn route(&self, source: &str, destination: &str, mode: &str, period: Period) -> Option<&LogisticsRecord> {
        let key = (
            source.to_string(),
            destination.to_string(),
            mode.to_string(),
            period,
        );
        self.route_by_tuple.get(&key).map(|&idx| &self.logistics[idx])
    }

    /// (起点, 终点) 的全部路线行（任意方式/周期）
    pub fn pair_rows<'a>(&'a self, source: &str, destination: &str) -> impl Iterator<Item = &'a LogisticsRecord> + 'a {
        self.rows_by_pair
            .get(&(source.to_string(), destination.to_string()))
            .into_iter()
            .flatten()
            .map(move |&idx| &self.logistics[idx])
    }

    pub fn logistics(&self) -> &[LogisticsRecord] {
        &self.logistics
    }

    // ==========================================
    // 工厂取值原语
    // ==========================================

    pub fn plant_type_record(&self, plant: &str) -> Option<&PlantTypeRecord> {
        self.plant_type_by_code
            .get(plant)
            .map(|&idx| &self.plant_types[idx])
    }

    pub fn plant_type(&self, plant: &str) -> FieldValue<String> {
        self.plant_type_record(plant)
            .and_then(|r| r.plant_type.clone())
            .into()
    }

    /// 类型表中的 # Source 列
    pub fn source_count(&self, plant: &str) -> FieldValue<f64> {
        self.plant_type_record(plant).and_then(|r| r.source_count).into()
    }

    pub fn plant_types(&self) -> &[PlantTypeRecord] {
        &self.plant_types
    }

    pub fn demand(&self, plant: &str, period: Period) -> FieldValue<f64> {
        self.demand.get(plant, period).and_then(|r| r.demand).into()
    }

    pub fn min_fulfillment_pct(&self, plant: &str, period: Period) -> FieldValue<f64> {
        self.demand
            .get(plant, period)
            .and_then(|r| r.min_fulfillment_pct)
            .into()
    }

    /// 需求表中是否存在该 (工厂, 周期) 行（不论取值）
    pub fn has_demand_row(&self, plant: &str, period: Period) -> bool {
        self.demand.get(plant, period).is_some()
    }

    pub fn capacity(&self, plant: &str, period: Period) -> FieldValue<f64> {
        self.capacity.get(plant, period).and_then(|r| r.capacity).into()
    }

    pub fn production_cost(&self, plant: &str, period: Period) -> FieldValue<f64> {
        self.production_cost
            .get(plant, period)
            .and_then(|r| r.cost)
            .into()
    }

    pub fn opening_stock(&self, plant: &str) -> FieldValue<f64> {
        self.opening_by_plant
            .get(plant)
            .and_then(|&idx| self.opening_stock[idx].opening_stock)
            .into()
    }

    pub fn closing_min(&self, plant: &str, period: Period) -> FieldValue<f64> {
        self.closing_stock
            .get(plant, period)
            .and_then(|r| r.min_close_stock)
            .into()
    }

    pub fn closing_max(&self, plant: &str, period: Period) -> FieldValue<f64> {
        self.closing_stock
            .get(plant, period)
            .and_then(|r| r.max_close_stock)
            .into()
    }

    pub fn demand_table(&self) -> &KeyedTable<DemandRecord> {
        &self.demand
    }

    pub fn capacity_table(&self) -> &KeyedTable<CapacityRecord> {
        &self.capacity
    }

    pub fn production_cost_table(&self) -> &KeyedTable<ProductionCostRecord> {
        &self.production_cost
    }

    pub fn closing_stock_table(&self) -> &KeyedTable<ClosingStockRecord> {
        &self.closing_stock
    }

    /// 适用于该路线/周期的战略约束（通配匹配）
    pub fn applicable_constraints(
        &self,
        source: &str,
        destination: &str,
        mode: &str,
        period: Period,
    ) -> Vec<StrategicConstraintRecord> {
        self.constraints
            .iter()
            .filter(|c| c.applies_to(source, destination, mode, period))
            .cloned()
            .collect()
    }

    pub fn hub_opening_stock_for<'a>(&'a self, plant: &'a str) -> impl Iterator<Item = &'a HubOpeningStockRecord> + 'a {
        self.hub_opening_stock
            .iter()
            .filter(move |r| r.plant == plant || r.hub.as_deref() == Some(plant))
    }

    // ==========================================
    // 汇总
    // ==========================================

    /// 出现在任一表中的全部工厂代码（排序）
    pub fn all_plants(&self) -> BTreeSet<String> {
        let mut plants: BTreeSet<String> = self.plant_types.iter().map(|r| r.plant.clone()).collect();
        for route in &self.logistics {
            plants.insert(route.source.clone());
            plants.insert(route.destination.clone());
        }
        plants.extend(self.demand.rows().iter().map(|r| r.plant.clone()));
        plants.extend(self.capacity.rows().iter().map(|r| r.plant.clone()));
        plants.extend(self.production_cost.rows().iter().map(|r| r.plant.clone()));
        plants.extend(self.opening_stock.iter().map(|r| r.plant.clone()));
        plants.extend(self.closing_stock.rows().iter().map(|r| r.plant.clone()));
        plants
    }

    /// 需求表中出现的周期（排序去重）
    pub fn demand_periods(&self) -> Vec<Period> {
        let periods: BTreeSet<Period> = self.demand.rows().iter().filter_map(|r| r.period).collect();
        periods.into_iter().collect()
    }

    pub fn row_counts(&self) -> &BTreeMap<String, usize> {
        &self.row_counts
    }

    pub fn skipped_rows(&self) -> &BTreeMap<String, usize> {
        &self.skipped_rows
    }
}
