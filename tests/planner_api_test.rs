// ==========================================
// PlannerApi 集成测试
// ==========================================
// 测试目标: 验证加载生命周期、选择校验、查询接口
// 覆盖范围: 失败加载保留旧数据集、场景 C、幂等性、元数据、工厂明细
// ==========================================

mod test_helpers;

use route_balance::engine::{Selection, SelectionIssue};
use route_balance::{ApiError, FieldValue, PlannerApi};
use test_helpers::{scenario_a, DatasetBuilder};

// ==========================================
// 测试辅助函数
// ==========================================

fn loaded(builder: &DatasetBuilder) -> PlannerApi {
    let api = PlannerApi::default();
    let outcome = api.load(builder.build());
    assert!(outcome.success, "load failed: {:?}", outcome.errors);
    api
}

fn selection_issues(err: ApiError) -> Vec<SelectionIssue> {
    match err {
        ApiError::Selection(issues) => issues,
        other => panic!("expected selection error, got {:?}", other),
    }
}

// ==========================================
// 加载生命周期
// ==========================================

#[test]
fn test_unloaded_api_returns_empty_lists() {
    let api = PlannerApi::default();

    assert!(!api.is_loaded());
    assert!(api.metadata().is_none());
    assert!(api.list_sources().is_empty());
    assert!(api.list_destinations("IU1").is_empty());
    assert!(api.list_modes("IU1", "GU1").is_empty());
    assert!(api.list_periods().is_empty());

    let err = api.compute_route("IU1", "GU1", "T1", 1).unwrap_err();
    assert_eq!(selection_issues(err), vec![SelectionIssue::NotLoaded]);
}

#[test]
fn test_load_reports_metadata() {
    let api = PlannerApi::default();
    let outcome = api.load(scenario_a().build());

    assert!(outcome.success);
    assert!(outcome.errors.is_empty());
    assert!(outcome.report.complete);
    let metadata = outcome.metadata.unwrap();
    assert_eq!(metadata.valid_sources, vec!["IU1".to_string()]);
    assert_eq!(metadata.destinations_by_source["IU1"], vec!["GU1".to_string()]);
    assert_eq!(metadata.modes_by_route.len(), 1);
    assert_eq!(metadata.modes_by_route[0].modes, vec!["T1".to_string()]);
    assert_eq!(metadata.periods, vec![1]);
    assert_eq!(metadata.row_counts["Logistics"], 1);
    assert_eq!(metadata.row_counts["OpeningStock"], 2);
    assert_eq!(metadata.producing_plants, vec!["IU1".to_string()]);
    assert_eq!(metadata.plants_by_type["GU"], vec!["GU1".to_string()]);
    assert_eq!(metadata.raw_source_count, 1);
    assert_eq!(metadata.valid_source_count, 1);
    assert_eq!(api.metadata().unwrap().dataset_id, metadata.dataset_id);
}

#[test]
fn test_failed_load_keeps_previous_dataset() {
    let api = loaded(&scenario_a());
    let before = api.metadata().unwrap().dataset_id;

    let mut tables = scenario_a().build();
    tables.remove("ClinkerCapacity");
    let outcome = api.load(tables);

    assert!(!outcome.success);
    assert_eq!(outcome.report.missing, vec!["Capacity".to_string()]);
    assert_eq!(outcome.errors.len(), 1);
    assert!(outcome.metadata.is_none());
    assert_eq!(api.metadata().unwrap().dataset_id, before);
    assert!(api.compute_route("IU1", "GU1", "T1", 1).is_ok());
}

#[test]
fn test_failed_first_load_leaves_api_empty() {
    let api = PlannerApi::default();
    let mut tables = scenario_a().build();
    tables.remove("LogisticsIUGU");

    let outcome = api.load(tables);
    assert!(!outcome.success);
    assert!(!api.is_loaded());
}

#[test]
fn test_successful_reload_replaces_dataset() {
    let api = loaded(&scenario_a());
    let first = api.metadata().unwrap().dataset_id;

    let outcome = api.load(
        scenario_a()
            .plant("IU2", "IU")
            .route("IU2", "GU1", "T2", "1", "3", "1")
            .capacity("IU2", "1", "5000")
            .production_cost("IU2", "1", "8")
            .build(),
    );

    assert!(outcome.success);
    assert_ne!(api.metadata().unwrap().dataset_id, first);
    assert_eq!(api.list_sources(), vec!["IU1".to_string(), "IU2".to_string()]);
}

// ==========================================
// 选择校验
// ==========================================

#[test]
fn test_scenario_c_missing_destination_demand_period() {
    // 周期 2 存在路线行，但 GU1 在周期 2 无需求行
    let api = loaded(&scenario_a().route("IU1", "GU1", "T1", "2", "5", "1"));

    let issues = selection_issues(api.compute_route("IU1", "GU1", "T1", 2).unwrap_err());
    assert_eq!(
        issues,
        vec![SelectionIssue::DestinationDemandMissing {
            destination: "GU1".to_string(),
            period: 2,
        }]
    );
    assert!(issues[0].message().contains('2'));
}

#[test]
fn test_selection_errors_are_distinct_and_complete() {
    let api = loaded(&scenario_a());

    let issues = selection_issues(api.compute_route("IU9", "GU1", "T1", 9).unwrap_err());
    assert_eq!(
        issues,
        vec![
            SelectionIssue::UnknownSource { source: "IU9".to_string() },
            SelectionIssue::UnknownPeriod { period: 9 },
        ]
    );

    let issues = selection_issues(api.compute_route("IU1", "GU7", "T1", 1).unwrap_err());
    assert_eq!(
        issues,
        vec![SelectionIssue::UnknownRoute {
            source: "IU1".to_string(),
            destination: "GU7".to_string(),
        }]
    );

    let issues = selection_issues(api.compute_route("IU1", "GU1", "T3", 1).unwrap_err());
    assert_eq!(
        issues,
        vec![SelectionIssue::ModeUnavailable {
            source: "IU1".to_string(),
            destination: "GU1".to_string(),
            mode: "T3".to_string(),
        }]
    );
}

#[test]
fn test_route_row_missing_for_exact_period() {
    // 周期 2 由其他路线引入；IU1 → GU1 在周期 2 无路线行
    let api = loaded(
        &scenario_a()
            .route("IU1", "GU2", "T1", "2", "5", "1")
            .demand("GU1", "2", "100"),
    );

    let issues = selection_issues(api.compute_route("IU1", "GU1", "T1", 2).unwrap_err());
    assert_eq!(
        issues,
        vec![SelectionIssue::RouteNotFound {
            source: "IU1".to_string(),
            destination: "GU1".to_string(),
            mode: "T1".to_string(),
            period: 2,
        }]
    );
}

#[test]
fn test_validate_partial_selection() {
    let api = loaded(&scenario_a());

    assert!(api.validate_selection(&Selection::default()).valid);

    let check = api.validate_selection(&Selection {
        source: Some("IU1".to_string()),
        period: Some(1),
        ..Selection::default()
    });
    assert!(check.valid);

    let check = api.validate_selection(&Selection {
        destination: Some("GU9".to_string()),
        mode: Some("T7".to_string()),
        ..Selection::default()
    });
    assert!(!check.valid);
    assert_eq!(check.errors.len(), 2);
    assert_eq!(
        check.issues,
        vec![
            SelectionIssue::UnknownDestination { destination: "GU9".to_string() },
            SelectionIssue::UnknownMode { mode: "T7".to_string() },
        ]
    );

    assert!(api.validate_selection(&Selection::route("IU1", "GU1", "T1", 1)).valid);
}

// ==========================================
// 查询接口
// ==========================================

#[test]
fn test_compute_is_idempotent() {
    let api = loaded(&scenario_a());

    let first = api.compute_route("IU1", "GU1", "T1", 1).unwrap();
    let second = api.compute_route("IU1", "GU1", "T1", 1).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_list_modes_flags_unknown_reference_entries() {
    let api = loaded(&scenario_a().route("IU1", "GU1", "T9", "1", "5", "1"));

    let modes = api.list_modes("IU1", "GU1");
    assert_eq!(modes.len(), 2);
    assert_eq!(modes[0].code, "T1");
    assert_eq!(modes[0].name, FieldValue::Available("Road".to_string()));
    assert_eq!(modes[0].vehicle_capacity, FieldValue::Available(30.0));
    assert!(modes[0].emission_factor.is_available());
    assert_eq!(modes[1].code, "T9");
    assert_eq!(modes[1].name, FieldValue::Unavailable);
    assert_eq!(modes[1].vehicle_capacity, FieldValue::Unavailable);

    assert!(api.list_modes("IU1", "GU7").is_empty());
}

#[test]
fn test_every_valid_source_has_destinations() {
    let api = loaded(
        &scenario_a()
            .route("IU2", "GU1", "T1", "1", "5", "1")
            .route("IU3", "GU1", "T1", "1", "5", "1")
            .capacity("IU3", "1", "10")
            .production_cost("IU3", "1", "10"),
    );

    let sources = api.list_sources();
    assert_eq!(sources, vec!["IU1".to_string(), "IU3".to_string()]);
    for source in sources {
        assert!(!api.list_destinations(&source).is_empty());
    }
}

#[test]
fn test_plant_details() {
    let api = loaded(&scenario_a().constraint("IU1", "", "", "", "L", "C", "500"));

    let details = api.plant_details("IU1").unwrap();
    assert_eq!(details.plant_type, FieldValue::Available("IU".to_string()));
    assert_eq!(details.opening_stock, FieldValue::Available(100.0));
    assert_eq!(details.capacity.len(), 1);
    assert_eq!(details.closing_stock.len(), 1);
    assert_eq!(details.outbound, vec![("GU1".to_string(), "T1".to_string())]);
    assert!(details.inbound.is_empty());

    let err = api.plant_details("XX").unwrap_err();
    assert_eq!(
        selection_issues(err),
        vec![SelectionIssue::UnknownPlant { plant: "XX".to_string() }]
    );
}

#[test]
fn test_model_formulation_available_without_dataset() {
    let api = PlannerApi::default();
    assert!(!api.is_loaded());

    let model = api.model_formulation();
    assert_eq!(model.transport_modes.len(), 3);
    assert_eq!(model.objective.components.len(), 3);
    assert_eq!(model.data_sources.len(), 9);
    let balance = model.constraint("mass_balance").unwrap();
    assert!(balance.source.contains("IUGUOpeningStock.csv"));
    assert!(balance.source.contains("ClinkerDemand.csv"));
    assert!(model.constraint("unknown").is_none());
}
