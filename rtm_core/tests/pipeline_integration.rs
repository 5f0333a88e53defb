//! End-to-end pipeline tests: CSV text in, consistent projections out.

use std::collections::HashMap;

use rtm_core::config::BandConfig;
use rtm_core::core::domain::Field;
use rtm_core::parsing::loader::load_reader;
use rtm_core::services::dashboard::{DashboardRequest, DashboardSession, Recomputed};
use rtm_core::services::map_view::ColorBy;
use rtm_core::transformations::filtering::Selection;

const EXTRACT: &str = "\
ID_SAP,CLIENTE,CENTRO,Descripción Tipo,Ruta ZPV,GRUPO_RM1,GEC_RTM,Método_venta ZPV,Ritmo ZPV,Fv ZPV,ZPV_L,ZPV_M,ZPV_R,ZPV_J,ZPV_V,ZPV_S,latitud,longitud
100,TIENDA A,UO-01,EDI,R1,G1,GEC-A,1DA,2,LMV,10,10,10,10,10,10,19.40,-99.10
100,TIENDA A,UO-01,EDI,R2,G1,GEC-A,1DA,2,LMV,40,40,40,40,40,40,19.41,-99.11
101,TIENDA B,UO-01,EDI,R1,G1,GEC-A,1DA,3,LM,45,45,45,45,45,45,19.42,-99.12
102,TIENDA C,UO-01,MAYOREO,R3,G2,GEC-B,2DA,4,LMRJVS,50,50,50,50,50,50,19.43,-99.13
103,TIENDA D,UO-02,EDI,R4,G1,GEC-A,1DA,2,L,70,70,70,70,70,70,20.00,-103.00
104,TIENDA E,UO-01,EDI,R1,G1,GEC-A,1DA,2,LMV,0,0,0,0,0,0,19.44,bad-lon
";

fn session() -> DashboardSession {
    let load = load_reader(EXTRACT.as_bytes(), "extract.csv").unwrap();
    let bands = BandConfig::from_toml_str(
        "[default]\nmin = 48\nmax = 58\n\n[per_type.EDI]\nmin = 0\nmax = 99\n",
    )
    .unwrap();
    DashboardSession::new(rtm_core::core::dataset::Dataset::new(load.records), bands)
}

fn ready(session: &mut DashboardSession, request: &DashboardRequest) -> rtm_core::services::dashboard::DashboardData {
    match session.recompute(request) {
        Recomputed::Ready(data) => *data,
        Recomputed::NoMatchingRecords { .. } => panic!("expected data"),
    }
}

#[test]
fn projections_stay_consistent_with_the_same_filtered_subset() {
    let mut session = session();
    let mut request = DashboardRequest::select_all();
    request.color_by = ColorBy::Field(Field::Route);

    let data = ready(&mut session, &request);

    // All six rows survive the open filters.
    assert_eq!(data.record_count, 6);

    // Map: client 100 deduplicates to one point and the bad-longitude row
    // drops, so 6 rows -> 4 points.
    assert_eq!(data.map.points.len(), 4);
    assert_eq!(data.map.deduplicated_clients, 1);
    assert_eq!(data.map.dropped_missing_coords, 1);
    let count_100 = data
        .map
        .points
        .iter()
        .filter(|p| p.client_id == "100")
        .count();
    assert_eq!(count_100, 1);

    // Hierarchy still counts all 6 rows: map cleaning never leaks into it.
    let root_weight: u64 = data
        .hierarchy
        .iter()
        .filter(|n| n.parent.is_empty())
        .map(|n| n.weight)
        .sum();
    assert_eq!(root_weight, 6);

    // Weight conservation at every non-leaf node.
    let mut child_sums: HashMap<&str, u64> = HashMap::new();
    for node in &data.hierarchy {
        if !node.parent.is_empty() {
            *child_sums.entry(node.parent.as_str()).or_default() += node.weight;
        }
    }
    for node in &data.hierarchy {
        if let Some(sum) = child_sums.get(node.id.as_str()) {
            assert_eq!(node.weight, *sum);
        }
    }

    // Compliance sees all route groups, including the coordinate-less row's.
    assert_eq!(data.compliance.total_routes(), 4);

    // The client listing shows every filtered row: client 100 appears once
    // per route and the coordinate-less client 104 is still listed.
    assert_eq!(data.clients.len(), 6);
    let listed_100 = data.clients.iter().filter(|c| c.client_id == "100").count();
    assert_eq!(listed_100, 2);
    let c104 = data.clients.iter().find(|c| c.client_id == "104").unwrap();
    assert_eq!(c104.longitude, None);
    assert_eq!(c104.client_name, "TIENDA E");
}

#[test]
fn compliance_uses_per_type_bands_with_default_fallback() {
    let mut session = session();
    let data = ready(&mut session, &DashboardRequest::select_all());

    // EDI routes get the wide 0-99 band: all in-band.
    // The MAYOREO route averages 50 under the default 48-58 band: in-band.
    let in_band: Vec<&str> = data
        .compliance
        .in_band
        .iter()
        .map(|r| r.route.as_str())
        .collect();
    assert!(in_band.contains(&"R1"));
    assert!(in_band.contains(&"R3"));

    let r1 = data
        .compliance
        .in_band
        .iter()
        .find(|r| r.route == "R1")
        .unwrap();
    // R1 weekday sums are 55 across six days; Sunday column is absent.
    assert_eq!(r1.daily_average, 55);
    assert_eq!(r1.weekday_totals[6], None);
}

#[test]
fn emptying_a_downstream_stage_reports_no_matching_records() {
    let mut session = session();
    let mut request = DashboardRequest::select_all();
    request.stages[2].selection = Selection::none();

    match session.recompute(&request) {
        Recomputed::NoMatchingRecords { stages } => {
            assert!(stages[2].selected.is_empty());
            assert!(!stages[2].options.is_empty());
        }
        Recomputed::Ready(_) => panic!("expected NoMatchingRecords"),
    }
}

#[test]
fn cascade_narrowing_shrinks_downstream_option_sets() {
    let mut session = session();
    let mut request = DashboardRequest::select_all();
    request.stages[0].selection = Selection::chosen(["UO-02"]);

    let data = ready(&mut session, &request);
    assert_eq!(data.record_count, 1);
    // Route options derive from the UO-02 subset only.
    assert_eq!(data.stages[2].options, vec!["R4"]);
}

#[test]
fn legend_colors_are_stable_across_recomputes() {
    let mut session = session();
    let mut request = DashboardRequest::select_all();
    request.color_by = ColorBy::Field(Field::CommercialFigure);

    let wide = ready(&mut session, &request);
    request.stages[1].selection = Selection::chosen(["EDI"]);
    let narrow = ready(&mut session, &request);

    let color_in = |data: &rtm_core::services::dashboard::DashboardData, label: &str| {
        data.map
            .legend
            .iter()
            .find(|e| e.label == label)
            .map(|e| e.color)
    };

    assert_eq!(color_in(&wide, "EDI"), color_in(&narrow, "EDI"));
    assert!(color_in(&wide, "MAYOREO").is_some());
    assert!(color_in(&narrow, "MAYOREO").is_none());
}

#[test]
fn dashboard_data_serializes_for_renderers() {
    let mut session = session();
    let data = ready(&mut session, &DashboardRequest::select_all());

    let json = serde_json::to_value(&data).unwrap();
    assert!(json.get("map").is_some());
    assert!(json.get("hierarchy").is_some());
    assert!(json.get("compliance").is_some());
    assert!(json.get("weekday_profile").is_some());
    assert!(json.get("clients").is_some());
}
