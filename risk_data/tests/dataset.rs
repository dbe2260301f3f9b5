use std::path::PathBuf;

use fireutil::Timer;
use risk_data::{BuildingID, Dataset, FireSize, ScoreType};

fn fixture() -> Dataset {
    fireutil::logger::setup_for_tests();
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../data");
    Dataset::load(dir, &mut Timer::throwaway()).unwrap()
}

const DAM_1: BuildingID = BuildingID(363100012000001);
const DAM_3: BuildingID = BuildingID(363100012000002);
const ROKIN: BuildingID = BuildingID(363100012000004);

#[test]
fn load_fixture() {
    let data = fixture();
    // The last building has a broken outline
    assert_eq!(4, data.buildings.len());
    assert_eq!(3, data.roads.len());
    assert_eq!(2, data.transit_lines.len());
    assert_eq!(3, data.transit_segments.len());

    // Written as a float in the file
    assert!(data.building(ROKIN).is_some());
    assert!(data.building(BuildingID(363100012000005)).is_none());
    assert!(data.building(BuildingID(42)).is_none());

    let bounds = data.bounds();
    for b in data.all_buildings() {
        assert!(bounds.contains(b.polygon.center()));
    }
}

#[test]
fn scores() {
    let data = fixture();
    let b = data.building(DAM_1).unwrap();
    let score = b.scores.get(ScoreType::Roads, FireSize::Big);
    assert_eq!(60.0, score.raw);
    assert_eq!(1.0, score.normalized);

    let rokin = data.building(ROKIN).unwrap();
    assert!(rokin
        .scores
        .get(ScoreType::Residential, FireSize::Big)
        .normalized
        .is_nan());
}

#[test]
fn blocked_routes() {
    let data = fixture();
    let b = data.building(DAM_1).unwrap();

    let small = data.blocked_road_summary(b, FireSize::Small);
    assert_eq!(1, small.len());
    assert_eq!("hoofdnet route", small["Dam"]);

    let big = data.blocked_roads(b, FireSize::Big);
    assert_eq!(
        vec!["Dam", "Rokin"],
        big.iter().map(|r| r.name.as_str()).collect::<Vec<_>>()
    );

    assert!(data.blocked_transit(b, FireSize::Small).is_empty());
    let transit = data.blocked_transit_summary(b, FireSize::Big);
    assert_eq!("tram 2", transit["Nieuwezijds Kolk - Dam"]);

    let neighbor = data.building(DAM_3).unwrap();
    let segments = data.blocked_transit(neighbor, FireSize::Big);
    assert_eq!(
        vec![10, 11],
        segments.iter().map(|s| s.number).collect::<Vec<_>>()
    );
}

#[test]
fn building_info() {
    let data = fixture();
    let b = data.building(DAM_1).unwrap();

    let info = data.building_info(b, FireSize::Big);
    assert_eq!(2, info.functions.get("kantoorfunctie".to_string()));
    assert_eq!(1, info.num_neighbors);
    assert_eq!(3, info.num_linked);
    assert_eq!(2, info.neighbor_functions.get("woonfunctie".to_string()));
    assert_eq!(3, info.linked_functions.get("woonfunctie".to_string()));
    assert_eq!(1, info.linked_functions.get("bijeenkomstfunctie".to_string()));
    assert_eq!(
        vec![
            "Dam 3 1012JS",
            "Rokin 2-8 1012KT",
            "Rokin 10 1012KT",
            "All in Amsterdam",
            "1 unknown addresses",
        ],
        info.addresses
    );

    let small = data.building_info(b, FireSize::Small);
    assert_eq!(1, small.num_linked);
    assert_eq!(vec!["Dam 3 1012JS", "All in Amsterdam"], small.addresses);
}

#[test]
fn fire_radius_covers_building() {
    let data = fixture();
    let b = data.building(DAM_3).unwrap();
    for fire in FireSize::all() {
        let radius = b.fire_radius(fire).unwrap();
        let bounds = radius.get_bounds();
        for pt in b.polygon.points() {
            assert!(bounds.contains(*pt));
        }
    }
}

#[test]
fn missing_directory() {
    let err = Dataset::load("/nonexistent/firemap", &mut Timer::throwaway())
        .err()
        .unwrap();
    assert!(format!("{:#}", err).contains(risk_data::BUILDINGS_FILE));
}

#[test]
fn duplicate_ids() {
    fireutil::logger::setup_for_tests();
    let csv = r#"pand_id,wgs,full_adress
363100012000001,"[[52.3730, 4.8930], [52.3730, 4.8932], [52.3732, 4.8932], [52.3732, 4.8930]]",Dam 1
363100012000002,"[[52.3733, 4.8930], [52.3733, 4.8932], [52.3735, 4.8932], [52.3735, 4.8930]]",Dam 3
363100012000001.0,"[[52.3740, 4.8940], [52.3740, 4.8942], [52.3742, 4.8942], [52.3742, 4.8940]]",Dam 1 again
"#;
    let buildings = risk_data::load_buildings(csv.as_bytes(), &mut Timer::throwaway()).unwrap();
    assert_eq!(3, buildings.len());
    let data = Dataset::new(buildings, Vec::new(), Vec::new(), Vec::new());

    // The first row wins
    let b = data.building(DAM_1).unwrap();
    assert_eq!(vec!["Dam 1"], b.address_lines());

    let all: Vec<&str> = data
        .all_buildings()
        .map(|b| b.address.as_deref().unwrap())
        .collect();
    assert_eq!(vec!["Dam 1", "Dam 3"], all);
}
