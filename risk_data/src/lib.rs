//! The datasets behind the fire risk map: buildings with their precomputed risk scores, roads,
//! and tram/metro lines, all read from CSV files exported by the analysis notebooks.
//!
//! Coordinates in these files are WGS84, latitude first. Everything handed out from this crate
//! is already projected to Web Mercator, except where noted.

#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod buildings;
mod coords;
mod dataset;
mod fire;
mod info;
pub mod literal;
mod roads;
mod transit;

pub use crate::buildings::{load_buildings, Building, BuildingID, Score, Scores};
pub use crate::coords::{parse_building_id, parse_coord_pair, parse_coord_string};
pub use crate::dataset::Dataset;
pub use crate::fire::{FireSize, ScoreType};
pub use crate::info::{summarize_addresses, BuildingInfo};
pub use crate::roads::{load_roads, Road, RoadCategory, RoadID};
pub use crate::transit::{load_transit_lines, load_transit_segments, TransitLine, TransitSegment};

pub const BUILDINGS_FILE: &str = "city_area_buildings.csv";
pub const ROADS_FILE: &str = "all_roads_amsterdam.csv";
pub const TRANSIT_LINES_FILE: &str = "tram_metro_lijnen.csv";
pub const TRANSIT_SEGMENTS_FILE: &str = "tram en metro lijnen plus stations.csv";
