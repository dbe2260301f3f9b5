use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::Result;
use fs_err::File;

use fireutil::{prettyprint_usize, Counter, Timer};
use geom::Bounds;

use crate::{
    load_buildings, load_roads, load_transit_lines, load_transit_segments, summarize_addresses,
    Building, BuildingID, BuildingInfo, FireSize, Road, TransitLine, TransitSegment,
    BUILDINGS_FILE, ROADS_FILE, TRANSIT_LINES_FILE, TRANSIT_SEGMENTS_FILE,
};

/// All four CSV files, loaded and cross-referenced.
pub struct Dataset {
    pub buildings: Vec<Building>,
    pub roads: Vec<Road>,
    pub transit_lines: Vec<TransitLine>,
    pub transit_segments: Vec<TransitSegment>,

    // Into buildings
    building_index: BTreeMap<BuildingID, usize>,
}

impl Dataset {
    /// Reads the CSV files from a directory. Individual malformed rows are skipped, but a missing
    /// or unreadable file is an error.
    pub fn load<P: AsRef<Path>>(dir: P, timer: &mut Timer) -> Result<Dataset> {
        let dir = dir.as_ref();

        timer.start("load buildings");
        let buildings = load_buildings(File::open(dir.join(BUILDINGS_FILE))?, timer)?;
        timer.stop("load buildings");

        timer.start("load roads");
        let roads = load_roads(File::open(dir.join(ROADS_FILE))?, timer)?;
        timer.stop("load roads");

        timer.start("load transit");
        let transit_lines = load_transit_lines(File::open(dir.join(TRANSIT_LINES_FILE))?, timer)?;
        let transit_segments =
            load_transit_segments(File::open(dir.join(TRANSIT_SEGMENTS_FILE))?, timer)?;
        timer.stop("load transit");

        Ok(Dataset::new(
            buildings,
            roads,
            transit_lines,
            transit_segments,
        ))
    }

    pub fn new(
        buildings: Vec<Building>,
        roads: Vec<Road>,
        transit_lines: Vec<TransitLine>,
        transit_segments: Vec<TransitSegment>,
    ) -> Dataset {
        let mut building_index = BTreeMap::new();
        for (idx, b) in buildings.iter().enumerate() {
            // The first occurrence of a duplicate id wins
            if building_index.contains_key(&b.id) {
                warn!("Building {} appears more than once", b.id);
                continue;
            }
            building_index.insert(b.id, idx);
        }
        info!(
            "Dataset has {} buildings, {} roads, {} transit segments",
            prettyprint_usize(building_index.len()),
            prettyprint_usize(roads.len()),
            prettyprint_usize(transit_segments.len())
        );

        Dataset {
            buildings,
            roads,
            transit_lines,
            transit_segments,
            building_index,
        }
    }

    pub fn building(&self, id: BuildingID) -> Option<&Building> {
        self.building_index.get(&id).map(|idx| &self.buildings[*idx])
    }

    /// Every building except duplicates, in file order.
    pub fn all_buildings(&self) -> impl Iterator<Item = &Building> {
        self.buildings
            .iter()
            .enumerate()
            .filter(move |(idx, b)| self.building_index.get(&b.id) == Some(idx))
            .map(|(_, b)| b)
    }

    /// The known buildings among some ids, in file order. Unknown and repeated ids are ignored.
    fn lookup_buildings(&self, ids: &[BuildingID]) -> Vec<&Building> {
        let indices: BTreeSet<usize> = ids
            .iter()
            .filter_map(|id| self.building_index.get(id).cloned())
            .collect();
        indices.into_iter().map(|idx| &self.buildings[idx]).collect()
    }

    /// In file order
    pub fn blocked_roads(&self, b: &Building, fire: FireSize) -> Vec<&Road> {
        let ids: BTreeSet<_> = b.blocked_roads(fire).iter().cloned().collect();
        self.roads.iter().filter(|r| ids.contains(&r.id)).collect()
    }

    /// In file order
    pub fn blocked_transit(&self, b: &Building, fire: FireSize) -> Vec<&TransitSegment> {
        let numbers: BTreeSet<_> = b.blocked_transit(fire).iter().cloned().collect();
        self.transit_segments
            .iter()
            .filter(|s| numbers.contains(&s.number))
            .collect()
    }

    /// Road name to its category. Roads sharing a name keep the category of the last one.
    pub fn blocked_road_summary(&self, b: &Building, fire: FireSize) -> BTreeMap<String, String> {
        self.blocked_roads(b, fire)
            .into_iter()
            .map(|r| (r.name.clone(), r.category.describe()))
            .collect()
    }

    /// "station - station" to "modality line"
    pub fn blocked_transit_summary(
        &self,
        b: &Building,
        fire: FireSize,
    ) -> BTreeMap<String, String> {
        self.blocked_transit(b, fire)
            .into_iter()
            .map(|s| (s.stations(), s.describe()))
            .collect()
    }

    pub fn building_info(&self, b: &Building, fire: FireSize) -> BuildingInfo {
        let mut neighbor_functions = Counter::new();
        for neighbor in self.lookup_buildings(&b.neighbors) {
            neighbor_functions.extend(neighbor.function_counts());
        }

        let linked = self.lookup_buildings(b.linked(fire));
        let mut linked_functions = Counter::new();
        for other in &linked {
            linked_functions.extend(other.function_counts());
        }
        let addresses = summarize_addresses(linked.iter().map(|other| other.address.as_deref()));

        BuildingInfo {
            functions: b.function_counts(),
            neighbor_functions,
            linked_functions,
            num_neighbors: b.neighbors.len(),
            num_linked: b.linked(fire).len(),
            addresses,
        }
    }

    /// Covers every building
    pub fn bounds(&self) -> Bounds {
        let mut bounds = Bounds::new();
        for b in &self.buildings {
            bounds.union(b.polygon.get_bounds());
        }
        bounds
    }
}
