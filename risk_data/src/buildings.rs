use std::fmt;
use std::io::Read;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use fireutil::{prettyprint_usize, Counter, Timer};
use geom::{LonLat, Polygon, Pt2D, Ring};

use crate::literal;
use crate::{parse_building_id, FireSize, RoadID, ScoreType};

/// The BAG "pand" identifier of a building.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BuildingID(pub u64);

impl fmt::Display for BuildingID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Score {
    pub raw: f64,
    /// Scaled to [0, 1] over all buildings. NaN if the notebook couldn't compute it.
    pub normalized: f64,
}

/// One score per combination of score type and fire size.
#[derive(Clone, Debug, PartialEq)]
pub struct Scores {
    // Indexed by ScoreType, then FireSize
    values: [[Score; 2]; 3],
}

impl Scores {
    pub fn get(&self, score_type: ScoreType, fire: FireSize) -> Score {
        let row = match score_type {
            ScoreType::Default => 0,
            ScoreType::Residential => 1,
            ScoreType::Roads => 2,
        };
        let col = match fire {
            FireSize::Small => 0,
            FireSize::Big => 1,
        };
        self.values[row][col]
    }
}

pub struct Building {
    pub id: BuildingID,
    /// The outline as stored, in WGS84.
    pub outline: Vec<LonLat>,
    /// The outline in Web Mercator.
    pub polygon: Polygon,
    /// Multiple lines. None when the address is unknown.
    pub address: Option<String>,
    /// What each unit ("verblijfsobject") in the building is used for. Repeats are meaningful.
    pub functions: Vec<String>,
    pub neighbors: Vec<BuildingID>,
    linked_small: Vec<BuildingID>,
    linked_big: Vec<BuildingID>,
    roads_small: Vec<RoadID>,
    roads_big: Vec<RoadID>,
    transit_small: Vec<u64>,
    transit_big: Vec<u64>,
    pub scores: Scores,
}

impl Building {
    pub fn function_counts(&self) -> Counter<String> {
        self.functions.iter().cloned().collect()
    }

    /// Buildings within the fire radius.
    pub fn linked(&self, fire: FireSize) -> &Vec<BuildingID> {
        match fire {
            FireSize::Small => &self.linked_small,
            FireSize::Big => &self.linked_big,
        }
    }

    /// Roads a fire would block.
    pub fn blocked_roads(&self, fire: FireSize) -> &Vec<RoadID> {
        match fire {
            FireSize::Small => &self.roads_small,
            FireSize::Big => &self.roads_big,
        }
    }

    /// Tram/metro segments a fire would block, by their `number`.
    pub fn blocked_transit(&self, fire: FireSize) -> &Vec<u64> {
        match fire {
            FireSize::Small => &self.transit_small,
            FireSize::Big => &self.transit_big,
        }
    }

    /// The area a fire of this size blocks around the building, in Web Mercator. The outline is
    /// buffered in degrees and only then projected, so the shape is slightly squashed north-south.
    pub fn fire_radius(&self, fire: FireSize) -> Result<Polygon> {
        let raw = Ring::close(
            self.outline
                .iter()
                .map(|gps| Pt2D::new(gps.longitude, gps.latitude))
                .collect(),
        )?
        .into_polygon();
        let buffered = raw
            .buffer(fire.radius_degrees(), 32)
            .with_context(|| format!("buffering building {}", self.id))?;
        buffered.transform(|pt| LonLat::new(pt.x(), pt.y()).to_pt())
    }

    /// The address on one line per part, for tooltips. "unknown" if missing.
    pub fn address_lines(&self) -> Vec<String> {
        match self.address {
            Some(ref address) => address.lines().map(|x| x.to_string()).collect(),
            None => vec!["unknown".to_string()],
        }
    }
}

#[derive(Deserialize)]
struct BuildingRecord {
    pand_id: String,
    wgs: String,
    #[serde(default)]
    full_adress: Option<String>,
    #[serde(default, rename = "gebruiksdoelVerblijfsobject")]
    functions: String,
    #[serde(default)]
    neighbors: String,
    #[serde(default)]
    linked_small: String,
    #[serde(default)]
    linked_big: String,
    #[serde(default)]
    roads_small: String,
    #[serde(default)]
    roads_big: String,
    #[serde(default)]
    ov_small: String,
    #[serde(default)]
    ov_big: String,

    #[serde(default)]
    score_small_default: Option<f64>,
    #[serde(default)]
    score_big_default: Option<f64>,
    #[serde(default)]
    score_small_residential: Option<f64>,
    #[serde(default)]
    score_big_residential: Option<f64>,
    #[serde(default)]
    score_small_road: Option<f64>,
    #[serde(default)]
    score_big_road: Option<f64>,
    #[serde(default)]
    norm_score_small_default: Option<f64>,
    #[serde(default)]
    norm_score_big_default: Option<f64>,
    #[serde(default)]
    norm_score_small_residential: Option<f64>,
    #[serde(default)]
    norm_score_big_residential: Option<f64>,
    #[serde(default)]
    norm_score_small_road: Option<f64>,
    #[serde(default)]
    norm_score_big_road: Option<f64>,
}

impl BuildingRecord {
    fn into_building(self) -> Result<Building> {
        let id = parse_building_id(&self.pand_id)?;
        let outline: Vec<LonLat> = literal::parse_pairs(&self.wgs)
            .context("outline")?
            .into_iter()
            .map(|(lat, lon)| LonLat::from_lat_lon(lat, lon))
            .collect();
        let polygon = Ring::close(outline.iter().map(|gps| gps.to_pt()).collect())
            .context("outline")?
            .into_polygon();

        let address = self
            .full_adress
            .filter(|x| !x.trim().is_empty() && x != "nan");

        let score = |raw: Option<f64>, normalized: Option<f64>| Score {
            raw: raw.unwrap_or(f64::NAN),
            normalized: normalized.unwrap_or(f64::NAN),
        };
        let scores = Scores {
            values: [
                [
                    score(self.score_small_default, self.norm_score_small_default),
                    score(self.score_big_default, self.norm_score_big_default),
                ],
                [
                    score(
                        self.score_small_residential,
                        self.norm_score_small_residential,
                    ),
                    score(self.score_big_residential, self.norm_score_big_residential),
                ],
                [
                    score(self.score_small_road, self.norm_score_small_road),
                    score(self.score_big_road, self.norm_score_big_road),
                ],
            ],
        };

        Ok(Building {
            id,
            outline,
            polygon,
            address,
            functions: literal::parse_strings(&self.functions).context("functions")?,
            neighbors: building_ids(&self.neighbors).context("neighbors")?,
            linked_small: building_ids(&self.linked_small).context("linked_small")?,
            linked_big: building_ids(&self.linked_big).context("linked_big")?,
            roads_small: road_ids(&self.roads_small).context("roads_small")?,
            roads_big: road_ids(&self.roads_big).context("roads_big")?,
            transit_small: literal::parse_ids(&self.ov_small).context("ov_small")?,
            transit_big: literal::parse_ids(&self.ov_big).context("ov_big")?,
            scores,
        })
    }
}

fn building_ids(input: &str) -> Result<Vec<BuildingID>> {
    Ok(literal::parse_ids(input)?
        .into_iter()
        .map(BuildingID)
        .collect())
}

fn road_ids(input: &str) -> Result<Vec<RoadID>> {
    Ok(literal::parse_ids(input)?.into_iter().map(RoadID).collect())
}

/// Reads buildings from CSV. Rows that can't be understood are skipped with a warning, since one
/// odd building shouldn't take the whole map down.
pub fn load_buildings<R: Read>(reader: R, timer: &mut Timer) -> Result<Vec<Building>> {
    let mut buildings = Vec::new();
    let mut skipped = 0;
    for (idx, rec) in csv::Reader::from_reader(reader).deserialize().enumerate() {
        // Line 1 is the header
        let line = idx + 2;
        let rec: BuildingRecord = rec.with_context(|| format!("building on line {}", line))?;
        let pand_id = rec.pand_id.clone();
        match rec.into_building() {
            Ok(b) => buildings.push(b),
            Err(err) => {
                timer.warn(format!(
                    "Skipping building {} on line {}: {:#}",
                    pand_id, line, err
                ));
                skipped += 1;
            }
        }
    }
    timer.note(format!(
        "Loaded {} buildings, skipped {}",
        prettyprint_usize(buildings.len()),
        prettyprint_usize(skipped)
    ));
    Ok(buildings)
}
