use std::fmt;
use std::io::Read;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use fireutil::{prettyprint_usize, Timer};
use geom::Pt2D;

use crate::literal::float_to_id;
use crate::parse_coord_string;

/// The `number` column of the road network.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RoadID(pub u64);

impl fmt::Display for RoadID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Road #{}", self.0)
    }
}

/// How important a road is to emergency services, from the `AUTO` column.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RoadCategory {
    Calamity,
    Main,
    Plus,
    /// Anything unexpected is kept verbatim.
    Other(String),
}

impl RoadCategory {
    pub fn parse(x: &str) -> RoadCategory {
        match x.trim() {
            "calamiteit" => RoadCategory::Calamity,
            "hoofd" => RoadCategory::Main,
            "plus" => RoadCategory::Plus,
            other => RoadCategory::Other(other.to_string()),
        }
    }

    /// The label used in tooltips and the blocked roads list.
    pub fn describe(&self) -> String {
        match self {
            RoadCategory::Calamity => "calamiteiten route".to_string(),
            RoadCategory::Main => "hoofdnet route".to_string(),
            RoadCategory::Plus => "plusnet route".to_string(),
            RoadCategory::Other(x) => x.clone(),
        }
    }
}

pub struct Road {
    pub id: RoadID,
    pub name: String,
    pub category: RoadCategory,
    /// In Web Mercator
    pub points: Vec<Pt2D>,
}

#[derive(Deserialize)]
struct RoadRecord {
    number: f64,
    #[serde(rename = "WKT_LAT_LNG")]
    wkt: String,
    #[serde(rename = "STT_NAAM", default)]
    name: String,
    #[serde(rename = "AUTO", default)]
    category: String,
}

pub fn load_roads<R: Read>(reader: R, timer: &mut Timer) -> Result<Vec<Road>> {
    let mut roads = Vec::new();
    let mut skipped = 0;
    for (idx, rec) in csv::Reader::from_reader(reader).deserialize().enumerate() {
        let line = idx + 2;
        let rec: RoadRecord = rec.with_context(|| format!("road on line {}", line))?;
        let parsed = float_to_id(rec.number).and_then(|id| {
            let points = parse_coord_string(&rec.wkt)?
                .into_iter()
                .map(|gps| gps.to_pt())
                .collect::<Vec<_>>();
            if points.len() < 2 {
                bail!("only {} points", points.len());
            }
            Ok((RoadID(id), points))
        });
        match parsed {
            Ok((id, points)) => roads.push(Road {
                id,
                name: rec.name,
                category: RoadCategory::parse(&rec.category),
                points,
            }),
            Err(err) => {
                timer.warn(format!("Skipping road on line {}: {:#}", line, err));
                skipped += 1;
            }
        }
    }
    timer.note(format!(
        "Loaded {} roads, skipped {}",
        prettyprint_usize(roads.len()),
        prettyprint_usize(skipped)
    ));
    Ok(roads)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load() {
        let csv = "number,WKT_LAT_LNG,STT_NAAM,AUTO
1,\"52.3731 4.8926,52.3740 4.8950\",Raadhuisstraat,hoofd
2.0,\"52.3660 4.8980,52.3670 4.9000,52.3680 4.9010\",Vijzelstraat,calamiteit
3,52.3660 4.8980,Nergensweg,plus
4,\"52.3600 4.9000,52.3610 4.9010\",Wibautstraat,stadsstraat
";
        let mut timer = Timer::throwaway();
        let roads = load_roads(csv.as_bytes(), &mut timer).unwrap();
        // Road 3 only has one point
        assert_eq!(3, roads.len());
        assert_eq!(1, timer.warnings().len());

        assert_eq!(RoadID(1), roads[0].id);
        assert_eq!("Raadhuisstraat", roads[0].name);
        assert_eq!("hoofdnet route", roads[0].category.describe());
        assert_eq!(2, roads[0].points.len());

        assert_eq!(RoadID(2), roads[1].id);
        assert_eq!(RoadCategory::Calamity, roads[1].category);
        assert_eq!(3, roads[1].points.len());

        assert_eq!(
            RoadCategory::Other("stadsstraat".to_string()),
            roads[2].category
        );
        assert_eq!("stadsstraat", roads[2].category.describe());
    }

    #[test]
    fn projected() {
        let csv = "number,WKT_LAT_LNG,STT_NAAM,AUTO\n1,\"52.36 4.9,52.37 4.9\",X,plus\n";
        let roads = load_roads(csv.as_bytes(), &mut Timer::throwaway()).unwrap();
        let pt = roads[0].points[0];
        assert!((pt.x() - 545465.5048870406).abs() < 1e-6);
        assert!((pt.y() - 6865481.656980445).abs() < 1e-6);
    }
}
