use std::io::Read;

use anyhow::{Context, Result};
use serde::Deserialize;

use fireutil::{prettyprint_usize, Timer};
use geom::Pt2D;

use crate::literal::float_to_id;
use crate::{parse_coord_pair, parse_coord_string};

/// A whole tram or metro line, only used as a backdrop.
pub struct TransitLine {
    /// In Web Mercator
    pub points: Vec<Pt2D>,
}

/// The stretch of a tram or metro line between two consecutive stations.
pub struct TransitSegment {
    /// Referenced by the `ov_small` and `ov_big` columns of buildings.
    pub number: u64,
    pub points: Vec<Pt2D>,
    pub station1: String,
    pub station2: String,
    pub station1_pt: Pt2D,
    pub station2_pt: Pt2D,
    /// "tram" or "metro"
    pub modality: String,
    /// The line number, like "17" or "M52"
    pub line: String,
}

impl TransitSegment {
    /// Like "Dam - Spui"
    pub fn stations(&self) -> String {
        format!("{} - {}", self.station1, self.station2)
    }

    /// Like "tram 2"
    pub fn describe(&self) -> String {
        format!("{} {}", self.modality, self.line)
    }
}

#[derive(Deserialize)]
struct LineRecord {
    #[serde(rename = "WKT_LAT_LNG")]
    wkt: String,
}

pub fn load_transit_lines<R: Read>(reader: R, timer: &mut Timer) -> Result<Vec<TransitLine>> {
    let mut lines = Vec::new();
    let mut skipped = 0;
    for (idx, rec) in csv::Reader::from_reader(reader).deserialize().enumerate() {
        let line = idx + 2;
        let rec: LineRecord = rec.with_context(|| format!("transit line on line {}", line))?;
        match parse_coord_string(&rec.wkt) {
            Ok(pts) => lines.push(TransitLine {
                points: pts.into_iter().map(|gps| gps.to_pt()).collect(),
            }),
            Err(err) => {
                timer.warn(format!("Skipping transit line on line {}: {:#}", line, err));
                skipped += 1;
            }
        }
    }
    timer.note(format!(
        "Loaded {} transit lines, skipped {}",
        prettyprint_usize(lines.len()),
        prettyprint_usize(skipped)
    ));
    Ok(lines)
}

#[derive(Deserialize)]
struct SegmentRecord {
    number: f64,
    lijn_coordinaten: String,
    coords_s1: String,
    coords_s2: String,
    #[serde(default)]
    station1: String,
    #[serde(default)]
    station2: String,
    #[serde(default)]
    modaliteit: String,
    #[serde(default)]
    lijn: String,
}

impl SegmentRecord {
    fn into_segment(self) -> Result<TransitSegment> {
        Ok(TransitSegment {
            number: float_to_id(self.number)?,
            points: parse_coord_string(&self.lijn_coordinaten)?
                .into_iter()
                .map(|gps| gps.to_pt())
                .collect(),
            station1_pt: parse_coord_pair(&self.coords_s1)
                .context("coords_s1")?
                .to_pt(),
            station2_pt: parse_coord_pair(&self.coords_s2)
                .context("coords_s2")?
                .to_pt(),
            station1: self.station1,
            station2: self.station2,
            modality: self.modaliteit,
            line: self.lijn,
        })
    }
}

pub fn load_transit_segments<R: Read>(
    reader: R,
    timer: &mut Timer,
) -> Result<Vec<TransitSegment>> {
    let mut segments = Vec::new();
    let mut skipped = 0;
    for (idx, rec) in csv::Reader::from_reader(reader).deserialize().enumerate() {
        let line = idx + 2;
        let rec: SegmentRecord =
            rec.with_context(|| format!("transit segment on line {}", line))?;
        match rec.into_segment() {
            Ok(seg) => segments.push(seg),
            Err(err) => {
                timer.warn(format!(
                    "Skipping transit segment on line {}: {:#}",
                    line, err
                ));
                skipped += 1;
            }
        }
    }
    timer.note(format!(
        "Loaded {} transit segments, skipped {}",
        prettyprint_usize(segments.len()),
        prettyprint_usize(skipped)
    ));
    Ok(segments)
}
