use std::fmt;

use anyhow::Result;
use geo::Area;
use serde::{Deserialize, Serialize};

use crate::{Bounds, Polygon, Pt2D};

/// Like a polyline, but closed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ring {
    // first equals last
    pts: Vec<Pt2D>,
}

impl Ring {
    pub fn new(pts: Vec<Pt2D>) -> Result<Ring> {
        if pts.len() < 4 {
            bail!("Can't make a ring with only {} points", pts.len());
        }
        if !pts[0].same_as(pts[pts.len() - 1]) {
            bail!("Can't make a ring with mismatching first/last points");
        }
        if let Some(pair) = pts.windows(2).find(|pair| pair[0].same_as(pair[1])) {
            bail!("Ring has duplicate adjacent points near {}", pair[0]);
        }
        Ok(Ring { pts })
    }

    /// Builds a ring from an outline that may or may not repeat the first point at the end, and
    /// may contain repeated points. The source data does both.
    pub fn close(mut pts: Vec<Pt2D>) -> Result<Ring> {
        pts.dedup_by(|a, b| a.same_as(*b));
        if let (Some(first), Some(last)) = (pts.first().cloned(), pts.last().cloned()) {
            if !first.same_as(last) {
                pts.push(first);
            }
        }
        Ring::new(pts)
    }

    pub fn points(&self) -> &Vec<Pt2D> {
        &self.pts
    }

    pub fn into_polygon(self) -> Polygon {
        Polygon::new(self)
    }

    pub fn get_bounds(&self) -> Bounds {
        Bounds::from(&self.pts)
    }

    /// Unsigned area, in the square of whatever units the points use.
    pub fn area(&self) -> f64 {
        geo::Polygon::new(geo::LineString::from(self.clone()), Vec::new()).unsigned_area()
    }

    /// Applies a transformation to every point. Fails if the result isn't a valid ring anymore.
    pub fn transform<F: Fn(Pt2D) -> Pt2D>(&self, f: F) -> Result<Ring> {
        Ring::new(self.pts.iter().map(|pt| f(*pt)).collect())
    }
}

impl fmt::Display for Ring {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Ring::new(vec![")?;
        for pt in &self.pts {
            writeln!(f, "  Pt2D::new({}, {}),", pt.x(), pt.y())?;
        }
        write!(f, "])")
    }
}

impl From<Ring> for geo::LineString {
    fn from(ring: Ring) -> Self {
        let coords = ring
            .pts
            .into_iter()
            .map(geo::Coordinate::from)
            .collect::<Vec<_>>();
        Self(coords)
    }
}

impl TryFrom<geo::LineString> for Ring {
    type Error = anyhow::Error;

    fn try_from(line_string: geo::LineString) -> Result<Self> {
        Ring::close(line_string.into_iter().map(Pt2D::from).collect())
    }
}
