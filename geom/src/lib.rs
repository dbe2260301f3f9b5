//! Geometry for the fire risk map: WGS84 and Web Mercator points, rings and polygons, and the
//! offset buffering used to draw the area a fire blocks around a building.

#[macro_use]
extern crate anyhow;

mod bounds;
mod gps;
mod polygon;
mod pt;
mod ring;

pub use crate::bounds::Bounds;
pub use crate::gps::{LonLat, WebMercator, EARTH_RADIUS_METERS, MAX_MERCATOR_LATITUDE};
pub use crate::polygon::Polygon;
pub use crate::pt::Pt2D;
pub use crate::ring::Ring;

/// Points closer together than this are considered the same.
pub const EPSILON_DIST: f64 = 1e-9;
