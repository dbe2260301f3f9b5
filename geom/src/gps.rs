use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Pt2D;

/// The sphere Web Mercator pretends the earth is.
pub const EARTH_RADIUS_METERS: f64 = 6_378_137.0;
/// Web Mercator is square; latitudes beyond this are clamped.
pub const MAX_MERCATOR_LATITUDE: f64 = 85.051_128_779_806_59;

// longitude is x, latitude is y
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct LonLat {
    pub longitude: f64,
    pub latitude: f64,
}

impl LonLat {
    pub fn new(lon: f64, lat: f64) -> LonLat {
        LonLat {
            longitude: lon,
            latitude: lat,
        }
    }

    /// The datasets store coordinates latitude first, matching the EPSG:4326 axis order.
    pub fn from_lat_lon(lat: f64, lon: f64) -> LonLat {
        LonLat::new(lon, lat)
    }

    pub fn to_pt(self) -> Pt2D {
        WebMercator::forward(self)
    }
}

impl fmt::Display for LonLat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "LonLat({0}, {1})", self.longitude, self.latitude)
    }
}

/// Spherical Web Mercator, EPSG:4326 to EPSG:3857 and back.
pub struct WebMercator;

impl WebMercator {
    pub fn forward(gps: LonLat) -> Pt2D {
        let lat = gps
            .latitude
            .clamp(-MAX_MERCATOR_LATITUDE, MAX_MERCATOR_LATITUDE);
        let x = EARTH_RADIUS_METERS * gps.longitude.to_radians();
        let y = EARTH_RADIUS_METERS * (PI / 4.0 + lat.to_radians() / 2.0).tan().ln();
        Pt2D::new(x, y)
    }

    pub fn inverse(pt: Pt2D) -> LonLat {
        let lon = (pt.x() / EARTH_RADIUS_METERS).to_degrees();
        let lat = (2.0 * (pt.y() / EARTH_RADIUS_METERS).exp().atan() - PI / 2.0).to_degrees();
        LonLat::new(lon, lat)
    }

    /// Takes arguments in the order the source data stores them: latitude, then longitude.
    pub fn transform(lat: f64, lon: f64) -> Pt2D {
        WebMercator::forward(LonLat::from_lat_lon(lat, lon))
    }

    /// Half the width of the world, in meters.
    pub fn origin_shift() -> f64 {
        PI * EARTH_RADIUS_METERS
    }
}
