use std::fmt;

use anyhow::{Context, Result};
use geo::{Area, Contains, Intersects};
use geo_clipper::{Clipper, EndType, JoinType};
use serde::{Deserialize, Serialize};

use crate::{Bounds, Pt2D, Ring};

/// Clipper rounds to integers. For degrees, 2^32 keeps well under a millimeter of precision.
const CLIPPER_SCALE: f64 = 4_294_967_296.0;

#[derive(PartialEq, Serialize, Deserialize, Clone, Debug)]
pub struct Polygon {
    /// The first ring is the exterior, the rest are holes.
    rings: Vec<Ring>,
}

impl Polygon {
    pub fn new(outer: Ring) -> Polygon {
        Polygon { rings: vec![outer] }
    }

    pub fn with_holes(outer: Ring, mut inner: Vec<Ring>) -> Polygon {
        inner.insert(0, outer);
        Polygon { rings: inner }
    }

    pub fn from_rings(mut rings: Vec<Ring>) -> Result<Polygon> {
        if rings.is_empty() {
            bail!("Can't make a polygon from no rings");
        }
        let outer = rings.remove(0);
        Ok(Polygon::with_holes(outer, rings))
    }

    pub fn exterior(&self) -> &Ring {
        &self.rings[0]
    }

    pub fn holes(&self) -> &[Ring] {
        &self.rings[1..]
    }

    /// The points of the exterior ring. The first and last are the same.
    pub fn points(&self) -> &Vec<Pt2D> {
        self.exterior().points()
    }

    /// Does this polygon contain the point in its interior?
    pub fn contains_pt(&self, pt: Pt2D) -> bool {
        self.to_geo().contains(&geo::Point::from(pt))
    }

    /// Do two polygons intersect at all?
    pub fn intersects(&self, other: &Polygon) -> bool {
        self.to_geo().intersects(&other.to_geo())
    }

    pub fn get_bounds(&self) -> Bounds {
        self.exterior().get_bounds()
    }

    /// In the square of whatever units the points use. Holes are subtracted.
    pub fn area(&self) -> f64 {
        self.to_geo().unsigned_area()
    }

    pub fn center(&self) -> Pt2D {
        self.get_bounds().center()
    }

    /// Applies a transformation to every point of every ring.
    pub fn transform<F: Fn(Pt2D) -> Pt2D>(&self, f: F) -> Result<Polygon> {
        let rings = self
            .rings
            .iter()
            .map(|ring| ring.transform(&f))
            .collect::<Result<Vec<_>>>()?;
        Polygon::from_rings(rings)
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Result<Polygon> {
        self.transform(|pt| pt.offset(dx, dy))
    }

    /// Grows the exterior of this polygon outwards by `radius`, rounding every corner, like
    /// sweeping a circle along the outline. The radius is in the same units as the points.
    /// `segments` is how many straight pieces a full circle gets.
    ///
    /// Clipper works on integers, so points are scaled up by `CLIPPER_SCALE` first. If the offset
    /// falls apart into several pieces, the largest one is kept. Holes are ignored.
    pub fn buffer(&self, radius: f64, segments: usize) -> Result<Polygon> {
        if !radius.is_finite() || radius <= 0.0 {
            bail!("Can't buffer a polygon by {}", radius);
        }
        if segments < 3 {
            bail!("Rounding corners needs at least 3 segments, not {}", segments);
        }

        let scaled: geo::Polygon = self
            .exterior()
            .transform(|pt| Pt2D::new(pt.x() * CLIPPER_SCALE, pt.y() * CLIPPER_SCALE))?
            .into_polygon()
            .into();
        let delta = radius * CLIPPER_SCALE;
        // How far the chord of one segment strays from the true arc
        let arc_tolerance = delta * (1.0 - (std::f64::consts::PI / (segments as f64)).cos());
        let offset = scaled.offset(
            delta,
            JoinType::Round(arc_tolerance),
            EndType::ClosedPolygon,
            1.0,
        );

        let largest = offset
            .into_iter()
            .max_by(|a, b| a.unsigned_area().total_cmp(&b.unsigned_area()))
            .ok_or_else(|| anyhow!("Buffering by {} produced nothing", radius))?;
        let (exterior, _) = largest.into_inner();
        let ring = Ring::try_from(exterior)
            .with_context(|| format!("buffering by {}", radius))?
            .transform(|pt| Pt2D::new(pt.x() / CLIPPER_SCALE, pt.y() / CLIPPER_SCALE))?;
        Ok(Polygon::new(ring))
    }

    // A less verbose way of invoking the From/Into impl. Note this hides a potentially expensive
    // clone.
    fn to_geo(&self) -> geo::Polygon {
        self.clone().into()
    }
}

impl fmt::Display for Polygon {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "Polygon with {} points and {} holes",
            self.points().len(),
            self.rings.len() - 1
        )?;
        for (idx, pt) in self.points().iter().enumerate() {
            writeln!(f, "  {}: {}", idx, pt)?;
        }
        Ok(())
    }
}

impl TryFrom<geo::Polygon> for Polygon {
    type Error = anyhow::Error;

    fn try_from(poly: geo::Polygon) -> Result<Self> {
        let (exterior, interiors) = poly.into_inner();
        Ok(Polygon::with_holes(
            Ring::try_from(exterior)?,
            interiors
                .into_iter()
                .map(Ring::try_from)
                .collect::<Result<Vec<_>>>()?,
        ))
    }
}

impl From<Polygon> for geo::Polygon {
    fn from(mut poly: Polygon) -> Self {
        let exterior = poly.rings.remove(0);
        let interiors: Vec<geo::LineString> =
            poly.rings.into_iter().map(geo::LineString::from).collect();
        Self::new(exterior.into(), interiors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(size: f64) -> Polygon {
        Ring::close(vec![
            Pt2D::new(0.0, 0.0),
            Pt2D::new(size, 0.0),
            Pt2D::new(size, size),
            Pt2D::new(0.0, size),
        ])
        .unwrap()
        .into_polygon()
    }

    #[test]
    fn basics() {
        let p = square(10.0);
        assert!((p.area() - 100.0).abs() < 1e-9);
        assert!(p.contains_pt(Pt2D::new(5.0, 5.0)));
        assert!(!p.contains_pt(Pt2D::new(15.0, 5.0)));
        assert_eq!(Pt2D::new(5.0, 5.0), p.center());

        let moved = p.translate(100.0, 0.0).unwrap();
        assert!(!p.intersects(&moved));
        assert!(moved.contains_pt(Pt2D::new(105.0, 5.0)));
    }

    #[test]
    fn buffer_square() {
        let p = square(10.0);
        let buffered = p.buffer(1.0, 64).unwrap();

        let bounds = buffered.get_bounds();
        assert!((bounds.min_x + 1.0).abs() < 1e-6, "{:?}", bounds);
        assert!((bounds.min_y + 1.0).abs() < 1e-6, "{:?}", bounds);
        assert!((bounds.max_x - 11.0).abs() < 1e-6, "{:?}", bounds);
        assert!((bounds.max_y - 11.0).abs() < 1e-6, "{:?}", bounds);

        // The square, 4 side strips and 4 quarter circles. The arcs are chords, so a bit is
        // shaved off the circle.
        let full = 100.0 + 4.0 * 10.0 + std::f64::consts::PI;
        assert!(buffered.area() <= full + 1e-6, "{}", buffered.area());
        assert!(buffered.area() > full - 0.02, "{}", buffered.area());

        // Every original corner is well inside
        for pt in p.points() {
            assert!(buffered.contains_pt(*pt));
        }
        // The rounded corners cut off the bounding box corners
        assert!(!buffered.contains_pt(Pt2D::new(10.9, 10.9)));
    }

    #[test]
    fn buffer_concave() {
        // An L-shaped building
        let p = Ring::close(vec![
            Pt2D::new(0.0, 0.0),
            Pt2D::new(4.0, 0.0),
            Pt2D::new(4.0, 1.0),
            Pt2D::new(1.0, 1.0),
            Pt2D::new(1.0, 4.0),
            Pt2D::new(0.0, 4.0),
        ])
        .unwrap()
        .into_polygon();
        let buffered = p.buffer(0.5, 32).unwrap();
        assert!(buffered.area() > p.area());
        // The inner corner gets filled in
        assert!(buffered.contains_pt(Pt2D::new(1.3, 1.3)));
        assert!(!buffered.contains_pt(Pt2D::new(2.0, 2.0)));
    }

    #[test]
    fn buffer_bad_radius() {
        let p = square(1.0);
        assert!(p.buffer(0.0, 16).is_err());
        assert!(p.buffer(-1.0, 16).is_err());
        assert!(p.buffer(f64::NAN, 16).is_err());
        assert!(p.buffer(1.0, 2).is_err());
    }

    #[test]
    fn buffer_tiny_jagged_outline() {
        // A building outline in (lon, lat) degrees with near-collinear edges a few decimals apart
        let p = Ring::close(
            vec![
                (52.37982, 4.89864),
                (52.37985, 4.89860),
                (52.37991, 4.89859),
                (52.37991, 4.89853),
                (52.37988, 4.89847),
                (52.37982, 4.89845),
                (52.37978, 4.89851),
                (52.37977, 4.89854),
                (52.37973, 4.89858),
                (52.37973, 4.89868),
            ]
            .into_iter()
            .map(|(lat, lon)| Pt2D::new(lon, lat))
            .collect(),
        )
        .unwrap()
        .into_polygon();
        let buffered = p.buffer(0.0001, 32).unwrap();
        for pt in p.points() {
            assert!(buffered.contains_pt(*pt));
        }
        let (before, after) = (p.get_bounds(), buffered.get_bounds());
        // The top is a flat edge, so it moves out exactly
        assert!((after.max_y - before.max_y - 0.0001).abs() < 1e-9);
        // The westmost point is a corner, where the arc is only approximated
        let grow = before.min_x - after.min_x;
        assert!(grow > 0.000099 && grow < 0.0001 + 1e-9, "grew by {}", grow);
    }

    #[test]
    fn geo_round_trip() {
        let p = square(3.0);
        let back = Polygon::try_from(geo::Polygon::from(p.clone())).unwrap();
        assert_eq!(p, back);
    }
}
