use geom::{Bounds, WebMercator};

/// Raster tiles are this many pixels wide at their nominal zoom. Retina tiles have twice the
/// pixels, but cover the same area.
pub const TILE_SIZE: f64 = 256.0;
const MAX_ZOOM: u32 = 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileProvider {
    CartoDbPositronRetina,
}

impl TileProvider {
    pub fn url(self, tile: Tile) -> String {
        match self {
            TileProvider::CartoDbPositronRetina => format!(
                "https://tiles.basemaps.cartocdn.com/light_all/{}/{}/{}@2x.png",
                tile.z, tile.x, tile.y
            ),
        }
    }

    /// HTML, shown in a corner of the plot.
    pub fn attribution(self) -> &'static str {
        match self {
            TileProvider::CartoDbPositronRetina => {
                "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> \
                 contributors, &copy; <a href=\"https://carto.com/attributions\">CARTO</a>"
            }
        }
    }
}

/// An XYZ tile. `y` counts from the north.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Tile {
    pub z: u32,
    pub x: u32,
    pub y: u32,
}

impl Tile {
    /// Width of one tile at this zoom, in Mercator meters.
    pub fn size_meters(z: u32) -> f64 {
        2.0 * WebMercator::origin_shift() / 2.0_f64.powi(z as i32)
    }

    pub fn bounds(&self) -> Bounds {
        let size = Tile::size_meters(self.z);
        let shift = WebMercator::origin_shift();
        let mut b = Bounds::new();
        b.min_x = -shift + (self.x as f64) * size;
        b.max_x = b.min_x + size;
        b.max_y = shift - (self.y as f64) * size;
        b.min_y = b.max_y - size;
        b
    }
}

/// The smallest zoom whose tiles are at least as detailed as `meters_per_pixel`.
pub fn zoom_for_resolution(meters_per_pixel: f64) -> u32 {
    if meters_per_pixel.is_nan() || meters_per_pixel <= 0.0 {
        return MAX_ZOOM;
    }
    let world_pixels = 2.0 * WebMercator::origin_shift() / meters_per_pixel;
    let zoom = (world_pixels / TILE_SIZE).log2().ceil();
    if zoom <= 0.0 {
        0
    } else {
        (zoom as u32).min(MAX_ZOOM)
    }
}

/// All tiles at one zoom touching the bounds, row by row from the north-west.
pub fn tiles_covering(bounds: &Bounds, z: u32) -> Vec<Tile> {
    if bounds.is_empty() {
        return Vec::new();
    }
    let size = Tile::size_meters(z);
    let shift = WebMercator::origin_shift();
    let max_idx = (1u64 << z) - 1;
    let idx = |meters: f64| -> u32 { ((meters / size).floor().max(0.0) as u64).min(max_idx) as u32 };

    let x1 = idx(bounds.min_x + shift);
    let x2 = idx(bounds.max_x + shift);
    let y1 = idx(shift - bounds.max_y);
    let y2 = idx(shift - bounds.min_y);

    let mut tiles = Vec::new();
    for y in y1..=y2 {
        for x in x1..=x2 {
            tiles.push(Tile { z, x, y });
        }
    }
    tiles
}

#[cfg(test)]
mod tests {
    use super::*;
    use geom::Pt2D;

    #[test]
    fn whole_world() {
        let tile = Tile { z: 0, x: 0, y: 0 };
        let b = tile.bounds();
        assert!((b.max_x - 20037508.342789244).abs() < 1e-6);
        assert!((b.min_y + 20037508.342789244).abs() < 1e-6);
        assert_eq!(
            "https://tiles.basemaps.cartocdn.com/light_all/0/0/0@2x.png",
            TileProvider::CartoDbPositronRetina.url(tile)
        );
    }

    #[test]
    fn amsterdam() {
        let view = Bounds::from(&[
            Pt2D::new(530683.95, 6854570.54),
            Pt2D::new(555576.10, 6876203.35),
        ]);
        // About 25 meters per pixel across a 1000 pixel plot
        let z = zoom_for_resolution(view.width() / 1000.0);
        assert_eq!(13, z);

        let tiles = tiles_covering(&view, z);
        assert!(!tiles.is_empty());
        // Dam square, at zoom 13
        assert!(tiles.contains(&Tile {
            z: 13,
            x: 4207,
            y: 2692
        }));
        let mut covered = Bounds::new();
        for t in &tiles {
            covered.union(t.bounds());
        }
        for pt in view.get_corners() {
            assert!(covered.contains(pt));
        }
    }

    #[test]
    fn zoom_limits() {
        assert_eq!(0, zoom_for_resolution(1e9));
        assert_eq!(MAX_ZOOM, zoom_for_resolution(0.0001));
        assert_eq!(MAX_ZOOM, zoom_for_resolution(f64::NAN));
    }
}
