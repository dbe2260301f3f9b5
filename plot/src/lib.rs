//! Draws map figures as SVG over raster tiles, with a bit of JavaScript for tooltips, clicking on
//! shapes, panning and zooming. Coordinates are Web Mercator meters.

#[macro_use]
extern crate anyhow;

mod color;
mod embed;
mod figure;
mod glyph;
mod tiles;

pub use crate::color::{Color, ColorBar, ColorScale, LinearColorMapper};
pub use crate::embed::{components, resources};
pub use crate::figure::{Figure, LegendItem};
pub use crate::glyph::{Glyph, Hover, Row, Shape, Style, TapAction};
pub use crate::tiles::{tiles_covering, zoom_for_resolution, Tile, TileProvider, TILE_SIZE};
