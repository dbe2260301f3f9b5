use std::fmt::Write;

use svg::node::element::{
    Circle, Definitions, Group, Image, LinearGradient, Path, Polyline, Rectangle, Stop,
};
use svg::Document;

use geom::{Bounds, Polygon, Pt2D};

use crate::tiles::{tiles_covering, zoom_for_resolution, Tile, TileProvider};
use crate::{Color, ColorBar, Glyph, Shape};

/// A map-like plot in Web Mercator coordinates. Glyphs are drawn in the order they're added.
pub struct Figure {
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    /// In pixels
    pub width: usize,
    pub height: usize,
    pub tiles: Option<TileProvider>,
    pub glyphs: Vec<Glyph>,
    pub color_bar: Option<ColorBar>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LegendItem {
    pub label: String,
    pub color: Color,
}

impl Figure {
    pub fn new(x_range: (f64, f64), y_range: (f64, f64), width: usize, height: usize) -> Figure {
        Figure {
            x_range,
            y_range,
            width,
            height,
            tiles: None,
            glyphs: Vec::new(),
            color_bar: None,
        }
    }

    pub fn add_tile(&mut self, provider: TileProvider) {
        self.tiles = Some(provider);
    }

    pub fn add(&mut self, glyph: Glyph) {
        self.glyphs.push(glyph);
    }

    pub fn add_color_bar(&mut self, bar: ColorBar) {
        self.color_bar = Some(bar);
    }

    pub fn view(&self) -> Bounds {
        Bounds::from(&[
            Pt2D::new(self.x_range.0, self.y_range.0),
            Pt2D::new(self.x_range.1, self.y_range.1),
        ])
    }

    /// Mercator to pixels, with y pointing down.
    pub fn to_pixels(&self, pt: Pt2D) -> (f64, f64) {
        let (x0, x1) = self.x_range;
        let (y0, y1) = self.y_range;
        (
            (pt.x() - x0) / (x1 - x0) * (self.width as f64),
            (y1 - pt.y()) / (y1 - y0) * (self.height as f64),
        )
    }

    /// Tiles covering the view, at the zoom matching the plot's resolution.
    pub fn tiles_in_view(&self) -> Vec<Tile> {
        if self.tiles.is_none() || self.width == 0 {
            return Vec::new();
        }
        let view = self.view();
        let zoom = zoom_for_resolution(view.width() / (self.width as f64));
        tiles_covering(&view, zoom)
    }

    /// One entry per distinct label, in the order they first appear.
    pub fn legend(&self) -> Vec<LegendItem> {
        let mut items: Vec<LegendItem> = Vec::new();
        for glyph in &self.glyphs {
            if let Some(ref label) = glyph.legend_label {
                if items.iter().any(|item| &item.label == label) {
                    continue;
                }
                items.push(LegendItem {
                    label: label.clone(),
                    color: glyph.style.swatch(),
                });
            }
        }
        items
    }

    /// The map itself. Every glyph is a group tagged with `data-glyph`, and each of its shapes
    /// with `data-row`, so the page script can find the data behind them.
    pub fn to_svg(&self) -> Document {
        let mut doc = Document::new()
            .set("class", "firemap-map")
            .set("viewBox", format!("0 0 {} {}", self.width, self.height))
            .set("width", self.width.to_string())
            .set("height", self.height.to_string());

        if let Some(provider) = self.tiles {
            let mut group = Group::new().set("class", "firemap-tiles");
            for tile in self.tiles_in_view() {
                let b = tile.bounds();
                let (x1, y1) = self.to_pixels(Pt2D::new(b.min_x, b.max_y));
                let (x2, y2) = self.to_pixels(Pt2D::new(b.max_x, b.min_y));
                group = group.add(
                    Image::new()
                        .set("href", provider.url(tile))
                        .set("x", num(x1))
                        .set("y", num(y1))
                        .set("width", num(x2 - x1))
                        .set("height", num(y2 - y1))
                        .set("preserveAspectRatio", "none"),
                );
            }
            doc = doc.add(group);
        }

        for (idx, glyph) in self.glyphs.iter().enumerate() {
            doc = doc.add(self.render_glyph(idx, glyph));
        }
        doc
    }

    fn render_glyph(&self, idx: usize, glyph: &Glyph) -> Group {
        let style = &glyph.style;
        let mut class = "firemap-glyph".to_string();
        if glyph.tap.is_some() {
            class.push_str(" firemap-tappable");
        }
        if glyph.rows.iter().any(|row| row.hover.is_some()) {
            class.push_str(" firemap-hoverable");
        }
        let mut group = Group::new()
            .set("class", class)
            .set("data-glyph", idx.to_string())
            .set(
                "fill",
                style
                    .fill
                    .map(|c| c.to_hex())
                    .unwrap_or_else(|| "none".to_string()),
            )
            .set("fill-opacity", num(style.alpha))
            .set(
                "stroke",
                style
                    .line_color
                    .map(|c| c.to_hex())
                    .unwrap_or_else(|| "none".to_string()),
            )
            .set("stroke-opacity", num(style.alpha))
            .set("stroke-width", num(style.line_width));

        for (row_idx, row) in glyph.rows.iter().enumerate() {
            let row_attr = row_idx.to_string();
            let fill = row.fill.map(|c| c.to_hex());
            match row.shape {
                Shape::Polygon(ref polygon) => {
                    let mut path = Path::new()
                        .set("data-row", row_attr)
                        .set("d", self.path_data(polygon))
                        .set("fill-rule", "evenodd")
                        .set("vector-effect", "non-scaling-stroke");
                    if let Some(fill) = fill {
                        path = path.set("fill", fill);
                    }
                    group = group.add(path);
                }
                Shape::Line(ref pts) => {
                    let mut points = String::new();
                    for pt in pts {
                        let (x, y) = self.to_pixels(*pt);
                        // Writing to a String can't fail
                        let _ = write!(points, "{},{} ", num(x), num(y));
                    }
                    group = group.add(
                        Polyline::new()
                            .set("data-row", row_attr)
                            .set("points", points.trim_end().to_string())
                            .set("fill", "none")
                            .set("vector-effect", "non-scaling-stroke"),
                    );
                }
                Shape::Circle { center, size } => {
                    let (x, y) = self.to_pixels(center);
                    let mut circle = Circle::new()
                        .set("data-row", row_attr)
                        .set("cx", num(x))
                        .set("cy", num(y))
                        .set("r", num(size / 2.0));
                    if let Some(fill) = fill {
                        circle = circle.set("fill", fill);
                    }
                    group = group.add(circle);
                }
            }
        }
        group
    }

    fn path_data(&self, polygon: &Polygon) -> String {
        let mut d = String::new();
        for ring in std::iter::once(polygon.exterior()).chain(polygon.holes().iter()) {
            for (idx, pt) in ring.points().iter().enumerate() {
                let (x, y) = self.to_pixels(*pt);
                let cmd = if idx == 0 { 'M' } else { 'L' };
                let _ = write!(d, "{}{} {} ", cmd, num(x), num(y));
            }
            d.push('Z');
        }
        d
    }

    /// A vertical gradient, high values on top. Labels are placed by the page, not in the SVG.
    pub fn color_bar_svg(&self) -> Option<Document> {
        let bar = self.color_bar.as_ref()?;
        let width = 20;
        let height = self.height;

        // Offset 0 is the top of the bar, where the high end goes
        let mut gradient = LinearGradient::new()
            .set("id", "firemap-gradient")
            .set("x1", "0")
            .set("y1", "0")
            .set("x2", "0")
            .set("y2", "1");
        for (offset, color) in bar.mapper.scale.stops().into_iter().rev() {
            gradient = gradient.add(
                Stop::new()
                    .set("offset", num(1.0 - offset))
                    .set("stop-color", color.to_hex()),
            );
        }

        Some(
            Document::new()
                .set("class", "firemap-colorbar")
                .set("viewBox", format!("0 0 {} {}", width, height))
                .set("width", width.to_string())
                .set("height", height.to_string())
                .add(Definitions::new().add(gradient))
                .add(
                    Rectangle::new()
                        .set("x", "0")
                        .set("y", "0")
                        .set("width", width.to_string())
                        .set("height", height.to_string())
                        .set("fill", "url(#firemap-gradient)")
                        .set("stroke", "#000000")
                        .set("stroke-width", "0.5"),
                ),
        )
    }
}

/// Two decimals is well below a pixel.
fn num(x: f64) -> String {
    let s = format!("{:.2}", x);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ColorScale, Hover, LinearColorMapper, Row, Style, TapAction};
    use geom::Ring;

    fn base() -> Figure {
        Figure::new((530683.95, 555576.10), (6854570.54, 6876203.35), 1000, 600)
    }

    fn square(x: f64, y: f64, size: f64) -> Polygon {
        Ring::close(vec![
            Pt2D::new(x, y),
            Pt2D::new(x + size, y),
            Pt2D::new(x + size, y + size),
            Pt2D::new(x, y + size),
        ])
        .unwrap()
        .into_polygon()
    }

    #[test]
    fn pixels() {
        let fig = base();
        assert_eq!((0.0, 600.0), fig.to_pixels(Pt2D::new(530683.95, 6854570.54)));
        assert_eq!((1000.0, 0.0), fig.to_pixels(Pt2D::new(555576.10, 6876203.35)));
        let (x, y) = fig.to_pixels(Pt2D::new(543130.025, 6865386.945));
        assert!((x - 500.0).abs() < 1e-6);
        assert!((y - 300.0).abs() < 1e-6);
    }

    #[test]
    fn numbers() {
        assert_eq!("12", num(12.0));
        assert_eq!("12.5", num(12.5));
        assert_eq!("0.33", num(1.0 / 3.0));
        assert_eq!("0", num(-0.001));
    }

    #[test]
    fn render() {
        let mut fig = base();
        fig.add_tile(TileProvider::CartoDbPositronRetina);
        let rows = vec![
            Row::new(Shape::Polygon(square(540000.0, 6860000.0, 100.0)))
                .id("1")
                .hover(Hover::new().row("Address", "Dam 1")),
            Row::new(Shape::Polygon(square(541000.0, 6860000.0, 100.0))).id("2"),
        ];
        fig.add(
            Glyph::multi_polygons(rows, Style::solid(Color::PERU).alpha(0.3))
                .tap(TapAction::navigate("/building/{id}/small")),
        );
        fig.add(
            Glyph::line(
                vec![Pt2D::new(540000.0, 6860000.0), Pt2D::new(545000.0, 6865000.0)],
                Style::stroke(Color::BLACK, 3.0),
            )
            .legend("Blocked roads"),
        );
        fig.add(
            Glyph::line(
                vec![Pt2D::new(540000.0, 6861000.0), Pt2D::new(545000.0, 6866000.0)],
                Style::stroke(Color::BLACK, 3.0),
            )
            .legend("Blocked roads"),
        );
        fig.add(
            Glyph::circles(vec![Pt2D::new(540000.0, 6860000.0)], 6.0, Style::solid(Color::RED))
                .legend("Blocked public transport"),
        );

        let svg = fig.to_svg().to_string();
        assert!(svg.contains("viewBox=\"0 0 1000 600\""));
        assert!(svg.contains("light_all/13/"));
        assert!(svg.contains("fill=\"#cd853f\""));
        assert!(svg.contains("data-glyph=\"0\""));
        assert!(svg.contains("data-row=\"1\""));
        assert!(svg.contains("firemap-tappable"));
        assert!(svg.contains("<polyline"));
        assert!(svg.contains("r=\"3\""));

        let legend = fig.legend();
        assert_eq!(
            vec!["Blocked roads", "Blocked public transport"],
            legend.iter().map(|x| x.label.as_str()).collect::<Vec<_>>()
        );
        assert_eq!(Color::RED, legend[1].color);

        assert!(fig.color_bar_svg().is_none());
    }

    #[test]
    fn color_bar() {
        let mut fig = base();
        fig.add_color_bar(ColorBar::new(
            LinearColorMapper::new(ColorScale::fire_reversed(), 0.0, 1.0),
            "Low effect",
            "High effect",
        ));
        let svg = fig.color_bar_svg().unwrap().to_string();
        assert!(svg.contains("linearGradient"));
        assert!(svg.contains("stop-color=\"#000000\""));
        assert!(svg.contains("url(#firemap-gradient)"));
    }

    #[test]
    fn no_tiles() {
        let fig = base();
        assert!(fig.tiles_in_view().is_empty());
        assert!(!fig.to_svg().to_string().contains("<image"));
    }
}
