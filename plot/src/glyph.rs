use serde::Serialize;

use geom::{Polygon, Pt2D};

use crate::Color;

#[derive(Clone, Debug, PartialEq)]
pub struct Style {
    /// None means no fill
    pub fill: Option<Color>,
    pub line_color: Option<Color>,
    /// In screen pixels
    pub line_width: f64,
    pub alpha: f64,
}

impl Default for Style {
    fn default() -> Style {
        Style {
            fill: None,
            line_color: None,
            line_width: 1.0,
            alpha: 1.0,
        }
    }
}

impl Style {
    /// Fill and outline in one color.
    pub fn solid(color: Color) -> Style {
        Style {
            fill: Some(color),
            line_color: Some(color),
            ..Default::default()
        }
    }

    pub fn stroke(color: Color, line_width: f64) -> Style {
        Style {
            line_color: Some(color),
            line_width,
            ..Default::default()
        }
    }

    pub fn alpha(mut self, alpha: f64) -> Style {
        self.alpha = alpha;
        self
    }

    pub fn line_color(mut self, color: Color) -> Style {
        self.line_color = Some(color);
        self
    }

    pub fn line_width(mut self, width: f64) -> Style {
        self.line_width = width;
        self
    }

    /// The color a legend entry should show.
    pub fn swatch(&self) -> Color {
        self.fill.or(self.line_color).unwrap_or(Color::BLACK)
    }
}

/// Tooltip rows shown while hovering over one shape.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Hover {
    /// (label, value). Values may span multiple lines.
    pub rows: Vec<(String, String)>,
    /// An extra line at the bottom, set apart from the rows.
    pub footer: Option<String>,
}

impl Hover {
    pub fn new() -> Hover {
        Hover::default()
    }

    pub fn row<I1: Into<String>, I2: Into<String>>(mut self, label: I1, value: I2) -> Hover {
        self.rows.push((label.into(), value.into()));
        self
    }

    pub fn footer<I: Into<String>>(mut self, footer: I) -> Hover {
        self.footer = Some(footer.into());
        self
    }
}

/// What happens when a shape is clicked.
#[derive(Clone, Debug, PartialEq)]
pub enum TapAction {
    /// Go to a URL. `{id}` in the template is replaced by the shape's id.
    Navigate { template: String },
}

impl TapAction {
    pub fn navigate<I: Into<String>>(template: I) -> TapAction {
        TapAction::Navigate {
            template: template.into(),
        }
    }

    pub fn url_for(&self, id: &str) -> String {
        match self {
            TapAction::Navigate { template } => template.replace("{id}", id),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Polygon(Polygon),
    Line(Vec<Pt2D>),
    /// Size is the diameter in screen pixels.
    Circle { center: Pt2D, size: f64 },
}

/// One shape of a glyph, with its own data.
#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    pub shape: Shape,
    pub id: Option<String>,
    pub hover: Option<Hover>,
    /// Overrides the glyph's fill, for color-mapped glyphs.
    pub fill: Option<Color>,
}

impl Row {
    pub fn new(shape: Shape) -> Row {
        Row {
            shape,
            id: None,
            hover: None,
            fill: None,
        }
    }

    pub fn id<I: Into<String>>(mut self, id: I) -> Row {
        self.id = Some(id.into());
        self
    }

    pub fn hover(mut self, hover: Hover) -> Row {
        self.hover = Some(hover);
        self
    }

    pub fn fill(mut self, color: Color) -> Row {
        self.fill = Some(color);
        self
    }
}

/// A group of shapes drawn with one style, like one call to a plotting library.
#[derive(Clone, Debug, PartialEq)]
pub struct Glyph {
    pub rows: Vec<Row>,
    pub style: Style,
    pub legend_label: Option<String>,
    pub tap: Option<TapAction>,
}

impl Glyph {
    fn new(rows: Vec<Row>, style: Style) -> Glyph {
        Glyph {
            rows,
            style,
            legend_label: None,
            tap: None,
        }
    }

    /// A single polygon
    pub fn patch(polygon: Polygon, style: Style) -> Glyph {
        Glyph::new(vec![Row::new(Shape::Polygon(polygon))], style)
    }

    /// One polygon per row
    pub fn multi_polygons(rows: Vec<Row>, style: Style) -> Glyph {
        Glyph::new(rows, style)
    }

    pub fn line(pts: Vec<Pt2D>, style: Style) -> Glyph {
        Glyph::new(vec![Row::new(Shape::Line(pts))], style)
    }

    pub fn circles(centers: Vec<Pt2D>, size: f64, style: Style) -> Glyph {
        Glyph::new(
            centers
                .into_iter()
                .map(|center| Row::new(Shape::Circle { center, size }))
                .collect(),
            style,
        )
    }

    pub fn legend<I: Into<String>>(mut self, label: I) -> Glyph {
        self.legend_label = Some(label.into());
        self
    }

    pub fn tap(mut self, action: TapAction) -> Glyph {
        self.tap = Some(action);
        self
    }

    /// Applies to every row.
    pub fn hover(mut self, hover: Hover) -> Glyph {
        for row in &mut self.rows {
            row.hover = Some(hover.clone());
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigate() {
        let tap = TapAction::navigate("/building/{id}/small");
        assert_eq!("/building/42/small", tap.url_for("42"));
    }

    #[test]
    fn builders() {
        let glyph = Glyph::circles(
            vec![Pt2D::new(0.0, 0.0), Pt2D::new(1.0, 1.0)],
            6.0,
            Style::solid(Color::RED),
        )
        .legend("Blocked public transport")
        .hover(Hover::new().row("Station", "Dam"));
        assert_eq!(2, glyph.rows.len());
        assert!(glyph.rows.iter().all(|r| r.hover.is_some()));
        assert_eq!(Color::RED, glyph.style.swatch());
        assert_eq!(
            Color::BLACK,
            Style::stroke(Color::BLACK, 3.0).alpha(0.5).swatch()
        );
    }
}
