use minijinja::context;

use plot::{Color, Glyph, Row, Shape, Style, TapAction};

use crate::error::PageError;
use crate::pages::{base_figure, building_hover, plot_page};
use crate::templates;
use crate::App;

/// The base map: every tram and metro line vertex, and every building, clickable.
pub fn home(app: &App) -> Result<String, PageError> {
    let data = &app.dataset;
    let mut fig = base_figure();

    let vertices = data
        .transit_lines
        .iter()
        .flat_map(|line| line.points.iter().cloned())
        .collect();
    // The default plotting blue
    let transit_color = Color::rgb(31, 119, 180);
    fig.add(Glyph::circles(vertices, 2.0, Style::solid(transit_color)));

    let rows = data
        .all_buildings()
        .map(|b| {
            Row::new(Shape::Polygon(b.polygon.clone()))
                .id(b.id.to_string())
                .hover(building_hover(b))
        })
        .collect();
    fig.add(
        Glyph::multi_polygons(rows, Style::solid(Color::PERU).alpha(0.3))
            .tap(TapAction::navigate("/building/{id}/small")),
    );

    plot_page(
        app,
        "Fire risk map Amsterdam",
        templates::INDEX,
        &fig,
        context! {},
    )
}
