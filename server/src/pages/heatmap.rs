use minijinja::context;
use serde::Serialize;

use plot::{Color, ColorBar, ColorScale, Glyph, LinearColorMapper, Row, Shape, Style, TapAction};
use risk_data::{FireSize, ScoreType};

use crate::error::PageError;
use crate::pages::{base_figure, plot_page, scored_building_hover};
use crate::templates;
use crate::App;

/// Buildings colored by how much a fire there would affect its surroundings.
pub fn heatmap(app: &App, score_type: ScoreType, fire: FireSize) -> Result<String, PageError> {
    let data = &app.dataset;
    let mut fig = base_figure();

    let mapper = LinearColorMapper::spanning(
        ColorScale::fire_reversed(),
        data.all_buildings()
            .map(|b| b.scores.get(score_type, fire).normalized),
    );
    let rows = data
        .all_buildings()
        .map(|b| {
            Row::new(Shape::Polygon(b.polygon.clone()))
                .id(b.id.to_string())
                .fill(mapper.map(b.scores.get(score_type, fire).normalized))
                .hover(scored_building_hover(b, score_type, fire))
        })
        .collect();
    fig.add(
        Glyph::multi_polygons(
            rows,
            Style::solid(Color::GREY)
                .line_color(Color::BLACK)
                .line_width(0.05)
                .alpha(0.8),
        )
        .tap(TapAction::navigate(format!("/building/{{id}}/{}", fire))),
    );
    fig.add_color_bar(ColorBar::new(mapper, "Low effect", "High effect"));

    let score_links = ScoreType::all()
        .into_iter()
        .map(|x| Link::new(x.key(), format!("/heatmap/{}/{}", x, fire), x == score_type))
        .collect::<Vec<_>>();
    let fire_links = FireSize::all()
        .into_iter()
        .map(|x| Link::new(x.key(), format!("/heatmap/{}/{}", score_type, x), x == fire))
        .collect::<Vec<_>>();

    plot_page(
        app,
        &format!("Heatmap: {} ({} fire)", score_type.describe(), fire),
        templates::HEATMAP,
        &fig,
        context! {
            fire => fire.key(),
            score_description => score_type.describe(),
            score_links => score_links,
            fire_links => fire_links,
        },
    )
}

/// A choice between heatmaps. The current choice is shown in bold instead of linked.
#[derive(Serialize)]
struct Link {
    label: &'static str,
    url: String,
    current: bool,
}

impl Link {
    fn new(label: &'static str, url: String, current: bool) -> Link {
        Link {
            label,
            url,
            current,
        }
    }
}
