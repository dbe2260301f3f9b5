use anyhow::Context;
use minijinja::{context, Value};

use plot::{Color, Glyph, Hover, Row, Shape, Style, TapAction};
use risk_data::{parse_building_id, FireSize, ScoreType};

use super::export::Bookmark;
use crate::error::PageError;
use crate::pages::{base_figure, building_hover, function_lines, functions_text, plot_page};
use crate::templates;
use crate::App;

/// One building and everything a fire there would affect.
pub fn building(app: &App, raw_id: &str, fire: FireSize) -> Result<String, PageError> {
    let data = &app.dataset;
    let id = parse_building_id(raw_id)
        .map_err(|_| PageError::NotFound(format!("{} isn't a building id", raw_id)))?;
    let b = data
        .building(id)
        .ok_or_else(|| PageError::NotFound(format!("There's no building {}", id)))?;

    let mut fig = base_figure();

    // Every other building, still clickable
    let rows = data
        .all_buildings()
        .filter(|other| other.id != b.id)
        .map(|other| {
            Row::new(Shape::Polygon(other.polygon.clone()))
                .id(other.id.to_string())
                .hover(building_hover(other))
        })
        .collect();
    fig.add(
        Glyph::multi_polygons(rows, Style::solid(Color::PERU).alpha(0.3))
            .tap(TapAction::navigate(format!("/building/{{id}}/{}", fire))),
    );

    fig.add(Glyph::multi_polygons(
        vec![Row::new(Shape::Polygon(b.polygon.clone()))
            .id(b.id.to_string())
            .hover(Hover::new().row("Address", b.address_lines().join("\n")))],
        Style::solid(Color::RED).alpha(0.5),
    ));

    let radius = b
        .fire_radius(fire)
        .with_context(|| format!("fire radius of {}", b.id))?;
    fig.add(
        Glyph::patch(radius, Style::solid(Color::RED).line_width(5.0).alpha(0.2))
            .legend(format!("{} fire radius", fireutil::capitalize(fire.key()))),
    );

    let roads = data.blocked_roads(b, fire);
    for road in &roads {
        fig.add(
            Glyph::line(road.points.clone(), Style::stroke(Color::BLACK, 3.0))
                .legend("Blocked roads")
                .hover(
                    Hover::new()
                        .row("Road", road.name.clone())
                        .row("Type", road.category.describe()),
                ),
        );
    }

    let transit = data.blocked_transit(b, fire);
    for segment in &transit {
        fig.add(
            Glyph::line(segment.points.clone(), Style::stroke(Color::RED, 2.5))
                .legend("Blocked public transport")
                .hover(
                    Hover::new()
                        .row("Stations", segment.stations())
                        .row("Line", segment.describe()),
                ),
        );
        fig.add(Glyph::circles(
            vec![segment.station1_pt, segment.station2_pt],
            6.0,
            Style::solid(Color::RED),
        ));
    }

    let info = data.building_info(b, fire);
    let road_summary = data.blocked_road_summary(b, fire);
    let transit_summary = data.blocked_transit_summary(b, fire);

    let other_fire = match fire {
        FireSize::Small => FireSize::Big,
        FireSize::Big => FireSize::Small,
    };
    let url = format!("/building/{}/{}", b.id, fire);
    let score = |score_type: ScoreType| {
        let x = b.scores.get(score_type, fire).normalized;
        if x.is_nan() {
            None
        } else {
            Some(x)
        }
    };
    let bookmark = Bookmark {
        pand_id: b.id.to_string(),
        fire: fire.to_string(),
        address: b.address_lines().join(", "),
        functions: functions_text(&info.functions).replace('\n', ", "),
        num_neighbors: info.num_neighbors,
        num_linked: info.num_linked,
        blocked_roads: roads.len(),
        blocked_transit: transit.len(),
        score_default: score(ScoreType::Default),
        score_residential: score(ScoreType::Residential),
        score_roads: score(ScoreType::Roads),
        url,
    };
    let bookmark_json = serde_json::to_string(&bookmark)
        .context("serializing bookmark")?
        .replace("</", "<\\/");

    let blocked_roads = road_summary
        .into_iter()
        .map(|(name, category)| format!("{}: {}", name, category))
        .collect::<Vec<_>>();
    let blocked_transit = transit_summary
        .into_iter()
        .map(|(stations, line)| format!("{}: {}", stations, line))
        .collect::<Vec<_>>();

    plot_page(
        app,
        &format!("Building {} ({} fire)", b.id, fire),
        templates::BUILDING,
        &fig,
        context! {
            address => b.address_lines().join(", "),
            pand_id => b.id.to_string(),
            fire_title => fireutil::capitalize(fire.key()),
            other_fire => other_fire.key(),
            num_neighbors => info.num_neighbors,
            num_linked => info.num_linked,
            functions => function_lines(&info.functions),
            neighbor_functions => function_lines(&info.neighbor_functions),
            linked_functions => function_lines(&info.linked_functions),
            addresses => info.addresses,
            blocked_roads => blocked_roads,
            blocked_transit => blocked_transit,
            bookmark_json => Value::from_safe_string(bookmark_json),
        },
    )
}
