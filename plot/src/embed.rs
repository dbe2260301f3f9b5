use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Context, Result};
use minijinja::value::Value;
use minijinja::{context, AutoEscape, Environment};
use serde::Serialize;

use crate::{Figure, Hover, TapAction};

static NEXT_PLOT_ID: AtomicUsize = AtomicUsize::new(1);

const CSS: &str = include_str!("assets/plot.css");
const JS: &str = include_str!("assets/plot.js");
const DIV: &str = include_str!("assets/plot.html");

/// The CSS and JS every page with a plot needs once, in its `<head>`.
pub fn resources() -> String {
    format!(
        "<style type=\"text/css\">\n{}</style>\n<script type=\"text/javascript\">\n{}</script>\n",
        CSS, JS
    )
}

#[derive(Serialize)]
struct PlotData<'a> {
    id: &'a str,
    width: usize,
    height: usize,
    glyphs: Vec<GlyphData<'a>>,
}

#[derive(Serialize)]
struct GlyphData<'a> {
    /// A URL template
    tap: Option<&'a str>,
    ids: Vec<Option<&'a str>>,
    hover: Vec<Option<&'a Hover>>,
}

#[derive(Serialize)]
struct LegendData {
    color: String,
    label: String,
}

#[derive(Serialize)]
struct ColorBarData {
    high: String,
    high_label: String,
    low: String,
    low_label: String,
    svg: Value,
}

/// Splits a figure into the `<script>` wiring up interactivity and the `<div>` holding the plot,
/// to be placed separately in a page.
pub fn components(fig: &Figure) -> Result<(String, String)> {
    let id = format!("firemap-plot-{}", NEXT_PLOT_ID.fetch_add(1, Ordering::Relaxed));

    let data = PlotData {
        id: &id,
        width: fig.width,
        height: fig.height,
        glyphs: fig
            .glyphs
            .iter()
            .map(|glyph| GlyphData {
                tap: glyph.tap.as_ref().map(|tap| match tap {
                    TapAction::Navigate { template } => template.as_str(),
                }),
                ids: glyph.rows.iter().map(|row| row.id.as_deref()).collect(),
                hover: glyph.rows.iter().map(|row| row.hover.as_ref()).collect(),
            })
            .collect(),
    };
    let json = serde_json::to_string(&data).context("serializing plot data")?;
    // Keep the payload from closing the script tag early
    let script = format!(
        "<script type=\"text/javascript\">\nfiremap.attach({});\n</script>",
        json.replace("</", "<\\/")
    );

    let legend: Vec<LegendData> = fig
        .legend()
        .into_iter()
        .map(|item| LegendData {
            color: item.color.to_hex(),
            label: item.label,
        })
        .collect();
    let color_bar = match (fig.color_bar.as_ref(), fig.color_bar_svg()) {
        (Some(bar), Some(svg)) => Some(ColorBarData {
            high: format_tick(bar.mapper.high),
            high_label: bar.high_label.clone(),
            low: format_tick(bar.mapper.low),
            low_label: bar.low_label.clone(),
            svg: Value::from_safe_string(svg.to_string()),
        }),
        _ => None,
    };

    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| AutoEscape::Html);
    env.add_template("plot.html", DIV)?;
    let div = env.get_template("plot.html")?.render(context! {
        id => id,
        width => fig.width,
        height => fig.height,
        svg => Value::from_safe_string(fig.to_svg().to_string()),
        legend => legend,
        attribution => fig
            .tiles
            .map(|provider| Value::from_safe_string(provider.attribution().to_string())),
        color_bar => color_bar,
    })?;

    Ok((script, div))
}

fn format_tick(x: f64) -> String {
    if x.fract() == 0.0 {
        format!("{}", x)
    } else {
        format!("{:.2}", x)
    }
}
