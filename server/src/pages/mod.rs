mod building;
mod export;
mod heatmap;
mod home;

pub use self::building::building;
pub use self::export::export;
pub use self::heatmap::heatmap;
pub use self::home::home;

use minijinja::{context, Environment, Value};

use fireutil::Counter;
use plot::{Figure, Hover, TileProvider};
use risk_data::{Building, FireSize, ScoreType};

use crate::error::PageError;
use crate::templates;
use crate::App;

/// The default view, covering the whole city.
pub const X_RANGE: (f64, f64) = (530683.95, 555576.10);
pub const Y_RANGE: (f64, f64) = (6854570.54, 6876203.35);
pub const WIDTH: usize = 1000;
pub const HEIGHT: usize = 600;

const CLICK_FOR_MORE: &str = "Click for more information on building";

pub fn base_figure() -> Figure {
    let mut fig = Figure::new(X_RANGE, Y_RANGE, WIDTH, HEIGHT);
    fig.add_tile(TileProvider::CartoDbPositronRetina);
    fig
}

/// Wraps a figure in a page, along with any other template variables.
pub fn plot_page(
    app: &App,
    title: &str,
    template: &str,
    fig: &Figure,
    vars: Value,
) -> Result<String, PageError> {
    let (script, div) = plot::components(fig)?;
    let html = templates::render(
        &app.templates,
        template,
        context! {
            title => title,
            resources => Value::from_safe_string(plot::resources()),
            plot_script => Value::from_safe_string(script),
            plot_div => Value::from_safe_string(div),
            ..vars
        },
    )?;
    Ok(html)
}

/// One entry per function, like "2 woonfunctie"
pub fn function_lines(counts: &Counter<String>) -> Vec<String> {
    counts
        .borrow()
        .iter()
        .map(|(function, count)| format!("{} {}", count, function))
        .collect()
}

pub fn functions_text(counts: &Counter<String>) -> String {
    function_lines(counts).join("\n")
}

/// The tooltip shared by all building glyphs.
pub fn building_hover(b: &Building) -> Hover {
    Hover::new()
        .row("Address", b.address_lines().join("\n"))
        .row("Functions in building", functions_text(&b.function_counts()))
        .footer(CLICK_FOR_MORE)
}

/// Like `building_hover`, with the score on top.
pub fn scored_building_hover(b: &Building, score_type: ScoreType, fire: FireSize) -> Hover {
    let normalized = b.scores.get(score_type, fire).normalized;
    let score = if normalized.is_nan() {
        "NaN".to_string()
    } else {
        format!("{:.2}", normalized)
    };
    let mut hover = Hover::new().row("Score", score);
    hover.rows.extend(building_hover(b).rows);
    hover.footer(CLICK_FOR_MORE)
}

pub fn parse_fire(raw: &str) -> Result<FireSize, PageError> {
    raw.parse()
        .map_err(|err: anyhow::Error| PageError::BadRequest(err.to_string()))
}

pub fn parse_score_type(raw: &str) -> Result<ScoreType, PageError> {
    raw.parse()
        .map_err(|err: anyhow::Error| PageError::BadRequest(err.to_string()))
}

/// The page shown for any error. If even that fails, the visitor gets plain text.
pub fn error_page(env: &Environment<'static>, err: &PageError) -> String {
    let status = err.status();
    let status_text = format!(
        "{} {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Error")
    );
    let message = err.public_message();
    match templates::render(
        env,
        templates::ERROR,
        context! { title => &status_text, status => &status_text, message => &message },
    ) {
        Ok(html) => html,
        Err(render_err) => {
            error!("Couldn't render the error page: {:#}", render_err);
            format!("{}: {}", status_text, message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn functions() {
        let counts: Counter<String> = vec!["woonfunctie", "winkelfunctie", "woonfunctie"]
            .into_iter()
            .map(|x| x.to_string())
            .collect();
        assert_eq!("1 winkelfunctie\n2 woonfunctie", functions_text(&counts));
        assert_eq!("", functions_text(&Counter::new()));
    }

    #[test]
    fn function_list() {
        let counts: Counter<String> = vec!["woonfunctie", "winkelfunctie", "woonfunctie"]
            .into_iter()
            .map(|x| x.to_string())
            .collect();
        assert_eq!(
            vec!["1 winkelfunctie".to_string(), "2 woonfunctie".to_string()],
            function_lines(&counts)
        );
        assert!(function_lines(&Counter::new()).is_empty());
    }

    #[test]
    fn bad_params() {
        assert!(matches!(parse_fire("medium"), Err(PageError::BadRequest(_))));
        assert!(matches!(
            parse_score_type("everything"),
            Err(PageError::BadRequest(_))
        ));
        assert_eq!(FireSize::Big, parse_fire("big").unwrap());
    }

    #[test]
    fn errors() {
        let env = templates::environment().unwrap();
        let html = error_page(&env, &PageError::NotFound("No building 42".to_string()));
        assert!(html.contains("<title>404 Not Found</title>"));
        assert!(html.contains("No building 42"));

        let html = error_page(
            &env,
            &PageError::BadRequest("<script>alert(1)</script> isn't a fire size".to_string()),
        );
        assert!(html.contains("400 Bad Request"));
        assert!(html.contains("&lt;script&gt;alert(1)"));
        assert!(!html.contains("<script>alert"));

        let html = error_page(&env, &PageError::Internal(anyhow::anyhow!("secret path /srv")));
        assert!(html.contains("500 Internal Server Error"));
        assert!(!html.contains("secret"));

        // No templates at all still produces something
        let text = error_page(&Environment::new(), &PageError::NotFound("gone".to_string()));
        assert_eq!("404 Not Found: gone", text);
    }
}
