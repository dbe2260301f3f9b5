//! The HTML pages are Jinja templates compiled into the binary. Everything is HTML-escaped unless
//! it's explicitly marked safe, like a rendered plot.

use anyhow::{Context, Result};
use minijinja::{AutoEscape, Environment};
use serde::Serialize;

pub const INDEX: &str = "index.html";
pub const HEATMAP: &str = "heatmap.html";
pub const BUILDING: &str = "building.html";
pub const EXPORT: &str = "export.html";
pub const ERROR: &str = "error.html";

const SOURCES: &[(&str, &str)] = &[
    ("base.html", include_str!("../templates/base.html")),
    (INDEX, include_str!("../templates/index.html")),
    (HEATMAP, include_str!("../templates/heatmap.html")),
    (BUILDING, include_str!("../templates/building.html")),
    (EXPORT, include_str!("../templates/export.html")),
    (ERROR, include_str!("../templates/error.html")),
];

/// Parses every page template once.
pub fn environment() -> Result<Environment<'static>> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| AutoEscape::Html);
    for (name, source) in SOURCES {
        env.add_template(name, source)
            .with_context(|| format!("parsing template {}", name))?;
    }
    Ok(env)
}

pub fn render<S: Serialize>(env: &Environment<'static>, name: &str, ctx: S) -> Result<String> {
    env.get_template(name)
        .and_then(|template| template.render(ctx))
        .with_context(|| format!("rendering {}", name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;

    #[test]
    fn layout() {
        let env = environment().unwrap();
        let html = render(
            &env,
            ERROR,
            context! { title => "Fire & risk", status => "404 Not Found", message => "<b>gone</b>" },
        )
        .unwrap();
        assert!(html.contains("<title>Fire &amp; risk</title>"));
        assert!(html.contains("&lt;b&gt;gone"));
        assert!(!html.contains("<b>gone"));
        assert!(html.contains("href=\"/export\""));
    }

    #[test]
    fn missing_template() {
        let env = environment().unwrap();
        assert!(render(&env, "nope.html", context! {}).is_err());
    }
}
