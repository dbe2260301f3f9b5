use anyhow::Context;
use minijinja::{context, Environment, Value};
use serde::Serialize;

use crate::error::PageError;
use crate::templates;

/// What the building page stores in the browser's session storage, and the export page turns
/// into CSV.
#[derive(Serialize)]
pub struct Bookmark {
    pub pand_id: String,
    pub fire: String,
    pub address: String,
    pub functions: String,
    pub num_neighbors: usize,
    pub num_linked: usize,
    pub blocked_roads: usize,
    pub blocked_transit: usize,
    pub score_default: Option<f64>,
    pub score_residential: Option<f64>,
    pub score_roads: Option<f64>,
    pub url: String,
}

/// (field of Bookmark, column header), in CSV order
pub const COLUMNS: &[(&str, &str)] = &[
    ("pand_id", "Building"),
    ("fire", "Fire size"),
    ("address", "Address"),
    ("functions", "Functions"),
    ("num_neighbors", "Neighbors"),
    ("num_linked", "Buildings in fire radius"),
    ("blocked_roads", "Blocked roads"),
    ("blocked_transit", "Blocked public transport"),
    ("score_default", "Score (all)"),
    ("score_residential", "Score (residential)"),
    ("score_roads", "Score (roads)"),
    ("url", "Link"),
];

/// The bookmarks live in the browser, so this page is only a shell for them.
pub fn export(env: &Environment<'static>) -> Result<String, PageError> {
    let columns: Vec<&str> = COLUMNS.iter().map(|(key, _)| *key).collect();
    let labels: Vec<&str> = COLUMNS.iter().map(|(_, label)| *label).collect();
    let columns_json = serde_json::to_string(&columns).context("serializing columns")?;
    let labels_json = serde_json::to_string(&labels)
        .context("serializing column labels")?
        .replace("</", "<\\/");

    let html = templates::render(
        env,
        templates::EXPORT,
        context! {
            title => "Bookmarked buildings",
            labels => labels,
            columns_json => Value::from_safe_string(columns_json),
            labels_json => Value::from_safe_string(labels_json),
        },
    )?;
    Ok(html)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_match_bookmarks() {
        let bookmark = Bookmark {
            pand_id: "363100012000001".to_string(),
            fire: "small".to_string(),
            address: "Dam 1, 1012JS Amsterdam".to_string(),
            functions: "1 winkelfunctie".to_string(),
            num_neighbors: 1,
            num_linked: 1,
            blocked_roads: 1,
            blocked_transit: 0,
            score_default: Some(0.4),
            score_residential: None,
            score_roads: Some(0.5),
            url: "/building/363100012000001/small".to_string(),
        };
        let value = serde_json::to_value(&bookmark).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(COLUMNS.len(), object.len());
        for (key, _) in COLUMNS {
            assert!(object.contains_key(*key), "missing {}", key);
        }
    }

    #[test]
    fn page() {
        let html = export(&templates::environment().unwrap()).unwrap();
        assert!(html.contains("<th>Buildings in fire radius</th>"));
        assert!(html.contains("\"score_residential\""));
        assert!(html.contains("sessionStorage"));
    }

    #[test]
    fn csv_header_uses_labels() {
        let html = export(&templates::environment().unwrap()).unwrap();
        assert!(html.contains(
            "var labels = [\"Building\",\"Fire size\",\"Address\",\"Functions\",\"Neighbors\",\
             \"Buildings in fire radius\",\"Blocked roads\",\"Blocked public transport\",\
             \"Score (all)\",\"Score (residential)\",\"Score (roads)\",\"Link\"];"
        ));
        assert!(html.contains("var lines = [labels.map(quote).join(\",\")];"));
    }
}
