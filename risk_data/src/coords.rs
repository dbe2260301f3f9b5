use anyhow::{Context, Result};

use geom::LonLat;

use crate::literal::float_to_id;
use crate::BuildingID;

/// Parses the `WKT_LAT_LNG` style of coordinate list: `"lat lon,lat lon,..."`. Pairs may also be
/// separated by `;`, and the whole thing may be wrapped like `LINESTRING(...)`.
pub fn parse_coord_string(input: &str) -> Result<Vec<LonLat>> {
    let mut body = input.trim();
    if let Some(open) = body.find('(') {
        if body[..open].chars().all(|c| c.is_ascii_alphabetic() || c == ' ') {
            body = body[open + 1..].trim_end().trim_end_matches(')');
        }
    }

    let mut pts = Vec::new();
    for pair in body.split(|c| c == ',' || c == ';') {
        if pair.trim().is_empty() {
            continue;
        }
        pts.push(parse_coord_pair(pair).with_context(|| format!("in {}", abbreviate(input)))?);
    }
    Ok(pts)
}

/// Parses a single `"lat lon"` pair.
pub fn parse_coord_pair(input: &str) -> Result<LonLat> {
    let parts: Vec<&str> = input.split_whitespace().collect();
    if parts.len() != 2 {
        bail!("Malformed coordinates: {:?}", input);
    }
    let lat = parts[0]
        .parse::<f64>()
        .with_context(|| format!("bad latitude {:?}", parts[0]))?;
    let lon = parts[1]
        .parse::<f64>()
        .with_context(|| format!("bad longitude {:?}", parts[1]))?;
    Ok(LonLat::from_lat_lon(lat, lon))
}

/// Building ids are 16-digit integers, but pandas writes them as floats whenever the column has a
/// missing value somewhere.
pub fn parse_building_id(input: &str) -> Result<BuildingID> {
    let input = input.trim();
    if let Ok(id) = input.parse::<u64>() {
        return Ok(BuildingID(id));
    }
    let x = input
        .parse::<f64>()
        .map_err(|_| anyhow!("{:?} isn't a building id", input))?;
    Ok(BuildingID(float_to_id(x)?))
}

fn abbreviate(input: &str) -> String {
    if input.chars().count() <= 40 {
        return input.to_string();
    }
    format!("{}...", input.chars().take(40).collect::<String>())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coord_string() {
        let pts = parse_coord_string("52.3731 4.8926,52.3789 4.9004").unwrap();
        assert_eq!(
            vec![
                LonLat::new(4.8926, 52.3731),
                LonLat::new(4.9004, 52.3789)
            ],
            pts
        );

        // Sloppier spacing, semicolons, a WKT wrapper and a trailing separator
        let pts =
            parse_coord_string("LINESTRING( 52.1 4.1 , 52.2 4.2;52.3   4.3, )").unwrap();
        assert_eq!(3, pts.len());
        assert_eq!(LonLat::new(4.3, 52.3), pts[2]);

        assert!(parse_coord_string("").unwrap().is_empty());
    }

    #[test]
    fn bad_coord_strings() {
        assert!(parse_coord_string("52.1 4.1, 52.2").is_err());
        assert!(parse_coord_string("52.1 4.1 7.0").is_err());
        assert!(parse_coord_string("north east").is_err());
        assert!(parse_coord_pair("").is_err());
    }

    #[test]
    fn building_ids() {
        assert_eq!(BuildingID(363100012061236), parse_building_id("363100012061236").unwrap());
        assert_eq!(
            BuildingID(363100012061236),
            parse_building_id(" 363100012061236.0 ").unwrap()
        );
        assert_eq!(BuildingID(363100012061236), parse_building_id("3.63100012061236e14").unwrap());
        assert!(parse_building_id("abc").is_err());
        assert!(parse_building_id("12.5").is_err());
        assert!(parse_building_id("nan").is_err());
    }
}
