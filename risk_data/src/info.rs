use fireutil::Counter;

/// Everything the building page says about the people and things at risk.
#[derive(Clone, Debug, PartialEq)]
pub struct BuildingInfo {
    pub functions: Counter<String>,
    pub neighbor_functions: Counter<String>,
    /// Functions of every building within the fire radius
    pub linked_functions: Counter<String>,
    pub num_neighbors: usize,
    pub num_linked: usize,
    /// From `summarize_addresses`
    pub addresses: Vec<String>,
}

/// Condenses the addresses of many buildings into a few lines. Nearly every address ends with the
/// city, so that's dropped and said once at the end. Buildings with no known address are counted.
///
/// Blank lines are dropped.
pub fn summarize_addresses<'a, I: IntoIterator<Item = Option<&'a str>>>(
    addresses: I,
) -> Vec<String> {
    let mut summary = String::new();
    let mut unknown = 0;
    for address in addresses {
        match address {
            Some(address) if address.contains("All in Amsterdam") => {
                summary.push_str(&address.replace("All in Amsterdam", ""));
            }
            Some(address) => {
                summary.push_str(&address.replace('\n', " ").replace(" Amsterdam", "\n"));
            }
            None => {
                unknown += 1;
            }
        }
    }
    summary.push_str("All in Amsterdam");
    if unknown > 0 {
        summary.push_str(&format!("\n{} unknown addresses", unknown));
    }

    summary
        .split('\n')
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(|line| line.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addresses() {
        assert_eq!(
            vec![
                "Keizersgracht 1 1015CC",
                "Keizersgracht 3 1015CC",
                "All in Amsterdam",
                "1 unknown addresses",
            ],
            summarize_addresses(vec![
                Some("Keizersgracht 1\n1015CC Amsterdam"),
                None,
                Some("Keizersgracht 3\n1015CC Amsterdam"),
            ])
        );
    }

    #[test]
    fn already_summarized() {
        // Buildings with many units already carry a summary
        assert_eq!(
            vec![
                "Damrak 1-5 1012LG",
                "Damrak 7 1012LG",
                "Spui 2 1012WX",
                "All in Amsterdam",
            ],
            summarize_addresses(vec![
                Some("Damrak 1-5 1012LG\nDamrak 7 1012LG\nAll in Amsterdam"),
                Some("Spui 2\n1012WX Amsterdam"),
            ])
        );
    }

    #[test]
    fn nothing_linked() {
        assert_eq!(vec!["All in Amsterdam"], summarize_addresses(Vec::new()));
    }
}
