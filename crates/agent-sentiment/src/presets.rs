//! Named ticker lists

/// A named portfolio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    pub name: &'static str,
    pub label: &'static str,
    pub tickers: &'static str,
}

pub const PRESETS: &[Preset] = &[
    Preset {
        name: "tech",
        label: "Tech Giants",
        tickers: "AAPL, MSFT, GOOGL, NVDA",
    },
    Preset {
        name: "finance",
        label: "Finance",
        tickers: "JPM, BAC, GS, WFC",
    },
    Preset {
        name: "ev",
        label: "EV & Auto",
        tickers: "TSLA, RIVN, LCID",
    },
    Preset {
        name: "ecommerce",
        label: "E-commerce",
        tickers: "AMZN, SHOP, MELI",
    },
];

/// Look up a preset by name, ignoring case, spaces and dashes
pub fn find(name: &str) -> Option<&'static Preset> {
    let wanted: String = name
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect();
    PRESETS.iter().find(|p| p.name == wanted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::parse_tickers;

    #[test]
    fn test_find_preset() {
        assert_eq!(find("tech").unwrap().tickers, "AAPL, MSFT, GOOGL, NVDA");
        assert_eq!(find("E-Commerce").unwrap().name, "ecommerce");
        assert_eq!(find(" EV ").unwrap().label, "EV & Auto");
        assert!(find("crypto").is_none());
    }

    #[test]
    fn test_presets_parse_cleanly() {
        for preset in PRESETS {
            let tickers = parse_tickers(preset.tickers);
            assert!(!tickers.is_empty());
            assert!(tickers.iter().all(|t| t.chars().all(|c| c.is_ascii_uppercase())));
        }
    }
}
