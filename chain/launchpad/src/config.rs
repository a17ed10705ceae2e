//! Launchpad configuration

use serde::{Deserialize, Serialize};
use types::numeric::Wei;

/// Limits applied when a token is created.
///
/// Every limit is off by default: any name and symbol are accepted, empty
/// ones included, and no seed liquidity is required.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchpadConfig {
    /// Maximum token name length in characters.
    pub max_name_len: Option<usize>,
    /// Maximum token symbol length in characters.
    pub max_symbol_len: Option<usize>,
    /// Reject names and symbols that are empty or whitespace.
    pub require_metadata: bool,
    /// Smallest seed liquidity accepted at creation.
    pub min_seed_liquidity: Wei,
}

impl LaunchpadConfig {
    /// Load from a JSON document. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_impose_no_limits() {
        let config = LaunchpadConfig::default();
        assert_eq!(config.max_name_len, None);
        assert_eq!(config.max_symbol_len, None);
        assert!(!config.require_metadata);
        assert!(config.min_seed_liquidity.is_zero());
    }

    #[test]
    fn test_from_json_partial() {
        let config = LaunchpadConfig::from_json(
            r#"{ "max_symbol_len": 11, "min_seed_liquidity": "1000000000000000000" }"#,
        )
        .unwrap();
        assert_eq!(config.min_seed_liquidity, Wei::from_wei(1_000_000_000_000_000_000));
        assert_eq!(config.max_symbol_len, Some(11));
        assert_eq!(config.max_name_len, None);
        assert!(!config.require_metadata);
    }

    #[test]
    fn test_from_json_rejects_fractional_wei() {
        assert!(LaunchpadConfig::from_json(r#"{ "min_seed_liquidity": "0.5" }"#).is_err());
    }
}
