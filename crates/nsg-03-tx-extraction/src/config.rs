//! # Pipeline Configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default number of concurrent extraction units.
pub const DEFAULT_MAX_EXTRACTING: usize = 10;

/// Extraction pipeline configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Chain symbol stamped on records and derived ids.
    pub symbol: String,
    /// Decimal exponent of the base currency.
    pub decimals: u32,
    /// Maximum concurrent extraction units per block.
    pub max_extracting: usize,
    /// Upper bound on waiting for a block's results, in seconds.
    pub stall_timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            symbol: nsg_types::SYMBOL.to_string(),
            decimals: nsg_types::DECIMALS,
            max_extracting: DEFAULT_MAX_EXTRACTING,
            stall_timeout_secs: 120,
        }
    }
}

impl PipelineConfig {
    /// Create a config for testing (short stall timeout).
    pub fn for_testing() -> Self {
        Self {
            max_extracting: 4,
            stall_timeout_secs: 2,
            ..Self::default()
        }
    }

    /// Stall timeout as a duration.
    pub fn stall_timeout(&self) -> Duration {
        Duration::from_secs(self.stall_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.symbol, "NSG");
        assert_eq!(config.decimals, 8);
        assert_eq!(config.max_extracting, 10);
    }

    #[test]
    fn test_testing_config() {
        assert_eq!(PipelineConfig::for_testing().stall_timeout(), Duration::from_secs(2));
    }
}
