//! # Scanner Configuration

use nsg_03_tx_extraction::config::DEFAULT_MAX_EXTRACTING;
use nsg_03_tx_extraction::PipelineConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Block scanner configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Chain symbol; also the store namespace.
    pub symbol: String,
    /// Decimal exponent of the base currency.
    pub decimals: u32,
    /// Maximum concurrent extraction units per block.
    pub max_extracting: usize,
    /// Upper bound on waiting for a block's extraction results, in seconds.
    pub stall_timeout_secs: u64,
    /// Interval between scan passes, in seconds.
    pub scan_period_secs: u64,
    /// Re-extract heights with unscan records once caught up.
    pub rescan_failed: bool,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            symbol: nsg_types::SYMBOL.to_string(),
            decimals: nsg_types::DECIMALS,
            max_extracting: DEFAULT_MAX_EXTRACTING,
            stall_timeout_secs: 120,
            scan_period_secs: 10,
            rescan_failed: true,
        }
    }
}

impl ScannerConfig {
    /// Create a config for testing (fast ticks, short stall timeout).
    pub fn for_testing() -> Self {
        Self {
            max_extracting: 4,
            stall_timeout_secs: 2,
            scan_period_secs: 1,
            ..Self::default()
        }
    }

    /// Scan period as a duration.
    pub fn scan_period(&self) -> Duration {
        Duration::from_secs(self.scan_period_secs.max(1))
    }

    /// Configuration handed to the extraction pipeline.
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            symbol: self.symbol.clone(),
            decimals: self.decimals,
            max_extracting: self.max_extracting,
            stall_timeout_secs: self.stall_timeout_secs,
        }
    }
}
