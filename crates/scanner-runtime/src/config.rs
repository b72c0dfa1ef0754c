//! # Runtime Configuration
//!
//! Loaded from environment variables.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `NSG_SERVER_API` | required | Node API base URL |
//! | `NSG_DATA_DIR` | `data` | Root of the persistent store |
//! | `NSG_STORAGE` | `memory` | `memory` or `rocksdb` |
//! | `NSG_MAX_EXTRACTING` | `10` | Concurrent extraction units |
//! | `NSG_SCAN_PERIOD_SECS` | `10` | Pause between scan passes |
//! | `NSG_STALL_TIMEOUT_SECS` | `120` | Per-block extraction bound |
//! | `NSG_RPC_RETRY` | `3` | Broadcast attempts |
//! | `NSG_WATCH_ADDRESSES` | empty | `address=accountKey` pairs, comma separated |
//! | `NSG_SUBMIT_RAW` | unset | Broadcast this raw transaction and exit |

use std::path::PathBuf;
use std::str::FromStr;

use nsg_04_block_scanner::ScannerConfig;
use nsg_rpc_client::ClientConfig;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is unset or empty.
    #[error("{0} must be set")]
    Missing(&'static str),

    /// A numeric variable did not parse.
    #[error("{var} is not a valid number: {value:?}")]
    InvalidNumber {
        /// Variable name.
        var: &'static str,
        /// Offending value.
        value: String,
    },

    /// A variable is out of its allowed range.
    #[error("{var} must be at least {min}")]
    TooSmall {
        /// Variable name.
        var: &'static str,
        /// Lower bound.
        min: u64,
    },

    /// `NSG_STORAGE` names an unknown backend.
    #[error("Unknown storage backend: {0} (expected memory or rocksdb)")]
    UnknownStorage(String),

    /// A watch list entry is not `address=accountKey`.
    #[error("Invalid watch entry {0:?}, expected address=accountKey")]
    InvalidWatchEntry(String),
}

/// Store backend.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StorageBackend {
    /// Lost on exit.
    #[default]
    Memory,
    /// RocksDB under the data directory.
    RocksDb,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "memory" => Ok(StorageBackend::Memory),
            "rocksdb" => Ok(StorageBackend::RocksDb),
            other => Err(ConfigError::UnknownStorage(other.to_string())),
        }
    }
}

/// Everything the binary needs.
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    /// Node client.
    pub client: ClientConfig,
    /// Scan loop.
    pub scanner: ScannerConfig,
    /// Store backend.
    pub storage: StorageBackend,
    /// Root of the persistent store.
    pub data_dir: PathBuf,
    /// Broadcast attempts.
    pub rpc_retry: u32,
    /// Watched `(address, account_key)` pairs.
    pub watch: Vec<(String, String)>,
    /// Raw transaction to broadcast instead of scanning.
    pub submit_raw: Option<String>,
}

impl RuntimeConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let server_api = get("NSG_SERVER_API").ok_or(ConfigError::Missing("NSG_SERVER_API"))?;

        let mut scanner = ScannerConfig::default();
        if let Some(value) = get("NSG_MAX_EXTRACTING") {
            scanner.max_extracting = parse_number("NSG_MAX_EXTRACTING", &value)?;
            if scanner.max_extracting == 0 {
                return Err(ConfigError::TooSmall {
                    var: "NSG_MAX_EXTRACTING",
                    min: 1,
                });
            }
        }
        if let Some(value) = get("NSG_SCAN_PERIOD_SECS") {
            scanner.scan_period_secs = parse_number("NSG_SCAN_PERIOD_SECS", &value)?;
        }
        if let Some(value) = get("NSG_STALL_TIMEOUT_SECS") {
            scanner.stall_timeout_secs = parse_number("NSG_STALL_TIMEOUT_SECS", &value)?;
            if scanner.stall_timeout_secs == 0 {
                return Err(ConfigError::TooSmall {
                    var: "NSG_STALL_TIMEOUT_SECS",
                    min: 1,
                });
            }
        }

        let rpc_retry = match get("NSG_RPC_RETRY") {
            Some(value) => parse_number("NSG_RPC_RETRY", &value)?,
            None => 3,
        };

        let storage = match get("NSG_STORAGE") {
            Some(value) => value.parse()?,
            None => StorageBackend::default(),
        };

        let watch = match get("NSG_WATCH_ADDRESSES") {
            Some(value) => parse_watch_list(&value)?,
            None => Vec::new(),
        };

        Ok(Self {
            client: ClientConfig::new(server_api),
            scanner,
            storage,
            data_dir: get("NSG_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data")),
            rpc_retry,
            watch,
            submit_raw: get("NSG_SUBMIT_RAW"),
        })
    }

    /// Directory of the chain's RocksDB store.
    pub fn db_path(&self) -> PathBuf {
        self.data_dir
            .join(self.scanner.symbol.to_lowercase())
            .join("db")
    }
}

fn parse_number<T: FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        var,
        value: value.to_string(),
    })
}

/// Parse `addr1=key1,addr2=key2`.
pub fn parse_watch_list(value: &str) -> Result<Vec<(String, String)>, ConfigError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry.split_once('=') {
            Some((address, key)) if !address.trim().is_empty() && !key.trim().is_empty() => {
                Ok((address.trim().to_string(), key.trim().to_string()))
            }
            _ => Err(ConfigError::InvalidWatchEntry(entry.to_string())),
        })
        .collect()
}
