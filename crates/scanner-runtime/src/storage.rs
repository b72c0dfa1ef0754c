//! Opening the chain state store for the configured backend.

use std::path::Path;

use anyhow::Result;
use nsg_02_chain_store::ChainStateStore;
use tracing::{info, warn};

use crate::config::{RuntimeConfig, StorageBackend};

/// Warn when the data directory's filesystem has less free space than this.
pub const LOW_DISK_PERCENT: u8 = 5;

/// Open the store named by `config.storage`.
pub fn open_store(config: &RuntimeConfig) -> Result<ChainStateStore> {
    match config.storage {
        StorageBackend::Memory => {
            info!("using in-memory store, scan progress is lost on exit");
            Ok(ChainStateStore::in_memory(&config.scanner.symbol))
        }
        StorageBackend::RocksDb => open_rocksdb(config),
    }
}

#[cfg(feature = "rocksdb")]
fn open_rocksdb(config: &RuntimeConfig) -> Result<ChainStateStore> {
    use anyhow::Context;
    use nsg_02_chain_store::{RocksDbConfig, RocksDbStore};

    let path = config.db_path();
    std::fs::create_dir_all(&path)
        .with_context(|| format!("cannot create data directory {}", path.display()))?;
    check_disk_space(&path);

    let db = RocksDbStore::open(RocksDbConfig {
        path: path.to_string_lossy().into_owned(),
        ..RocksDbConfig::default()
    })
    .with_context(|| format!("cannot open RocksDB at {}", path.display()))?;
    info!(path = %path.display(), "opened RocksDB store");
    Ok(ChainStateStore::new(Box::new(db), &config.scanner.symbol))
}

#[cfg(not(feature = "rocksdb"))]
fn open_rocksdb(_config: &RuntimeConfig) -> Result<ChainStateStore> {
    anyhow::bail!("NSG_STORAGE=rocksdb requires building with the rocksdb feature")
}

/// Free space on the filesystem holding `path`, in percent.
pub fn available_disk_percent(path: &Path) -> std::io::Result<u8> {
    let available = fs2::available_space(path)?;
    let total = fs2::total_space(path)?;
    if total == 0 {
        return Err(std::io::Error::new(
            std::io::ErrorKind::Other,
            "Unable to determine disk space",
        ));
    }
    Ok(((available as f64 / total as f64) * 100.0) as u8)
}

/// Log a warning when the store's filesystem is nearly full.
pub fn check_disk_space(path: &Path) {
    match available_disk_percent(path) {
        Ok(percent) if percent < LOW_DISK_PERCENT => {
            warn!(path = %path.display(), percent, "low disk space for chain store")
        }
        Ok(percent) => info!(path = %path.display(), percent, "disk space available"),
        Err(e) => warn!(path = %path.display(), error = %e, "cannot read disk space"),
    }
}
