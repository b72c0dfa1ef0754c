//! # Domain Layer

pub mod entities;
pub mod errors;
pub mod keys;

pub use entities::ScanCursor;
pub use errors::{KVStoreError, StoreError};
pub use keys::KeyLayout;
