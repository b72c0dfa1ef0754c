//! # Service Layer

pub mod observers;
pub mod pipeline;

pub use observers::ObserverRegistry;
pub use pipeline::{BatchExtractor, BatchOutcome};
