//! # Domain Layer
//!
//! Scan states, pass reports and errors.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
