//! # NSG Types Crate
//!
//! Ledger entities and the chain client port shared across the scanner
//! workspace.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: block headers, transactions and balances as
//!   the node serves them are defined once, here.
//! - **Port, not client**: crates depend on [`ChainClient`]; the HTTP
//!   implementation lives in `nsg-rpc-client`.
//! - **Fixed-point amounts**: on-chain integers are rendered as decimal strings
//!   through [`amount`], never through floats.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod amount;
pub mod entities;
pub mod errors;
pub mod ports;

pub use amount::{format_units, scale_raw_amount};
pub use entities::*;
pub use errors::{AmountError, ChainClientError};
pub use ports::{linked_header, ChainClient, MockChainClient};

/// Base currency symbol.
pub const SYMBOL: &str = "NSG";

/// Decimal exponent of the base currency.
pub const DECIMALS: u32 = 8;

/// Signature curve used by the ledger.
pub const CURVE: &str = "ed25519";

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
