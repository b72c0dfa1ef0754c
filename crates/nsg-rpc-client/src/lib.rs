//! # NSG RPC Client
//!
//! [`ChainClient`](nsg_types::ChainClient) over the NSG node's HTTP API.
//!
//! ## Endpoints
//!
//! | Operation | Request |
//! |-----------|---------|
//! | `get_height` | `GET /api/blocks/getHeight` |
//! | `get_block_by_height` | `GET /api/blocks/get?height=` |
//! | `get_transactions_by_block` | `GET /api/transactions?blockId=` |
//! | `get_transaction` | `GET /api/uia/transactions/get?id=` |
//! | `get_balance` | `GET /api/accounts/getBalance?address=` |
//! | `get_asset_balance` | `GET /api/uia/balances/{address}/{currency}` |
//! | `broadcast` | `POST /peer/transactions` (`magic`, `version` headers) |
//!
//! Every request is bounded by the configured timeouts; a hung node surfaces
//! as [`ChainClientError::Connection`](nsg_types::ChainClientError::Connection).

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod config;
pub mod types;

pub use client::{ClientError, NsgRpcClient, NETWORK_MAGIC, PEER_VERSION};
pub use config::ClientConfig;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
