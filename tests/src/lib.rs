//! # NSG Scanner Test Suite
//!
//! Cross-crate flows run against `MockChainClient` and the in-memory store.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── scan_flows.rs      # seeding, catch-up, forks, rescans
//!     └── signing_flows.rs   # hash → sign → combine → submit
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p nsg-tests
//! cargo test -p nsg-tests integration::scan_flows
//! ```

#![allow(unused_variables)]
#![allow(unused_imports)]
#![allow(dead_code)]

pub mod integration;
