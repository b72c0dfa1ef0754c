//! Cross-crate integration flows.

pub mod scan_flows;
pub mod signing_flows;
