//! # Service Layer

pub mod scanner;

pub use scanner::BlockScanner;
