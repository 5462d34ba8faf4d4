//! Shared domain types and leaf utilities for the Concierge platform.
//!
//! This crate has no database or HTTP dependencies; it holds the types,
//! errors, and crypto helpers the other crates build on.

pub mod error;
pub mod password;
pub mod token;
pub mod types;
