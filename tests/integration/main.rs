//! Cross-layer integration tests for entigen
//!
//! Tests that verify correct interaction between multiple crates.

mod properties;
