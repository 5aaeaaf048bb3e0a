//! Integration tests for Layer 4: Codegen
//!
//! Tests for the generator contract, the orchestrator, and the shipped
//! backends.

mod backends;
mod orchestration;
