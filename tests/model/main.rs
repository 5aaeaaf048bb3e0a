//! Integration tests for Layer 2: Model
//!
//! Tests for inheritance linking, field layout, and the reference index.

mod inheritance;
mod layout;
