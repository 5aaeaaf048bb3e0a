//! Integration tests for Layer 1: Language
//!
//! Tests for the scanner and the declaration parser.

mod parser;
