//! Core types, field flags, values, and errors for entigen.
//!
//! This crate provides:
//! - [`ScalarType`] - Built-in scalar types of the schema language
//! - [`FieldFlags`] / [`FieldFlag`] - Field attribute bitmask and its closed flag set
//! - [`Value`] - Runtime values held by generated stores
//! - [`Error`] - Compile errors carrying a `line <n>: <message>` envelope

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod flags;
pub mod types;
pub mod value;

pub use error::{Error, ErrorCategory, ErrorContext, ErrorKind, Result};
pub use flags::{FieldFlag, FieldFlags};
pub use types::ScalarType;
pub use value::Value;
