//! Driver, model snapshots, and the entigen CLI.
//!
//! This crate provides:
//! - [`Driver`] - The `load -> compile -> generate -> write` pipeline
//! - [`BackendKind`] - The backends selectable by name
//! - Model snapshots in `MessagePack` ([`to_bytes`], [`save_to_file`], ...)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod driver;
pub mod serialize;

pub use driver::{BackendKind, Driver, DriverError, DriverResult, Outcome, compile_file, model_name, write_artifact};
pub use serialize::{from_bytes, load_from_file, save_to_file, to_bytes};
