//! In-memory CRUD store for entigen models.
//!
//! This crate provides:
//! - [`MemoryStore`] - Executes create/delete/find/list/count/aggregate/edit
//! - [`Grants`] / [`Operations`] - Which operations each entity exposes
//! - [`Instance`] - A materialized, parent-first instance
//! - [`StoreConfig`] - Page size and id allocation

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod instance;
pub mod operation;
pub mod store;

pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use instance::Instance;
pub use operation::{Grants, Operation, Operations};
pub use store::MemoryStore;
