//! Semantic model builder for entigen.
//!
//! This crate provides:
//! - [`Model`] - The resolved, read-only entity/enum graph
//! - [`Entity`] / [`Field`] / [`FieldDecl`] - Linked entities and their output fields
//! - [`Reference`] - Inferred references between entities
//! - [`compile`] - Scan, parse, and link a schema in one call

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod builder;
pub mod entity;
pub mod model;
pub mod reference;

pub use builder::{build, compile};
pub use entity::{Entity, EntityRef, Field, FieldDecl, ID_FIELD, OutputType, SearchKey, Subtype};
pub use model::{Enumerate, Model, Variant, Warning};
pub use reference::Reference;
