//! entigen - entity schema compiler
//!
//! This crate re-exports all layers of the entigen system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 5: entigen_runtime    - Driver, model snapshots, CLI
//! Layer 4: entigen_codegen    - Generator contract, orchestrator, backends
//! Layer 3: entigen_storage    - Executable in-memory store
//! Layer 2: entigen_model      - Semantic model builder
//! Layer 1: entigen_language   - Scanner, declarations, parser
//! Layer 0: entigen_foundation - Core types (ScalarType, FieldFlags, Value, Error)
//! ```

pub use entigen_codegen as codegen;
pub use entigen_foundation as foundation;
pub use entigen_language as language;
pub use entigen_model as model;
pub use entigen_runtime as runtime;
pub use entigen_storage as storage;
