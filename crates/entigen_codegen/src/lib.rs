//! Generator contract, orchestration, and reference backends for entigen.
//!
//! This crate provides:
//! - [`Generator`] - The per-entity backend contract
//! - [`Orchestrator`] - Drives a generator over a model in dependency order
//! - [`Output`] - The shared indented text buffer
//! - [`GeneratorConfig`] - Namespace, indentation, artifact name, failure policy
//! - [`backend`] - The outline and memory backends

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod backend;
pub mod config;
pub mod error;
pub mod generator;
pub mod orchestrator;
pub mod output;

pub use backend::{MemoryBackend, OutlineBackend};
pub use config::GeneratorConfig;
pub use error::{BackendError, BackendResult};
pub use generator::{Access, Generator};
pub use orchestrator::{Artifact, Call, Failure, Orchestrator, Report, plan};
pub use output::Output;
