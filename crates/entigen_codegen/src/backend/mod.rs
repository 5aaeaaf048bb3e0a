//! Reference backends.
//!
//! - [`OutlineBackend`] - Language-neutral interface listing
//! - [`MemoryBackend`] - Grant table for an executable [`MemoryStore`](entigen_storage::MemoryStore)

mod memory;
mod outline;

pub use memory::MemoryBackend;
pub use outline::OutlineBackend;
