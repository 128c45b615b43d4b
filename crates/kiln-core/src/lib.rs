#![forbid(unsafe_code)]
//! kiln-core library.
//!
//! Dependency tracking for incremental artifact builds: an immutable
//! set-based [`graph::Graph`], the algorithms a build pipeline needs on top of
//! it (reversal, reachability, cycle search), the [`metadata::Resource`]
//! annotation container, and the thin manifest/planning boundary used by the
//! `kiln` binary.
//!
//! # Conventions
//!
//! - **Errors**: `thiserror` enums at module boundaries ([`error::KilnError`]),
//!   `anyhow::Result` for config loading.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod config;
pub mod error;
pub mod graph;
pub mod manifest;
pub mod metadata;
pub mod plan;

pub use error::{ErrorCode, KilnError};
pub use graph::{Cycle, Graph, Node};
pub use metadata::{Merge, Metadata, Resource};
