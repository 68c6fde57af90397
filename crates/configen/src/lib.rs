//! configen: build-configuration schema → generated build script translation.
//!
//! A directory tree of `configure.json` documents is the canonical
//! description of a library's features, command-line inputs, compile/SIMD
//! probes, and third-party requirements. configen projects each document into
//! a generated `configure.cmake` script with four labeled sections (Inputs,
//! Libraries, Tests, Features), then recurses into the document's
//! subconfigurations.
//!
//! The heavy lifting, rewriting the embedded condition micro-language into
//! CMake boolean syntax, lives in the `configen-condition` crate; the static
//! package/platform/symbol tables live in `configen-mappings`. This crate
//! holds the per-section processors and the [`Orchestrator`] that drives one
//! run.

pub mod document;
pub mod features;
pub mod inputs;
pub mod libraries;
pub mod orchestrator;
pub mod probes;
pub mod script;

pub use document::ConfigDocument;
pub use orchestrator::Orchestrator;

use std::path::PathBuf;

/// Fatal errors. Everything else in the pipeline is reported through
/// diagnostics and degrades the generated output instead of failing.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A directory was requested (root or subconfig) but holds no document.
    /// There is nothing to generate, so the run stops.
    #[error("missing configuration document: {}", .0.display())]
    MissingDocument(PathBuf),

    #[error("failed to read {}", .0.display())]
    Read(PathBuf, #[source] std::io::Error),

    #[error("invalid JSON in {}", .0.display())]
    Json(PathBuf, #[source] serde_json::Error),

    #[error("failed to write {}", .0.display())]
    Write(PathBuf, #[source] std::io::Error),
}
