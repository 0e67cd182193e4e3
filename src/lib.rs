// SPDX-License-Identifier: CC0-1.0

//! safegen umbrella crate.
//!
//! This crate primarily serves as the workspace root and re-exports the
//! generation pipeline for callers that only need the library surface.
//!
//! All functional code lives in the workspace member crates under
//! `compiler/`, `primitives/` and `cli/`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]
#![doc(test(attr(warn(unused))))]

pub use pipeline::{
    inline_kernel_headers, BuildOptions, GenerationContext, HeaderInliner, IncludedHeaders,
    PipelineError, RunSummary, SafeBuild,
};

/// Miscellaneous metadata about the safegen workspace.
pub mod safegen_meta {
    /// Version string for the umbrella crate, as reported by Cargo.
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
}
