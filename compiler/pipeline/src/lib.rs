#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! High-level pipeline that assembles a "safe" build tree for a native PHP
//! extension.
//!
//! A safe build is a single translation unit (`<name>.c` plus `<name>.h`)
//! together with the build-config files needed to compile it, which makes the
//! extension portable across 32-bit and 64-bit targets.
//!
//! ## Module Organization
//!
//! - `orchestration` - Main entry point (`SafeBuild::run`)
//! - `generation_context` - Immutable paths shared by every generator
//! - `module_generators` - The sub-generators writing the output tree
//! - `header_inliner` - Single-level `#include "kernel/..."` inlining
//! - `template_management` - Directory reset and file copy helpers

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Convenient result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors that can occur while generating a safe build.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// I/O error tied to a specific file or directory.
    #[error("I/O error on {}: {source}", path.display())]
    FileAccess {
        /// The file or directory being accessed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
    /// A build-config template lacks the construct the generator rewrites.
    #[error("Malformed template {}: {message}", file.display())]
    Template {
        /// Template file that was being rewritten
        file: PathBuf,
        /// What was missing
        message: String,
    },
    /// Generic message-based error.
    #[error("{0}")]
    Message(String),
    /// I/O error without path context.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Error while walking the source tree.
    #[error(transparent)]
    Walk(#[from] walkdir::Error),
    /// Regex compilation error.
    #[error(transparent)]
    Regex(#[from] regex::Error),
    /// Error serializing the run summary.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl PipelineError {
    /// Whether this error originates from the filesystem
    pub fn is_io(&self) -> bool {
        match self {
            PipelineError::FileAccess { .. } | PipelineError::Io(_) => true,
            PipelineError::Walk(e) => e.io_error().is_some(),
            _ => false,
        }
    }
}

/// Attach a path to an I/O result.
pub(crate) trait IoContext<T> {
    fn at(self, path: &Path) -> Result<T>;
}

impl<T> IoContext<T> for std::io::Result<T> {
    fn at(self, path: &Path) -> Result<T> {
        self.map_err(|source| PipelineError::FileAccess { path: path.to_path_buf(), source })
    }
}

// Module declarations
pub mod generation_context;
pub mod header_inliner;
pub mod module_generators;
pub mod orchestration;
pub mod template_management;

pub use generation_context::GenerationContext;
pub use header_inliner::{inline_kernel_headers, HeaderInliner, KERNEL_PREFIX};
pub use module_generators::{FileGenerator, IncludedHeaders};
pub use orchestration::{BuildOptions, RunSummary, SafeBuild};
