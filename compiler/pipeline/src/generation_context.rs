//! Generation context for the safe-build pipeline.
//!
//! This module provides the immutable set of paths shared by the orchestrator
//! and every sub-generator during one run.

use std::path::{Path, PathBuf};

use crate::PipelineError;

/// Extension name used when none is configured
pub const DEFAULT_EXTENSION: &str = "phalcon";

/// Context containing all paths needed for one safe-build run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationContext {
    /// Root of the extension project
    pub root_dir: PathBuf,
    /// Directory with the extension sources (`<root>/ext`)
    pub source_dir: PathBuf,
    /// Directory with build resources (`<root>/build/_resource/config`)
    pub config_dir: PathBuf,
    /// Directory the safe build is written to
    pub output_dir: PathBuf,
    /// Extension name, used to derive generated file names
    pub extension_name: String,
}

impl GenerationContext {
    /// Create a new builder for GenerationContext
    pub fn builder() -> GenerationContextBuilder { GenerationContextBuilder::default() }

    /// PHP-facing main header, e.g. `php_phalcon.h`
    pub fn main_header_name(&self) -> String { path::main_header_name(&self.extension_name) }

    /// Aggregate header, e.g. `phalcon.h`
    pub fn header_file_name(&self) -> String { format!("{}.h", self.extension_name) }

    /// Aggregate source, e.g. `phalcon.c`
    pub fn source_file_name(&self) -> String { format!("{}.c", self.extension_name) }

    /// Identifier of `file` relative to the source directory
    pub fn source_id(&self, file: &Path) -> Option<String> {
        path::relative_id(file, &self.source_dir)
    }
}

#[derive(Default)]
/// Builder for GenerationContext
pub struct GenerationContextBuilder {
    root_dir: Option<PathBuf>,
    source_dir: Option<PathBuf>,
    config_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    extension_name: Option<String>,
}

impl GenerationContextBuilder {
    /// Set the project root; source and config directories derive from it
    pub fn root_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.root_dir = Some(dir.into());
        self
    }

    /// Override the source directory
    pub fn source_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.source_dir = Some(dir.into());
        self
    }

    /// Override the build resource directory
    pub fn config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config_dir = Some(dir.into());
        self
    }

    /// Set the output directory
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Set the extension name
    pub fn extension_name(mut self, name: impl Into<String>) -> Self {
        self.extension_name = Some(name.into());
        self
    }

    /// Build the GenerationContext
    ///
    /// All paths are lexically normalised, so `./` prefixes and `..` segments
    /// do not change how files are identified or compared.
    pub fn build(self) -> Result<GenerationContext, PipelineError> {
        let root_dir = self
            .root_dir
            .map(|dir| path::normalize(&dir))
            .ok_or_else(|| PipelineError::Message("root_dir is required".to_string()))?;
        let output_dir = self
            .output_dir
            .map(|dir| path::normalize(&dir))
            .ok_or_else(|| PipelineError::Message("output_dir is required".to_string()))?;
        let extension_name =
            self.extension_name.unwrap_or_else(|| DEFAULT_EXTENSION.to_string());
        if extension_name.is_empty()
            || !extension_name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(PipelineError::Message(format!(
                "invalid extension name '{}': expected [A-Za-z0-9_]+",
                extension_name
            )));
        }

        Ok(GenerationContext {
            source_dir: path::normalize(
                &self.source_dir.unwrap_or_else(|| path::source_dir(&root_dir)),
            ),
            config_dir: path::normalize(
                &self.config_dir.unwrap_or_else(|| path::config_dir(&root_dir)),
            ),
            root_dir,
            output_dir,
            extension_name,
        })
    }
}
