#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]
//! Command implementations for the safegen CLI.
//!
//! The binary parses arguments and delegates here; each command merges its
//! flags over the loaded configuration before calling into the pipeline.

use std::path::{Path, PathBuf};

use config::Config;
use pipeline::{BuildOptions, GenerationContext, HeaderInliner, RunSummary, SafeBuild};
use thiserror::Error;
use tracing::info;

/// Errors that can occur during CLI operations.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded or saved.
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    /// Logging could not be initialised.
    #[error(transparent)]
    Logging(#[from] logging::LoggingError),
    /// The generation pipeline failed.
    #[error(transparent)]
    Pipeline(#[from] pipeline::PipelineError),
    /// Generic error with a custom message.
    #[error("{0}")]
    Message(String),
}

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// Flags accepted by `safegen generate`
#[derive(Debug, Clone, Default)]
pub struct GenerateRequest {
    /// Project root override
    pub root: Option<PathBuf>,
    /// Output directory override
    pub output: Option<PathBuf>,
    /// Force `config.w32` generation
    pub windows: bool,
    /// Force `Makefile.frag` generation
    pub makefile_frag: bool,
    /// Extension name override
    pub extension: Option<String>,
    /// Where to write the JSON run report
    pub report: Option<PathBuf>,
}

/// Merge `request` over `config` into a context and build options
///
/// The project root comes from the request, then the configuration, then a
/// search upwards from the current directory.
pub fn resolve(config: &Config, request: &GenerateRequest) -> Result<(GenerationContext, BuildOptions)> {
    let extension =
        request.extension.clone().unwrap_or_else(|| config.build.extension_name.clone());

    let root = match request.root.clone().or_else(|| config.paths.root_dir.clone()) {
        Some(root) => root,
        None => path::find_project_root(&extension).map_err(|e| CliError::Message(e.to_string()))?,
    };
    let output = request
        .output
        .clone()
        .or_else(|| config.paths.output_dir.clone())
        .unwrap_or_else(|| path::default_output_dir(&root));

    let ctx = GenerationContext::builder()
        .root_dir(root)
        .output_dir(output)
        .extension_name(extension)
        .build()?;
    let options = BuildOptions {
        windows_config: request.windows || config.build.windows_config_enabled(),
        makefile_frag: request.makefile_frag || config.build.makefile_frag,
        include_prefix: config.build.include_prefix.clone(),
    };

    Ok((ctx, options))
}

/// Run `safegen generate`
pub fn generate(config: &Config, request: &GenerateRequest) -> Result<RunSummary> {
    let (ctx, options) = resolve(config, request)?;
    let summary = SafeBuild::new(ctx, &options)?.run()?;

    if let Some(report) = &request.report {
        summary.write_json(report)?;
        info!(report = %report.display(), "wrote run report");
    }
    Ok(summary)
}

/// Run `safegen inline`, returning the number of directives replaced
pub fn inline(file: &Path, base: &Path, prefix: &str) -> Result<usize> {
    Ok(HeaderInliner::new(prefix)?.inline_file(file, base)?)
}

/// Run `safegen init-config`, returning the path written
pub fn init_config(path: Option<PathBuf>, force: bool) -> Result<PathBuf> {
    let path = match path {
        Some(path) => path,
        None => Config::default_path()?,
    };
    if path.exists() && !force {
        return Err(CliError::Message(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(config::ConfigError::FileRead)?;
    }
    Config::default().save(&path)?;
    Ok(path)
}
