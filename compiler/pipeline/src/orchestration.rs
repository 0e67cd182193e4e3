//! Pipeline orchestration for the safe build.
//!
//! This module contains the main entry point that coordinates the output
//! directory reset, the sub-generators, the fixed-file copy and the header
//! inlining pass.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::generation_context::GenerationContext;
use crate::header_inliner::{HeaderInliner, KERNEL_PREFIX};
use crate::module_generators::{
    AggregateHeaderGenerator, AggregateSourceGenerator, ConfigM4Generator, ConfigW32Generator,
    FileGenerator, MakefileFragGenerator,
};
use crate::template_management::{clean_directory, copy_fixed_file, list_files, write_file};
use crate::Result;

/// Capabilities selecting which optional generators run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// Emit `config.w32` for the Windows build system
    pub windows_config: bool,
    /// Emit `Makefile.frag` from the build resources
    pub makefile_frag: bool,
    /// Include prefix whose directives are inlined into the main header
    pub include_prefix: String,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            windows_config: false,
            makefile_frag: false,
            include_prefix: KERNEL_PREFIX.to_string(),
        }
    }
}

impl BuildOptions {
    /// Options matching the current host: `config.w32` only on Windows
    pub fn for_host() -> Self { Self { windows_config: cfg!(windows), ..Self::default() } }
}

/// What a successful run produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Output directory of the run
    pub output_dir: PathBuf,
    /// Generated files relative to the output directory, sorted
    pub files: Vec<String>,
    /// Headers aggregated into `<name>.h`, in emission order
    pub included_headers: Vec<String>,
    /// Number of include directives inlined into `php_<name>.h`
    pub inlined_directives: usize,
}

impl RunSummary {
    /// Write this summary as pretty-printed JSON
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        write_file(path, json.as_bytes())
    }
}

/// Safe-build orchestrator
///
/// Owns the context, the generators and the inliner for one run. Every step
/// depends on the previous one succeeding; the first error aborts the run.
pub struct SafeBuild {
    ctx: GenerationContext,
    header: Box<dyn FileGenerator>,
    source: Box<dyn FileGenerator>,
    configs: Vec<Box<dyn FileGenerator>>,
    inliner: HeaderInliner,
}

impl SafeBuild {
    /// Wire the standard generators according to `options`
    pub fn new(ctx: GenerationContext, options: &BuildOptions) -> Result<Self> {
        let mut configs: Vec<Box<dyn FileGenerator>> = vec![Box::new(ConfigM4Generator)];
        if options.windows_config {
            configs.push(Box::new(ConfigW32Generator));
        }
        if options.makefile_frag {
            configs.push(Box::new(MakefileFragGenerator));
        }

        Ok(Self::with_generators(
            ctx,
            Box::new(AggregateHeaderGenerator),
            Box::new(AggregateSourceGenerator),
            configs,
            HeaderInliner::new(&options.include_prefix)?,
        ))
    }

    /// Build an orchestrator from explicitly provided generators
    pub fn with_generators(
        ctx: GenerationContext,
        header: Box<dyn FileGenerator>,
        source: Box<dyn FileGenerator>,
        configs: Vec<Box<dyn FileGenerator>>,
        inliner: HeaderInliner,
    ) -> Self {
        Self { ctx, header, source, configs, inliner }
    }

    /// The context this orchestrator writes with
    pub fn context(&self) -> &GenerationContext { &self.ctx }

    /// Names of the generators in invocation order
    pub fn generator_names(&self) -> Vec<&str> {
        [self.header.name(), self.source.name()]
            .into_iter()
            .chain(self.configs.iter().map(|g| g.name()))
            .collect()
    }

    /// Generate the safe build
    ///
    /// # Returns
    ///
    /// Returns `Result<RunSummary>` describing the populated output directory
    pub fn run(&self) -> Result<RunSummary> {
        let ctx = &self.ctx;
        info!(
            source = %ctx.source_dir.display(),
            output = %ctx.output_dir.display(),
            "generating safe build"
        );

        clean_directory(&ctx.output_dir)?;

        let included = self.header.generate(ctx, None)?;
        self.source.generate(ctx, included.as_ref())?;

        for config in &self.configs {
            debug!(generator = config.name(), "running config generator");
            config.generate(ctx, None)?;
        }

        let main_header = copy_fixed_file(&ctx.source_dir, &ctx.output_dir, &ctx.main_header_name())?;
        let inlined_directives = self.inliner.inline_file(&main_header, &ctx.source_dir)?;

        let summary = RunSummary {
            output_dir: ctx.output_dir.clone(),
            files: list_files(&ctx.output_dir)?,
            included_headers: included.map(|h| h.as_slice().to_vec()).unwrap_or_default(),
            inlined_directives,
        };
        info!(files = summary.files.len(), "safe build complete");
        Ok(summary)
    }
}
