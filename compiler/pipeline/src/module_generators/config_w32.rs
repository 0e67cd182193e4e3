//! `config.w32` generator
//!
//! Rewrites the extension's `config.w32` for the Windows build system: the
//! `EXTENSION(...)` call compiles the aggregate source and every
//! `ADD_SOURCES(...)` line is dropped.

use regex::Regex;

use super::{FileGenerator, GeneratedFile, IncludedHeaders};
use crate::generation_context::GenerationContext;
use crate::template_management::read_text;
use crate::{PipelineError, Result};

/// Generator for `config.w32`
pub struct ConfigW32Generator;

impl FileGenerator for ConfigW32Generator {
    fn name(&self) -> &str { "config_w32" }

    fn output_file(&self, _ctx: &GenerationContext) -> String { "config.w32".to_string() }

    fn render(
        &self,
        ctx: &GenerationContext,
        _input: Option<&IncludedHeaders>,
    ) -> Result<GeneratedFile> {
        let template = ctx.source_dir.join("config.w32");
        let text = read_text(&template)?;

        let kept: String = text
            .split_inclusive('\n')
            .filter(|line| !line.trim_start().starts_with("ADD_SOURCES("))
            .collect();

        let pattern = Regex::new(r#"\bEXTENSION\(\s*"[^"]*"\s*,\s*("[^"]*")"#)?;
        let files = pattern.captures(&kept).and_then(|caps| caps.get(1)).ok_or_else(|| {
            PipelineError::Template {
                file: template.clone(),
                message: "no EXTENSION(\"...\", \"...\") call found".to_string(),
            }
        })?;

        let rewritten =
            format!("{}\"{}\"{}", &kept[..files.start()], ctx.source_file_name(), &kept[files.end()..]);

        Ok(GeneratedFile { contents: rewritten.into_bytes(), included: None })
    }
}
