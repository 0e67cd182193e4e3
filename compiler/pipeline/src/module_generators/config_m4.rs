//! `config.m4` generator
//!
//! Rewrites the extension's `config.m4` so that `PHP_NEW_EXTENSION` compiles
//! the single aggregate source instead of the full source list.

use regex::Regex;

use super::{FileGenerator, GeneratedFile, IncludedHeaders};
use crate::generation_context::GenerationContext;
use crate::template_management::read_text;
use crate::{PipelineError, Result};

/// Generator for `config.m4`
pub struct ConfigM4Generator;

impl FileGenerator for ConfigM4Generator {
    fn name(&self) -> &str { "config_m4" }

    fn output_file(&self, _ctx: &GenerationContext) -> String { "config.m4".to_string() }

    fn render(
        &self,
        ctx: &GenerationContext,
        _input: Option<&IncludedHeaders>,
    ) -> Result<GeneratedFile> {
        let template = ctx.source_dir.join("config.m4");
        let text = read_text(&template)?;

        // The file list is the second argument, either bracket-quoted or bare
        let pattern =
            Regex::new(r"PHP_NEW_EXTENSION\(\s*\[?[A-Za-z0-9_]+\]?\s*,\s*(\[[^\]]*\]|[^,)]*)")?;
        let files = pattern.captures(&text).and_then(|caps| caps.get(1)).ok_or_else(|| {
            PipelineError::Template {
                file: template.clone(),
                message: "no PHP_NEW_EXTENSION(...) call found".to_string(),
            }
        })?;

        let mut rewritten = String::with_capacity(text.len());
        rewritten.push_str(&text[..files.start()]);
        rewritten.push_str(&ctx.source_file_name());
        rewritten.push_str(&text[files.end()..]);

        Ok(GeneratedFile { contents: rewritten.into_bytes(), included: None })
    }
}
