//! Aggregate source generator
//!
//! Concatenates every C source of the extension into `<name>.c`, removing the
//! includes already satisfied by the aggregate header.

use std::path::Path;

use super::{
    banner, collect_sources, lines, push_terminated, FileGenerator, GeneratedFile,
    IncludeScanner, IncludedHeaders,
};
use crate::generation_context::GenerationContext;
use crate::template_management::read_file;
use crate::{PipelineError, Result};

/// Generator for `<name>.c`
pub struct AggregateSourceGenerator;

impl FileGenerator for AggregateSourceGenerator {
    fn name(&self) -> &str { "aggregate_source" }

    fn output_file(&self, ctx: &GenerationContext) -> String { ctx.source_file_name() }

    fn render(
        &self,
        ctx: &GenerationContext,
        input: Option<&IncludedHeaders>,
    ) -> Result<GeneratedFile> {
        let included = input.ok_or_else(|| {
            PipelineError::Message(
                "aggregate source requires the headers emitted by the aggregate header".to_string(),
            )
        })?;
        let scanner = IncludeScanner::new()?;
        let main_header = ctx.main_header_name();

        let mut contents = banner(ctx, &ctx.source_file_name()).into_bytes();
        contents.extend_from_slice(
            format!(
                "#ifdef HAVE_CONFIG_H\n#include \"config.h\"\n#endif\n\n#include \"{}\"\n#include \"{}\"\n\n",
                main_header,
                ctx.header_file_name()
            )
            .as_bytes(),
        );

        let sources = collect_sources(ctx, "c")?;
        for source in &sources {
            let id = ctx.source_id(source).unwrap_or_else(|| source.display().to_string());
            let original = read_file(source)?;
            let mut body = Vec::with_capacity(original.len());

            for line in lines(&original) {
                let satisfied = scanner.local_include(line).is_some_and(|target| {
                    target == Path::new("config.h")
                        || scanner.resolve(ctx, source, &target).is_some_and(|(_, dep_id)| {
                            dep_id == main_header || included.contains(&dep_id)
                        })
                });
                if !satisfied {
                    body.extend_from_slice(line);
                }
            }

            contents.extend_from_slice(format!("/* {} */\n", id).as_bytes());
            push_terminated(&mut contents, &body);
            contents.push(b'\n');
        }

        tracing::info!(sources = sources.len(), "aggregated sources");
        Ok(GeneratedFile { contents, included: None })
    }
}
