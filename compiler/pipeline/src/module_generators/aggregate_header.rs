//! Aggregate header generator
//!
//! Collects every local header reachable from the extension's C sources into
//! one `<name>.h`, dependencies first, each header exactly once.

use std::collections::BTreeSet;
use std::path::Path;

use super::{
    banner, collect_sources, lines, push_terminated, FileGenerator, GeneratedFile,
    IncludeScanner, IncludedHeaders,
};
use crate::generation_context::GenerationContext;
use crate::template_management::read_file;
use crate::Result;

/// Generator for `<name>.h`
pub struct AggregateHeaderGenerator;

impl FileGenerator for AggregateHeaderGenerator {
    fn name(&self) -> &str { "aggregate_header" }

    fn output_file(&self, ctx: &GenerationContext) -> String { ctx.header_file_name() }

    fn render(
        &self,
        ctx: &GenerationContext,
        _input: Option<&IncludedHeaders>,
    ) -> Result<GeneratedFile> {
        let mut collector = HeaderCollector {
            ctx,
            scanner: IncludeScanner::new()?,
            main_header: ctx.main_header_name(),
            visited: BTreeSet::new(),
            included: IncludedHeaders::new(),
            body: Vec::new(),
        };

        for source in collect_sources(ctx, "c")? {
            let contents = read_file(&source)?;
            for line in lines(&contents) {
                if let Some(target) = collector.scanner.local_include(line) {
                    if let Some((header, id)) = collector.scanner.resolve(ctx, &source, &target) {
                        collector.emit(&header, id)?;
                    }
                }
            }
        }

        let guard = format!("{}_H", ctx.extension_name.to_ascii_uppercase());
        let mut contents = banner(ctx, &ctx.header_file_name()).into_bytes();
        contents.extend_from_slice(format!("#ifndef {guard}\n#define {guard}\n\n").as_bytes());
        contents.extend_from_slice(&collector.body);
        contents.extend_from_slice(format!("#endif /* {guard} */\n").as_bytes());

        tracing::info!(headers = collector.included.len(), "aggregated headers");
        Ok(GeneratedFile { contents, included: Some(collector.included) })
    }
}

struct HeaderCollector<'a> {
    ctx: &'a GenerationContext,
    scanner: IncludeScanner,
    main_header: String,
    /// Headers already started; an id enters `included` only after its
    /// dependencies, so this set is what stops include cycles.
    visited: BTreeSet<String>,
    included: IncludedHeaders,
    body: Vec<u8>,
}

impl HeaderCollector<'_> {
    /// Emit `header` after its own local dependencies
    fn emit(&mut self, header: &Path, id: String) -> Result<()> {
        if id == self.main_header || !self.visited.insert(id.clone()) {
            return Ok(());
        }

        let contents = read_file(header)?;
        let mut own = Vec::with_capacity(contents.len());
        for line in lines(&contents) {
            let dependency = self
                .scanner
                .local_include(line)
                .and_then(|target| self.scanner.resolve(self.ctx, header, &target));
            match dependency {
                Some((_, dep_id)) if dep_id == self.main_header => {}
                Some((dep_path, dep_id)) => self.emit(&dep_path, dep_id)?,
                None => own.extend_from_slice(line),
            }
        }

        self.body.extend_from_slice(format!("/* {} */\n", id).as_bytes());
        push_terminated(&mut self.body, &own);
        self.body.push(b'\n');
        self.included.insert(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{context, write_sources};
    use super::*;

    #[test]
    fn test_dependencies_first_each_once() {
        let tmp = tempfile::tempdir().expect("Failed to create temporary directory");
        write_sources(
            tmp.path(),
            &[
                ("php_phalcon.h", "#define PHP_PHALCON_VERSION \"1.0\"\n"),
                ("kernel/main.h", "#include \"php_phalcon.h\"\n#include \"kernel/memory.h\"\nMAIN\n"),
                ("kernel/memory.h", "#include \"main.h\"\nMEMORY\n"),
                ("kernel/main.c", "#include \"php_phalcon.h\"\n#include \"kernel/main.h\"\n"),
                ("mvc/app.c", "#include <php.h>\n#include \"kernel/memory.h\"\n#include \"missing.h\"\n"),
            ],
        );
        let ctx = context(tmp.path());

        let file = AggregateHeaderGenerator.render(&ctx, None).expect("render should succeed");
        let included = file.included.expect("header generator returns included headers");
        let text = String::from_utf8(file.contents).expect("output is UTF-8");

        assert_eq!(included.as_slice(), ["kernel/memory.h", "kernel/main.h"]);
        assert!(text.contains("#ifndef PHALCON_H\n#define PHALCON_H\n"));
        assert!(text.trim_end().ends_with("#endif /* PHALCON_H */"));
        assert_eq!(text.matches("MEMORY").count(), 1);
        assert_eq!(text.matches("MAIN").count(), 1);
        assert!(text.find("MEMORY") < text.find("MAIN"));
        assert!(text.contains("/* kernel/memory.h */\nMEMORY\n"));
        assert!(!text.contains("#include"));
        assert!(!text.contains("PHP_PHALCON_VERSION"));
    }

    #[test]
    fn test_include_cycle_terminates() {
        let tmp = tempfile::tempdir().expect("Failed to create temporary directory");
        write_sources(
            tmp.path(),
            &[
                ("kernel/a.h", "#include \"kernel/b.h\"\nA\n"),
                ("kernel/b.h", "#include \"kernel/a.h\"\nB\n"),
                ("kernel/a.c", "#include \"kernel/a.h\"\n"),
            ],
        );
        let ctx = context(tmp.path());

        let file = AggregateHeaderGenerator.render(&ctx, None).expect("render should succeed");
        let included = file.included.expect("header generator returns included headers");

        assert_eq!(included.as_slice(), ["kernel/b.h", "kernel/a.h"]);
    }

    #[test]
    fn test_missing_source_dir_is_io_error() {
        let tmp = tempfile::tempdir().expect("Failed to create temporary directory");
        let ctx = context(tmp.path());
        let err = AggregateHeaderGenerator.render(&ctx, None).expect_err("no ext dir must fail");
        assert!(err.is_io());
    }
}
