//! `Makefile.frag` generator
//!
//! Copies the makefile fragment shipped with the build resources.

use super::{FileGenerator, GeneratedFile, IncludedHeaders};
use crate::generation_context::GenerationContext;
use crate::template_management::read_file;
use crate::Result;

/// Generator for `Makefile.frag`
pub struct MakefileFragGenerator;

impl FileGenerator for MakefileFragGenerator {
    fn name(&self) -> &str { "makefile_frag" }

    fn output_file(&self, _ctx: &GenerationContext) -> String { "Makefile.frag".to_string() }

    fn render(
        &self,
        ctx: &GenerationContext,
        _input: Option<&IncludedHeaders>,
    ) -> Result<GeneratedFile> {
        let contents = read_file(&ctx.config_dir.join("Makefile.frag"))?;
        Ok(GeneratedFile { contents, included: None })
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::super::test_support::context;
    use super::*;

    #[test]
    fn test_copies_fragment_from_config_dir() {
        let tmp = tempfile::tempdir().expect("Failed to create temporary directory");
        let ctx = context(tmp.path());
        fs::create_dir_all(&ctx.config_dir).expect("Failed to create config dir");
        fs::write(ctx.config_dir.join("Makefile.frag"), "phalcon.lo: phalcon.c\n")
            .expect("Failed to write fragment");

        let written = MakefileFragGenerator.generate(&ctx, None).expect("generate should succeed");

        assert!(written.is_none());
        assert_eq!(
            fs::read_to_string(ctx.output_dir.join("Makefile.frag")).expect("read output"),
            "phalcon.lo: phalcon.c\n"
        );
    }

    #[test]
    fn test_missing_fragment_is_io_error() {
        let tmp = tempfile::tempdir().expect("Failed to create temporary directory");
        let ctx = context(tmp.path());
        let err = MakefileFragGenerator.render(&ctx, None).expect_err("must fail");
        assert!(err.is_io());
    }
}
