//! Sub-generators for the safe-build pipeline.
//!
//! Each generator implements [`FileGenerator`] and writes one file of the
//! output tree. Only the aggregate header produces a result
//! ([`IncludedHeaders`]), which the orchestrator hands to the aggregate source.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use regex::bytes::Regex;
use tracing::debug;
use walkdir::WalkDir;

use crate::generation_context::GenerationContext;
use crate::template_management::write_file;
use crate::Result;

/// Output of [`FileGenerator::render`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Bytes to write
    pub contents: Vec<u8>,
    /// Result value handed to later generators, if any
    pub included: Option<IncludedHeaders>,
}

/// Trait for generating one file of the output tree
pub trait FileGenerator {
    /// Get the name of this generator
    fn name(&self) -> &str;

    /// File written by this generator, relative to the output directory
    fn output_file(&self, ctx: &GenerationContext) -> String;

    /// Produce the file contents
    fn render(
        &self,
        ctx: &GenerationContext,
        input: Option<&IncludedHeaders>,
    ) -> Result<GeneratedFile>;

    /// Render and write the file, returning the result value
    fn generate(
        &self,
        ctx: &GenerationContext,
        input: Option<&IncludedHeaders>,
    ) -> Result<Option<IncludedHeaders>> {
        let file = self.render(ctx, input)?;
        let path = ctx.output_dir.join(self.output_file(ctx));
        write_file(&path, &file.contents)?;
        debug!(generator = self.name(), file = %path.display(), bytes = file.contents.len(), "wrote");
        Ok(file.included)
    }
}

/// Ordered, duplicate-free list of header identifiers (relative to the source dir)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncludedHeaders {
    order: Vec<String>,
    seen: BTreeSet<String>,
}

impl IncludedHeaders {
    /// Create an empty list
    pub fn new() -> Self { Self::default() }

    /// Append `id` unless already present; returns whether it was added
    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if self.seen.insert(id.clone()) {
            self.order.push(id);
            true
        } else {
            false
        }
    }

    /// Whether `id` is in the list
    pub fn contains(&self, id: &str) -> bool { self.seen.contains(id) }

    /// Identifiers in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &str> { self.order.iter().map(String::as_str) }

    /// Number of identifiers
    pub fn len(&self) -> usize { self.order.len() }

    /// Whether the list is empty
    pub fn is_empty(&self) -> bool { self.order.is_empty() }

    /// Identifiers in insertion order
    pub fn as_slice(&self) -> &[String] { &self.order }
}

impl<S: Into<String>> FromIterator<S> for IncludedHeaders {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut headers = Self::new();
        for id in iter {
            headers.insert(id);
        }
        headers
    }
}

/// Recognises local `#include "..."` directives in C sources and headers
#[derive(Debug, Clone)]
pub struct IncludeScanner {
    local: Regex,
}

impl IncludeScanner {
    /// Compile the directive pattern
    pub fn new() -> Result<Self> {
        Ok(Self { local: Regex::new(r#"(?-u)^[ \t]*#[ \t]*include[ \t]+"([^"\n]+)""#)? })
    }

    /// Target of a local include directive on `line`
    pub fn local_include(&self, line: &[u8]) -> Option<PathBuf> {
        self.local
            .captures(line)
            .and_then(|caps| caps.get(1))
            .and_then(|m| path::path_from_bytes(m.as_bytes()))
    }

    /// Resolve `target` included from `including_file` to a file under the source dir
    ///
    /// The including file's directory is tried first, then the source root.
    /// Targets outside the source tree (or missing) resolve to `None`.
    pub fn resolve(
        &self,
        ctx: &GenerationContext,
        including_file: &Path,
        target: &Path,
    ) -> Option<(PathBuf, String)> {
        let sibling = including_file.parent().map(|dir| path::normalize(&dir.join(target)));
        let rooted = path::normalize(&ctx.source_dir.join(target));

        sibling.into_iter().chain(std::iter::once(rooted)).find_map(|candidate| {
            if !candidate.is_file() {
                return None;
            }
            let id = ctx.source_id(&candidate)?;
            Some((candidate, id))
        })
    }
}

/// Split `contents` into lines, keeping terminators
pub fn lines(contents: &[u8]) -> impl Iterator<Item = &[u8]> {
    contents.split_inclusive(|b| *b == b'\n')
}

/// Append `chunk` to `out`, adding a newline if `chunk` lacks one
pub fn push_terminated(out: &mut Vec<u8>, chunk: &[u8]) {
    out.extend_from_slice(chunk);
    if !chunk.is_empty() && !chunk.ends_with(b"\n") {
        out.push(b'\n');
    }
}

/// All `*.<extension>` files under the source dir, sorted by path
///
/// The output directory is skipped when it lives inside the source tree.
pub fn collect_sources(ctx: &GenerationContext, extension: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let walker = WalkDir::new(&ctx.source_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| path::normalize(entry.path()) != ctx.output_dir);
    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_file()
            && entry.path().extension().and_then(|e| e.to_str()) == Some(extension)
        {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Banner placed at the top of every generated C file
pub fn banner(ctx: &GenerationContext, file_name: &str) -> String {
    format!(
        "/*\n * {} - safe build of the {} extension.\n * Generated by safegen. Do not edit.\n */\n\n",
        file_name, ctx.extension_name
    )
}

pub mod aggregate_header;
pub mod aggregate_source;
pub mod config_m4;
pub mod config_w32;
pub mod makefile_frag;

pub use aggregate_header::AggregateHeaderGenerator;
pub use aggregate_source::AggregateSourceGenerator;
pub use config_m4::ConfigM4Generator;
pub use config_w32::ConfigW32Generator;
pub use makefile_frag::MakefileFragGenerator;

#[cfg(test)]
pub(crate) mod test_support {
    use std::fs;
    use std::path::Path;

    use crate::generation_context::GenerationContext;

    /// Write `files` (relative path, contents) under `<root>/ext`
    pub fn write_sources(root: &Path, files: &[(&str, &str)]) {
        for (name, contents) in files {
            let path = root.join("ext").join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).expect("Failed to create source dir");
            }
            fs::write(&path, contents).expect("Failed to write source file");
        }
    }

    /// Context rooted at `root` writing into `<root>/out`
    pub fn context(root: &Path) -> GenerationContext {
        GenerationContext::builder()
            .root_dir(root)
            .output_dir(root.join("out"))
            .build()
            .expect("context should build")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_included_headers_dedup_and_order() {
        let mut headers = IncludedHeaders::new();
        assert!(headers.insert("kernel/main.h"));
        assert!(headers.insert("kernel/array.h"));
        assert!(!headers.insert("kernel/main.h"));
        assert_eq!(headers.as_slice(), ["kernel/main.h", "kernel/array.h"]);
        assert!(headers.contains("kernel/array.h"));
        assert_eq!(headers.len(), 2);
    }

    #[test]
    fn test_scanner_local_include() {
        let scanner = IncludeScanner::new().expect("pattern compiles");
        assert_eq!(scanner.local_include(b"#include \"kernel/main.h\"\n"), Some("kernel/main.h".into()));
        assert_eq!(scanner.local_include(b"  #  include\t\"a.h\""), Some("a.h".into()));
        assert_eq!(scanner.local_include(b"#include <php.h>\n"), None);
        assert_eq!(scanner.local_include(b"// #include \"a.h\"\n"), None);
    }

    #[test]
    fn test_collect_sources_skips_nested_output_dir() {
        let tmp = tempfile::tempdir().expect("Failed to create temporary directory");
        test_support::write_sources(tmp.path(), &[("a.c", ""), ("safe/old.c", "")]);
        let ctx = GenerationContext::builder()
            .root_dir(tmp.path())
            .output_dir(tmp.path().join("ext/./safe"))
            .build()
            .expect("context should build");

        let sources = collect_sources(&ctx, "c").expect("walk should succeed");
        assert_eq!(sources, vec![ctx.source_dir.join("a.c")]);
    }

    #[test]
    fn test_resolve_prefers_sibling() {
        let tmp = tempfile::tempdir().expect("Failed to create temporary directory");
        test_support::write_sources(
            tmp.path(),
            &[("kernel/main.h", ""), ("main.h", ""), ("kernel/main.c", "")],
        );
        let ctx = test_support::context(tmp.path());
        let scanner = IncludeScanner::new().expect("pattern compiles");
        let including = ctx.source_dir.join("kernel/main.c");

        let (_, id) =
            scanner.resolve(&ctx, &including, Path::new("main.h")).expect("sibling resolves");
        assert_eq!(id, "kernel/main.h");
        let (_, id) =
            scanner.resolve(&ctx, &including, Path::new("../main.h")).expect("parent resolves");
        assert_eq!(id, "main.h");
        assert!(scanner.resolve(&ctx, &including, Path::new("missing.h")).is_none());
        assert!(scanner.resolve(&ctx, &including, Path::new("../../outside.h")).is_none());
    }
}
