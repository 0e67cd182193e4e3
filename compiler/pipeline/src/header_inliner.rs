//! Inlining of kernel headers into the PHP-facing main header.
//!
//! The copied `php_<name>.h` refers to kernel headers through directives such
//! as `#include "kernel/globals.h"`. A safe build ships without the kernel
//! tree, so each such directive is replaced by the literal contents of the
//! referenced file, resolved against the original source tree.
//!
//! Only directives present in the original file are expanded. Directives that
//! appear inside inlined content are emitted verbatim.

use std::path::{Path, PathBuf};

use regex::bytes::Regex;
use tracing::{debug, info};

use crate::template_management::{read_file, write_file};
use crate::{PipelineError, Result};

/// Include prefix whose directives are inlined by default
pub const KERNEL_PREFIX: &str = "kernel/";

/// Separator appended after each inlined file
#[cfg(windows)]
pub const LINE_SEPARATOR: &str = "\r\n";
/// Separator appended after each inlined file
#[cfg(not(windows))]
pub const LINE_SEPARATOR: &str = "\n";

/// Result of inlining one document in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inlined {
    /// Transformed document
    pub content: Vec<u8>,
    /// Paths (relative to the base directory) that were inlined, in order
    pub inlined: Vec<PathBuf>,
}

/// Single-pass `#include` inliner for one include prefix
#[derive(Debug, Clone)]
pub struct HeaderInliner {
    pattern: Regex,
}

impl HeaderInliner {
    /// Create an inliner for directives of the form `#include "<prefix>..."`
    pub fn new(prefix: &str) -> Result<Self> {
        let pattern = Regex::new(&format!(r#"(?-u)^#include "({}.+)""#, regex::escape(prefix)))?;
        Ok(Self { pattern })
    }

    /// Create an inliner for `#include "kernel/..."` directives
    pub fn kernel() -> Result<Self> { Self::new(KERNEL_PREFIX) }

    /// Raw path bytes named by `line` if it is a recognised directive
    pub fn directive_path<'l>(&self, line: &'l [u8]) -> Option<&'l [u8]> {
        self.pattern.captures(line).and_then(|caps| caps.get(1)).map(|m| m.as_bytes())
    }

    /// Inline every recognised directive of `input`
    ///
    /// # Arguments
    ///
    /// * `input` - The document; lines keep their original terminators
    /// * `resolve` - Returns the contents of a referenced path; its first error aborts
    pub fn inline_bytes<F>(&self, input: &[u8], mut resolve: F) -> Result<Inlined>
    where
        F: FnMut(&Path) -> Result<Vec<u8>>,
    {
        let mut content = Vec::with_capacity(input.len());
        let mut inlined = Vec::new();

        for line in input.split_inclusive(|b| *b == b'\n') {
            match self.directive_path(line) {
                Some(raw) => {
                    let path = path::path_from_bytes(raw).ok_or_else(|| {
                        PipelineError::Message(format!(
                            "include path is not valid UTF-8: {}",
                            String::from_utf8_lossy(raw)
                        ))
                    })?;
                    let body = resolve(&path)?;
                    content.extend_from_slice(&body);
                    content.extend_from_slice(LINE_SEPARATOR.as_bytes());
                    inlined.push(path);
                }
                None => content.extend_from_slice(line),
            }
        }

        Ok(Inlined { content, inlined })
    }

    /// Inline recognised directives of `file` in place, resolving against `base_dir`
    ///
    /// The file is rewritten once, after every directive has been resolved. If
    /// any referenced file cannot be read, the error is returned and `file` is
    /// left untouched.
    ///
    /// # Returns
    ///
    /// Returns `Result<usize>` with the number of directives replaced
    pub fn inline_file(&self, file: &Path, base_dir: &Path) -> Result<usize> {
        let original = read_file(file)?;
        let result = self.inline_bytes(&original, |relative| {
            let referenced = base_dir.join(relative);
            debug!(header = %referenced.display(), "inlining");
            read_file(&referenced)
        })?;

        if !result.inlined.is_empty() {
            write_file(file, &result.content)?;
        }
        info!(file = %file.display(), count = result.inlined.len(), "resolved kernel headers");

        Ok(result.inlined.len())
    }
}

/// Inline `#include "kernel/..."` directives of `file` against `base_dir`
pub fn inline_kernel_headers(file: &Path, base_dir: &Path) -> Result<usize> {
    HeaderInliner::kernel()?.inline_file(file, base_dir)
}
