// SPDX-License-Identifier: CC0-1.0

//! Path utility functions for finding project roots and resolving paths.
//!
//! This module provides the fixed directory layout of an extension project
//! and helpers for walking up to its root and naming files relative to it.

use std::path::{Component, Path, PathBuf};

#[cfg(unix)]
use std::ffi::OsStr;
#[cfg(unix)]
use std::os::unix::ffi::OsStrExt;

/// Directory (relative to the project root) holding the extension sources
pub const SOURCE_SUBDIR: &str = "ext";

/// Directory (relative to the project root) holding build resources
pub const CONFIG_SUBDIR: &str = "build/_resource/config";

/// Default output directory (relative to the project root) for safe builds
pub const DEFAULT_OUTPUT_SUBDIR: &str = "build/safe";

/// Source directory of the project rooted at `root_dir`
pub fn source_dir(root_dir: &Path) -> PathBuf { root_dir.join(SOURCE_SUBDIR) }

/// Build resource directory of the project rooted at `root_dir`
pub fn config_dir(root_dir: &Path) -> PathBuf { root_dir.join(CONFIG_SUBDIR) }

/// Default safe-build output directory of the project rooted at `root_dir`
pub fn default_output_dir(root_dir: &Path) -> PathBuf { root_dir.join(DEFAULT_OUTPUT_SUBDIR) }

/// Name of the PHP-facing main header for an extension
///
/// # Examples
///
/// ```
/// use safegen_path::main_header_name;
/// assert_eq!(main_header_name("phalcon"), "php_phalcon.h");
/// ```
pub fn main_header_name(extension: &str) -> String { format!("php_{}.h", extension) }

/// Find the project root by walking up from the current directory
///
/// A directory is the project root when it contains `ext/php_<extension>.h`.
///
/// # Returns
///
/// Returns `Result<PathBuf>` containing the path to the project root directory.
/// Returns an error if no ancestor of the current directory qualifies.
pub fn find_project_root(extension: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let current = std::env::current_dir()?;
    find_project_root_from(&current, extension)
}

/// Find the project root by walking up from `start`
///
/// # Arguments
///
/// * `start` - Directory to start searching from
/// * `extension` - Extension name used to recognise the main header
pub fn find_project_root_from(
    start: &Path,
    extension: &str,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let marker = Path::new(SOURCE_SUBDIR).join(main_header_name(extension));
    let mut current = start.to_path_buf();
    loop {
        if current.join(&marker).is_file() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(format!(
                "Could not find project root (no ancestor of {} contains {})",
                start.display(),
                marker.display()
            )
            .into());
        }
    }
}

/// Identifier of `path` relative to `base`, with `/` separators
///
/// Both sides are normalised first, so `./ext/kernel/main.h` and
/// `ext/kernel/main.h` name the same file under `./ext`. Returns `None` when
/// `path` does not live under `base`.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use safegen_path::relative_id;
/// assert_eq!(
///     relative_id(Path::new("/src/ext/kernel/main.h"), Path::new("/src/ext")),
///     Some("kernel/main.h".to_string())
/// );
/// assert_eq!(
///     relative_id(Path::new("ext/kernel/main.h"), Path::new("./ext")),
///     Some("kernel/main.h".to_string())
/// );
/// assert_eq!(relative_id(Path::new("/elsewhere/a.h"), Path::new("/src/ext")), None);
/// ```
pub fn relative_id(path: &Path, base: &Path) -> Option<String> {
    let relative = pathdiff::diff_paths(normalize(path), normalize(base))?;
    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::CurDir => {}
            _ => return None,
        }
    }
    if parts.is_empty() {
        return None;
    }
    Some(parts.join("/"))
}

/// Lexically normalise `path`, folding `.` and `..` components
///
/// Generated include directives such as `#include "../kernel/main.h"` name the
/// same file as `kernel/main.h`; normalising lets both resolve to one identity
/// without touching the filesystem. A path that folds away entirely becomes `.`.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Path named by the raw bytes of an include directive
///
/// On Unix any byte sequence is a valid path. Elsewhere the bytes must be
/// UTF-8 and `None` is returned otherwise.
pub fn path_from_bytes(bytes: &[u8]) -> Option<PathBuf> {
    #[cfg(unix)]
    {
        Some(PathBuf::from(OsStr::from_bytes(bytes)))
    }
    #[cfg(not(unix))]
    {
        std::str::from_utf8(bytes).ok().map(PathBuf::from)
    }
}
