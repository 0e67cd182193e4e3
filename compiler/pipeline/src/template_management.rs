//! File management for the pipeline.
//!
//! This module handles resetting the output directory and copying or writing
//! individual files with path-aware errors.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::{IoContext, Result};

/// Remove `dir` if it exists and recreate it empty
///
/// # Arguments
///
/// * `dir` - Directory to reset
///
/// # Returns
///
/// Returns `Result<()>`; fails with a `FileAccess` error if the directory
/// cannot be removed or recreated.
pub fn clean_directory(dir: &Path) -> Result<()> {
    if dir.exists() {
        debug!(dir = %dir.display(), "removing previous output");
        fs::remove_dir_all(dir).at(dir)?;
    }
    fs::create_dir_all(dir).at(dir)?;
    Ok(())
}

/// Copy `file_name` verbatim from `src_dir` into `dst_dir`
///
/// # Returns
///
/// Returns `Result<PathBuf>` containing the path of the copy
pub fn copy_fixed_file(src_dir: &Path, dst_dir: &Path, file_name: &str) -> Result<PathBuf> {
    let src_path = src_dir.join(file_name);
    let dst_path = dst_dir.join(file_name);

    if !src_path.is_file() {
        return Err(crate::PipelineError::FileAccess {
            path: src_path,
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "required file is missing"),
        });
    }
    fs::copy(&src_path, &dst_path).at(&dst_path)?;
    debug!(from = %src_path.display(), to = %dst_path.display(), "copied fixed file");

    Ok(dst_path)
}

/// Read a whole file as bytes
pub fn read_file(path: &Path) -> Result<Vec<u8>> { fs::read(path).at(path) }

/// Read a whole file as UTF-8 text
pub fn read_text(path: &Path) -> Result<String> { fs::read_to_string(path).at(path) }

/// Write `contents` to `path`, creating parent directories as needed
pub fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).at(parent)?;
    }
    fs::write(path, contents).at(path)
}

/// List every file under `dir` as sorted `/`-separated relative identifiers
pub fn list_files(dir: &Path) -> Result<Vec<String>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() {
            if let Some(id) = path::relative_id(entry.path(), dir) {
                files.push(id);
            }
        }
    }
    Ok(files)
}
