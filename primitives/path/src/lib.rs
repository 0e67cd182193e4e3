// SPDX-License-Identifier: CC0-1.0

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Path utility functions for locating extension source trees.
//!
//! This crate knows the fixed layout of an extension project (`ext/` for
//! sources, `build/_resource/config` for build resources), finds the project
//! root, and turns file paths into the `/`-separated identifiers used in
//! generated headers.

pub mod path_utils;

// Re-export for convenience
pub use path_utils::*;
