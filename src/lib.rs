//! `freecad-finder` - Locate FreeCAD installation directories for use from a
//! standalone Python.
//!
//! A search runs in three steps, each usable on its own:
//! [`enumerate_candidate_roots`] lists where FreeCAD may be installed,
//! [`validate_and_collect`] keeps the directories that exist, and
//! [`register`] adds them to an import search list.

#![deny(
    warnings,
    missing_debug_implementations,
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo
)]

use std::path::PathBuf;

pub mod candidates;
pub mod collect;
pub mod error;
pub mod normalize;
pub mod platform;
pub mod register;
pub mod types;

pub use candidates::{CandidateRoots, enumerate_candidate_roots};
pub use collect::{Placement, SearchOptions, validate_and_collect};
pub use error::{Error, Result};
pub use platform::HostEnv;
pub use register::{register, register_front};
pub use types::{CandidateRoot, DiscoveredPath, PathKind, Platform, RootSource, SearchResult};

/// Find FreeCAD directories and add them to `target`
///
/// Runs enumeration, validation and registration with default options and
/// returns what was found. Finding nothing is not an error.
///
/// # Errors
/// Returns error if an override is empty or contains a NUL byte.
pub fn find_application_paths(
    env: &HostEnv,
    overrides: &[PathBuf],
    target: &mut Vec<PathBuf>,
) -> Result<SearchResult> {
    find_application_paths_with(env, overrides, &SearchOptions::default(), target)
}

/// Like [`find_application_paths`], with explicit options
///
/// # Errors
/// Returns error if an override is empty or contains a NUL byte.
pub fn find_application_paths_with(
    env: &HostEnv,
    overrides: &[PathBuf],
    options: &SearchOptions,
    target: &mut Vec<PathBuf>,
) -> Result<SearchResult> {
    let candidates = enumerate_candidate_roots(env, overrides)?;
    let result = validate_and_collect(env.platform, candidates, options)?;
    match options.placement {
        Placement::Append => register(&result, target),
        Placement::Prepend => register_front(&result, target),
    };
    Ok(result)
}
