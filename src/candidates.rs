//! Candidate root enumeration
//!
//! Enumeration is pure: it only builds paths. Whether anything exists there is
//! decided later by [`crate::collect`].

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::platform::{DefaultRoot, HostEnv, default_roots, executable_root};
use crate::types::{CandidateRoot, RootSource};

/// Enumeration stage, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Overrides,
    Defaults,
    LibRoot,
    Executable,
    Done,
}

/// Lazy sequence of candidate roots
///
/// Cloning copies the cursor, so a clone taken before iterating walks the
/// whole sequence again.
#[derive(Debug, Clone)]
pub struct CandidateRoots<'a> {
    /// Caller-supplied roots, already validated
    overrides: &'a [PathBuf],
    /// Platform install locations
    defaults:  &'static [DefaultRoot],
    /// Host values
    env:       &'a HostEnv,
    /// Current stage
    stage:     Stage,
    /// Position within the current stage
    index:     usize,
}

impl Iterator for CandidateRoots<'_> {
    type Item = CandidateRoot;

    fn next(&mut self) -> Option<CandidateRoot> {
        loop {
            match self.stage {
                Stage::Overrides => {
                    if let Some(path) = self.overrides.get(self.index) {
                        self.index += 1;
                        return Some(CandidateRoot::new(path.clone(), RootSource::Override));
                    }
                    self.advance(Stage::Defaults);
                },
                Stage::Defaults => {
                    let Some(root) = self.defaults.get(self.index) else {
                        self.advance(Stage::LibRoot);
                        continue;
                    };
                    self.index += 1;
                    if let Some(path) = root.resolve(self.env.home.as_deref()) {
                        return Some(CandidateRoot::new(path, RootSource::PlatformDefault));
                    }
                },
                Stage::LibRoot => {
                    self.advance(Stage::Executable);
                    if let Some(path) = &self.env.lib_root {
                        return Some(CandidateRoot::new(
                            path.clone(),
                            RootSource::LibRootVariable,
                        ));
                    }
                },
                Stage::Executable => {
                    self.advance(Stage::Done);
                    let root = self
                        .env
                        .executable
                        .as_deref()
                        .and_then(|exe| executable_root(exe, self.env.home.as_deref()));
                    if let Some(path) = root {
                        return Some(CandidateRoot::new(path, RootSource::Executable));
                    }
                },
                Stage::Done => return None,
            }
        }
    }
}

impl CandidateRoots<'_> {
    const fn advance(&mut self, stage: Stage) {
        self.stage = stage;
        self.index = 0;
    }
}

/// Enumerate candidate roots for a host
///
/// Order: `overrides` as given, then the platform's conventional locations,
/// then `FREECAD_LIB_ROOT`, then the root implied by `FREECAD_EXECUTABLE`.
///
/// # Errors
/// Returns error if an override is empty or contains a NUL byte. Overrides
/// that do not exist, however many or long, are enumerated like any other.
pub fn enumerate_candidate_roots<'a>(
    env: &'a HostEnv,
    overrides: &'a [PathBuf],
) -> Result<CandidateRoots<'a>> {
    for path in overrides {
        validate_override(path)?;
    }

    Ok(CandidateRoots {
        overrides,
        defaults: default_roots(env.platform),
        env,
        stage: Stage::Overrides,
        index: 0,
    })
}

/// Validate a caller-supplied root
fn validate_override(path: &Path) -> Result<()> {
    let raw = path.as_os_str();
    if raw.is_empty() {
        return Err(Error::invalid_override(path, "path is empty"));
    }
    if raw.as_encoded_bytes().contains(&0) {
        return Err(Error::invalid_override(path, "path contains a NUL byte"));
    }
    Ok(())
}
