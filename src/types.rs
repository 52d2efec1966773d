//! Common types and constants for `freecad-finder`

use std::fmt;
use std::path::{Path, PathBuf};

/// Name of the directory holding FreeCAD workbench modules
pub const MODULE_DIR: &str = "Mod";

/// Operating system family whose install conventions are searched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Platform {
    /// Linux and other unix-like systems
    Linux,
    /// macOS
    Macos,
    /// Windows
    Windows,
}

impl Platform {
    /// Every supported platform
    pub const ALL: [Self; 3] = [Self::Linux, Self::Macos, Self::Windows];

    /// Platform this binary was compiled for
    #[must_use]
    pub const fn current() -> Self {
        if cfg!(target_os = "windows") {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::Macos
        } else {
            Self::Linux
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Linux => "linux",
            Self::Macos => "macos",
            Self::Windows => "windows",
        })
    }
}

/// Where a candidate root came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootSource {
    /// Supplied by the caller
    Override,
    /// Conventional install location for the platform
    PlatformDefault,
    /// The `FREECAD_LIB_ROOT` value
    LibRootVariable,
    /// Derived from the `FREECAD_EXECUTABLE` value
    Executable,
}

impl fmt::Display for RootSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Override => "override",
            Self::PlatformDefault => "default",
            Self::LibRootVariable => "FREECAD_LIB_ROOT",
            Self::Executable => "FREECAD_EXECUTABLE",
        })
    }
}

/// A directory that may hold a FreeCAD installation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateRoot {
    /// Path as enumerated, not yet normalized
    path:   PathBuf,
    /// Origin of the candidate
    source: RootSource,
}

impl CandidateRoot {
    /// Create a candidate root
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, source: RootSource) -> Self {
        Self { path: path.into(), source }
    }

    /// Path of the candidate
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Origin of the candidate
    #[must_use]
    pub const fn source(&self) -> RootSource {
        self.source
    }
}

/// What a discovered path is relative to its root
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    /// The candidate root itself
    Root,
    /// One of the fixed marker subdirectories
    Marker(&'static str),
    /// An immediate child of the module directory
    ModuleChild,
}

impl fmt::Display for PathKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => f.write_str("root"),
            Self::Marker(name) => write!(f, "marker:{name}"),
            Self::ModuleChild => f.write_str("module"),
        }
    }
}

/// An existing directory confirmed to hold importable modules
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredPath {
    /// Normalized absolute path
    pub path: PathBuf,
    /// Role of the directory
    pub kind: PathKind,
}

impl AsRef<Path> for DiscoveredPath {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

/// Ordered, duplicate-free list of discovered paths
///
/// Earlier entries take precedence over later ones when the same module name
/// exists in several directories.
#[derive(Debug, Default, Clone)]
pub struct SearchResult {
    /// Discovered paths in priority order
    paths: Vec<DiscoveredPath>,
}

impl SearchResult {
    /// Create an empty result
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of discovered paths
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether nothing was discovered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Discovered paths in priority order
    #[must_use]
    pub fn as_slice(&self) -> &[DiscoveredPath] {
        &self.paths
    }

    /// Iterate over discovered paths in priority order
    pub fn iter(&self) -> std::slice::Iter<'_, DiscoveredPath> {
        self.paths.iter()
    }

    /// Iterate over the bare paths in priority order
    pub fn paths(&self) -> impl Iterator<Item = &Path> + '_ {
        self.paths.iter().map(|d| d.path.as_path())
    }

    /// Append a path
    pub(crate) fn push(&mut self, path: DiscoveredPath) {
        self.paths.push(path);
    }
}

impl<'a> IntoIterator for &'a SearchResult {
    type IntoIter = std::slice::Iter<'a, DiscoveredPath>;
    type Item = &'a DiscoveredPath;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_platform_is_supported() {
        assert!(Platform::ALL.contains(&Platform::current()));
    }

    #[test]
    fn test_platform_display() {
        assert_eq!(Platform::Linux.to_string(), "linux");
        assert_eq!(Platform::Macos.to_string(), "macos");
        assert_eq!(Platform::Windows.to_string(), "windows");
    }

    #[test]
    fn test_search_result_preserves_order() {
        let mut result = SearchResult::new();
        assert!(result.is_empty());

        for name in ["a", "b", "c"] {
            result.push(DiscoveredPath { path: PathBuf::from(name), kind: PathKind::Root });
        }

        let names: Vec<_> = result.paths().map(|p| p.to_string_lossy().into_owned()).collect();
        assert_eq!(names, ["a", "b", "c"]);
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_path_kind_display() {
        assert_eq!(PathKind::Root.to_string(), "root");
        assert_eq!(PathKind::Marker("Mod").to_string(), "marker:Mod");
        assert_eq!(PathKind::ModuleChild.to_string(), "module");
    }
}
