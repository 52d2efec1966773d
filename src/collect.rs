//! Candidate validation and result collection

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use arrayvec::ArrayVec;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

use crate::error::{Error, Result};
use crate::normalize;
use crate::platform::{MARKER_SUBDIRS, marker_subdirs};
use crate::types::{
    CandidateRoot, DiscoveredPath, MODULE_DIR, PathKind, Platform, RootSource, SearchResult,
};

/// File name patterns of the FreeCAD core library
pub const CORE_LIBRARY_PATTERNS: &[&str] =
    &["FreeCAD.{so,pyd,dylib}", "FreeCAD.*.{so,pyd}", "FreeCAD_d.pyd"];

/// Where discovered paths go relative to existing search list entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Placement {
    /// After every existing entry
    #[default]
    Append,
    /// Before every existing entry, as one block
    Prepend,
}

/// Knobs for a single search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// Also collect each child directory of a discovered `Mod`
    pub module_children:      bool,
    /// Keep a root only if it or a marker directory holds the core library
    pub require_core_library: bool,
    /// Where `register` puts new entries
    pub placement:            Placement,
}

/// Matcher for the core library file names
#[derive(Debug)]
struct CoreLibrary {
    /// Compiled patterns
    set: GlobSet,
}

impl CoreLibrary {
    /// Compile the core library patterns for a platform
    ///
    /// # Errors
    /// Returns error if a pattern is invalid
    fn new(platform: Platform) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in CORE_LIBRARY_PATTERNS {
            let glob = GlobBuilder::new(pattern)
                .case_insensitive(platform == Platform::Windows)
                .literal_separator(true)
                .build()
                .map_err(|e| Error::pattern(&format!("Invalid core library pattern: {e}")))?;
            builder.add(glob);
        }
        let set = builder
            .build()
            .map_err(|e| Error::pattern(&format!("Invalid core library pattern: {e}")))?;
        Ok(Self { set })
    }

    /// Whether `dir` directly contains the core library
    ///
    /// Unreadable directories count as not containing it.
    fn is_in(&self, dir: &Path) -> bool {
        let Ok(entries) = fs::read_dir(dir) else {
            return false;
        };
        entries
            .filter_map(std::result::Result::ok)
            .filter(|entry| entry.file_type().is_ok_and(|t| !t.is_dir()))
            .any(|entry| self.set.is_match(entry.file_name()))
    }
}

/// Collector that keeps the result free of duplicate directories
#[derive(Debug)]
struct Collector {
    /// Result under construction
    result: SearchResult,
    /// Keys of paths already in `result`
    seen:   HashSet<PathBuf>,
}

impl Collector {
    fn new() -> Self {
        Self { result: SearchResult::new(), seen: HashSet::new() }
    }

    /// Add a path unless an equivalent one is already present
    fn push_unique(&mut self, discovered: DiscoveredPath) {
        if self.seen.insert(normalize::key(&discovered.path)) {
            self.result.push(discovered);
        }
    }
}

/// Room for a root and every marker beneath it
const GROUP_CAPACITY: usize = MARKER_SUBDIRS.len() + 1;

/// A root and the directories found beneath it
type Group = ArrayVec<DiscoveredPath, GROUP_CAPACITY>;

/// Probe one root, returning it and its marker subdirectories
fn probe_root(platform: Platform, root: PathBuf) -> Group {
    let markers: Group = marker_subdirs(platform)
        .filter_map(|name| {
            normalize::canonical_dir(&root.join(name))
                .map(|path| DiscoveredPath { path, kind: PathKind::Marker(name) })
        })
        .collect();

    let mut group = Group::new();
    group.push(DiscoveredPath { path: root, kind: PathKind::Root });
    group.extend(markers);
    group
}

/// Immediate child directories of a module directory, sorted by name
fn module_children(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut children: Vec<_> = entries
        .filter_map(std::result::Result::ok)
        .filter(|entry| {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            !name.starts_with('.') && name != "__pycache__"
        })
        .filter_map(|entry| normalize::canonical_dir(&entry.path()))
        .collect();
    children.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    children
}

/// Keep existing candidates and the marker directories beneath them
///
/// Candidates are visited in order. Missing candidates are skipped, and so are
/// platform defaults that are not absolute on this host (another platform's
/// locations, such as `C:\Program Files` on unix). Every kept path is
/// canonical, and a directory reached through several spellings appears once,
/// at its first position. An empty result is not an error.
///
/// # Errors
/// Returns error if the core library patterns fail to compile.
pub fn validate_and_collect<I>(
    platform: Platform,
    candidates: I,
    options: &SearchOptions,
) -> Result<SearchResult>
where
    I: IntoIterator<Item = CandidateRoot>,
{
    let library = if options.require_core_library {
        Some(CoreLibrary::new(platform)?)
    } else {
        None
    };
    let mut collector = Collector::new();

    for candidate in candidates {
        if candidate.source() == RootSource::PlatformDefault && !candidate.path().is_absolute() {
            continue;
        }
        let Some(root) = normalize::canonical_dir(candidate.path()) else {
            continue;
        };
        let group = probe_root(platform, root);

        if library.as_ref().is_some_and(|lib| !group.iter().any(|d| lib.is_in(&d.path))) {
            continue;
        }

        for discovered in group {
            let children = if options.module_children
                && discovered.kind == PathKind::Marker(MODULE_DIR)
            {
                module_children(&discovered.path)
            } else {
                Vec::new()
            };

            collector.push_unique(discovered);
            for path in children {
                collector.push_unique(DiscoveredPath { path, kind: PathKind::ModuleChild });
            }
        }
    }

    Ok(collector.result)
}
