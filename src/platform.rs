//! Platform install conventions and host values
//!
//! The tables here are data, not contract: FreeCAD moves its install layout
//! between releases, so new locations belong at the end of the relevant list.

use std::env;
use std::path::{Path, PathBuf};

use crate::types::{MODULE_DIR, Platform};

/// Environment variable naming a FreeCAD library root
pub const LIB_ROOT_VAR: &str = "FREECAD_LIB_ROOT";

/// Environment variable naming the FreeCAD executable
pub const EXECUTABLE_VAR: &str = "FREECAD_EXECUTABLE";

/// Base a default location is resolved against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Absolute location on the system
    System,
    /// Location relative to the user's home directory
    Home,
}

/// A conventional install location
#[derive(Debug, Clone, Copy)]
pub struct DefaultRoot {
    /// What the segments are joined onto
    pub anchor:   Anchor,
    /// Path segments, the first of which is absolute for `Anchor::System`
    pub segments: &'static [&'static str],
}

impl DefaultRoot {
    const fn system(segments: &'static [&'static str]) -> Self {
        Self { anchor: Anchor::System, segments }
    }

    const fn home(segments: &'static [&'static str]) -> Self {
        Self { anchor: Anchor::Home, segments }
    }

    /// Resolve to a path, or `None` for home-relative roots without a home
    #[must_use]
    pub fn resolve(&self, home: Option<&Path>) -> Option<PathBuf> {
        let mut path = match self.anchor {
            Anchor::System => PathBuf::new(),
            Anchor::Home => home?.to_path_buf(),
        };
        path.extend(self.segments);
        Some(path)
    }
}

const LINUX_ROOTS: &[DefaultRoot] = &[
    DefaultRoot::system(&["/usr/lib/freecad-python3"]),
    DefaultRoot::system(&["/usr/lib/freecad"]),
    DefaultRoot::system(&["/usr/local/lib/freecad"]),
    DefaultRoot::system(&["/usr/share/freecad"]),
    DefaultRoot::system(&["/opt/freecad"]),
    DefaultRoot::system(&["/snap/freecad/current/usr/lib/freecad"]),
    DefaultRoot::home(&["src", "FreeCAD", "build"]),
    DefaultRoot::home(&["FreeCAD", "build"]),
];

const MACOS_ROOTS: &[DefaultRoot] = &[
    DefaultRoot::system(&["/Applications/FreeCAD.app/Contents/Resources"]),
    DefaultRoot::home(&["Applications", "FreeCAD.app", "Contents", "Resources"]),
    DefaultRoot::system(&["/opt/homebrew/lib/freecad"]),
    DefaultRoot::system(&["/usr/local/lib/freecad"]),
    DefaultRoot::home(&["src", "FreeCAD", "build"]),
    DefaultRoot::home(&["FreeCAD", "build"]),
];

const WINDOWS_ROOTS: &[DefaultRoot] = &[
    DefaultRoot::system(&["C:\\Program Files\\FreeCAD 1.0"]),
    DefaultRoot::system(&["C:\\Program Files\\FreeCAD 0.21"]),
    DefaultRoot::system(&["C:\\Program Files\\FreeCAD 0.20"]),
    DefaultRoot::system(&["C:\\Program Files\\FreeCAD"]),
    DefaultRoot::home(&["AppData", "Local", "Programs", "FreeCAD 1.0"]),
    DefaultRoot::home(&["AppData", "Local", "Programs", "FreeCAD 0.21"]),
    DefaultRoot::home(&["src", "FreeCAD", "build"]),
];

/// Conventional install locations for a platform, highest priority first
#[must_use]
pub const fn default_roots(platform: Platform) -> &'static [DefaultRoot] {
    match platform {
        Platform::Linux => LINUX_ROOTS,
        Platform::Macos => MACOS_ROOTS,
        Platform::Windows => WINDOWS_ROOTS,
    }
}

/// A subdirectory whose presence marks a build or install tree
#[derive(Debug, Clone, Copy)]
pub struct MarkerSubdir {
    /// Directory name directly beneath the root
    pub name:      &'static str,
    /// Platforms the marker applies to
    pub platforms: &'static [Platform],
}

/// Marker subdirectories in the order FreeCAD puts them on its own search list
pub const MARKER_SUBDIRS: &[MarkerSubdir] = &[
    MarkerSubdir { name: MODULE_DIR, platforms: &Platform::ALL },
    MarkerSubdir { name: "lib", platforms: &Platform::ALL },
    MarkerSubdir { name: "Ext", platforms: &Platform::ALL },
    MarkerSubdir { name: "bin", platforms: &[Platform::Windows] },
];

/// Marker subdirectory names that apply to a platform, in probe order
pub fn marker_subdirs(platform: Platform) -> impl Iterator<Item = &'static str> {
    MARKER_SUBDIRS.iter().filter(move |m| m.platforms.contains(&platform)).map(|m| m.name)
}

/// Host values sampled once and passed into the search
///
/// Nothing in the search reads process state; construct this explicitly in
/// tests or with [`HostEnv::detect`] at the program edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEnv {
    /// Operating system family
    pub platform:   Platform,
    /// User home directory
    pub home:       Option<PathBuf>,
    /// Value of `FREECAD_LIB_ROOT`
    pub lib_root:   Option<PathBuf>,
    /// Value of `FREECAD_EXECUTABLE`
    pub executable: Option<PathBuf>,
}

impl HostEnv {
    /// Host values with nothing but a platform
    #[must_use]
    pub const fn bare(platform: Platform) -> Self {
        Self { platform, home: None, lib_root: None, executable: None }
    }

    /// Sample the running process
    #[must_use]
    pub fn detect() -> Self {
        Self {
            platform:   Platform::current(),
            home:       dirs::home_dir(),
            lib_root:   non_empty_var(LIB_ROOT_VAR),
            executable: non_empty_var(EXECUTABLE_VAR),
        }
    }
}

fn non_empty_var(key: &str) -> Option<PathBuf> {
    env::var_os(key).filter(|v| !v.is_empty()).map(PathBuf::from)
}

/// Installation root implied by an executable path
///
/// `<root>/bin/FreeCAD` maps to `<root>`; an executable outside a `bin`
/// directory maps to its own directory. A leading `~` is expanded against
/// `home`. Returns `None` for a bare command name with no directory.
#[must_use]
pub fn executable_root(executable: &Path, home: Option<&Path>) -> Option<PathBuf> {
    let expanded = expand_home(executable, home);
    let dir = expanded.parent().filter(|p| !p.as_os_str().is_empty())?;
    let is_bin = dir
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.eq_ignore_ascii_case("bin"));
    if is_bin {
        dir.parent().filter(|p| !p.as_os_str().is_empty()).map(Path::to_path_buf)
    } else {
        Some(dir.to_path_buf())
    }
}

fn expand_home(path: &Path, home: Option<&Path>) -> PathBuf {
    match (path.strip_prefix("~"), home) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_platform_has_defaults() {
        for platform in Platform::ALL {
            assert!(!default_roots(platform).is_empty(), "{platform}");
        }
    }

    #[test]
    fn test_home_roots_need_home() {
        let root = DefaultRoot::home(&["src", "FreeCAD", "build"]);
        assert_eq!(root.resolve(None), None);
        assert_eq!(
            root.resolve(Some(Path::new("/home/u"))),
            Some(PathBuf::from("/home/u/src/FreeCAD/build"))
        );
    }

    #[test]
    fn test_system_roots_ignore_home() {
        let root = DefaultRoot::system(&["/usr/lib/freecad"]);
        assert_eq!(root.resolve(None), Some(PathBuf::from("/usr/lib/freecad")));
        assert_eq!(
            root.resolve(Some(Path::new("/home/u"))),
            Some(PathBuf::from("/usr/lib/freecad"))
        );
    }

    #[test]
    fn test_marker_order() {
        let linux: Vec<_> = marker_subdirs(Platform::Linux).collect();
        assert_eq!(linux, ["Mod", "lib", "Ext"]);

        let windows: Vec<_> = marker_subdirs(Platform::Windows).collect();
        assert_eq!(windows, ["Mod", "lib", "Ext", "bin"]);
    }

    #[test]
    fn test_executable_root_strips_bin() {
        assert_eq!(
            executable_root(Path::new("/home/u/src/FreeCAD/build/bin/FreeCAD"), None),
            Some(PathBuf::from("/home/u/src/FreeCAD/build"))
        );
    }

    #[test]
    fn test_executable_root_outside_bin() {
        assert_eq!(
            executable_root(Path::new("/opt/freecad/FreeCAD"), None),
            Some(PathBuf::from("/opt/freecad"))
        );
    }

    #[test]
    fn test_executable_root_expands_home() {
        assert_eq!(
            executable_root(Path::new("~/FreeCAD/bin/FreeCAD"), Some(Path::new("/home/u"))),
            Some(PathBuf::from("/home/u/FreeCAD"))
        );
    }

    #[test]
    fn test_executable_root_bare_command() {
        assert_eq!(executable_root(Path::new("FreeCAD"), None), None);
    }

    #[test]
    fn test_bare_env_is_empty() {
        let env = HostEnv::bare(Platform::Linux);
        assert!(env.home.is_none());
        assert!(env.lib_root.is_none());
        assert!(env.executable.is_none());
    }
}
