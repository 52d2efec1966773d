//! Path normalization for duplicate detection

use std::path::{Component, Path, PathBuf};

/// Resolve an existing directory to its canonical absolute form
///
/// Symbolic links are followed, so two spellings of one directory give the
/// same result. Returns `None` when the path is missing or not a directory.
#[must_use]
pub fn canonical_dir(path: &Path) -> Option<PathBuf> {
    let resolved = canonicalize(path)?;
    resolved.is_dir().then_some(resolved)
}

#[cfg(windows)]
fn canonicalize(path: &Path) -> Option<PathBuf> {
    // dunce avoids `\\?\` prefixes that Python cannot import from
    dunce::canonicalize(path).ok()
}

#[cfg(not(windows))]
fn canonicalize(path: &Path) -> Option<PathBuf> {
    std::fs::canonicalize(path).ok()
}

/// Collapse `.` and `..` components without touching the filesystem
///
/// `..` at the start of a relative path is kept, and `..` past the root of an
/// absolute path is dropped.
#[must_use]
pub fn lexical(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {},
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                },
                Some(Component::RootDir | Component::Prefix(_)) => {},
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    out.iter().collect()
}

/// Key under which two paths compare equal
///
/// Existing paths are keyed by their canonical form; anything else by its
/// lexical form. Windows keys ignore case and separator style. Keys keep the
/// raw path bytes, so names that are not valid UTF-8 stay distinct.
#[must_use]
pub fn key(path: &Path) -> PathBuf {
    let normalized = canonicalize(path).unwrap_or_else(|| lexical(path));
    platform_key(normalized)
}

#[cfg(windows)]
fn platform_key(path: PathBuf) -> PathBuf {
    // Unpaired surrogates cannot be case-folded; compare those as spelled
    match path.to_str() {
        Some(text) => PathBuf::from(text.to_lowercase().replace('/', "\\")),
        None => path,
    }
}

#[cfg(not(windows))]
const fn platform_key(path: PathBuf) -> PathBuf {
    path
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_canonical_dir_missing() {
        let temp_dir = TempDir::new().unwrap();
        assert_eq!(canonical_dir(&temp_dir.path().join("missing")), None);
    }

    #[test]
    fn test_canonical_dir_rejects_files() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("FreeCAD.so");
        fs::File::create(&file).unwrap();
        assert_eq!(canonical_dir(&file), None);
    }

    #[test]
    fn test_canonical_dir_collapses_dots() {
        let temp_dir = TempDir::new().unwrap();
        let build = temp_dir.path().join("build");
        fs::create_dir(&build).unwrap();
        fs::create_dir(build.join("Mod")).unwrap();

        let dotted = build.join("Mod").join("..").join(".");
        assert_eq!(canonical_dir(&dotted), canonical_dir(&build));
        assert!(canonical_dir(&build).unwrap().is_absolute());
    }

    #[cfg(unix)]
    #[test]
    fn test_canonical_dir_follows_symlinks() {
        let temp_dir = TempDir::new().unwrap();
        let build = temp_dir.path().join("build");
        fs::create_dir(&build).unwrap();
        let link = temp_dir.path().join("link");
        std::os::unix::fs::symlink(&build, &link).unwrap();

        assert_eq!(canonical_dir(&link), canonical_dir(&build));
    }

    #[test]
    fn test_lexical() {
        assert_eq!(lexical(Path::new("/opt/./a/../b")), PathBuf::from("/opt/b"));
        assert_eq!(lexical(Path::new("/../opt")), PathBuf::from("/opt"));
        assert_eq!(lexical(Path::new("../a/./b/..")), PathBuf::from("../a"));
        assert_eq!(lexical(Path::new("a/../..")), PathBuf::from(".."));
    }

    #[cfg(not(windows))]
    #[test]
    fn test_key_of_missing_path_is_lexical() {
        let missing = Path::new("/no/such/./dir/../freecad");
        assert_eq!(key(missing), PathBuf::from("/no/such/freecad"));
    }

    #[test]
    fn test_key_matches_for_equivalent_spellings() {
        let temp_dir = TempDir::new().unwrap();
        let lib = temp_dir.path().join("lib");
        fs::create_dir(&lib).unwrap();

        assert_eq!(key(&lib), key(&lib.join(".")));
        assert_eq!(key(&lib), key(&temp_dir.path().join("lib").join("..").join("lib")));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_key_keeps_non_utf8_names_apart() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp_dir = TempDir::new().unwrap();
        let first = temp_dir.path().join(OsStr::from_bytes(b"fc\xFE"));
        let second = temp_dir.path().join(OsStr::from_bytes(b"fc\xFF"));
        fs::create_dir(&first).unwrap();
        fs::create_dir(&second).unwrap();

        assert_ne!(key(&first), key(&second));
        assert_ne!(
            key(Path::new(OsStr::from_bytes(b"/no/such/fc\xFE"))),
            key(Path::new(OsStr::from_bytes(b"/no/such/fc\xFF")))
        );
    }
}
