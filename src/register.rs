//! Registration of discovered paths into an import search list

use std::collections::HashSet;
use std::path::PathBuf;

use crate::normalize;
use crate::types::SearchResult;

/// Keys of the entries already on the list
fn existing_keys(target: &[PathBuf]) -> HashSet<PathBuf> {
    target.iter().map(|p| normalize::key(p)).collect()
}

/// New entries from `result`, in result order
fn missing(result: &SearchResult, target: &[PathBuf]) -> Vec<PathBuf> {
    let mut seen = existing_keys(target);
    result
        .paths()
        .filter(|path| seen.insert(normalize::key(path)))
        .map(PathBuf::from)
        .collect()
}

/// Append discovered paths that are not yet on `target`
///
/// Existing entries are left where they are. Calling this again with the same
/// result adds nothing. Returns the number of entries added.
pub fn register(result: &SearchResult, target: &mut Vec<PathBuf>) -> usize {
    let added = missing(result, target);
    let count = added.len();
    target.extend(added);
    count
}

/// Insert discovered paths that are not yet on `target` at its front
///
/// The new entries keep their result order as one block ahead of every
/// existing entry. Returns the number of entries added.
pub fn register_front(result: &SearchResult, target: &mut Vec<PathBuf>) -> usize {
    let added = missing(result, target);
    let count = added.len();
    target.splice(0..0, added);
    count
}
