//! Error types for `freecad-finder`

use std::path::Path;

use arrayvec::ArrayString;
use thiserror::Error;

/// Maximum length of error messages
pub const MAX_ERROR_LENGTH: usize = 256;

/// Custom result type for `freecad-finder` operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for `freecad-finder`
///
/// Candidates that do not exist are never errors; they are skipped. Only
/// caller mistakes and output failures are reported.
#[derive(Debug, Error)]
pub enum Error {
    /// A caller-supplied override root is unusable
    #[error("Error: Invalid override root: {0}")]
    InvalidOverride(Box<ArrayString<MAX_ERROR_LENGTH>>),

    /// IO operation failed
    #[error("Error: {0}")]
    Io(#[from] std::io::Error),

    /// Core library pattern failed to compile
    #[error("Error: {0}")]
    Pattern(Box<ArrayString<MAX_ERROR_LENGTH>>),

    /// Search list could not be joined into a single variable
    #[error("Error: {0}")]
    JoinPaths(#[from] std::env::JoinPathsError),
}

impl Error {
    /// Create an invalid override error naming the offending path
    pub fn invalid_override(path: &Path, reason: &str) -> Self {
        let mut buf = ArrayString::new();
        // Parts that do not fit are dropped
        let _ = buf.try_push_str(reason);
        let _ = buf.try_push_str(" (");
        let _ = buf.try_push_str(&path.to_string_lossy());
        let _ = buf.try_push_str(")");
        Self::InvalidOverride(Box::new(buf))
    }

    /// Create a pattern error
    pub fn pattern(msg: &str) -> Self {
        let mut buf = ArrayString::new();
        let _ = buf.try_push_str(msg);
        Self::Pattern(Box::new(buf))
    }

    /// Get a user-friendly error message with action items
    #[must_use]
    pub fn user_message(&self) -> ArrayString<MAX_ERROR_LENGTH> {
        let mut msg = ArrayString::new();
        match self {
            Self::InvalidOverride(reason) => {
                let _ = msg.try_push_str("Error: Invalid root: ");
                let _ = msg.try_push_str(reason);
                let _ = msg.try_push_str("\nTip: Pass an existing directory to --root");
            },
            Self::Io(e) => {
                let _ = msg.try_push_str(&format!(
                    "Error: {e}\nTip: Check that standard output is writable"
                ));
            },
            Self::Pattern(pattern_msg) => {
                let _ = msg.try_push_str("Error: ");
                let _ = msg.try_push_str(pattern_msg);
            },
            Self::JoinPaths(e) => {
                let _ = msg.try_push_str(&format!(
                    "Error: {e}\nTip: Remove the path separator from installation paths"
                ));
            },
        }
        msg
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_invalid_override_names_path() {
        let err = Error::invalid_override(&PathBuf::from("/opt/x"), "empty");
        let text = err.to_string();
        assert!(text.contains("empty"));
        assert!(text.contains("/opt/x"));
    }

    #[test]
    fn test_invalid_override_truncates_long_paths() {
        let long = PathBuf::from("a".repeat(MAX_ERROR_LENGTH * 2));
        let err = Error::invalid_override(&long, "too long");
        match err {
            Error::InvalidOverride(buf) => assert!(buf.len() <= MAX_ERROR_LENGTH),
            other => panic!("Expected InvalidOverride, got {other:?}"),
        }
    }

    #[test]
    fn test_user_message_has_tip() {
        let errors = [
            Error::invalid_override(&PathBuf::new(), "path is empty"),
            Error::Io(std::io::Error::from(std::io::ErrorKind::BrokenPipe)),
        ];
        for err in errors {
            assert!(err.user_message().contains("Tip:"), "{err:?}");
        }
    }
}
