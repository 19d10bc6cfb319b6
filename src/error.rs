//! Error types for the folio library
//!
//! Every fallible operation in the crate returns [`FolioError`]. The variants
//! map onto the ways a content build can fail: a missing slug, a metadata block
//! that is not a YAML mapping, a render stage that gave up, or the filesystem.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// The main error type for all library operations
#[derive(Error, Debug)]
pub enum FolioError {
    /// The requested slug has no backing file
    #[error("Not found: '{slug}' ({})", path.display())]
    NotFound { slug: String, path: PathBuf },

    /// A metadata block is present but is not a YAML mapping
    #[error("Malformed metadata in {}: {reason}", path.display())]
    MalformedMetadata { path: PathBuf, reason: String },

    /// A render stage failed
    #[error("Render failure in stage '{stage}': {reason}")]
    RenderFailure { stage: &'static str, reason: String },

    /// Directory or file inaccessible
    #[error("Filesystem error at {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Two files in one collection resolve to the same slug
    #[error("Duplicate slug '{slug}': {} and {}", first.display(), second.display())]
    DuplicateSlug {
        slug: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// YAML serialization errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Invalid configuration
    #[error("Configuration error: {reason}")]
    Config { reason: String },
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, FolioError>;

/// Placeholder path used when parsing content that did not come from a file
pub(crate) const IN_MEMORY: &str = "<memory>";

impl FolioError {
    /// Create a new not found error
    pub fn not_found(slug: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::NotFound {
            slug: slug.into(),
            path: path.into(),
        }
    }

    /// Create a new malformed metadata error
    pub fn malformed_metadata(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::MalformedMetadata {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a new render failure
    pub fn render_failure(stage: &'static str, reason: impl Into<String>) -> Self {
        Self::RenderFailure {
            stage,
            reason: reason.into(),
        }
    }

    /// Wrap an I/O error with the path it happened at
    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }

    /// Create a new duplicate slug error
    pub fn duplicate_slug(
        slug: impl Into<String>,
        first: impl Into<PathBuf>,
        second: impl Into<PathBuf>,
    ) -> Self {
        Self::DuplicateSlug {
            slug: slug.into(),
            first: first.into(),
            second: second.into(),
        }
    }

    /// Create a new configuration error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// Attach a file path to a metadata error raised while parsing in memory
    pub fn at_path(self, path: &Path) -> Self {
        match self {
            Self::MalformedMetadata { reason, .. } => Self::MalformedMetadata {
                path: path.to_path_buf(),
                reason,
            },
            other => other,
        }
    }

    /// Whether the caller should translate this error into a not-found page
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = FolioError::not_found("hello", "content/blog/hello.mdx");
        assert!(err.is_not_found());
        assert_eq!(
            err.to_string(),
            "Not found: 'hello' (content/blog/hello.mdx)"
        );
    }

    #[test]
    fn test_at_path_rewrites_metadata_errors_only() {
        let err = FolioError::malformed_metadata(IN_MEMORY, "unterminated block")
            .at_path(Path::new("post.mdx"));
        match err {
            FolioError::MalformedMetadata { path, reason } => {
                assert_eq!(path, PathBuf::from("post.mdx"));
                assert_eq!(reason, "unterminated block");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = FolioError::render_failure("highlight", "boom").at_path(Path::new("x"));
        assert!(matches!(err, FolioError::RenderFailure { stage: "highlight", .. }));
    }

    #[test]
    fn test_filesystem_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = FolioError::filesystem("content", io);
        assert!(!err.is_not_found());
        assert!(std::error::Error::source(&err).is_some());
    }
}
