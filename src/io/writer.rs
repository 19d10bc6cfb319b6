//! Document writing with atomic replacement and dry-run previews
//!
//! Documents are serialized with [`frontmatter::serialize`], compared with what
//! is on disk, and only written when the text changed. Writes go through a
//! temporary file in the same directory that is renamed over the target.

use crate::core::Document;
use crate::error::{FolioError, Result};
use crate::io::frontmatter;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Configuration for the document writer
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// Use atomic writes (write to temp file first, then rename)
    pub atomic_writes: bool,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            atomic_writes: true,
        }
    }
}

/// Write operation options for individual operations
#[derive(Debug, Clone, Copy, Default)]
pub struct WriteOptions {
    /// Compute the result and diff without touching the file
    pub dry_run: bool,
}

/// Result of a write operation
#[derive(Debug)]
pub struct WriteResult {
    /// Whether the file content differs (or would differ, for a dry run)
    pub modified: bool,
    pub path: PathBuf,
    /// Line diff between the old and new content, when they differ
    pub diff: Option<String>,
}

/// Serializes documents back to disk
#[derive(Debug, Clone, Default)]
pub struct DocumentWriter {
    config: WriterConfig,
}

impl DocumentWriter {
    /// Create a new writer with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new writer with custom configuration
    pub fn with_config(config: WriterConfig) -> Self {
        Self { config }
    }

    /// Write a document to `path`
    pub fn write_file(
        &self,
        document: &Document,
        path: &Path,
        options: WriteOptions,
    ) -> Result<WriteResult> {
        let new_content = frontmatter::serialize(document.metadata(), document.body())?;

        let original_content = match fs::read_to_string(path) {
            Ok(content) => Some(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(FolioError::filesystem(path, e)),
        };

        let modified = original_content.as_deref() != Some(new_content.as_str());
        let diff = if modified {
            generate_diff(original_content.as_deref().unwrap_or(""), &new_content, path)
        } else {
            None
        };

        let result = WriteResult {
            modified,
            path: path.to_path_buf(),
            diff,
        };

        if options.dry_run || !modified {
            return Ok(result);
        }

        if self.config.atomic_writes {
            self.write_atomic(path, &new_content)?;
        } else {
            fs::write(path, &new_content).map_err(|e| FolioError::filesystem(path, e))?;
        }
        log::debug!("Wrote {}", path.display());

        Ok(result)
    }

    /// Write file atomically using temporary file
    fn write_atomic(&self, path: &Path, content: &str) -> Result<()> {
        let parent_dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut temp_file =
            NamedTempFile::new_in(parent_dir).map_err(|e| FolioError::filesystem(parent_dir, e))?;
        temp_file
            .write_all(content.as_bytes())
            .and_then(|_| temp_file.flush())
            .map_err(|e| FolioError::filesystem(temp_file.path(), e))?;

        temp_file
            .persist(path)
            .map_err(|e| FolioError::filesystem(path, e.error))?;
        Ok(())
    }

    /// Get writer configuration
    pub fn config(&self) -> &WriterConfig {
        &self.config
    }
}

/// Single-hunk line diff: common prefix and suffix are trimmed away
fn generate_diff(old_content: &str, new_content: &str, path: &Path) -> Option<String> {
    if old_content == new_content {
        return None;
    }

    let old_lines: Vec<&str> = old_content.lines().collect();
    let new_lines: Vec<&str> = new_content.lines().collect();

    let common_prefix = old_lines
        .iter()
        .zip(new_lines.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let old_rest = &old_lines[common_prefix..];
    let new_rest = &new_lines[common_prefix..];

    let common_suffix = old_rest
        .iter()
        .rev()
        .zip(new_rest.iter().rev())
        .take_while(|(a, b)| a == b)
        .count();

    let old_middle = &old_rest[..old_rest.len() - common_suffix];
    let new_middle = &new_rest[..new_rest.len() - common_suffix];

    if old_middle.is_empty() && new_middle.is_empty() {
        // Only trailing newlines differ
        return None;
    }

    let mut diff_lines = vec![
        format!("--- {}", path.display()),
        format!("+++ {}", path.display()),
        format!(
            "@@ -{},{} +{},{} @@",
            common_prefix + 1,
            old_middle.len(),
            common_prefix + 1,
            new_middle.len()
        ),
    ];
    diff_lines.extend(old_middle.iter().map(|line| format!("-{line}")));
    diff_lines.extend(new_middle.iter().map(|line| format!("+{line}")));

    Some(diff_lines.join("\n"))
}
