//! Document reading
//!
//! Reads content files from disk and parses their frontmatter. Nothing is
//! cached: every call goes back to the filesystem, so edits show up on the
//! next read.

use crate::core::{slug_from_path, Document, Metadata};
use crate::error::{FolioError, Result};
use crate::io::frontmatter;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Configuration for the document reader
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Maximum file size to read (in bytes)
    pub max_file_size: Option<u64>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            max_file_size: Some(10 * 1024 * 1024), // 10MB default limit
        }
    }
}

/// Reads documents and directory listings
#[derive(Debug, Clone, Default)]
pub struct DocumentReader {
    config: ReaderConfig,
}

impl DocumentReader {
    /// Create a new reader with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new reader with custom configuration
    pub fn with_config(config: ReaderConfig) -> Self {
        Self { config }
    }

    /// Read and parse a document; its slug is the file stem
    pub fn read_file(&self, path: &Path) -> Result<Document> {
        let content = self.read_to_string(path)?;
        let (metadata, body) = frontmatter::parse(&content).map_err(|e| e.at_path(path))?;
        let slug = slug_of(path)?;

        log::debug!("Read {} ({} metadata keys)", path.display(), metadata.len());
        Ok(Document::new(slug, metadata, body).with_path(path))
    }

    /// Read only the metadata of a file
    pub fn read_metadata(&self, path: &Path) -> Result<Metadata> {
        let content = self.read_to_string(path)?;
        frontmatter::parse_metadata(&content).map_err(|e| e.at_path(path))
    }

    /// Files directly inside `dir` with the given extension, sorted by file name
    ///
    /// The directory is not walked recursively. Symlinks to files count as
    /// files; dangling links are skipped.
    pub fn list_files(&self, dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        let walker = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry.map_err(|e| walk_error(dir, e))?;
            let is_file = entry.file_type().is_file()
                || (entry.path_is_symlink() && entry.path().is_file());
            if is_file && has_extension(entry.path(), extension) {
                files.push(entry.into_path());
            }
        }

        log::debug!(
            "Found {} '.{}' files in {}",
            files.len(),
            extension,
            dir.display()
        );
        Ok(files)
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        if let Some(max_size) = self.config.max_file_size {
            let metadata = fs::metadata(path).map_err(|e| io_error(path, e))?;
            if metadata.len() > max_size {
                return Err(FolioError::filesystem(
                    path,
                    std::io::Error::other(format!(
                        "file too large: {} bytes (limit: {} bytes)",
                        metadata.len(),
                        max_size
                    )),
                ));
            }
        }

        fs::read_to_string(path).map_err(|e| io_error(path, e))
    }

    /// Get reader configuration
    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }
}

/// Exact extension match: `post.mdx.WIP` is not an `mdx` file
pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().is_some_and(|ext| ext == extension)
}

fn slug_of(path: &Path) -> Result<String> {
    slug_from_path(path).ok_or_else(|| {
        FolioError::filesystem(
            path,
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "file name is not valid UTF-8",
            ),
        )
    })
}

fn io_error(path: &Path, error: std::io::Error) -> FolioError {
    match error.kind() {
        std::io::ErrorKind::NotFound => {
            FolioError::not_found(slug_from_path(path).unwrap_or_default(), path)
        }
        _ => FolioError::filesystem(path, error),
    }
}

fn walk_error(dir: &Path, error: walkdir::Error) -> FolioError {
    let path = error.path().unwrap_or(dir).to_path_buf();
    let io = error
        .into_io_error()
        .unwrap_or_else(|| std::io::Error::other("filesystem loop detected"));
    FolioError::filesystem(path, io)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_read_file_with_metadata() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "hello-world.mdx", "---\ntitle: Hello\n---\n# Hi\n");

        let doc = DocumentReader::new().read_file(&path).unwrap();
        assert_eq!(doc.slug(), "hello-world");
        assert_eq!(doc.metadata().title(), Some("Hello"));
        assert_eq!(doc.body(), "# Hi\n");
        assert_eq!(doc.path(), Some(path.as_path()));
    }

    #[cfg(unix)]
    #[test]
    fn test_list_files_follows_file_symlinks() {
        let shared = TempDir::new().unwrap();
        let target = write(&shared, "shared.mdx", "---\ntitle: Shared\n---\n");

        let dir = TempDir::new().unwrap();
        write(&dir, "a.mdx", "");
        std::os::unix::fs::symlink(&target, dir.path().join("b.mdx")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone.mdx"), dir.path().join("c.mdx")).unwrap();
        std::os::unix::fs::symlink(shared.path(), dir.path().join("d.mdx")).unwrap();

        let files = DocumentReader::new().list_files(dir.path(), "mdx").unwrap();
        assert_eq!(files, vec![dir.path().join("a.mdx"), dir.path().join("b.mdx")]);

        let doc = DocumentReader::new().read_file(&files[1]).unwrap();
        assert_eq!(doc.slug(), "b");
        assert_eq!(doc.metadata().title(), Some("Shared"));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = DocumentReader::new()
            .read_file(&dir.path().join("nope.mdx"))
            .unwrap_err();
        assert!(matches!(err, FolioError::NotFound { ref slug, .. } if slug == "nope"));
    }

    #[test]
    fn test_malformed_metadata_carries_path() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "bad.md", "---\n- not\n- a map\n---\nBody");

        let err = DocumentReader::new().read_file(&path).unwrap_err();
        match err {
            FolioError::MalformedMetadata { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_list_files_filters_and_sorts() {
        let dir = TempDir::new().unwrap();
        write(&dir, "b.mdx", "");
        write(&dir, "a.mdx", "");
        write(&dir, "draft.mdx.WIP", "");
        write(&dir, "notes.md", "");
        fs::create_dir(dir.path().join("nested.mdx")).unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("deep.mdx"), "").unwrap();

        let files = DocumentReader::new().list_files(dir.path(), "mdx").unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.mdx", "b.mdx"]);
    }

    #[test]
    fn test_list_missing_dir_is_filesystem_error() {
        let dir = TempDir::new().unwrap();
        let err = DocumentReader::new()
            .list_files(&dir.path().join("missing"), "md")
            .unwrap_err();
        assert!(matches!(err, FolioError::Filesystem { .. }));
    }

    #[test]
    fn test_file_size_limit() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "big.md", "0123456789");
        let reader = DocumentReader::with_config(ReaderConfig {
            max_file_size: Some(4),
        });
        assert!(matches!(
            reader.read_file(&path).unwrap_err(),
            FolioError::Filesystem { .. }
        ));
    }
}
