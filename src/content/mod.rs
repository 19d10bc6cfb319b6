//! Content collections
//!
//! A [`Collection`] is one directory of markdown files sharing an extension.
//! The typed collections build on it:
//!
//! - [`PostCollection`]: blog and master-react posts, rendered in full
//! - [`WritingCollection`]: numbered writing prompts, listed from metadata only
//!
//! Nothing is cached; every call reads the directory again.

pub mod blog;
pub mod writing;

pub use blog::{group_by_year, PostCollection};
pub use writing::WritingCollection;

use crate::config::{CollectionConfig, SiteConfig};
use crate::core::Document;
use crate::error::{FolioError, Result};
use crate::io::DocumentReader;
use crate::render::MarkdownRenderer;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A directory of content files with one extension
#[derive(Debug, Clone)]
pub struct Collection {
    dir: PathBuf,
    extension: String,
    reader: DocumentReader,
}

impl Collection {
    pub fn new(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.into(),
            reader: DocumentReader::new(),
        }
    }

    /// Use a custom reader (size limits)
    pub fn with_reader(mut self, reader: DocumentReader) -> Self {
        self.reader = reader;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub(crate) fn reader(&self) -> &DocumentReader {
        &self.reader
    }

    /// Files of this collection, sorted by file name
    ///
    /// Fails with [`FolioError::DuplicateSlug`] when two files differ only in
    /// letter case.
    pub fn files(&self) -> Result<Vec<PathBuf>> {
        let files = self.reader.list_files(&self.dir, &self.extension)?;

        let mut seen: HashMap<String, &PathBuf> = HashMap::with_capacity(files.len());
        for file in &files {
            let Some(slug) = crate::core::slug_from_path(file) else {
                continue;
            };
            if let Some(first) = seen.insert(slug.to_lowercase(), file) {
                return Err(FolioError::duplicate_slug(slug, first, file));
            }
        }

        Ok(files)
    }

    /// Load every document of the collection, in file-name order
    pub fn list_all(&self) -> Result<Vec<Document>> {
        self.files()?
            .iter()
            .map(|path| self.reader.read_file(path))
            .collect()
    }

    /// Load the document stored as `<dir>/<slug>.<extension>`
    pub fn get_one(&self, slug: &str) -> Result<Document> {
        let path = self.path_of(slug)?;
        self.reader.read_file(&path)
    }

    /// File path for a slug; slugs that would escape the directory are not found
    pub fn path_of(&self, slug: &str) -> Result<PathBuf> {
        let file_name = format!("{slug}.{}", self.extension);
        if slug.is_empty() || slug.contains(['/', '\\']) || slug.contains("..") {
            return Err(FolioError::not_found(slug, self.dir.join(file_name)));
        }
        Ok(self.dir.join(file_name))
    }
}

/// Every collection of a site, sharing one renderer
#[derive(Debug, Clone)]
pub struct Site {
    config: SiteConfig,
    blog: PostCollection,
    master_react: PostCollection,
    writing: WritingCollection,
}

impl Site {
    /// Build the collections described by a configuration
    ///
    /// Fails only when the render configuration is invalid.
    pub fn new(config: SiteConfig) -> Result<Self> {
        let renderer = Arc::new(MarkdownRenderer::new(config.render.clone())?);
        let collection = |c: &CollectionConfig| {
            Collection::new(config.collection_dir(c), c.extension.clone())
        };

        Ok(Self {
            blog: PostCollection::new(collection(&config.blog), Arc::clone(&renderer)),
            master_react: PostCollection::new(
                collection(&config.master_react),
                Arc::clone(&renderer),
            ),
            writing: WritingCollection::new(collection(&config.writing), renderer),
            config,
        })
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn blog(&self) -> &PostCollection {
        &self.blog
    }

    pub fn master_react(&self) -> &PostCollection {
        &self.master_react
    }

    pub fn writing(&self) -> &WritingCollection {
        &self.writing
    }

    pub fn renderer(&self) -> &MarkdownRenderer {
        self.blog.renderer()
    }
}
