//! Document model
//!
//! A [`Document`] is one content file: its slug, ordered metadata and raw
//! markdown body. The rendered and summarized views built on top of it live
//! here as well, since every collection hands them to the same callers.

use crate::core::metadata::{Metadata, PostMetadata};
use crate::error::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// A markdown file with frontmatter metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    slug: String,
    #[serde(skip)]
    path: Option<PathBuf>,
    metadata: Metadata,
    body: String,
}

impl Document {
    /// Create a document that is not backed by a file
    pub fn new(slug: impl Into<String>, metadata: Metadata, body: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            path: None,
            metadata,
            body: body.into(),
        }
    }

    /// Attach the file the document was read from
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = body.into();
    }

    pub fn into_parts(self) -> (Metadata, String) {
        (self.metadata, self.body)
    }
}

/// Derive a slug from a file path: the file name with its extension stripped
pub fn slug_from_path(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
}

/// A document together with its rendered HTML
#[derive(Debug, Clone, Serialize)]
pub struct RenderedPost {
    #[serde(flatten)]
    document: Document,
    html: String,
}

impl RenderedPost {
    pub fn new(document: Document, html: String) -> Self {
        Self { document, html }
    }

    pub fn slug(&self) -> &str {
        self.document.slug()
    }

    pub fn metadata(&self) -> &Metadata {
        self.document.metadata()
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    /// Typed access to the common post fields
    pub fn post_metadata(&self) -> Result<PostMetadata> {
        self.metadata().deserialize()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.metadata().get_str_list("tags").iter().any(|t| t == tag)
    }
}

/// Listing entry for a writing prompt; built from metadata only
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WritingPromptSummary {
    pub slug: String,
    pub number: u64,
    pub prompt: String,
    pub published_at: String,
}

impl WritingPromptSummary {
    pub fn from_document(document: &Document) -> Self {
        let metadata = document.metadata();
        Self {
            slug: document.slug().to_string(),
            number: prompt_number(document.slug()),
            prompt: metadata.title().unwrap_or_default().to_string(),
            published_at: metadata.published_at().unwrap_or_default().to_string(),
        }
    }

    /// Published means a non-blank `publishedAt`
    pub fn is_published(&self) -> bool {
        !self.published_at.trim().is_empty()
    }
}

/// A single writing prompt with its response rendered
#[derive(Debug, Clone, Serialize)]
pub struct WritingPrompt {
    #[serde(flatten)]
    pub summary: WritingPromptSummary,
    pub html: String,
}

/// Leading digits of a slug: `"003-foo-bar"` is 3, no digits is 0
pub fn prompt_number(slug: &str) -> u64 {
    let digits: &str = slug
        .find(|c: char| !c.is_ascii_digit())
        .map_or(slug, |end| &slug[..end]);
    digits.parse().unwrap_or(0)
}
