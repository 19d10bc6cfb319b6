//! Writing prompts
//!
//! Files are named `NNN-some-slug.md`; the leading number orders them. The
//! listing reads metadata only, since it never shows the responses.

use super::Collection;
use crate::core::{Document, WritingPrompt, WritingPromptSummary};
use crate::error::{FolioError, Result};
use crate::render::MarkdownRenderer;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct WritingCollection {
    collection: Collection,
    renderer: Arc<MarkdownRenderer>,
}

impl WritingCollection {
    pub fn new(collection: Collection, renderer: Arc<MarkdownRenderer>) -> Self {
        Self {
            collection,
            renderer,
        }
    }

    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    pub fn list_all(&self) -> Result<Vec<Document>> {
        self.collection.list_all()
    }

    pub fn get_one(&self, slug: &str) -> Result<Document> {
        self.collection.get_one(slug)
    }

    /// Prompts with a non-blank `publishedAt`, by number ascending
    ///
    /// Equal numbers keep file-name order.
    pub fn list_published(&self) -> Result<Vec<WritingPromptSummary>> {
        let reader = self.collection.reader();
        let mut summaries = Vec::new();

        for path in self.collection.files()? {
            let metadata = reader.read_metadata(&path)?;
            let slug = crate::core::slug_from_path(&path).unwrap_or_default();
            let summary = WritingPromptSummary::from_document(&Document::new(slug, metadata, ""));
            if summary.is_published() {
                summaries.push(summary);
            } else {
                log::debug!("Skipping unpublished prompt '{}'", summary.slug);
            }
        }

        summaries.sort_by_key(|summary| summary.number);
        log::info!(
            "Listed {} published prompts from {}",
            summaries.len(),
            self.collection.dir().display()
        );
        Ok(summaries)
    }

    /// One prompt with its response rendered
    pub fn get_rendered(&self, slug: &str) -> Result<WritingPrompt> {
        let document = self.collection.get_one(slug)?;
        let html = self.renderer.render(document.body())?;
        Ok(WritingPrompt {
            summary: WritingPromptSummary::from_document(&document),
            html,
        })
    }

    /// Previous and next published prompts around `slug`
    ///
    /// `slug` itself must be published.
    pub fn neighbors(
        &self,
        slug: &str,
    ) -> Result<(Option<WritingPromptSummary>, Option<WritingPromptSummary>)> {
        let mut published = self.list_published()?;
        let Some(index) = published.iter().position(|summary| summary.slug == slug) else {
            let path = self.collection.path_of(slug)?;
            return Err(FolioError::not_found(slug, path));
        };

        let next = (index + 1 < published.len()).then(|| published.remove(index + 1));
        let previous = index.checked_sub(1).map(|prev| published.swap_remove(prev));
        Ok((previous, next))
    }
}
