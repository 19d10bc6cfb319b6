//! folio: the content pipeline behind a portfolio and blog site
//!
//! Markdown files with YAML frontmatter live in three collections: blog posts,
//! the master-react series and numbered writing prompts. This library reads
//! them, renders their bodies to HTML and serves listings; it also carries the
//! one-shot migration that moved writing prompts into metadata.
//!
//! # Quick Start
//!
//! ## Listing and rendering
//!
//! ```rust,no_run
//! use folio::{Result, Site, SiteConfig};
//!
//! fn main() -> Result<()> {
//!     let site = Site::new(SiteConfig::for_root("."))?;
//!
//!     for post in site.blog().list_published()? {
//!         println!("{}: {} bytes of HTML", post.slug(), post.html().len());
//!     }
//!
//!     let prompt = site.writing().get_rendered("001-courage")?;
//!     println!("{}", prompt.summary.prompt);
//!     Ok(())
//! }
//! ```
//!
//! ## Frontmatter
//!
//! ```rust
//! use folio::io::{parse, serialize};
//!
//! let (metadata, body) = parse("---\ntitle: Hello\n---\n# Hi\n").unwrap();
//! assert_eq!(metadata.title(), Some("Hello"));
//! assert_eq!(serialize(&metadata, &body).unwrap(), "---\ntitle: Hello\n---\n# Hi\n");
//! ```
//!
//! ## Migrating prompts
//!
//! ```rust,no_run
//! use folio::content::Collection;
//! use folio::migrate::{PromptMigrator, RunMode};
//!
//! let migrator = PromptMigrator::new(Collection::new("content/writing", "md"));
//! let report = migrator.run(RunMode::DryRun).unwrap();
//! println!("would update {}, skip {}", report.updated, report.skipped);
//! ```
//!
//! # Architecture
//!
//! - [`core`]: documents, metadata and the rendered views
//! - [`io`]: frontmatter parsing, document reading and atomic writing
//! - [`render`]: the markdown to HTML pipeline
//! - [`content`]: collections with filtering and sorting
//! - [`migrate`]: the writing prompt migration
//! - [`config`]: site configuration
//! - [`error`]: the error type shared by everything above

pub use config::{CollectionConfig, RenderConfig, SiteConfig};
pub use content::{Collection, PostCollection, Site, WritingCollection};
pub use core::{
    Document, Metadata, PostMetadata, RenderedPost, WritingPrompt, WritingPromptSummary,
};
pub use error::{FolioError, Result};
pub use render::MarkdownRenderer;

pub mod config;
pub mod content;
pub mod core;
pub mod error;
pub mod io;
pub mod migrate;
pub mod render;

/// Convenience functions for one-off use
pub mod convenience {
    //! Each call builds its own reader or renderer with default settings.

    use crate::io::DocumentReader;
    use crate::{Document, MarkdownRenderer, RenderConfig, Result};
    use std::path::Path;

    /// Read one document from a file
    pub fn read_document<P: AsRef<Path>>(path: P) -> Result<Document> {
        DocumentReader::new().read_file(path.as_ref())
    }

    /// Render markdown with the default configuration
    pub fn render_markdown(markdown: &str) -> Result<String> {
        MarkdownRenderer::new(RenderConfig::default())?.render(markdown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_and_render() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"---\ntitle: Test\n---\n# Hello\n\n| a |\n|---|\n| 1 |\n")
            .unwrap();
        temp_file.flush().unwrap();

        let document = convenience::read_document(temp_file.path()).unwrap();
        assert_eq!(document.metadata().title(), Some("Test"));

        let html = convenience::render_markdown(document.body()).unwrap();
        assert!(html.starts_with("<h1>Hello</h1>"));
        assert!(html.contains("<div class=\"overflow-x-auto my-4\">"));
    }
}
