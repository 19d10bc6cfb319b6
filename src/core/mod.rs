//! Core content types
//!
//! - Document: a content file (slug, metadata, body) and its rendered views
//! - Metadata: ordered frontmatter mapping with typed accessors

pub mod document;
pub mod metadata;

pub use document::{
    prompt_number, slug_from_path, Document, RenderedPost, WritingPrompt, WritingPromptSummary,
};
pub use metadata::{Metadata, PostMetadata};
