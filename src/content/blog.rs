//! Blog and master-react posts
//!
//! Both directories hold `.mdx` posts with the same metadata, so one type
//! serves them. A published listing drops drafts, sorts newest first and
//! renders every remaining post.

use super::Collection;
use crate::core::{Document, RenderedPost};
use crate::error::Result;
use crate::render::MarkdownRenderer;
use chrono::Datelike;
use rayon::prelude::*;
use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::sync::Arc;

/// A collection of fully rendered posts
#[derive(Debug, Clone)]
pub struct PostCollection {
    collection: Collection,
    renderer: Arc<MarkdownRenderer>,
}

impl PostCollection {
    pub fn new(collection: Collection, renderer: Arc<MarkdownRenderer>) -> Self {
        Self {
            collection,
            renderer,
        }
    }

    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    pub fn renderer(&self) -> &MarkdownRenderer {
        &self.renderer
    }

    /// Every post, drafts included, unrendered, in file-name order
    pub fn list_all(&self) -> Result<Vec<Document>> {
        self.collection.list_all()
    }

    /// One post, unrendered
    pub fn get_one(&self, slug: &str) -> Result<Document> {
        self.collection.get_one(slug)
    }

    /// Published posts, newest first, rendered
    ///
    /// Posts without a parseable `publishedAt` come last; ties keep file-name
    /// order. Rendering runs in parallel but the result keeps the sort order.
    pub fn list_published(&self) -> Result<Vec<RenderedPost>> {
        let mut documents: Vec<Document> = self
            .collection
            .list_all()?
            .into_iter()
            .filter(|doc| {
                let excluded = doc.metadata().is_excluded();
                if excluded {
                    log::debug!("Skipping draft '{}'", doc.slug());
                }
                !excluded
            })
            .collect();

        // `None` sorts below any date, so under `Reverse` it lands last
        documents.sort_by_key(|doc| Reverse(doc.metadata().published_date()));

        let posts = documents
            .into_par_iter()
            .map(|doc| self.render(doc))
            .collect::<Result<Vec<_>>>()?;

        log::info!(
            "Rendered {} published posts from {}",
            posts.len(),
            self.collection.dir().display()
        );
        Ok(posts)
    }

    /// One post, rendered
    ///
    /// Drafts are still served by slug; only listings hide them.
    pub fn get_rendered(&self, slug: &str) -> Result<RenderedPost> {
        let document = self.collection.get_one(slug)?;
        self.render(document)
    }

    /// Published posts carrying `tag`, in listing order
    pub fn with_tag(&self, tag: &str) -> Result<Vec<RenderedPost>> {
        Ok(self
            .list_published()?
            .into_iter()
            .filter(|post| post.has_tag(tag))
            .collect())
    }

    /// Tags of published posts with the number of posts using each, by name
    ///
    /// Reads metadata only; nothing is rendered.
    pub fn tags(&self) -> Result<Vec<(String, usize)>> {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for doc in self.collection.list_all()? {
            if doc.metadata().is_excluded() {
                continue;
            }
            let mut tags = doc.metadata().get_str_list("tags");
            tags.sort();
            tags.dedup();
            for tag in tags {
                *counts.entry(tag).or_default() += 1;
            }
        }
        Ok(counts.into_iter().collect())
    }

    fn render(&self, document: Document) -> Result<RenderedPost> {
        log::debug!("Rendering '{}'", document.slug());
        let html = self.renderer.render(document.body())?;
        Ok(RenderedPost::new(document, html))
    }
}

/// Bucket a sorted listing by publication year, newest year first
///
/// Order inside each bucket is the listing order. Posts without a parseable
/// `publishedAt` are left out.
pub fn group_by_year(posts: Vec<RenderedPost>) -> Vec<(i32, Vec<RenderedPost>)> {
    let mut years: BTreeMap<Reverse<i32>, Vec<RenderedPost>> = BTreeMap::new();
    for post in posts {
        if let Some(date) = post.metadata().published_date() {
            years.entry(Reverse(date.year())).or_default().push(post);
        }
    }
    years
        .into_iter()
        .map(|(Reverse(year), posts)| (year, posts))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderConfig;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn post(dir: &Path, slug: &str, frontmatter: &str, body: &str) {
        fs::write(
            dir.join(format!("{slug}.mdx")),
            format!("---\n{frontmatter}---\n{body}"),
        )
        .unwrap();
    }

    fn posts(dir: &Path) -> PostCollection {
        let renderer = MarkdownRenderer::new(RenderConfig::default()).unwrap();
        PostCollection::new(Collection::new(dir, "mdx"), Arc::new(renderer))
    }

    fn slugs(posts: &[RenderedPost]) -> Vec<&str> {
        posts.iter().map(RenderedPost::slug).collect()
    }

    #[test]
    fn test_list_published_sorts_newest_first() {
        let temp = TempDir::new().unwrap();
        post(temp.path(), "a-old", "publishedAt: 2023-01-02\n", "old\n");
        post(temp.path(), "b-new", "publishedAt: 2024-06-30\n", "new\n");
        post(temp.path(), "c-undated", "title: x\n", "undated\n");
        post(temp.path(), "d-mid", "publishedAt: 2023-09-10T08:00:00Z\n", "mid\n");

        let listed = posts(temp.path()).list_published().unwrap();
        assert_eq!(slugs(&listed), ["b-new", "d-mid", "a-old", "c-undated"]);
        assert_eq!(listed[0].html(), "<p>new</p>\n");
    }

    #[test]
    fn test_drafts_are_excluded() {
        let temp = TempDir::new().unwrap();
        post(temp.path(), "draft", "draft: true\npublishedAt: 2024-01-01\n", "x\n");
        post(temp.path(), "legacy", "unpublished: true\npublishedAt: 2024-01-01\n", "x\n");
        post(temp.path(), "overridden", "draft: false\nunpublished: true\npublishedAt: 2024-01-01\n", "x\n");
        post(temp.path(), "live", "publishedAt: 2024-01-01\n", "x\n");

        let collection = posts(temp.path());
        let listed = collection.list_published().unwrap();
        assert_eq!(slugs(&listed), ["live", "overridden"]);

        // Still reachable by slug
        assert_eq!(collection.get_rendered("draft").unwrap().html(), "<p>x</p>\n");
    }

    #[test]
    fn test_draft_behind_byte_order_mark_is_excluded() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("secret.mdx"),
            "\u{feff}---\ntitle: Secret\ndraft: true\n---\nHidden\n",
        )
        .unwrap();
        post(temp.path(), "live", "publishedAt: 2024-01-01\n", "x\n");

        let collection = posts(temp.path());
        assert_eq!(slugs(&collection.list_published().unwrap()), ["live"]);

        let secret = collection.get_rendered("secret").unwrap();
        assert_eq!(secret.metadata().title(), Some("Secret"));
        assert_eq!(secret.html(), "<p>Hidden</p>\n");
    }

    #[test]
    fn test_ties_keep_file_name_order() {
        let temp = TempDir::new().unwrap();
        for slug in ["c", "a", "b"] {
            post(temp.path(), slug, "publishedAt: 2024-01-01\n", "x\n");
        }
        let listed = posts(temp.path()).list_published().unwrap();
        assert_eq!(slugs(&listed), ["a", "b", "c"]);
    }

    #[test]
    fn test_render_failure_fails_listing() {
        let temp = TempDir::new().unwrap();
        post(temp.path(), "bad", "publishedAt: 2024-01-01\n", "```klingon\nx\n```\n");
        assert!(posts(temp.path()).list_published().is_err());
    }

    #[test]
    fn test_tags_and_filter() {
        let temp = TempDir::new().unwrap();
        post(temp.path(), "one", "publishedAt: 2024-01-01\ntags: [rust, web]\n", "x\n");
        post(temp.path(), "two", "publishedAt: 2024-02-01\ntags: [rust]\n", "x\n");
        post(temp.path(), "hidden", "draft: true\ntags: [secret]\n", "x\n");

        let collection = posts(temp.path());
        assert_eq!(
            collection.tags().unwrap(),
            vec![("rust".to_string(), 2), ("web".to_string(), 1)]
        );
        assert_eq!(slugs(&collection.with_tag("rust").unwrap()), ["two", "one"]);
        assert!(collection.with_tag("secret").unwrap().is_empty());
    }

    #[test]
    fn test_group_by_year() {
        let temp = TempDir::new().unwrap();
        post(temp.path(), "a", "publishedAt: 2023-03-01\n", "x\n");
        post(temp.path(), "b", "publishedAt: 2024-05-01\n", "x\n");
        post(temp.path(), "c", "publishedAt: 2024-01-01\n", "x\n");
        post(temp.path(), "d", "title: undated\n", "x\n");

        let grouped = group_by_year(posts(temp.path()).list_published().unwrap());
        let shape: Vec<(i32, Vec<&str>)> = grouped
            .iter()
            .map(|(year, posts)| (*year, slugs(posts)))
            .collect();
        assert_eq!(shape, vec![(2024, vec!["b", "c"]), (2023, vec!["a"])]);
    }
}
