//! Ordered frontmatter metadata
//!
//! [`Metadata`] wraps a `serde_yaml::Mapping`, which keeps keys in insertion
//! order. Serializing a document after editing one field therefore leaves
//! every other field where the author put it.

use crate::error::{FolioError, Result, IN_MEMORY};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

/// Canonical field that keeps a post out of listings
pub const DRAFT_KEY: &str = "draft";
/// Deprecated alias of [`DRAFT_KEY`], consulted only when `draft` is absent
pub const UNPUBLISHED_KEY: &str = "unpublished";

/// Ordered key/value metadata of a document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata {
    inner: Mapping,
}

impl Metadata {
    /// Create empty metadata
    pub fn new() -> Self {
        Self::default()
    }

    /// Build metadata from a parsed YAML value
    ///
    /// `null` is treated as an empty block. Anything that is not a mapping with
    /// string keys is rejected.
    pub fn from_yaml(value: Value) -> Result<Self> {
        let inner = match value {
            Value::Mapping(map) => map,
            Value::Null => Mapping::new(),
            other => {
                return Err(FolioError::malformed_metadata(
                    IN_MEMORY,
                    format!("expected a mapping, found {}", kind_of(&other)),
                ))
            }
        };

        if let Some(key) = inner.keys().find(|k| !k.is_string()) {
            return Err(FolioError::malformed_metadata(
                IN_MEMORY,
                format!("non-string key {key:?}"),
            ));
        }

        Ok(Self { inner })
    }

    /// The underlying mapping
    pub fn as_mapping(&self) -> &Mapping {
        &self.inner
    }

    pub fn into_mapping(self) -> Mapping {
        self.inner
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Keys in document order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.inner.keys().filter_map(Value::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.inner.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    /// Insert or replace a value
    ///
    /// An existing key keeps its position; a new key goes last.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.inner.insert(Value::String(key.into()), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.inner.shift_remove(key)
    }

    /// String field, if present and a string
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key)?.as_str()
    }

    /// Boolean field, if present and a boolean
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key)?.as_bool()
    }

    /// String list field. Missing or non-sequence values give an empty list;
    /// non-string items are skipped.
    pub fn get_str_list(&self, key: &str) -> Vec<String> {
        self.get(key)
            .and_then(Value::as_sequence)
            .map(|seq| {
                seq.iter()
                    .filter_map(|item| item.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn title(&self) -> Option<&str> {
        self.get_str("title")
    }

    pub fn published_at(&self) -> Option<&str> {
        self.get_str("publishedAt")
    }

    /// `publishedAt` parsed as a calendar date
    ///
    /// Accepts `yyyy-mm-dd` and RFC 3339 timestamps (the date part is used).
    pub fn published_date(&self) -> Option<NaiveDate> {
        parse_date(self.published_at()?)
    }

    /// Whether the document asked to be left out of listings
    ///
    /// `draft` wins whenever it is present. `unpublished` is only read when
    /// `draft` is absent.
    pub fn is_excluded(&self) -> bool {
        if self.contains_key(DRAFT_KEY) {
            return self.get(DRAFT_KEY).is_some_and(is_truthy);
        }
        match self.get(UNPUBLISHED_KEY) {
            Some(value) => {
                log::warn!("'{UNPUBLISHED_KEY}' is deprecated, use '{DRAFT_KEY}' instead");
                is_truthy(value)
            }
            None => false,
        }
    }

    /// Deserialize the metadata into a typed struct
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T> {
        serde_yaml::from_value(Value::Mapping(self.inner.clone()))
            .map_err(|e| FolioError::malformed_metadata(IN_MEMORY, e.to_string()))
    }

    /// Serialize to YAML text (no delimiters)
    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(&self.inner)?)
    }
}

/// Typed view of the fields blog and series posts use
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostMetadata {
    #[serde(default)]
    pub title: String,
    #[serde(rename = "publishedAt", default)]
    pub published_at: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub image: Option<String>,
}

pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            chrono::DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

// Loose truthiness, so `draft: "yes"` or `draft: 1` still hide a post.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Null => false,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty() && s != "false",
        _ => true,
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(yaml: &str) -> Metadata {
        Metadata::from_yaml(serde_yaml::from_str(yaml).unwrap()).unwrap()
    }

    #[test]
    fn test_keys_keep_document_order() {
        let meta = metadata("zeta: 1\nalpha: 2\nmid: 3\n");
        assert_eq!(meta.keys().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_set_existing_key_keeps_position() {
        let mut meta = metadata("summary: s\ntitle: old\npublishedAt: ''\n");
        meta.set("title", "new");
        meta.set("extra", true);

        assert_eq!(
            meta.keys().collect::<Vec<_>>(),
            vec!["summary", "title", "publishedAt", "extra"]
        );
        assert_eq!(meta.title(), Some("new"));
    }

    #[test]
    fn test_rejects_non_mapping() {
        let err = Metadata::from_yaml(serde_yaml::from_str("- a\n- b\n").unwrap()).unwrap_err();
        assert!(matches!(err, FolioError::MalformedMetadata { .. }));

        let err = Metadata::from_yaml(serde_yaml::from_str("1: one\n").unwrap()).unwrap_err();
        assert!(matches!(err, FolioError::MalformedMetadata { .. }));
    }

    #[test]
    fn test_null_is_empty() {
        let meta = Metadata::from_yaml(Value::Null).unwrap();
        assert!(meta.is_empty());
    }

    #[test]
    fn test_string_list() {
        let meta = metadata("tags: [rust, web, 3]\nsingle: rust\n");
        assert_eq!(meta.get_str_list("tags"), vec!["rust", "web"]);
        assert!(meta.get_str_list("single").is_empty());
        assert!(meta.get_str_list("missing").is_empty());
    }

    #[test]
    fn test_published_date_formats() {
        assert_eq!(
            metadata("publishedAt: 2024-03-09\n").published_date(),
            NaiveDate::from_ymd_opt(2024, 3, 9)
        );
        assert_eq!(
            metadata("publishedAt: '2024-03-09T10:00:00Z'\n").published_date(),
            NaiveDate::from_ymd_opt(2024, 3, 9)
        );
        assert_eq!(metadata("publishedAt: soon\n").published_date(), None);
        assert_eq!(metadata("title: x\n").published_date(), None);
    }

    #[test]
    fn test_draft_takes_precedence_over_unpublished() {
        assert!(metadata("draft: true\n").is_excluded());
        assert!(!metadata("draft: false\nunpublished: true\n").is_excluded());
        assert!(metadata("unpublished: true\n").is_excluded());
        assert!(!metadata("title: visible\n").is_excluded());
        assert!(!metadata("draft: null\n").is_excluded());
    }

    #[test]
    fn test_deserialize_post_metadata() {
        let meta = metadata(
            "title: Hello\npublishedAt: 2024-01-02\nsummary: Hi\ntags: [a, b]\nimage: /x.png\n",
        );
        let post: PostMetadata = meta.deserialize().unwrap();
        assert_eq!(post.title, "Hello");
        assert_eq!(post.published_at, "2024-01-02");
        assert_eq!(post.tags, vec!["a", "b"]);
        assert_eq!(post.image.as_deref(), Some("/x.png"));
    }
}
