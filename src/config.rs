//! Site configuration
//!
//! Assembled once at start-up and never mutated afterwards. Every field has a
//! default matching the standard layout, so a config file only needs to name
//! what differs:
//!
//! ```yaml
//! content_root: site/content
//! render:
//!   dark_theme: Solarized (dark)
//!   language_aliases:
//!     repl: bash
//! ```

use crate::error::{FolioError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// One content directory and the extension of its files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionConfig {
    /// Directory, relative to `content_root` unless absolute
    pub dir: PathBuf,
    /// File extension without the dot
    pub extension: String,
}

impl CollectionConfig {
    pub fn new(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.into(),
        }
    }
}

/// Markdown renderer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Highlighting theme for light mode (a syntect default theme name)
    pub light_theme: String,
    /// Highlighting theme for dark mode
    pub dark_theme: String,
    /// Code block language aliases, applied before syntax lookup
    pub language_aliases: BTreeMap<String, String>,
    /// Pass raw HTML in markdown through instead of escaping it
    pub allow_raw_html: bool,
    /// Fail on code blocks in unknown languages instead of rendering plain text
    pub strict_languages: bool,
    /// Class of the scrollable container put around tables
    pub table_wrapper_class: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        let language_aliases = [
            ("prompt", "bash"),
            ("shellscript", "bash"),
            ("shell", "bash"),
            ("zsh", "bash"),
            ("console", "bash"),
            ("ts", "js"),
            ("tsx", "js"),
            ("typescript", "js"),
            ("jsx", "js"),
            ("text", "txt"),
            ("plaintext", "txt"),
        ]
        .into_iter()
        .map(|(alias, target)| (alias.to_string(), target.to_string()))
        .collect();

        Self {
            light_theme: "InspiredGitHub".to_string(),
            dark_theme: "base16-ocean.dark".to_string(),
            language_aliases,
            allow_raw_html: true,
            strict_languages: true,
            table_wrapper_class: "overflow-x-auto my-4".to_string(),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub content_root: PathBuf,
    pub blog: CollectionConfig,
    pub master_react: CollectionConfig,
    pub writing: CollectionConfig,
    pub render: RenderConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            content_root: PathBuf::from("content"),
            blog: CollectionConfig::new("blog", "mdx"),
            master_react: CollectionConfig::new("master-react", "mdx"),
            writing: CollectionConfig::new("writing", "md"),
            render: RenderConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Default layout under a site root: `<root>/content/{blog,master-react,writing}`
    pub fn for_root(root: impl AsRef<Path>) -> Self {
        Self {
            content_root: root.as_ref().join("content"),
            ..Self::default()
        }
    }

    /// Load a YAML config file; missing fields take their defaults
    ///
    /// A relative `content_root` is resolved against the file's directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| FolioError::config(format!("cannot read {}: {e}", path.display())))?;
        let mut config: SiteConfig = serde_yaml::from_str(&text)
            .map_err(|e| FolioError::config(format!("invalid {}: {e}", path.display())))?;

        if config.content_root.is_relative() {
            if let Some(base) = path.parent() {
                config.content_root = base.join(&config.content_root);
            }
        }
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Absolute or root-relative directory of a collection
    pub fn collection_dir(&self, collection: &CollectionConfig) -> PathBuf {
        self.content_root.join(&collection.dir)
    }
}
