//! Markdown to HTML rendering
//!
//! Rendering is an ordered list of stages over one tree representation, the
//! pulldown-cmark event stream (a pre-order walk of the document tree, where
//! `Start`/`End` pairs delimit elements):
//!
//! 1. parse the markdown with the GFM extensions pulldown-cmark supports
//! 2. `gfm-autolinks`: turn bare URLs into links
//! 3. `raw-html`: pass raw HTML through, or demote it to text
//! 4. `highlight`: replace code blocks with highlighted markup
//! 5. `reparse-raw-html`: join raw HTML fragments so whole elements are visible
//! 6. `wrap-tables`: put tables in a scrollable container
//! 7. stringify the events into HTML
//!
//! Every stage is a plain function in [`STAGES`]; there is no registry.

mod autolink;
mod highlight;
mod raw_html;
mod tables;

pub use highlight::Highlighter;
pub use tables::{wrap_tables_html, TableWrapper};

use crate::config::RenderConfig;
use crate::error::{FolioError, Result};
use pulldown_cmark::{html, Event, Options, Parser, TextMergeStream};

/// The intermediate tree every stage consumes and returns
pub type Events = Vec<Event<'static>>;

/// A transformation over the event tree
pub type Stage = fn(&MarkdownRenderer, Events) -> Result<Events>;

/// Stages run between parsing and stringifying, in order
pub const STAGES: &[(&str, Stage)] = &[
    ("gfm-autolinks", autolink::link_bare_urls),
    ("raw-html", raw_html::apply_policy),
    ("highlight", highlight::highlight_code_blocks),
    ("reparse-raw-html", raw_html::coalesce),
    ("wrap-tables", tables::wrap_tables),
];

/// Renders markdown bodies to HTML fragments
#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    config: RenderConfig,
    highlighter: Highlighter,
    tables: TableWrapper,
}

impl MarkdownRenderer {
    /// Build a renderer; fails if a configured theme does not exist or the
    /// table wrapper class is empty
    pub fn new(config: RenderConfig) -> Result<Self> {
        if config.table_wrapper_class.trim().is_empty() {
            return Err(FolioError::config("table_wrapper_class must name a class"));
        }
        let highlighter = Highlighter::new(&config)?;
        let tables = TableWrapper::new(&config.table_wrapper_class);
        Ok(Self {
            config,
            highlighter,
            tables,
        })
    }

    /// Render a markdown body to HTML
    pub fn render(&self, markdown: &str) -> Result<String> {
        let mut events = parse(markdown);
        for (name, stage) in STAGES {
            log::trace!("Running render stage '{name}' over {} events", events.len());
            events = stage(self, events)?;
        }
        Ok(stringify(events))
    }

    /// Stylesheet for highlighted code in both themes
    pub fn theme_css(&self) -> Result<String> {
        self.highlighter.theme_css()
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub(crate) fn highlighter(&self) -> &Highlighter {
        &self.highlighter
    }

    pub(crate) fn tables(&self) -> &TableWrapper {
        &self.tables
    }
}

/// GFM dialect: tables, strikethrough, task lists and footnotes
fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_FOOTNOTES
}

fn parse(markdown: &str) -> Events {
    TextMergeStream::new(Parser::new_ext(markdown, parser_options()))
        .map(Event::into_static)
        .collect()
}

fn stringify(events: Events) -> String {
    let mut output = String::new();
    html::push_html(&mut output, events.into_iter());
    output
}
