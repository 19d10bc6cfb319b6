//! Scrollable table containers
//!
//! Wide tables break narrow layouts, so every table is wrapped in a container
//! that scrolls horizontally. A table whose direct parent already is such a
//! container is left alone, which makes the stage idempotent.

use super::{Events, MarkdownRenderer};
use crate::error::Result;
use pulldown_cmark::{Event, Tag, TagEnd};
use regex::Regex;
use std::sync::LazyLock;

static TABLE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<(/?)table\b[^>]*>").unwrap());

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(/?)([A-Za-z][A-Za-z0-9-]*)([^>]*)>").unwrap());

static CLASS_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bclass\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap()
});

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Wraps tables in `<div class="...">`
#[derive(Debug, Clone)]
pub struct TableWrapper {
    // First class of the emitted wrapper; `None` for an empty class attribute
    marker: Option<String>,
    open_tag: String,
}

impl TableWrapper {
    pub fn new(wrapper_class: &str) -> Self {
        Self {
            marker: wrapper_class.split_whitespace().next().map(str::to_string),
            open_tag: format!("<div class=\"{wrapper_class}\">"),
        }
    }

    fn is_wrapper_div(&self, name: &str, attributes: &str) -> bool {
        if !name.eq_ignore_ascii_case("div") {
            return false;
        }
        let Some(classes) = CLASS_ATTR
            .captures(attributes)
            .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
        else {
            return false;
        };
        match &self.marker {
            Some(marker) => classes.as_str().split_whitespace().any(|c| c == marker),
            None => classes.as_str().trim().is_empty(),
        }
    }

    /// Whether the innermost element left open by `preceding` is a wrapper
    fn is_wrapped(&self, preceding: &str) -> bool {
        let mut open: Vec<(&str, &str)> = Vec::new();
        for caps in HTML_TAG.captures_iter(preceding) {
            let (Some(name), Some(attributes)) = (caps.get(2), caps.get(3)) else {
                continue;
            };
            let (name, attributes) = (name.as_str(), attributes.as_str());
            let closing = caps.get(1).is_some_and(|m| !m.as_str().is_empty());

            if closing {
                if let Some(pos) = open
                    .iter()
                    .rposition(|(tag, _)| tag.eq_ignore_ascii_case(name))
                {
                    open.truncate(pos);
                }
            } else if !attributes.trim_end().ends_with('/')
                && !VOID_ELEMENTS.iter().any(|void| void.eq_ignore_ascii_case(name))
            {
                open.push((name, attributes));
            }
        }
        open.last()
            .is_some_and(|(name, attributes)| self.is_wrapper_div(name, attributes))
    }

    /// Wrap raw `<table>` elements in one HTML fragment
    ///
    /// `open` tracks, across fragments, whether each still-open table got a
    /// wrapper; `preceding` is the markup emitted before the fragment.
    fn wrap_fragment(&self, html: &str, preceding: &str, open: &mut Vec<bool>) -> String {
        let mut out = String::with_capacity(html.len());
        let mut last = 0;

        for caps in TABLE_TAG.captures_iter(html) {
            let Some(tag) = caps.get(0) else { continue };
            out.push_str(&html[last..tag.start()]);
            let closing = caps.get(1).is_some_and(|m| !m.as_str().is_empty());

            if closing {
                out.push_str(tag.as_str());
                if open.pop() == Some(true) {
                    out.push_str("</div>");
                }
            } else {
                let wrapped = self.is_wrapped(&format!("{preceding}{out}"));
                if !wrapped {
                    out.push_str(&self.open_tag);
                }
                out.push_str(tag.as_str());
                open.push(!wrapped);
            }
            last = tag.end();
        }

        out.push_str(&html[last..]);
        out
    }

    /// Wrap every unwrapped table in an HTML string
    pub fn wrap_html(&self, html: &str) -> String {
        let mut open = Vec::new();
        let mut out = self.wrap_fragment(html, "", &mut open);
        for wrapped in open.into_iter().rev() {
            if wrapped {
                out.push_str("</div>");
            }
        }
        out
    }
}

/// Wrap every table not already inside a `wrapper_class` container
///
/// Idempotent: `wrap_tables_html(&wrap_tables_html(h, c), c) == wrap_tables_html(h, c)`.
pub fn wrap_tables_html(html: &str, wrapper_class: &str) -> String {
    TableWrapper::new(wrapper_class).wrap_html(html)
}

/// Stage: wrap markdown tables and raw HTML tables
pub(crate) fn wrap_tables(renderer: &MarkdownRenderer, events: Events) -> Result<Events> {
    let wrapper = renderer.tables();
    let mut out: Events = Vec::with_capacity(events.len());
    let mut open: Vec<bool> = Vec::new();
    // Raw HTML and table markup emitted so far, for finding a table's parent
    let mut emitted = String::new();

    for event in events {
        match event {
            Event::Start(Tag::Table(alignments)) => {
                let wrapped = wrapper.is_wrapped(&emitted);
                if !wrapped {
                    out.push(Event::Html(format!("{}\n", wrapper.open_tag).into()));
                    emitted.push_str(&wrapper.open_tag);
                }
                open.push(!wrapped);
                emitted.push_str("<table>");
                out.push(Event::Start(Tag::Table(alignments)));
            }
            Event::End(TagEnd::Table) => {
                out.push(Event::End(TagEnd::Table));
                emitted.push_str("</table>");
                if open.pop() == Some(true) {
                    out.push(Event::Html("</div>\n".into()));
                    emitted.push_str("</div>");
                }
            }
            Event::Html(html) => {
                let wrapped = wrapper.wrap_fragment(&html, &emitted, &mut open);
                emitted.push_str(&wrapped);
                out.push(Event::Html(wrapped.into()));
            }
            Event::InlineHtml(html) => {
                let wrapped = wrapper.wrap_fragment(&html, &emitted, &mut open);
                emitted.push_str(&wrapped);
                out.push(Event::InlineHtml(wrapped.into()));
            }
            other => out.push(other),
        }
    }

    Ok(out)
}
