//! GFM autolink literals
//!
//! pulldown-cmark only links `<https://...>`; GitHub also links bare
//! `https://`, `http://` and `www.` URLs in running text.

use super::{Events, MarkdownRenderer};
use crate::error::Result;
use pulldown_cmark::{CowStr, Event, LinkType, Tag, TagEnd};
use regex::Regex;
use std::sync::LazyLock;

static BARE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:https?://|www\.)[^\s<]+").unwrap());

static RAW_ANCHOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^<(/?)a(?:\s[^>]*)?>$").unwrap());

/// Characters GFM strips from the end of an autolink
const TRAILING_PUNCTUATION: &[char] = &['?', '!', '.', ',', ':', '*', '_', '~', '\'', '"', ';'];

/// Stage: link bare URLs in text that is not already inside a link or code
///
/// Inline `<a ...>` tags written as raw HTML count as links too.
pub(crate) fn link_bare_urls(_renderer: &MarkdownRenderer, events: Events) -> Result<Events> {
    let mut out = Vec::with_capacity(events.len());
    let mut opaque_depth = 0usize;

    for event in events {
        match &event {
            Event::Start(Tag::Link { .. } | Tag::Image { .. } | Tag::CodeBlock(_)) => {
                opaque_depth += 1;
            }
            Event::End(TagEnd::Link | TagEnd::Image | TagEnd::CodeBlock) => {
                opaque_depth = opaque_depth.saturating_sub(1);
            }
            Event::InlineHtml(html) => {
                if let Some(caps) = RAW_ANCHOR.captures(html.trim()) {
                    if caps.get(1).is_some_and(|m| !m.as_str().is_empty()) {
                        opaque_depth = opaque_depth.saturating_sub(1);
                    } else {
                        opaque_depth += 1;
                    }
                }
            }
            Event::Text(text) if opaque_depth == 0 && BARE_URL.is_match(text) => {
                split_links(text, &mut out);
                continue;
            }
            _ => {}
        }
        out.push(event);
    }

    Ok(out)
}

fn split_links(text: &str, out: &mut Events) {
    let mut last = 0;
    for found in BARE_URL.find_iter(text) {
        let url = trim_url(found.as_str());
        if url.is_empty() || url.eq_ignore_ascii_case("www.") {
            continue;
        }
        let start = found.start();
        let end = start + url.len();

        if start > last {
            out.push(Event::Text(CowStr::from(text[last..start].to_string())));
        }

        let dest = if url.len() >= 4 && url[..4].eq_ignore_ascii_case("www.") {
            format!("http://{url}")
        } else {
            url.to_string()
        };
        out.push(Event::Start(Tag::Link {
            link_type: LinkType::Autolink,
            dest_url: dest.into(),
            title: CowStr::Borrowed(""),
            id: CowStr::Borrowed(""),
        }));
        out.push(Event::Text(url.to_string().into()));
        out.push(Event::End(TagEnd::Link));
        last = end;
    }

    if last < text.len() {
        out.push(Event::Text(text[last..].to_string().into()));
    }
}

/// Drop trailing punctuation and unbalanced closing parentheses
fn trim_url(url: &str) -> &str {
    let mut url = url;
    loop {
        if let Some(stripped) = url.strip_suffix(TRAILING_PUNCTUATION) {
            url = stripped;
            continue;
        }
        if url.ends_with(')') && url.matches(')').count() > url.matches('(').count() {
            url = &url[..url.len() - 1];
            continue;
        }
        return url;
    }
}
