//! Raw HTML handling
//!
//! pulldown-cmark reports an HTML block one line at a time. After the policy
//! stage decides whether raw HTML survives, the reparse stage joins adjacent
//! fragments back into whole elements for the structural stages that follow.

use super::{Events, MarkdownRenderer};
use crate::error::Result;
use pulldown_cmark::Event;

/// Stage: keep raw HTML as HTML, or demote it to escaped text
pub(crate) fn apply_policy(renderer: &MarkdownRenderer, events: Events) -> Result<Events> {
    if renderer.config().allow_raw_html {
        return Ok(events);
    }

    Ok(events
        .into_iter()
        .map(|event| match event {
            Event::Html(html) | Event::InlineHtml(html) => Event::Text(html),
            other => other,
        })
        .collect())
}

/// Stage: merge runs of adjacent block HTML events into one fragment
pub(crate) fn coalesce(_renderer: &MarkdownRenderer, events: Events) -> Result<Events> {
    let mut out: Events = Vec::with_capacity(events.len());

    for event in events {
        if let Event::Html(next) = &event {
            if let Some(Event::Html(previous)) = out.last_mut() {
                let mut joined = previous.to_string();
                joined.push_str(next);
                *previous = joined.into();
                continue;
            }
        }
        out.push(event);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderConfig;
    use pulldown_cmark::{Parser, TextMergeStream};

    fn events(markdown: &str) -> Events {
        TextMergeStream::new(Parser::new(markdown))
            .map(Event::into_static)
            .collect()
    }

    #[test]
    fn test_coalesce_joins_block_lines() {
        let renderer = MarkdownRenderer::new(RenderConfig::default()).unwrap();
        let raw = events("<div>\n<table>\n<tr><td>x</td></tr>\n</table>\n</div>\n");
        let html_count = |events: &Events| {
            events
                .iter()
                .filter(|e| matches!(e, Event::Html(_)))
                .count()
        };
        assert!(html_count(&raw) > 1);

        let joined = coalesce(&renderer, raw).unwrap();
        assert_eq!(html_count(&joined), 1);
        let fragment = joined
            .iter()
            .find_map(|e| match e {
                Event::Html(html) => Some(html.to_string()),
                _ => None,
            })
            .unwrap();
        assert!(fragment.contains("<table>") && fragment.contains("</table>"));
    }

    #[test]
    fn test_policy_keeps_html_by_default() {
        let renderer = MarkdownRenderer::new(RenderConfig::default()).unwrap();
        let raw = events("<b>bold</b>\n");
        let kept = apply_policy(&renderer, raw.clone()).unwrap();
        assert_eq!(kept, raw);
    }
}
