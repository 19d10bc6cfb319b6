//! Frontmatter splitting and serialization
//!
//! A document may open with a YAML block fenced by `---` lines:
//!
//! ```text
//! ---
//! title: Hello
//! publishedAt: 2024-05-01
//! ---
//! Body starts here.
//! ```
//!
//! [`parse`] returns the metadata and the body byte for byte; [`serialize`]
//! is its inverse, so `parse(&serialize(&m, b)?)? == (m, b)`.

use crate::core::Metadata;
use crate::error::{FolioError, Result, IN_MEMORY};

const DELIMITER: &str = "---";
const CLOSING_ALT: &str = "...";
const BYTE_ORDER_MARK: char = '\u{feff}';

/// Split raw text into metadata and body
///
/// A leading byte order mark does not hide the metadata block. Text without a
/// block is returned unchanged as the body.
pub fn parse(content: &str) -> Result<(Metadata, String)> {
    let unmarked = content.strip_prefix(BYTE_ORDER_MARK).unwrap_or(content);
    let Some(after_open) = strip_opening_delimiter(unmarked) else {
        return Ok((Metadata::new(), content.to_string()));
    };

    let mut offset = 0;
    for line in after_open.split_inclusive('\n') {
        let trimmed = line.trim_end();
        if trimmed == DELIMITER || trimmed == CLOSING_ALT {
            let yaml = &after_open[..offset];
            let body = &after_open[offset + line.len()..];
            return Ok((parse_yaml(yaml)?, body.to_string()));
        }
        offset += line.len();
    }

    Err(FolioError::malformed_metadata(
        IN_MEMORY,
        "metadata block is not closed by a '---' line",
    ))
}

/// Parse only the metadata block, ignoring the body
pub fn parse_metadata(content: &str) -> Result<Metadata> {
    parse(content).map(|(metadata, _)| metadata)
}

/// Join metadata and body back into document text
pub fn serialize(metadata: &Metadata, body: &str) -> Result<String> {
    if metadata.is_empty() {
        if strip_opening_delimiter(body).is_some() {
            return Ok(format!("{DELIMITER}\n{DELIMITER}\n{body}"));
        }
        return Ok(body.to_string());
    }

    let yaml = metadata.to_yaml_string()?;
    Ok(format!("{DELIMITER}\n{yaml}{DELIMITER}\n{body}"))
}

// Returns the text after the opening `---` line, if there is one.
fn strip_opening_delimiter(content: &str) -> Option<&str> {
    let first_line_end = content.find('\n')?;
    let first_line = &content[..first_line_end];
    (first_line.trim_end() == DELIMITER).then(|| &content[first_line_end + 1..])
}

fn parse_yaml(yaml: &str) -> Result<Metadata> {
    if yaml.trim().is_empty() {
        return Ok(Metadata::new());
    }
    let value: serde_yaml::Value = serde_yaml::from_str(yaml)
        .map_err(|e| FolioError::malformed_metadata(IN_MEMORY, e.to_string()))?;
    Metadata::from_yaml(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_frontmatter() {
        let content = "---\ntitle: Hello\ntags: [a, b]\n---\n# Heading\n\nBody.\n";
        let (meta, body) = parse(content).unwrap();

        assert_eq!(meta.title(), Some("Hello"));
        assert_eq!(meta.get_str_list("tags"), vec!["a", "b"]);
        assert_eq!(body, "# Heading\n\nBody.\n");
    }

    #[test]
    fn test_parse_without_frontmatter() {
        let content = "# Just markdown\n\n---\n\nwith a rule";
        let (meta, body) = parse(content).unwrap();
        assert!(meta.is_empty());
        assert_eq!(body, content);
    }

    #[test]
    fn test_parse_after_byte_order_mark() {
        let (meta, body) = parse("\u{feff}---\ntitle: Hi\ndraft: true\n---\nBody\n").unwrap();
        assert_eq!(meta.title(), Some("Hi"));
        assert!(meta.is_excluded());
        assert_eq!(body, "Body\n");

        let (meta, body) = parse("\u{feff}# No block\n").unwrap();
        assert!(meta.is_empty());
        assert_eq!(body, "\u{feff}# No block\n");
    }

    #[test]
    fn test_parse_keeps_leading_blank_lines_of_body() {
        let (_, body) = parse("---\na: 1\n---\n\n\nText").unwrap();
        assert_eq!(body, "\n\nText");
    }

    #[test]
    fn test_parse_crlf() {
        let (meta, body) = parse("---\r\ntitle: Win\r\n---\r\nBody\r\n").unwrap();
        assert_eq!(meta.title(), Some("Win"));
        assert_eq!(body, "Body\r\n");
    }

    #[test]
    fn test_parse_dots_close_block() {
        let (meta, body) = parse("---\ntitle: Dots\n...\nBody").unwrap();
        assert_eq!(meta.title(), Some("Dots"));
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_parse_empty_block() {
        let (meta, body) = parse("---\n---\nBody").unwrap();
        assert!(meta.is_empty());
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_unterminated_block_is_malformed() {
        let err = parse("---\ntitle: never closed\n\nBody").unwrap_err();
        assert!(matches!(err, FolioError::MalformedMetadata { .. }));
    }

    #[test]
    fn test_invalid_yaml_is_malformed() {
        let err = parse("---\ntitle: \"open\ntags: [a\n---\nBody").unwrap_err();
        assert!(matches!(err, FolioError::MalformedMetadata { .. }));

        let err = parse("---\njust a scalar\n---\nBody").unwrap_err();
        assert!(matches!(err, FolioError::MalformedMetadata { .. }));
    }

    #[test]
    fn test_round_trip() {
        let content = "---\nsummary: A post\ntitle: Ordered\npublishedAt: ''\nauthor:\n  name: Sam\ntags:\n- x\ndraft: false\n---\nBody with trailing newline\n";
        let (meta, body) = parse(content).unwrap();
        let text = serialize(&meta, &body).unwrap();
        let (meta2, body2) = parse(&text).unwrap();

        assert_eq!(meta, meta2);
        assert_eq!(body, body2);
        assert_eq!(
            meta2.keys().collect::<Vec<_>>(),
            vec!["summary", "title", "publishedAt", "author", "tags", "draft"]
        );
    }

    #[test]
    fn test_round_trip_empty_metadata() {
        for body in ["plain body", "---\nlooks like frontmatter\n---\n", ""] {
            let text = serialize(&Metadata::new(), body).unwrap();
            let (meta, parsed) = parse(&text).unwrap();
            assert!(meta.is_empty());
            assert_eq!(parsed, body);
        }
    }

    #[test]
    fn test_serialize_layout() {
        let mut meta = Metadata::new();
        meta.set("title", "Hi");
        assert_eq!(serialize(&meta, "Body").unwrap(), "---\ntitle: Hi\n---\nBody");
    }
}
