//! Code block highlighting
//!
//! Tokens are emitted as scope classes (`hl-` prefix), never inline colors.
//! One stylesheet carries both themes, each scoped to its color mode, so
//! switching between light and dark needs no re-render. Theme backgrounds are
//! dropped; the surrounding stylesheet owns the block background.

use super::{Events, MarkdownRenderer};
use crate::config::RenderConfig;
use crate::error::{FolioError, Result};
use pulldown_cmark::{CodeBlockKind, Event, Tag, TagEnd};
use std::collections::BTreeMap;
use std::sync::OnceLock;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{css_for_theme_with_class_style, ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

const STAGE: &str = "highlight";
const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed { prefix: "hl-" };
const LIGHT_SCOPE: &str = ":root:not(.dark)";
const DARK_SCOPE: &str = ":root.dark";

static SYNTAXES: OnceLock<SyntaxSet> = OnceLock::new();
static THEMES: OnceLock<ThemeSet> = OnceLock::new();

fn syntaxes() -> &'static SyntaxSet {
    SYNTAXES.get_or_init(SyntaxSet::load_defaults_newlines)
}

fn themes() -> &'static ThemeSet {
    THEMES.get_or_init(ThemeSet::load_defaults)
}

/// Syntax highlighter for fenced code blocks
#[derive(Debug, Clone)]
pub struct Highlighter {
    light_theme: String,
    dark_theme: String,
    aliases: BTreeMap<String, String>,
    strict: bool,
}

impl Highlighter {
    pub fn new(config: &RenderConfig) -> Result<Self> {
        for name in [&config.light_theme, &config.dark_theme] {
            if !themes().themes.contains_key(name) {
                let known: Vec<_> = themes().themes.keys().map(String::as_str).collect();
                return Err(FolioError::config(format!(
                    "unknown highlight theme '{name}' (available: {})",
                    known.join(", ")
                )));
            }
        }

        Ok(Self {
            light_theme: config.light_theme.clone(),
            dark_theme: config.dark_theme.clone(),
            aliases: config
                .language_aliases
                .iter()
                .map(|(alias, target)| (alias.to_lowercase(), target.clone()))
                .collect(),
            strict: config.strict_languages,
        })
    }

    /// Highlight one block of code
    ///
    /// `language` is the first word of the fence info string; `None` renders
    /// plain text.
    pub fn highlight(&self, language: Option<&str>, code: &str) -> Result<String> {
        let label = language.unwrap_or("plaintext");
        let syntax = match language {
            Some(lang) => self.resolve(lang)?,
            None => syntaxes().find_syntax_plain_text(),
        };

        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, syntaxes(), CLASS_STYLE);
        for line in LinesWithEndings::from(code) {
            generator
                .parse_html_for_line_which_includes_newline(line)
                .map_err(|e| {
                    FolioError::render_failure(STAGE, format!("highlighting '{label}': {e}"))
                })?;
        }
        let spans = generator.finalize();

        let label = attribute_safe(label);
        Ok(format!(
            "<figure data-code-figure=\"\"><pre data-language=\"{label}\" data-theme=\"{} {}\"><code data-language=\"{label}\">{spans}</code></pre></figure>\n",
            theme_slug(&self.light_theme),
            theme_slug(&self.dark_theme),
        ))
    }

    fn resolve(&self, language: &str) -> Result<&'static SyntaxReference> {
        let lowered = language.to_lowercase();
        let token = self.aliases.get(&lowered).map_or(lowered.as_str(), String::as_str);

        if let Some(syntax) = syntaxes().find_syntax_by_token(token) {
            return Ok(syntax);
        }
        if self.strict {
            return Err(FolioError::render_failure(
                STAGE,
                format!("unsupported language '{language}'"),
            ));
        }
        log::warn!("Unsupported language '{language}', rendering as plain text");
        Ok(syntaxes().find_syntax_plain_text())
    }

    /// Stylesheet for both themes, each scoped to its color mode
    pub fn theme_css(&self) -> Result<String> {
        let mut css = String::new();
        for (name, scope) in [
            (&self.light_theme, LIGHT_SCOPE),
            (&self.dark_theme, DARK_SCOPE),
        ] {
            let theme = self.theme(name)?;
            let raw = css_for_theme_with_class_style(theme, CLASS_STYLE)
                .map_err(|e| FolioError::render_failure(STAGE, e.to_string()))?;
            css.push_str(&format!("/* {name} */\n"));
            css.push_str(&scope_css(&raw, scope));
            css.push('\n');
        }
        Ok(css)
    }

    fn theme(&self, name: &str) -> Result<&'static Theme> {
        themes()
            .themes
            .get(name)
            .ok_or_else(|| FolioError::config(format!("unknown highlight theme '{name}'")))
    }
}

/// Prefix every selector with `scope` and drop background declarations
fn scope_css(css: &str, scope: &str) -> String {
    let mut scoped = String::with_capacity(css.len());
    for line in css.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("background") {
            continue;
        }
        if let Some(selectors) = trimmed.strip_suffix('{') {
            let prefixed: Vec<String> = selectors
                .split(',')
                .map(|selector| format!("{scope} {}", selector.trim()))
                .collect();
            scoped.push_str(&prefixed.join(", "));
            scoped.push_str(" {\n");
        } else {
            scoped.push_str(line);
            scoped.push('\n');
        }
    }
    scoped
}

fn theme_slug(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect()
}

fn attribute_safe(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+' | '#' | '.'))
        .collect()
}

/// First word of a fence info string: "rust title=main.rs" is "rust"
fn fence_language(info: &str) -> Option<String> {
    info.split(|c: char| c.is_whitespace() || c == '{' || c == ',')
        .find(|word| !word.is_empty())
        .map(str::to_string)
}

struct PendingBlock {
    language: Option<String>,
    code: String,
}

/// Stage: replace every code block with highlighted HTML
pub(crate) fn highlight_code_blocks(renderer: &MarkdownRenderer, events: Events) -> Result<Events> {
    let highlighter = renderer.highlighter();
    let mut out = Vec::with_capacity(events.len());
    let mut pending: Option<PendingBlock> = None;

    for event in events {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                let language = match kind {
                    CodeBlockKind::Fenced(info) => fence_language(&info),
                    CodeBlockKind::Indented => None,
                };
                pending = Some(PendingBlock {
                    language,
                    code: String::new(),
                });
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some(block) = pending.take() {
                    let html = highlighter.highlight(block.language.as_deref(), &block.code)?;
                    out.push(Event::Html(html.into()));
                }
            }
            Event::Text(text) if pending.is_some() => {
                if let Some(block) = pending.as_mut() {
                    block.code.push_str(&text);
                }
            }
            other => out.push(other),
        }
    }

    Ok(out)
}
