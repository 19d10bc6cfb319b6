//! Writing prompt migration
//!
//! Older prompts kept their question in the body:
//!
//! ```markdown
//! ## Prompt
//!
//! > Prompt: What is courage?
//!
//! ## Writing
//! ...
//! ```
//!
//! Migration moves the sentence into the `title` metadata field and removes
//! the block from the body. A migrated file has no `> Prompt:` line left, so
//! running the migration again changes nothing.

use crate::content::Collection;
use crate::core::Document;
use crate::error::Result;
use crate::io::{DocumentWriter, WriteOptions};
use regex::Regex;
use std::path::PathBuf;
use std::sync::LazyLock;

static PROMPT_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^>[ \t]*Prompt:[ \t]*(\S.*?)[ \t]*$").unwrap());

static PROMPT_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]*##[ \t]*Prompt[ \t]*$").unwrap());

/// Characters of body shown per document in a dry run
pub const PREVIEW_CHARS: usize = 80;

/// Result of migrating one body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigratedBody {
    /// The prompt sentence, trimmed
    pub title: String,
    /// The body with the prompt block removed and leading whitespace trimmed
    pub body: String,
}

/// Extract the prompt from a body, or `None` if it has no `> Prompt:` line
pub fn migrate_body(body: &str) -> Option<MigratedBody> {
    let lines: Vec<&str> = body.split_inclusive('\n').collect();

    let (prompt_index, title) = lines.iter().enumerate().find_map(|(index, line)| {
        PROMPT_LINE
            .captures(line_text(line))
            .and_then(|caps| caps.get(1).map(|m| (index, m.as_str().trim().to_string())))
    })?;

    let mut start = prompt_index;
    let mut above = prompt_index;
    while above > 0 && lines[above - 1].trim().is_empty() {
        above -= 1;
    }
    if above > 0 && PROMPT_HEADING.is_match(line_text(lines[above - 1])) {
        start = above - 1;
    }

    let mut end = prompt_index + 1;
    if lines.get(end).is_some_and(|line| line.trim().is_empty()) {
        end += 1;
    }

    let remaining: String = lines[..start]
        .iter()
        .chain(&lines[end..])
        .copied()
        .collect();

    Some(MigratedBody {
        title,
        body: remaining.trim_start().to_string(),
    })
}

fn line_text(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}

/// Migrate a document in place; returns `false` when there was nothing to do
pub fn migrate_document(document: &mut Document) -> bool {
    let Some(migrated) = migrate_body(document.body()) else {
        return false;
    };
    document.metadata_mut().set("title", migrated.title);
    document.set_body(migrated.body);
    true
}

/// Whether files are rewritten or only previewed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    #[default]
    DryRun,
    Apply,
}

/// What happened to one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// Migrated (or would be, in a dry run)
    Updated {
        title: String,
        preview: String,
        diff: Option<String>,
    },
    /// No `> Prompt:` line
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationEntry {
    pub path: PathBuf,
    pub outcome: MigrationOutcome,
}

/// Summary of one migration run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub updated: usize,
    pub skipped: usize,
    /// Per-file outcomes in processing order
    pub entries: Vec<MigrationEntry>,
}

/// Runs the migration over a writing collection
#[derive(Debug, Clone)]
pub struct PromptMigrator {
    collection: Collection,
    writer: DocumentWriter,
}

impl PromptMigrator {
    pub fn new(collection: Collection) -> Self {
        Self {
            collection,
            writer: DocumentWriter::new(),
        }
    }

    pub fn with_writer(mut self, writer: DocumentWriter) -> Self {
        self.writer = writer;
        self
    }

    /// Process every file in file-name order
    ///
    /// The first unreadable or unwritable file aborts the run.
    pub fn run(&self, mode: RunMode) -> Result<MigrationReport> {
        let options = WriteOptions {
            dry_run: mode == RunMode::DryRun,
        };
        let reader = self.collection.reader();
        let mut report = MigrationReport::default();

        for path in self.collection.files()? {
            let mut document = reader.read_file(&path)?;
            if !migrate_document(&mut document) {
                log::debug!("No prompt line in {}", path.display());
                report.skipped += 1;
                report.entries.push(MigrationEntry {
                    path,
                    outcome: MigrationOutcome::Skipped,
                });
                continue;
            }

            let written = self.writer.write_file(&document, &path, options)?;
            log::debug!("Migrated {} (mode {:?})", path.display(), mode);
            report.updated += 1;
            report.entries.push(MigrationEntry {
                path,
                outcome: MigrationOutcome::Updated {
                    title: document.metadata().title().unwrap_or_default().to_string(),
                    preview: preview(document.body()),
                    diff: written.diff,
                },
            });
        }

        log::info!(
            "Prompt migration ({:?}): {} updated, {} skipped",
            mode,
            report.updated,
            report.skipped
        );
        Ok(report)
    }
}

/// First [`PREVIEW_CHARS`] characters of a body, with an ellipsis when cut
pub fn preview(body: &str) -> String {
    let mut chars = body.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}…")
    } else {
        head
    }
}
