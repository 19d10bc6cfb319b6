//! Command-line argument definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Main CLI application
#[derive(Parser, Debug)]
#[command(
    name = "folio",
    version,
    about = "Content pipeline for a portfolio site",
    long_about = "folio reads the blog, master-react and writing collections of a site, \
                  renders them to HTML, and runs one-shot maintenance over the content \
                  directory such as the writing prompt migration."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Site root; collections live under <ROOT>/content
    #[arg(long, global = true, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// YAML configuration file (overrides --root)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Move "> Prompt:" lines of writing prompts into their title
    MigratePrompts(MigrateArgs),
    /// List the published items of a collection
    List(ListArgs),
    /// Render one item to HTML
    Render(RenderArgs),
    /// Show blog tags with post counts
    Tags,
    /// Load and render every published item; fails on the first error
    Check,
    /// Print the code highlighting stylesheet
    Css,
}

#[derive(Args, Debug, Clone)]
pub struct MigrateArgs {
    /// Show what would change without writing anything
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Collection to list
    #[arg(value_enum)]
    pub collection: CollectionName,

    /// Only posts with this tag (blog and master-react)
    #[arg(long)]
    pub tag: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "human")]
    pub format: ListFormat,
}

#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    /// Collection the item belongs to
    #[arg(value_enum)]
    pub collection: CollectionName,

    /// Slug of the item (file name without extension)
    pub slug: String,

    /// Output format
    #[arg(long, value_enum, default_value = "html")]
    pub format: RenderFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionName {
    Blog,
    MasterReact,
    Writing,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFormat {
    /// One line per item
    Human,
    /// JSON array
    Json,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderFormat {
    /// The HTML fragment only
    Html,
    /// Slug, metadata and HTML as JSON
    Json,
}
