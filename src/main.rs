use anyhow::Result;
use clap::Parser;
use folio::{Site, SiteConfig};
use log::LevelFilter;

mod cli_bin;

use cli_bin::args::{Cli, Commands};
use cli_bin::commands;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    let config = match &cli.config {
        Some(path) => SiteConfig::load(path)?,
        None => SiteConfig::for_root(&cli.root),
    };
    log::debug!("Content root: {}", config.content_root.display());
    let site = Site::new(config)?;

    match cli.command {
        Commands::MigratePrompts(args) => commands::migrate_prompts_command(&site, args, cli.verbose),
        Commands::List(args) => commands::list_command(&site, args),
        Commands::Render(args) => commands::render_command(&site, args),
        Commands::Tags => commands::tags_command(&site),
        Commands::Check => commands::check_command(&site),
        Commands::Css => commands::css_command(&site),
    }
}

// RUST_LOG, when set, takes precedence over -v/-q.
fn init_logging(cli: &Cli) {
    let level = if cli.verbose {
        LevelFilter::Debug
    } else if cli.quiet {
        LevelFilter::Error
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}
