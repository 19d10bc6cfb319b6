//! CLI command handlers
//!
//! Each handler takes the assembled [`Site`] and its parsed arguments, calls
//! into the library and prints the result to stdout. Progress goes to the log.

use crate::cli_bin::args::*;
use anyhow::{Context, Result};
use folio::migrate::{MigrationOutcome, PromptMigrator, RunMode};
use folio::{Metadata, PostCollection, RenderedPost, Site};
use log::{debug, info, warn};
use serde::Serialize;

/// Listing entry for `list --format json`; the HTML is left out
#[derive(Serialize)]
struct ListedPost<'a> {
    slug: &'a str,
    metadata: &'a Metadata,
}

/// Execute the migrate-prompts command
pub fn migrate_prompts_command(site: &Site, args: MigrateArgs, verbose: bool) -> Result<()> {
    let collection = site.writing().collection().clone();
    debug!(
        "Migrating prompts in {} (dry run: {})",
        collection.dir().display(),
        args.dry_run
    );

    let mode = if args.dry_run {
        RunMode::DryRun
    } else {
        RunMode::Apply
    };
    let report = PromptMigrator::new(collection)
        .run(mode)
        .context("prompt migration aborted")?;

    for entry in &report.entries {
        let file = entry.path.display();
        match &entry.outcome {
            MigrationOutcome::Skipped => println!("[skip] {file}: no \"> Prompt:\" line"),
            MigrationOutcome::Updated {
                title,
                preview,
                diff,
            } => {
                if args.dry_run {
                    println!("[dry-run] {file}");
                    println!("  title: {title}");
                    println!("  body:  {}", preview.replace('\n', "\\n"));
                    if verbose {
                        if let Some(diff) = diff {
                            println!("{diff}");
                        }
                    }
                } else {
                    println!("[ok] {file}");
                }
            }
        }
    }

    let verb = if args.dry_run { "Would update" } else { "Updated" };
    println!(
        "{verb} {} files, skipped {}.",
        report.updated, report.skipped
    );
    Ok(())
}

/// Execute the list command
pub fn list_command(site: &Site, args: ListArgs) -> Result<()> {
    debug!("Listing {:?}", args.collection);

    let posts = match args.collection {
        CollectionName::Writing => {
            if args.tag.is_some() {
                warn!("Writing prompts have no tags; ignoring --tag");
            }
            return list_prompts(site, args.format);
        }
        CollectionName::Blog | CollectionName::MasterReact => {
            let collection = post_collection(site, args.collection);
            match &args.tag {
                Some(tag) => collection.with_tag(tag)?,
                None => collection.list_published()?,
            }
        }
    };

    match args.format {
        ListFormat::Json => {
            let listed: Vec<ListedPost> = posts
                .iter()
                .map(|post| ListedPost {
                    slug: post.slug(),
                    metadata: post.metadata(),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&listed)?);
        }
        ListFormat::Human => {
            for post in &posts {
                println!("{}", post_line(post));
            }
            info!("{} posts", posts.len());
        }
    }
    Ok(())
}

fn list_prompts(site: &Site, format: ListFormat) -> Result<()> {
    let prompts = site.writing().list_published()?;
    match format {
        ListFormat::Json => println!("{}", serde_json::to_string_pretty(&prompts)?),
        ListFormat::Human => {
            for prompt in &prompts {
                println!(
                    "{:>4}  {:<10}  {}  {}",
                    prompt.number, prompt.published_at, prompt.slug, prompt.prompt
                );
            }
            info!("{} prompts", prompts.len());
        }
    }
    Ok(())
}

fn post_line(post: &RenderedPost) -> String {
    let metadata = post.metadata();
    format!(
        "{:<10}  {}  {}",
        metadata.published_at().unwrap_or("-"),
        post.slug(),
        metadata.title().unwrap_or_default()
    )
}

/// Execute the render command
pub fn render_command(site: &Site, args: RenderArgs) -> Result<()> {
    debug!("Rendering {:?} '{}'", args.collection, args.slug);

    let (html, json) = match args.collection {
        CollectionName::Writing => {
            let prompt = site.writing().get_rendered(&args.slug)?;
            let json = serde_json::to_string_pretty(&prompt)?;
            (prompt.html, json)
        }
        CollectionName::Blog | CollectionName::MasterReact => {
            let post = post_collection(site, args.collection).get_rendered(&args.slug)?;
            let json = serde_json::to_string_pretty(&post)?;
            (post.html().to_string(), json)
        }
    };

    match args.format {
        RenderFormat::Html => print!("{html}"),
        RenderFormat::Json => println!("{json}"),
    }
    Ok(())
}

/// Execute the tags command
pub fn tags_command(site: &Site) -> Result<()> {
    let tags = site.blog().tags()?;
    if tags.is_empty() {
        info!("No tags found");
    }
    for (tag, count) in tags {
        println!("{tag} ({count})");
    }
    Ok(())
}

/// Execute the check command
///
/// Everything a static build would produce is loaded and rendered; the first
/// failure aborts with its error.
pub fn check_command(site: &Site) -> Result<()> {
    let blog = check_posts(site.blog(), "blog")?;
    let series = check_posts(site.master_react(), "master-react")?;

    let prompts = site
        .writing()
        .list_published()
        .context("checking writing")?;
    for prompt in &prompts {
        debug!("Checking prompt '{}'", prompt.slug);
        site.writing()
            .get_rendered(&prompt.slug)
            .with_context(|| format!("checking writing/{}", prompt.slug))?;
    }

    println!(
        "OK: {blog} blog posts, {series} master-react posts, {} writing prompts",
        prompts.len()
    );
    Ok(())
}

fn check_posts(collection: &PostCollection, name: &str) -> Result<usize> {
    let posts = collection
        .list_published()
        .with_context(|| format!("checking {name}"))?;
    Ok(posts.len())
}

/// Execute the css command
pub fn css_command(site: &Site) -> Result<()> {
    print!("{}", site.renderer().theme_css()?);
    Ok(())
}

fn post_collection(site: &Site, name: CollectionName) -> &PostCollection {
    match name {
        CollectionName::MasterReact => site.master_react(),
        _ => site.blog(),
    }
}

