use std::fs;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use newest_post::cli::{Cli, Commands, FeedArgs};
use newest_post::config::Config;
use newest_post::errors::PostResult;
use newest_post::page::Page;
use newest_post::services::{InjectOptions, PostService};
use newest_post::sources::FeedSource;

fn main() {
    init_tracing();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run() -> PostResult<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_env()?;

    match cli.command {
        Commands::Show { feed, json } => cmd_show(&feed, &config, json),
        Commands::Inject {
            page,
            output,
            feed,
            marker_class,
            presentation_class,
            link_title,
            allow_empty,
            dry_run,
        } => {
            let mut options = InjectOptions::from_config(&config);
            if let Some(marker_class) = marker_class {
                options.marker_class = marker_class;
            }
            if let Some(presentation_class) = presentation_class {
                options.presentation_class = presentation_class;
            }
            options.link_title = link_title;
            options.allow_empty = allow_empty;

            cmd_inject(&page, output, &feed, &config, &options, dry_run)
        }
    }
}

fn post_service(feed: &FeedArgs, config: &Config) -> PostResult<PostService<Box<dyn FeedSource>>> {
    let location = feed.location(config)?;
    tracing::debug!(location = %location, "Resolved feed location");

    Ok(PostService::new(location.into_source(config.timeout)))
}

fn cmd_show(feed: &FeedArgs, config: &Config, json: bool) -> PostResult<()> {
    let service = post_service(feed, config)?;
    let summary = service.summary()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Newest post: {}", summary.post.post_title);
        println!("  URL: {}", summary.post.post_url);
        if let Some(published) = summary.published {
            println!("  Published: {}", published.format("%Y-%m-%d %H:%M UTC"));
        }
    }

    Ok(())
}

fn cmd_inject(
    page_path: &str,
    output: Option<String>,
    feed: &FeedArgs,
    config: &Config,
    options: &InjectOptions,
    dry_run: bool,
) -> PostResult<()> {
    let source = fs::read_to_string(page_path)?;
    let mut page = Page::parse(&source);

    let service = post_service(feed, config)?;
    let post = service.update_page(&mut page, options)?;
    if post.is_empty() {
        tracing::warn!("Feed has no posts, writing an empty title");
    }
    let rendered = page.render();

    if dry_run {
        println!("{}", rendered);
        return Ok(());
    }

    let target = output.unwrap_or_else(|| page_path.to_string());
    fs::write(&target, rendered)?;
    println!("Updated {}: {}", target, post.post_title);

    Ok(())
}
