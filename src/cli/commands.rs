use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "newest-post")]
#[command(about = "Injects the newest feed post into a static HTML page")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Where to read the feed from
#[derive(Args, Debug, Clone, Default)]
pub struct FeedArgs {
    /// Feed URL or local path (defaults to /rss.xml under the site URL)
    #[arg(short, long)]
    pub feed: Option<String>,

    /// Base URL of the site serving the feed
    #[arg(long)]
    pub site_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the newest post in the feed
    Show {
        #[command(flatten)]
        feed: FeedArgs,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write the newest post's title into an HTML page
    Inject {
        /// HTML page to update
        #[arg(short, long)]
        page: String,

        /// Output file path (updates the page in place if not specified)
        #[arg(short, long)]
        output: Option<String>,

        #[command(flatten)]
        feed: FeedArgs,

        /// Class marking the element to update
        #[arg(long)]
        marker_class: Option<String>,

        /// Class added to the updated element
        #[arg(long)]
        presentation_class: Option<String>,

        /// Render the title as a link to the post
        #[arg(long)]
        link_title: bool,

        /// Write an empty title when the feed has no posts instead of failing
        #[arg(long)]
        allow_empty: bool,

        /// Dry run - print the updated page instead of writing it
        #[arg(long)]
        dry_run: bool,
    },
}
