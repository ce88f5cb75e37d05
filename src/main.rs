mod config;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use graph::{
    Charset, CommitSource, Connector, GitWalker, GraphLayout, LoadOutcome, Paginator, Point,
    TextRenderer,
};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, Level};

use crate::config::Config;

#[derive(Parser)]
#[command(name = "railgraph")]
#[command(about = "Lay out git history as rails and connectors", long_about = None)]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the commit graph
    Log {
        /// Path to the repository
        #[arg(default_value = ".")]
        path: PathBuf,
        /// Commits per page
        #[arg(long)]
        page_size: Option<usize>,
        /// Number of pages to load
        #[arg(long)]
        pages: Option<usize>,
        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: Format,
        /// Use plain ASCII glyphs
        #[arg(long)]
        ascii: bool,
    },
    /// Show layout statistics
    Stats {
        /// Path to the repository
        #[arg(default_value = ".")]
        path: PathBuf,
        /// Commits per page
        #[arg(long)]
        page_size: Option<usize>,
        /// Number of pages to load
        #[arg(long)]
        pages: Option<usize>,
    },
}

/// Layout plus its projection, for renderers outside this process
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonOutput<'a> {
    layout: &'a GraphLayout,
    width: f32,
    height: f32,
    node_centers: Vec<Point>,
    connectors: Vec<Connector>,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

/// Refresh, then keep loading until `pages` pages are in or the source runs dry
async fn load_pages<S: CommitSource>(
    paginator: &Paginator<S>,
    pages: usize,
) -> Result<GraphLayout> {
    paginator.refresh().await?;
    let mut loaded = 1;

    while loaded < pages {
        match paginator.load_more().await? {
            LoadOutcome::Loaded { added } => {
                loaded += 1;
                info!(page = loaded, added, "loaded page");
            }
            LoadOutcome::Exhausted | LoadOutcome::Busy | LoadOutcome::Stale => break,
        }
    }

    let layout = paginator.layout();
    info!(
        repository = paginator.source().repository(),
        commits = layout.len(),
        rails = layout.rail_count,
        "history loaded"
    );
    Ok(layout)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = Config::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Log { path, page_size, pages, format, ascii } => {
            let walker = GitWalker::open(&path)?;
            let paginator = Paginator::new(walker, page_size.unwrap_or(config.page_size));
            let layout = load_pages(&paginator, pages.unwrap_or(config.pages)).await?;

            match format {
                Format::Text => {
                    let charset = if ascii || config.ascii {
                        Charset::Ascii
                    } else {
                        Charset::Unicode
                    };
                    let renderer = TextRenderer::new(charset, config.message_width);
                    for line in renderer.render_lines(&layout, None) {
                        println!("{}", line);
                    }
                    if paginator.with_session(|s| s.has_more()) {
                        println!("... more history available (--pages)");
                    }
                }
                Format::Json => {
                    let geometry = config.geometry;
                    let output = JsonOutput {
                        layout: &layout,
                        width: geometry.width(layout.rail_count),
                        height: geometry.height(layout.len()),
                        node_centers: layout
                            .nodes
                            .iter()
                            .map(|n| geometry.node_center(n.rail, n.row))
                            .collect(),
                        connectors: layout
                            .connections
                            .iter()
                            .map(|c| geometry.connector(c))
                            .collect(),
                    };
                    println!("{}", serde_json::to_string_pretty(&output)?);
                }
            }
        }
        Commands::Stats { path, page_size, pages } => {
            let walker = GitWalker::open(&path)?;
            let paginator = Paginator::new(walker, page_size.unwrap_or(config.page_size));
            let stats = load_pages(&paginator, pages.unwrap_or(config.pages)).await?.stats();

            println!("Commits:          {}", stats.total_commits);
            println!("Connections:      {}", stats.total_connections);
            println!("Merge commits:    {}", stats.merge_commits);
            println!("Root commits:     {}", stats.root_commits);
            println!("Dangling parents: {}", stats.dangling_parents);
            println!("Rails:            {}", stats.rail_count);
        }
    }

    Ok(())
}
