//! CLI for GST invoices: tax summaries, amounts in words and HTML rendering.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{batch, config, render, summary, words};

/// GST invoice tool - summarise, spell out and render invoices
#[derive(Parser)]
#[command(name = "gstbill")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the GST summary of an invoice
    Summary(summary::SummaryArgs),

    /// Render an invoice or quotation to HTML
    Render(render::RenderArgs),

    /// Render many invoice files
    Batch(batch::BatchArgs),

    /// Show an amount as rupees and in words
    Words(words::WordsArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Summary(args) => summary::run(args, cli.config.as_deref()).await,
        Commands::Render(args) => render::run(args, cli.config.as_deref()).await,
        Commands::Batch(args) => batch::run(args, cli.config.as_deref()).await,
        Commands::Words(args) => words::run(args).await,
        Commands::Config(args) => config::run(args, cli.config.as_deref()).await,
    }
}
