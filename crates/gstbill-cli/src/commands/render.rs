//! Render command - write an invoice or quotation as HTML.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::debug;

use super::{load_config, read_document, renderer, report_issues};

/// Arguments for the render command.
#[derive(Args)]
pub struct RenderArgs {
    /// Invoice JSON file
    #[arg(required = true)]
    input: PathBuf,

    /// Output HTML file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Report validation issues
    #[arg(long)]
    validate: bool,
}

pub async fn run(args: RenderArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let document = read_document(&args.input).await?;

    if args.validate {
        report_issues(&document);
    }

    let html = renderer(config).render(&document)?;

    if let Some(output_path) = &args.output {
        tokio::fs::write(output_path, &html).await?;
        println!(
            "{} Rendered {} to {}",
            style("✓").green(),
            args.input.display(),
            output_path.display()
        );
    } else {
        println!("{}", html);
    }

    debug!("Render time: {:?}", start.elapsed());

    Ok(())
}
