//! Batch command - render many invoice files to HTML.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use gstbill_core::{compute_summary, InvoiceDocument, InvoiceRenderer, TaxSummary};

use super::{load_config, read_document, renderer};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern of invoice JSON files
    #[arg(required = true)]
    input: String,

    /// Output directory (default: next to each input)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Also write a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Outcome of rendering a single file.
struct RenderResult {
    path: PathBuf,
    rendered: Option<(InvoiceDocument, TaxSummary)>,
    error: Option<String>,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let renderer = renderer(load_config(config_path)?);

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to render",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        tokio::fs::create_dir_all(output_dir).await?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let mut results = Vec::with_capacity(files.len());

    for path in files {
        match render_single_file(&path, &renderer, args.output_dir.as_deref()).await {
            Ok(rendered) => results.push(RenderResult {
                path,
                rendered: Some(rendered),
                error: None,
            }),
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to render {}: {}", path.display(), error_msg);
                    results.push(RenderResult {
                        path,
                        rendered: None,
                        error: Some(error_msg),
                    });
                } else {
                    error!("Failed to render {}: {}", path.display(), error_msg);
                    anyhow::bail!("Rendering failed: {}", error_msg);
                }
            }
        }

        pb.inc(1);
    }

    pb.finish_with_message("Complete");

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    println!();
    println!(
        "{} Rendered {} files in {:?}",
        style("✓").green(),
        results.len() - failed.len(),
        start.elapsed()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

async fn render_single_file(
    path: &Path,
    renderer: &InvoiceRenderer,
    output_dir: Option<&Path>,
) -> anyhow::Result<(InvoiceDocument, TaxSummary)> {
    let document = read_document(path).await?;
    let summary = compute_summary(&document);
    let html = renderer.render_with_summary(&document, &summary)?;

    let output_name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("invoice");
    let output_path = match output_dir {
        Some(dir) => dir.join(format!("{}.html", output_name)),
        None => path.with_extension("html"),
    };

    tokio::fs::write(&output_path, html).await?;
    debug!("Wrote {}", output_path.display());

    Ok((document, summary))
}

fn write_summary(path: &Path, results: &[RenderResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "number",
        "date",
        "buyer",
        "subtotal",
        "tax",
        "grand",
        "rounded",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_string();

        let record = match &result.rendered {
            Some((document, summary)) => [
                filename,
                "success".to_string(),
                document.number.clone().unwrap_or_default(),
                document.date.map(|d| d.to_string()).unwrap_or_default(),
                document.buyer.name().unwrap_or_default(),
                summary.totals.subtotal.to_string(),
                summary.totals.tax_total.to_string(),
                summary.totals.grand.to_string(),
                summary.totals.rounded.to_string(),
                String::new(),
            ],
            None => [
                filename,
                "error".to_string(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                result.error.clone().unwrap_or_default(),
            ],
        };
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}
