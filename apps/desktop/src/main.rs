use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use client_core::{explanation_line, AnalyzerClient};
use shared::protocol::AnalyzeRequest;

/// One-shot analyze client: posts text and/or a URL to the analyzer server
/// and prints the verdict.
#[derive(Parser, Debug)]
struct Args {
    #[arg(long, default_value = "http://127.0.0.1:5000")]
    server_url: String,
    /// Text to analyze.
    #[arg(long, default_value = "")]
    text: String,
    /// URL to analyze.
    #[arg(long, default_value = "")]
    url: String,
    /// Print the raw report JSON instead of the rendered summary.
    #[arg(long)]
    json: bool,
    /// Also write the report JSON to this file.
    #[arg(long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = Args::parse();

    let text = args.text.trim();
    let url = args.url.trim();
    if text.is_empty() && url.is_empty() {
        bail!("Please paste text or provide a URL");
    }

    let client = AnalyzerClient::new(args.server_url.as_str());
    let report = client
        .analyze(&AnalyzeRequest::new(text, url))
        .await
        .context("analyze request failed")?;

    let artifact = serde_json::to_string_pretty(&report)?;
    if args.json {
        println!("{artifact}");
    } else {
        println!("Verdict: {}", report.verdict);
        println!("Score: {}", report.score);
        println!("{}", explanation_line(&report.features));
        if !report.flagged_sentences.is_empty() {
            println!();
            println!("Flagged sentences:");
            for sentence in &report.flagged_sentences {
                println!("  - {sentence}");
            }
        }
        if !report.advice.is_empty() {
            println!();
            println!("Advice:");
            for line in &report.advice {
                println!("  - {line}");
            }
        }
    }

    if let Some(path) = args.output {
        std::fs::write(&path, &artifact)
            .with_context(|| format!("failed to write report to '{}'", path.display()))?;
        println!("Report saved to {}", path.display());
    }

    Ok(())
}
