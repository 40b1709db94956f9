// Command-line front end for the HTML export converter.
//
// Resolves the entry document, runs one export and prints where the merged
// PDF was written.

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser, ValueEnum};
use kodegen_tools_html2pdf::{CapPolicy, ExportConfig, FailurePolicy, resolve_entry};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "kodegen-html2pdf",
    version,
    about = "Convert a local HTML export into a single PDF",
    long_about = "Walks every .html document reachable from the entry page depth-first, \
                  prints each to PDF with Chromium and merges them in discovery order."
)]
#[command(group(ArgGroup::new("source").required(true).args(["url", "entry"])))]
struct Cli {
    /// file:// URL of the entry document
    #[arg(short, long)]
    url: Option<String>,

    /// Entry document, or a directory holding the export
    #[arg(short, long)]
    entry: Option<PathBuf>,

    /// Working directory for intermediates and the merged export
    #[arg(short, long, default_value = "./out")]
    out_dir: PathBuf,

    /// Maximum number of documents to export
    #[arg(long, env = "HTML2PDF_MAX_PAGES")]
    max_pages: Option<usize>,

    /// Wall-clock limit for the whole run, 0 disables it
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// What to do when the page cap is reached
    #[arg(long, value_enum, default_value_t = CapPolicyArg::Warn)]
    cap_policy: CapPolicyArg,

    /// Leave failed documents out instead of aborting the export
    #[arg(long)]
    skip_failed_branches: bool,

    /// Show the browser window (debug builds only)
    #[arg(long)]
    headed: bool,

    /// Print the export outcome as JSON instead of the export path
    #[arg(long)]
    json: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CapPolicyArg {
    Ignore,
    Warn,
    Fail,
}

impl From<CapPolicyArg> for CapPolicy {
    fn from(arg: CapPolicyArg) -> Self {
        match arg {
            CapPolicyArg::Ignore => CapPolicy::Ignore,
            CapPolicyArg::Warn => CapPolicy::Warn,
            CapPolicyArg::Fail => CapPolicy::Fail,
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("info,chromiumoxide::handler=off,chromiumoxide::conn=off")
    });

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("Fatal error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let entry_url = match (cli.url, cli.entry) {
        (Some(url), _) => url,
        (None, Some(path)) => resolve_entry(&path)?.to_string(),
        (None, None) => anyhow::bail!("Either --url or --entry is required"),
    };

    let mut builder = ExportConfig::builder()
        .working_dir(cli.out_dir)
        .entry_url(entry_url)
        .cap_policy(cli.cap_policy.into())
        .headless(!cli.headed);

    if let Some(max_pages) = cli.max_pages {
        builder = builder.max_pages(max_pages);
    }
    if let Some(secs) = cli.timeout_secs {
        builder = builder.run_timeout_secs((secs > 0).then_some(secs));
    }
    if cli.skip_failed_branches {
        builder = builder.failure_policy(FailurePolicy::SkipBranch);
    }

    let config = builder.build().context("Invalid export configuration")?;
    let outcome = kodegen_tools_html2pdf::export(config).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    if outcome.truncated > 0 {
        eprintln!(
            "Page cap reached: {} documents were not exported",
            outcome.truncated
        );
    }
    for url in &outcome.failed {
        eprintln!("Skipped after failure: {url}");
    }
    println!("{}", outcome.export_path.display());
    Ok(())
}
