//! Command line front end for the modpack fetcher
//!
//! ```bash
//! modpack-fetcher "C:\Packs\MyPack\modlist.html" --api-key '$2a$10$...'
//! ```

use anyhow::Context;
use clap::Parser;
use modpack_fetcher::{
    ConsolePrompter, DownloadConfig, DownloadError, InputResolver, ModOutcome, ModlistDownloadBuilder,
    UserEnvironmentStore,
};
use std::path::PathBuf;
use std::process::ExitCode;

/// Download every mod listed in a CurseForge modpack export
#[derive(Debug, Parser)]
#[command(name = "modpack-fetcher", version, about)]
struct Args {
    /// Path to the modpack's modlist.html (prompted for when omitted)
    modlist: Option<String>,

    /// CurseForge API key; saved for later runs
    #[arg(long, value_name = "KEY")]
    api_key: Option<String>,

    /// Directory that receives the Modpack_<timestamp> folder
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Do not open the mods folder in the file browser
    #[arg(long)]
    no_open: bool,

    /// Download each listed mod only once
    #[arg(long)]
    dedup: bool,

    /// Fail instead of prompting for missing input
    #[arg(long)]
    non_interactive: bool,

    /// Show debug logging and per-mod detail
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    dotenv::dotenv().ok();

    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<DownloadError>() {
                Some(download_error) => eprint!("{}", download_error.detailed_report()),
                None => eprintln!("Error: {:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let store = UserEnvironmentStore::new()?;
    let mut resolver = InputResolver::new(store, ConsolePrompter::stdio());
    if args.non_interactive {
        resolver = resolver.non_interactive();
    }

    let modlist_path = resolver.resolve_modlist_path(args.modlist.as_deref())?;
    let api_key = resolver.resolve_api_key(args.api_key.as_deref())?;
    tracing::debug!("Using API key {}", api_key.masked());

    let mut builder = ModlistDownloadBuilder::new(&modlist_path)
        .api_key(api_key)
        .config(DownloadConfig::from_env())
        .open_folder(!args.no_open)
        .dedup_slugs(args.dedup)
        .with_console_progress(args.verbose);
    if let Some(dir) = &args.output_dir {
        builder = builder.output_root(dir);
    }

    let result = builder
        .download()
        .await
        .with_context(|| format!("Modpack run for {} failed", modlist_path.display()))?;

    for report in &result.reports {
        if let ModOutcome::Failed { error } = &report.outcome {
            eprintln!("  {} failed: {}", report.slug, error);
        }
    }
    for line in &result.malformed_lines {
        eprintln!("  Skipped modlist line {}: {}", line.line_number, line.reason);
    }
    println!("{}", result.summary());
    println!("Mods saved in {}", result.session_folder.display());

    Ok(())
}
