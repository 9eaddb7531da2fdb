use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use revsync::utils::now_iso;
use revsync::{
    check_mismatch_all, reconcile_all, PromoteStrategy, SyncConfig, TargetMismatches,
};
use serde_json::json;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_LEVEL: &str = "warn";

/// Revsync - keep the highest revision of each drawing across folders
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log filter (e.g. "info", "revsync=debug")
    #[arg(long, env = "REVSYNC_LOG", default_value = DEFAULT_LOG_LEVEL, global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug)]
struct Dirs {
    /// Source directory holding the new revisions
    #[arg(short, long, env = "REVSYNC_SOURCE")]
    source: PathBuf,

    /// Target directories, processed in the given order
    #[arg(
        short,
        long = "target",
        env = "REVSYNC_TARGETS",
        value_delimiter = ',',
        required = true
    )]
    targets: Vec<PathBuf>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replace older target drawings with higher source revisions
    Reconcile {
        #[command(flatten)]
        dirs: Dirs,

        /// Report what would happen without touching any file
        #[arg(long)]
        dry_run: bool,

        /// Stage the new file in the target folder before removing the old one
        #[arg(long)]
        staged: bool,
    },
    /// List names present in only one of source and target
    Check {
        #[command(flatten)]
        dirs: Dirs,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&args.log_level)
                .with_context(|| format!("Invalid log filter: {}", args.log_level))?,
        )
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Command::Reconcile {
            dirs,
            dry_run,
            staged,
        } => {
            let config = SyncConfig {
                source: dirs.source,
                targets: dirs.targets,
                dry_run,
                strategy: if staged {
                    PromoteStrategy::StageThenSwap
                } else {
                    PromoteStrategy::DeleteThenMove
                },
            };
            config.validate()?;

            let batch = reconcile_all(&config.source, &config.targets, config.reconcile_options())
                .context("Reconciliation failed")?;

            if dirs.json {
                let report = json!({
                    "generatedAt": now_iso(),
                    "dryRun": config.dry_run,
                    "source": config.source,
                    "result": batch,
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for outcome in &batch.targets {
                    println!(
                        "{}: Updated: {}, Skipped: {}",
                        outcome.target.display(),
                        outcome.result.updated,
                        outcome.result.skipped
                    );
                }
                if config.dry_run {
                    println!("(dry run, no files changed)");
                }
            }

            info!(
                updated = batch.total.updated,
                skipped = batch.total.skipped,
                "Done"
            );
        }
        Command::Check { dirs } => {
            let config = SyncConfig::new(dirs.source, dirs.targets);
            config.validate()?;

            let reports = check_mismatch_all(&config.source, &config.targets)
                .context("Mismatch check failed")?;

            if dirs.json {
                let report = json!({
                    "generatedAt": now_iso(),
                    "source": config.source,
                    "targets": reports,
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_mismatches(&reports);
            }
        }
    }

    Ok(())
}

fn print_mismatches(reports: &[TargetMismatches]) {
    for report in reports {
        println!("{}:", report.target.display());
        if report.entries.is_empty() {
            println!("  All files matched.");
        }
        for entry in &report.entries {
            println!("  {}", entry);
        }
    }
}
