//! fpval CLI
//!
//! Runs the valuation engine over snapshot files.
//!
//! ```bash
//! fpval report --snapshot snap.json --hints hints.json --seed 7 --out report.json
//! fpval entropy --snapshot snap.json
//! fpval harden --snapshot snap.json
//! fpval verify --report report.json
//! fpval schema --out snapshot.schema.json
//! ```

#[cfg(feature = "cli")]
use anyhow::Result;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "fpval")]
#[command(about = "Estimate what your browser fingerprint is worth to advertisers", long_about = None)]
struct Cli {
    /// Increase log verbosity (RUST_LOG takes precedence)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// YAML or JSON file overriding the built-in reference tables
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Generate a full valuation report
    Report {
        /// Snapshot JSON file
        #[arg(long)]
        snapshot: PathBuf,

        /// External hints JSON file ({ad_blocker, vpn, tor})
        #[arg(long)]
        hints: Option<PathBuf>,

        /// Seed for reproducible auction pricing
        #[arg(long)]
        seed: Option<u64>,

        /// Output file (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Single-line JSON
        #[arg(long, default_value = "false")]
        compact: bool,
    },

    /// Entropy breakdown only
    Entropy {
        #[arg(long)]
        snapshot: PathBuf,

        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Browser-specific hardening steps
    Harden {
        #[arg(long)]
        snapshot: PathBuf,

        #[arg(long)]
        hints: Option<PathBuf>,
    },

    /// Check a report's verification value
    Verify {
        #[arg(long)]
        report: PathBuf,
    },

    /// Print the snapshot JSON Schema
    Schema {
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[cfg(feature = "cli")]
fn init_tracing(verbose: u8) {
    let default = if verbose > 0 { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Report {
            snapshot,
            hints,
            seed,
            out,
            compact,
        } => {
            let config = fpval_cli::load_config(cli.config.as_deref())?;
            let report = fpval_cli::build_report(&snapshot, hints.as_deref(), config, seed)?;

            eprintln!(
                "{} | {:.1} bits | defense {:.0}/100 | grade {}",
                report.valuation.cpm_display,
                report.entropy.total_bits,
                report.defenses.score,
                report.report_card.grade.as_str()
            );
            fpval_cli::write_json(&report, out.as_deref(), !compact)?;
            if let Some(path) = out {
                eprintln!("📄 Report saved to: {}", path.display());
            }
        }

        Commands::Entropy { snapshot, out } => {
            let config = fpval_cli::load_config(cli.config.as_deref())?;
            let snap = fpval_cli::load_snapshot(&snapshot)?;
            let entropy = fpval_core::generate_entropy_report(&snap, &config.entropy);
            fpval_cli::write_json(&entropy, out.as_deref(), true)?;
        }

        Commands::Harden { snapshot, hints } => {
            let snap = fpval_cli::load_snapshot(&snapshot)?;
            let hints = fpval_cli::load_hints(hints.as_deref())?;
            let status = fpval_core::analyze_defenses(&snap, &hints);
            let guide = fpval_core::generate_hardening_guide(&snap, &status);
            print_guide(&guide);
        }

        Commands::Verify { report } => {
            let loaded = fpval_cli::load_report(&report)?;
            if fpval_core::verify_report(&loaded) {
                println!("✅ Verification passed ({})", loaded.meta.verification);
            } else {
                anyhow::bail!(
                    "❌ Verification failed for report {}",
                    loaded.meta.report_id
                );
            }
        }

        Commands::Schema { out } => {
            let schema = fpval_core::api::snapshot_schema_json()?;
            let value: serde_json::Value = serde_json::from_str(&schema)?;
            fpval_cli::write_json(&value, out.as_deref(), true)?;
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn print_guide(guide: &fpval_core::HardeningGuide) {
    println!("🛡️  Hardening guide for {}", guide.browser.as_str());
    println!(
        "   Score: {:.0} -> {:.0} (potential)",
        guide.current_score, guide.potential_score
    );
    if guide.steps.is_empty() {
        println!("\n✅ Nothing left to harden");
        return;
    }
    for (i, step) in guide.steps.iter().enumerate() {
        println!("\n{}. {} (+{:.1})", i + 1, step.title, step.points);
        println!("   {}", step.instructions);
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("fpval CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
