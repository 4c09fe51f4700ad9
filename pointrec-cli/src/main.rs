use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use pointrec_core::{available_periods, reconcile, ReconParams, Reconciliation};
use pointrec_ingest::parse_points_csv;
use pointrec_report::{write_csv, ReportView};
use std::fs::File;
use std::path::PathBuf;

mod config;
mod state;

#[derive(Parser, Debug)]
#[command(name = "pointrec", version, about = "Loyalty-point ledger reconciliation")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Reconcile a point-history CSV and print the selected view
    Reconcile {
        /// Path to the point-history CSV export
        #[arg(long)]
        csv: PathBuf,

        /// Accounting period (YYYY-MM); omit for all periods
        #[arg(long)]
        period: Option<String>,

        /// Keep canceled orders in every computation
        #[arg(long)]
        include_canceled: bool,

        /// Case-insensitive label filter
        #[arg(long)]
        search: Option<String>,

        /// View to print: earn, merchant, product, user
        #[arg(long, default_value = "user")]
        view: String,

        /// Also write the view as CSV to this path
        #[arg(long)]
        out: Option<PathBuf>,

        /// Config file overriding ~/.pointrec/config.toml
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List accounting periods present in a CSV, newest first
    Periods {
        #[arg(long)]
        csv: PathBuf,

        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Config management
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config file
    Init {
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Reconcile {
            csv,
            period,
            include_canceled,
            search,
            view,
            out,
            config,
        } => {
            let view = ReportView::from_name(&view)
                .ok_or_else(|| anyhow!("unknown view: {view} (expected earn, merchant, product, user)"))?;
            let (rows, cfg) = load_rows(&csv, config.as_deref())?;

            let params = ReconParams {
                period,
                include_canceled,
                search: search.unwrap_or_default(),
            };
            let recon = reconcile(&rows, &cfg.denylist_set(), &params);

            print_summary(&recon, &params);
            print_view(&recon, view);

            if let Some(out) = out {
                let file = File::create(&out)
                    .with_context(|| format!("creating {}", out.display()))?;
                write_csv(&recon, view, file)?;
                println!("\nWrote {}", out.display());
            }
        }

        Command::Periods { csv, config } => {
            let (rows, cfg) = load_rows(&csv, config.as_deref())?;
            let real = pointrec_core::apply_denylist(&rows, &cfg.denylist_set());
            let valid = pointrec_core::exclude_canceled(&real, false);
            for period in available_periods(&valid) {
                println!("{period}");
            }
        }

        Command::Config { command } => match command {
            ConfigCommand::Init { config } => {
                config::init_config(config.as_deref())?;
            }
        },
    }

    Ok(())
}

fn load_rows(
    csv: &std::path::Path,
    config: Option<&std::path::Path>,
) -> Result<(Vec<pointrec_core::TransactionRecord>, config::Config)> {
    if !csv.exists() {
        bail!("CSV not found: {} (pass --csv <path>)", csv.display());
    }
    let rows = parse_points_csv(csv).with_context(|| format!("parsing {}", csv.display()))?;
    let cfg = config::load_config(config)?;
    Ok((rows, cfg))
}

fn print_summary(recon: &Reconciliation, params: &ReconParams) {
    let period = params.period.as_deref().unwrap_or("all periods");
    println!("# {period}\n");
    println!(
        "Carryover: {} | Earned: +{} ({}) | Used: {} ({}) | Balance: {}",
        recon.totals.carryover,
        recon.totals.earned,
        recon.totals.earn_count,
        recon.totals.used,
        recon.totals.use_count,
        recon.totals.balance
    );
    println!(
        "Canceled rows: {} ({})",
        recon.canceled_count,
        if params.include_canceled { "included" } else { "excluded" }
    );
    if recon.mismatch_count > 0 {
        println!("Mismatched ledgers: {}", recon.mismatch_count);
    }
    println!();
}

fn print_view(recon: &Reconciliation, view: ReportView) {
    match view {
        ReportView::Earn => {
            println!("{} earn categories:", recon.earn_categories.len());
            for c in &recon.earn_categories {
                println!("  +{:>8} | {:>3} users | {}", c.total_point, c.user_count, c.label);
            }
        }
        ReportView::Merchant => {
            println!("{} merchants:", recon.merchants.len());
            for m in &recon.merchants {
                println!("  {:>8} | {:>3} users | {}", m.used_point, m.user_count, m.label);
            }
        }
        ReportView::Product => {
            println!("{} products:", recon.products.len());
            for p in &recon.products {
                println!("  {:>8} | {:>3} users | {}", p.used_point, p.user_count, p.label);
            }
        }
        ReportView::User => {
            println!("{} users:", recon.ledgers.len());
            for u in &recon.ledgers {
                let check = if u.mismatch {
                    format!("MISMATCH calc={}", u.calculated_point)
                } else {
                    "ok".to_string()
                };
                println!(
                    "  {} ({}) | start {} | earned +{} | used {} | balance {} | {}",
                    u.name, u.id, u.start_point, u.earned_point, u.used_point, u.current_point, check
                );
            }
        }
    }
}
