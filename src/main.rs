mod config;
mod error;
mod mail;
mod report;
mod vtex;
mod window;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tabled::{settings::Style, Table, Tabled};
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

use crate::config::{
    config_dir, load_config, load_sellers, resolve_path, Secrets, CONFIG_TEMPLATE,
    SELLERS_TEMPLATE,
};
use crate::error::{ReportError, Result};
use crate::report::generate_report;
use crate::window::ReportWindow;

#[derive(Parser)]
#[command(name = "circreport")]
#[command(version, about = "Daily seller circularization report generator", long_about = None)]
struct Cli {
    /// Path to config directory (default: ~/.circreport or XDG config)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory with template files
    Init,

    /// Run the daily report pipeline (defaults to yesterday's window)
    Run {
        /// Report on an explicit business date instead of yesterday (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,

        /// Write the report files but do not email them
        #[arg(long)]
        skip_email: bool,
    },

    /// List active sellers from the seller directory
    Sellers,

    /// Print the report window that a run would use
    Window {
        /// Compute the window for an explicit business date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },
}

fn main() {
    if let Err(e) = run() {
        tracing::error!("{e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Determine config directory
    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };

    match cli.command {
        Commands::Init => cmd_init(&cfg_dir),
        Commands::Run { date, skip_email } => cmd_run(&cfg_dir, date, skip_email),
        Commands::Sellers => cmd_sellers(&cfg_dir),
        Commands::Window { date } => cmd_window(date),
    }
}

/// Initialize config directory with template files
fn cmd_init(cfg_dir: &PathBuf) -> Result<()> {
    if cfg_dir.exists() {
        return Err(ReportError::AlreadyInitialized(cfg_dir.clone()));
    }

    fs::create_dir_all(cfg_dir)?;
    fs::write(cfg_dir.join("config.toml"), CONFIG_TEMPLATE)?;
    fs::write(cfg_dir.join("sellers.csv"), SELLERS_TEMPLATE)?;

    println!("Initialized circreport config at: {}", cfg_dir.display());
    println!();
    println!("Next steps:");
    println!(
        "  1. Edit API and mail settings:   $EDITOR {}/config.toml",
        cfg_dir.display()
    );
    println!(
        "  2. Fill in the seller directory: $EDITOR {}/sellers.csv",
        cfg_dir.display()
    );
    println!(
        "  3. Export credentials:           {}, {}, {}, {}",
        config::ENV_APP_KEY,
        config::ENV_APP_TOKEN,
        config::ENV_SMTP_USER,
        config::ENV_SMTP_PASSWORD
    );
    println!();
    println!("Then run the daily report:");
    println!("  circreport run");

    Ok(())
}

#[derive(Tabled)]
struct SellerRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "EMAIL TO")]
    email_to: String,
    #[tabled(rename = "EMAIL CC")]
    email_cc: String,
}

/// List active sellers
fn cmd_sellers(cfg_dir: &PathBuf) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(ReportError::ConfigNotFound(cfg_dir.clone()));
    }

    let cfg = load_config(cfg_dir)?;
    let sellers_file = resolve_path(&cfg.report.sellers_file, cfg_dir);
    let sellers = load_sellers(&sellers_file)?;

    if sellers.is_empty() {
        println!("No active sellers configured.");
        println!("Add sellers to: {}", sellers_file.display());
        return Ok(());
    }

    let rows: Vec<SellerRow> = sellers
        .iter()
        .map(|seller| SellerRow {
            id: seller.id.clone(),
            name: seller.display_name.clone(),
            email_to: seller.email_to.join("; "),
            email_cc: seller.email_cc.join("; "),
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");

    Ok(())
}

/// Print the report window
fn cmd_window(date: Option<String>) -> Result<()> {
    let window = window_for(date)?;

    println!("Report window");
    println!("{}", "-".repeat(50));
    println!("Business date: {} ({})", window.date_iso, window.date_label);
    println!("UTC start:     {}", window.start_utc);
    println!("UTC end:       {}", window.end_utc);
    println!("File suffix:   {}", window.date_suffix);

    Ok(())
}

/// Run the daily pipeline
fn cmd_run(cfg_dir: &PathBuf, date: Option<String>, skip_email: bool) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(ReportError::ConfigNotFound(cfg_dir.clone()));
    }

    let cfg = load_config(cfg_dir)?;
    // Credentials are validated before any directory or network I/O
    let secrets = Secrets::from_env()?;

    let log_dir = resolve_path(&cfg.report.log_dir, cfg_dir);
    init_logging(&log_dir)?;

    let window = window_for(date)?;
    tracing::info!(
        "report window {} .. {} ({})",
        window.start_utc,
        window.end_utc,
        window.date_label
    );

    generate_report(&cfg, &secrets, &window, cfg_dir, skip_email)
}

fn window_for(date: Option<String>) -> Result<ReportWindow> {
    match date {
        Some(value) => {
            let parsed = NaiveDate::parse_from_str(&value, "%Y-%m-%d").map_err(|_| {
                ReportError::InvalidDate {
                    value,
                    expected: "YYYY-MM-DD",
                }
            })?;
            Ok(ReportWindow::for_date(parsed))
        }
        None => Ok(ReportWindow::yesterday()),
    }
}

/// Log to stdout and an append-mode file under the configured log dir
fn init_logging(log_dir: &PathBuf) -> Result<()> {
    fs::create_dir_all(log_dir)?;
    let log_file = fs::File::options()
        .create(true)
        .append(true)
        .open(log_dir.join("circreport.log"))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(std::io::stdout.and(Arc::new(log_file)))
        .init();

    Ok(())
}
