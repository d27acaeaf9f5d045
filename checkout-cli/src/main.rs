use std::io;
use std::path::PathBuf;

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use tracing::debug;

use checkout_cli::app::{self, SubmitRun};
use checkout_cli::config::AppConfig;
use checkout_cli::prompt::Prompter;
use checkout_cli::{form_loader, logging};
use checkout_core::RawForm;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Closing-shift checkout for the restaurant sheet.
///
/// Loads the shift's figures from a CSV sheet, shows the derived metrics,
/// and after a staff login and confirmation appends one row to the shared
/// spreadsheet. Without an endpoint the remote side is simulated.
#[derive(Debug, Parser)]
#[command(name = "shift-checkout", version)]
struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Apps Script web-app URL. Overrides the configuration file.
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Seconds allowed for each remote call.
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_secs: Option<u64>,

    /// Log filter, e.g. `debug` or `checkout_remote=debug,info`.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Also append log records to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Hide log output on the terminal.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct SheetArgs {
    /// CSV sheet with one row per shift.
    #[arg(long)]
    form: PathBuf,

    /// 1-based data row to use; defaults to the last row.
    #[arg(long)]
    row: Option<usize>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Log in, review and submit a checkout.
    Submit {
        #[command(flatten)]
        sheet: SheetArgs,

        /// Checkout date (YYYY-MM-DD); replaces the sheet's date.
        #[arg(long)]
        date: Option<String>,

        /// Quick tag to toggle in the remarks. Repeatable.
        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// Print the derived metrics without logging in.
    Summary {
        #[command(flatten)]
        sheet: SheetArgs,
    },
}

// ─── helpers ─────────────────────────────────────────────────────────────────

/// Defaults, then the file, then the environment, then flags.
fn settings(cli: &Cli) -> anyhow::Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    config.apply_env()?;

    if let Some(endpoint) = &cli.endpoint {
        config.remote.endpoint = Some(endpoint.clone());
    }
    if let Some(secs) = cli.timeout_secs {
        config.remote.timeout_secs = Some(secs);
    }
    Ok(config)
}

fn apply_logging(
    cli: &Cli,
    config: &AppConfig,
) -> anyhow::Result<()> {
    if let Some(level) = cli.log_level.as_deref().or(config.logging.level.as_deref()) {
        logging::set_log_level(level)?;
    }
    if let Some(path) = cli.log_file.as_deref().or(config.logging.file.as_deref()) {
        logging::enable_file_logging(path)?;
    }
    if cli.quiet {
        logging::set_terminal_enabled(false)?;
    }
    Ok(())
}

fn load_form(
    sheet: &SheetArgs,
    date: Option<&str>,
    today: NaiveDate,
    tags: &[String],
) -> anyhow::Result<RawForm> {
    let forms = form_loader::load_from_file(&sheet.form)
        .with_context(|| format!("loading {}", sheet.form.display()))?;
    let form = form_loader::select_row(forms, sheet.row)?;
    Ok(app::prepare_form(form, date, today, tags))
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_default_logging();

    let cli = Cli::parse();
    let config = settings(&cli)?;
    apply_logging(&cli, &config)?;

    let today = Local::now().date_naive();

    match &cli.command {
        Command::Summary { sheet } => {
            let form = load_form(sheet, None, today, &[])?;
            print!("{}", app::render_summary(&form));
        }
        Command::Submit { sheet, date, tags } => {
            let mut form = load_form(sheet, date.as_deref(), today, tags)?;

            let remote = config.remote_config();
            debug!(backend = remote.backend_name(), "creating remote service");
            let service = checkout_remote::default_registry().create(&remote).await?;

            let mut prompter = Prompter::new(io::stdin().lock(), io::stdout().lock());
            if let SubmitRun::Submitted(_) = app::run_submit(&*service, &mut form, &mut prompter).await? {
                debug!(date = %form.date, "form cleared for the next entry");
            }
        }
    }

    Ok(())
}
