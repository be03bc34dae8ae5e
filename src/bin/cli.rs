//! MMSpider CLI
//!
//! Local execution entry point, intended to be invoked from a scheduler
//! (e.g. cron). Runs are discrete and fully sequential; concurrent runs
//! against the same storage directory are not supported.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use mmspider::{
    config::load_config,
    error::Result,
    models::ToolKind,
    notify::{MailMessage, MailTransport, Sendmail},
    pipeline::{ChangeTracker, ReportComposer, run_check},
    services::{parse_assignments, parse_module_list},
    session::{Fetch, PortalSession},
    storage::{LocalStore, SnapshotStore},
};

/// MMSpider - coursework change notifier
#[derive(Parser, Debug)]
#[command(name = "mmspider", version, about = "Coursework change notifier for MMS")]
struct Cli {
    /// Path to storage directory containing config and snapshots
    #[arg(short, long, default_value = "storage")]
    storage_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check every coursework tool and email any changes
    Check {
        /// Print the report instead of emailing it
        #[arg(long)]
        dry_run: bool,
    },

    /// List modules, tools, and assignments for the configured year
    Modules,

    /// Validate the configuration file
    Validate,

    /// Show snapshot store info
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli.storage_dir.join("config.toml");
    let config = load_config(&config_path)?;
    log::info!("Loaded configuration from {}", config_path.display());

    let store_path = cli.storage_dir.join(&config.store.file);

    match cli.command {
        Command::Check { dry_run } => {
            let mut session =
                PortalSession::new(config.portal.clone(), config.credentials.clone())?;
            let store = LocalStore::open(&store_path)?;
            let mut tracker = ChangeTracker::new(store);

            let outcome = run_check(&config, &mut session, &mut tracker)?;
            log::info!(
                "Checked {} tool(s) across {} module(s), {} parse failure(s)",
                outcome.tools_checked,
                outcome.modules_seen,
                outcome.parse_failures
            );

            if !outcome.has_changes() {
                log::info!("No changes!");
                return Ok(());
            }

            let composer = ReportComposer::new(&config.notify.preamble);
            let body = composer.compose(&mut session, &outcome.diffs);

            if dry_run {
                println!("{body}");
            } else {
                let message = MailMessage {
                    from: config.notify.email.clone(),
                    to: config.notify.email.clone(),
                    subject: config.notify.subject.clone(),
                    body,
                };
                Sendmail::new(&config.notify.sendmail_path).send(&message)?;
                log::info!("Email sent!");
            }
        }

        Command::Modules => {
            let mut session =
                PortalSession::new(config.portal.clone(), config.credentials.clone())?;

            let html = session.fetch(&config.portal.modules_url())?;
            let modules = parse_module_list(&html, &config.portal.base_url)?;

            for module in &modules {
                println!(
                    "Module name: {}, code: {}, semester: {}",
                    module.name, module.code, module.semester
                );

                for tool in module.coursework_tools() {
                    let page = session.fetch(&tool.url)?;
                    for assignment in parse_assignments(&page, &tool.url)? {
                        println!("{assignment}");
                    }
                }

                println!("Tools:");
                for tool in &module.tools {
                    println!(
                        "Tool name: {}, Tool Type: {}, Tool URL: {}",
                        tool.name, tool.kind, tool.url
                    );
                }
            }

            let coursework_count: usize = modules
                .iter()
                .map(|m| m.tools_of_kind(ToolKind::Coursework).count())
                .sum();
            log::info!(
                "{} module(s), {} coursework tool(s)",
                modules.len(),
                coursework_count
            );
        }

        Command::Validate => {
            log::info!("Validating configuration...");
            config.validate()?;
            log::info!("Config OK");
        }

        Command::Info => {
            log::info!("Storage directory: {}", cli.storage_dir.display());

            if !store_path.exists() {
                log::info!("No snapshot store found yet.");
                return Ok(());
            }

            let store = LocalStore::open(&store_path)?;
            log::info!("Snapshot store: {}", store_path.display());
            log::info!("Tracked tools: {}", store.len());

            let mut total = 0;
            for fingerprint in store.fingerprints() {
                if let Some(snapshot) = store.load(&fingerprint)? {
                    total += snapshot.len();
                }
            }
            log::info!("Tracked assignments: {total}");
        }
    }

    Ok(())
}
