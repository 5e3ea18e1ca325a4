//! Audit run command

use clap::Args;
use geoaudit_core::logging_facility::{init, Profile};
use geoaudit_engine::{
    run_audit, AuditConfig, AuditOutcome, LayerStatus, Notifier, StdoutNotifier, TeamsNotifier,
    WfsSource,
};
use geoaudit_store::FsSnapshotStore;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct RunArgs {
    #[arg(long, default_value = "geoaudit.toml")]
    pub config: PathBuf,

    /// Overrides `snapshot_dir` from the configuration
    #[arg(long)]
    pub snapshot_dir: Option<PathBuf>,

    /// Print the notification instead of posting it to the webhook
    #[arg(long)]
    pub dry_run: bool,

    /// Emit JSON logs instead of human-readable ones
    #[arg(long)]
    pub json_logs: bool,

    /// Print the run outcome as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    init(if args.json_logs {
        Profile::Production
    } else {
        Profile::Development
    });

    let config = AuditConfig::load(&args.config)?;
    let snapshot_dir = args
        .snapshot_dir
        .unwrap_or_else(|| config.snapshot_dir.clone());
    let store = FsSnapshotStore::new(snapshot_dir);
    let source = WfsSource::new(config.base_url.clone(), config.http.fetch_timeout())?;

    let notifier: Box<dyn Notifier> = match (&config.webhook_url, args.dry_run) {
        (Some(url), false) => Box::new(TeamsNotifier::new(
            url.clone(),
            config.http.notify_timeout(),
        )?),
        (None, false) => {
            tracing::warn!("no webhook configured, printing the notification instead");
            Box::new(StdoutNotifier)
        }
        (_, true) => Box::new(StdoutNotifier),
    };

    let outcome = run_audit(&config, &source, &store, notifier.as_ref())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_outcome(&outcome);
    }
    Ok(())
}

fn print_outcome(outcome: &AuditOutcome) {
    println!();
    for report in &outcome.layers {
        let status = match &report.status {
            LayerStatus::Skipped => "skipped".to_string(),
            LayerStatus::BaselineCreated => "baseline created".to_string(),
            LayerStatus::Compared { added, removed } => format!("+{} -{}", added, removed),
            LayerStatus::Failed { error } => format!("FAILED {}", error),
        };
        println!("  {}: {}", report.layer, status);
    }
    println!(
        "Run {}: {}{}",
        outcome.run_id,
        outcome.notification.severity,
        if outcome.delivered {
            ""
        } else {
            " (notification not delivered)"
        }
    );
}
