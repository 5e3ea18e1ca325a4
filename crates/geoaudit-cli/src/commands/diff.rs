//! Offline layer diff command

use clap::Args;
use geoaudit_core::FeatureCollection;
use geoaudit_engine::{compare_layer, AuditConfig};
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct DiffArgs {
    #[arg(long, default_value = "geoaudit.toml")]
    pub config: PathBuf,

    /// Layer whose policy applies, as named in the configuration
    #[arg(long)]
    pub layer: String,

    #[arg(long)]
    pub old: PathBuf,

    #[arg(long)]
    pub new: PathBuf,
}

pub fn execute(args: DiffArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = AuditConfig::load_from_path(&args.config)?;
    let old = read_collection(&args.old)?;
    let new = read_collection(&args.new)?;

    let report = compare_layer(&config, &args.layer, &old, &new)?;

    println!("{}", report.notification.title);
    println!("{}: +{} -{}", report.layer, report.added, report.removed);
    println!();
    println!("{}", report.notification.body);
    Ok(())
}

fn read_collection(path: &Path) -> Result<FeatureCollection, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
    FeatureCollection::from_json_str(&text)
        .map_err(|e| format!("{}: {}", path.display(), e).into())
}
