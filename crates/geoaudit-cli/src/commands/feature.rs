//! Single-feature audit command

use clap::Args;
use geoaudit_core::diff::{audit_feature, format_feature_audit};
use geoaudit_core::Feature;
use serde_json::Value;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct FeatureArgs {
    #[arg(long)]
    pub old: PathBuf,

    #[arg(long)]
    pub new: PathBuf,

    /// Property excluded from the comparison (repeatable)
    #[arg(long = "ignore")]
    pub ignore: Vec<String>,

    /// Record identifier shown in the output; defaults to the old feature's `id`
    #[arg(long)]
    pub id: Option<String>,
}

pub fn execute(args: FeatureArgs) -> Result<(), Box<dyn std::error::Error>> {
    let old_doc = read_json(&args.old)?;
    let new_doc = read_json(&args.new)?;
    let old = Feature::from_value(&old_doc)?;
    let new = Feature::from_value(&new_doc)?;

    let ignore: BTreeSet<String> = args.ignore.into_iter().collect();
    let audit = audit_feature(&old, &new, &ignore);

    let record_id = args
        .id
        .or_else(|| old_doc.get("id").map(id_text))
        .unwrap_or_else(|| "?".to_string());

    if audit.is_unchanged() {
        println!("Record {}: no changes", record_id);
        return Ok(());
    }
    for line in format_feature_audit(&record_id, &audit) {
        println!("{}", line);
    }
    Ok(())
}

fn id_text(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn read_json(path: &Path) -> Result<Value, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
    Ok(serde_json::from_str(&text)?)
}
