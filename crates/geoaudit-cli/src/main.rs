//! geoaudit CLI
//!
//! Command-line interface for GeoServer snapshot audits

use clap::{Parser, Subcommand};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "geoaudit")]
#[command(about = "geoaudit - GeoServer layer change detection", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Audit every configured layer and notify
    Run(commands::run::RunArgs),
    /// Compare two saved collections of one configured layer
    Diff(commands::diff::DiffArgs),
    /// Field-level and geometry comparison of two single features
    Feature(commands::feature::FeatureArgs),
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run(args) => commands::run::execute(args),
        Commands::Diff(args) => commands::diff::execute(args),
        Commands::Feature(args) => commands::feature::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
