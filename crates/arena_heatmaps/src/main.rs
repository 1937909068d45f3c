use anyhow::{Context, Result};
use arena_heatmaps::{
    Config, Settings,
    pipeline,
    settings::default_project_root,
};
use clap::Parser;
use log::{error, info, warn};
use std::{io::Write, path::PathBuf};

#[derive(Parser)]
#[command(author, version, about = "Heat maps of agent satisfaction and population per simulation version", long_about = None)]
struct Args {
    /// Simulation set folder, relative to the project root
    folder_name: String,

    /// Learning percentages, e.g. "[0, 50, 100]"
    learning_percentages: String,

    /// Exchanges per day that were simulated, e.g. "[1, 25, 50]"
    exchanges: String,

    /// Starting ratio labels, e.g. "[1:1, 1:2]"
    starting_ratios: String,

    /// Days of interest, e.g. "[1, 25, 50]"
    days_of_interest: String,

    /// Render configuration file (TOML)
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Directory the folder name is resolved against (defaults to the workspace root)
    #[arg(short = 'r', long = "root")]
    root: Option<PathBuf>,
}

fn main() {
    // Initialize logger - defaults to RUST_LOG if set, otherwise INFO
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        error!("Error: {e}");
        for cause in e.chain().skip(1) {
            error!("  caused by: {cause}");
        }
        let _ = std::io::stderr().flush();
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = match &args.config {
        Some(path) if path.exists() => Config::load_from_file(path)
            .with_context(|| format!("loading render config {}", path.display()))?,
        Some(path) => {
            warn!(
                "Config file not found: {}, using default settings",
                path.display()
            );
            Config::default()
        }
        None => Config::default(),
    };

    let root = args.root.clone().unwrap_or_else(default_project_root);
    let settings = Settings::from_args(
        &args.folder_name,
        &args.learning_percentages,
        &args.exchanges,
        &args.starting_ratios,
        &args.days_of_interest,
        &root,
    )
    .context("parsing arguments")?;

    info!("Heat map generation starting...");
    info!("Simulation set: {}", settings.base_output_directory.display());
    info!("Learning percentages: {:?}", settings.learning_percentages);
    info!("Starting ratios: {:?}", settings.starting_ratios);

    let written = pipeline::run(&settings, &config)?;
    info!("{} figure(s) written", written.len());
    Ok(())
}
