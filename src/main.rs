use clap::{App, Arg};

use failure::Error;

use log::{error, info};
use std::path::{Path, PathBuf};
use std::sync::Arc;

mod catalog;
mod cli_utils;
mod holders;
mod query;
mod render;
mod server;

use chrono::offset::Local;

const DEFAULT_DATASET: &str = "MiningProperties_SNL_Americas.csv";

fn main() {
    let local_time = Local::now();
    let time_offset = local_time.offset();
    // Configure logging
    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config {
            offset: time_offset.clone(),
            ..simplelog::Config::default()
        },
        simplelog::TerminalMode::Stderr,
    )
    .ok();

    match do_main() {
        Ok(_) => info!("Process finished OK"),
        Err(err) => {
            error!("Process finished with an error: {}", err);
            std::process::exit(1);
        }
    };
}

fn serve_command(dataset_path: &Path) -> Result<(), Error> {
    info!("Loading properties from {} ...", dataset_path.display());

    // Nothing is served from a partial catalog.
    let catalog = catalog::Catalog::load(dataset_path)?;

    let state = server::AppState {
        catalog: Arc::new(catalog),
        assets_dir: PathBuf::from(server::ASSETS_DIR),
    };

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server::serve(state))
}

fn do_main() -> Result<(), Error> {
    let matches = App::new("mining_props")
        .version("0.1.0")
        .author("Gustavo Ajzenman")
        .about("Search mining properties around a given one")
        .arg(
            Arg::with_name("dataset")
                .short("S")
                .help("Path for the mining properties dataset (csv)")
                .takes_value(true)
                .default_value(DEFAULT_DATASET),
        )
        .get_matches();

    let dataset_path = Path::new(matches.value_of("dataset").unwrap_or(DEFAULT_DATASET));

    serve_command(dataset_path)
}
