use std::io::{self, Write};
use std::path::Path;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use splitledger::splitledger_report::{Renderer, TableRenderer};
use splitledger::{CsvStore, Tracker, TrackerConfig};

const USAGE: &str = "usage: summarize <expenses.csv> [splitledger.toml] | --config <splitledger.toml>";

/// Prints the monthly summary, the balance and the favourite restaurants of a CSV expense file.
/// With `--config`, the file is the one named by `store.path`.
fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let (store, config) = match args.next().as_deref() {
        Some("--config") => {
            let config = TrackerConfig::from_file(Path::new(&args.next().ok_or(USAGE)?))?;
            (config.csv_store()?, config)
        }
        Some(filename) => {
            let config = match args.next() {
                Some(config) => TrackerConfig::from_file(Path::new(&config))?,
                None => TrackerConfig::default(),
            };
            (CsvStore::new(filename), config)
        }
        None => return Err(USAGE.into()),
    };

    let tracker = Tracker::new(store, config);
    let dashboard = tracker.dashboard()?;
    let renderer = TableRenderer::new(&tracker.config().participants);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    renderer.render(&dashboard.summary, &mut out)?;
    writeln!(out)?;
    renderer.render(&dashboard.reconciliation, &mut out)?;
    writeln!(out)?;
    renderer.render(dashboard.merchant_visits.as_slice(), &mut out)?;
    Ok(())
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    if let Err(e) = run() {
        println!("Error: {}", e);
    }
}
