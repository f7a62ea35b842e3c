//! Compiles the technology documents into `app/public/data.json`.
//!
//! Takes no arguments: the repository root is discovered from the working
//! directory. Prints a start notice and a count summary; any read or write
//! failure ends the run with status 1.

use anyhow::Result;
use renovation_catalog::{CatalogLayout, compile_catalog, find_repo_root};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    init_tracing();
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run() -> Result<()> {
    println!("Сборка данных...");
    let layout = CatalogLayout::new(find_repo_root()?);
    let catalog = compile_catalog(&layout)?;

    println!("✓ Создан {}", layout.output_path().display());
    println!("  Направлений: {}", catalog.meta.total_directions);
    println!("  Технологий: {}", catalog.meta.total_technologies);
    Ok(())
}
