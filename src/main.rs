//! Northwind export
//!
//! Non-interactive driver: reads the configuration, loads the hierarchy with
//! the configured loading strategy and writes every configured export format.
//!
//! # Usage
//!
//! ```bash
//! # uses ~/.northwind-export/config.toml when present
//! northwind-export
//! ```

use tracing::{Level, info, warn};
use tracing_subscriber::EnvFilter;

use northwind_export::config::{Config, StoreConfig};
use northwind_export::error::Result;
use northwind_export::formatter::TableFormatter;
use northwind_export::{LoadingStrategy, MemoryStore, Session, run_exports};

/// Application entry point
fn main() {
    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(2),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Main application logic
///
/// # Returns
/// * `Result<bool>` - Whether every export format succeeded
fn run() -> Result<bool> {
    let config = Config::load()?;
    initialize_logging(&config);

    let store = build_store(&config.store)?;
    let formatter = TableFormatter::new();
    println!("{}", formatter.format_products(&store.products_by_cost_desc()));

    let mut session = Session::with_strategy(&store, config.loading.strategy);
    if config.loading.strategy == LoadingStrategy::Explicit && config.loading.resolve_all {
        let resolved = session.resolve_all()?;
        info!("Explicitly resolved {} categories", resolved);
    }

    let hierarchy = session.into_hierarchy()?;
    for category in &hierarchy {
        info!("{} has {} products.", category.name, category.product_count());
    }

    let report = run_exports(&hierarchy, &config.export);
    println!("{}", formatter.format_report(&report));

    if !report.is_success() {
        warn!("{} export format(s) failed", report.failure_count());
    }
    Ok(report.is_success())
}

/// Load the configured dataset, or the built-in sample
fn build_store(config: &StoreConfig) -> Result<MemoryStore> {
    let mut store = match &config.dataset {
        Some(path) => MemoryStore::from_json_file(path)?,
        None => MemoryStore::northwind_sample(),
    };
    store.set_include_discontinued(config.include_discontinued);
    Ok(store)
}

/// Filter used when `RUST_LOG` is unset or invalid
fn default_filter(level: Level) -> EnvFilter {
    EnvFilter::default().add_directive(level.into())
}

/// Initialize logging system from the logging configuration
///
/// `RUST_LOG` takes precedence over the configured level.
fn initialize_logging(config: &Config) {
    let level = config.logging.level.to_tracing_level();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    // Configure timestamps
    if config.logging.timestamps {
        subscriber.init();
    } else {
        subscriber.without_time().init();
    }
}
