//! Northwind export library
//!
//! Loads the Northwind category/product hierarchy under a chosen loading
//! strategy and exports it to XML, CSV and JSON.
//!
//! # Modules
//!
//! - `config`: Configuration management
//! - `error`: Error types and handling
//! - `export`: Format writers and the export coordinator
//! - `formatter`: Console tables for listings and export reports
//! - `model`: Category and product entities
//! - `session`: Loading-strategy selection and explicit resolution
//! - `store`: Data store trait and the in-memory store
//!
//! # Example
//!
//! ```no_run
//! use northwind_export::{ExportConfig, LoadingStrategy, MemoryStore, Session, run_exports};
//!
//! let store = MemoryStore::northwind_sample();
//! let mut session = Session::with_strategy(&store, LoadingStrategy::Explicit);
//! session.resolve(1)?;
//!
//! let hierarchy = session.into_hierarchy()?;
//! let report = run_exports(&hierarchy, &ExportConfig::default());
//! assert!(report.is_success());
//! # Ok::<(), northwind_export::NorthwindError>(())
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod formatter;
pub mod model;
pub mod session;
pub mod store;

// Re-export commonly used types
pub use config::{Config, ExportConfig, ExportFormat, MarkupEncoding};
pub use error::{NorthwindError, Result};
pub use export::{ExportReport, ExportResult, run_exports};
pub use model::{Category, Product, Products};
pub use session::{LoadingStrategy, Session};
pub use store::{DataStore, MemoryStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
