//! Export module for the category/product hierarchy
//!
//! This module turns a resolved hierarchy into files:
//! - XML markup, with fields as child elements or attributes
//! - CSV, one row per (category, product) pair
//! - JSON, a single object with a `categories` array
//!
//! # Architecture
//!
//! 1. **FormatWriter**: renders categories into an in-memory document
//! 2. **ProgressTracker**: optional progress feedback
//! 3. **ExportCoordinator**: drives one writer over the hierarchy and
//!    persists the document atomically
//!
//! [`run_exports`] runs one coordinator per configured format. Formats are
//! independent: a failure in one is recorded in the [`ExportReport`] and the
//! remaining formats still run.
//!
//! # Example
//!
//! ```no_run
//! use northwind_export::config::ExportConfig;
//! use northwind_export::export::run_exports;
//! use northwind_export::session::Session;
//! use northwind_export::store::MemoryStore;
//!
//! let store = MemoryStore::northwind_sample();
//! let hierarchy = Session::new(&store).into_hierarchy()?;
//! let report = run_exports(&hierarchy, &ExportConfig::default());
//! for result in report.into_all_or_nothing()? {
//!     println!("{} contains {} bytes.", result.path.display(), result.file_size_bytes);
//! }
//! # Ok::<(), northwind_export::NorthwindError>(())
//! ```

pub mod coordinator;
pub mod progress;
pub mod writers;

pub use coordinator::{ExportCoordinator, ExportResult, Rendered};
pub use progress::ProgressTracker;
pub use writers::{CsvWriter, FormatWriter, JsonWriter, XmlWriter};

use tracing::{info, warn};

use crate::config::{ExportConfig, ExportFormat};
use crate::error::Result;
use crate::model::Category;

/// Outcome of one format within an export run
#[derive(Debug)]
pub struct ExportOutcome {
    pub format: ExportFormat,
    pub result: Result<ExportResult>,
}

/// Outcomes of every format in an export run, in configured order
#[derive(Debug, Default)]
pub struct ExportReport {
    pub outcomes: Vec<ExportOutcome>,
}

impl ExportReport {
    /// Whether every format succeeded
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }

    /// Successful exports
    pub fn succeeded(&self) -> impl Iterator<Item = &ExportResult> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }

    /// Number of failed formats
    pub fn failure_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_err()).count()
    }

    /// Treat the run as all-or-nothing: the first failure becomes the error
    pub fn into_all_or_nothing(self) -> Result<Vec<ExportResult>> {
        self.outcomes.into_iter().map(|o| o.result).collect()
    }
}

/// Export `hierarchy` once per format in `config.formats`
pub fn run_exports(hierarchy: &[Category], config: &ExportConfig) -> ExportReport {
    let mut report = ExportReport::default();

    for &format in &config.formats {
        let mut coordinator = ExportCoordinator::for_format(format, config, hierarchy.len());
        let result = coordinator.execute(hierarchy, &config.output_dir);

        if let Err(ref e) = result {
            warn!("{} export failed: {}", format, e);
        }
        report.outcomes.push(ExportOutcome { format, result });
    }

    info!(
        "Export run finished: {} succeeded, {} failed",
        report.outcomes.len() - report.failure_count(),
        report.failure_count()
    );
    report
}
