//! Export coordinator for orchestrating export operations
//!
//! The coordinator walks the hierarchy once, feeding each category to a
//! [`FormatWriter`], and only writes the destination after the writer has
//! finalized successfully.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::{ExportConfig, ExportFormat};
use crate::error::Result;
use crate::model::Category;

use super::progress::ProgressTracker;
use super::writers::{self, FormatWriter, persist};

/// Result of an export operation
#[derive(Debug, Clone)]
pub struct ExportResult {
    /// Format produced
    pub format: ExportFormat,
    /// Destination file
    pub path: PathBuf,
    /// Number of categories traversed
    pub categories_exported: u64,
    /// Number of records emitted (products, or rows for CSV)
    pub records_exported: u64,
    /// File size in bytes
    pub file_size_bytes: u64,
    /// Time taken for export
    pub elapsed_ms: u64,
}

/// A document rendered in memory
#[derive(Debug, Clone)]
pub struct Rendered {
    pub bytes: Vec<u8>,
    pub categories: u64,
    pub records: u64,
}

/// Coordinator for export operations
///
/// Orchestrates traversal, progress tracking and format writing for one
/// output format.
pub struct ExportCoordinator {
    /// Format writer for output
    writer: Box<dyn FormatWriter>,
    /// Progress tracker for user feedback
    tracker: ProgressTracker,
}

impl ExportCoordinator {
    /// Create a new export coordinator
    pub fn new(writer: Box<dyn FormatWriter>, tracker: ProgressTracker) -> Self {
        Self { writer, tracker }
    }

    /// Coordinator for `format` configured from `config`
    pub fn for_format(format: ExportFormat, config: &ExportConfig, total: usize) -> Self {
        Self::new(
            writers::for_format(format, config),
            ProgressTracker::new(Some(total as u64), config.show_progress),
        )
    }

    pub fn format(&self) -> ExportFormat {
        self.writer.format()
    }

    /// File name the writer produces
    pub fn file_name(&self) -> String {
        self.writer.file_name()
    }

    /// Render the hierarchy without touching the filesystem
    pub fn render(&mut self, hierarchy: &[Category]) -> Result<Rendered> {
        let result = self.render_inner(hierarchy);
        self.tracker.finish();
        result
    }

    fn render_inner(&mut self, hierarchy: &[Category]) -> Result<Rendered> {
        self.writer.begin()?;

        for category in hierarchy {
            let records = self.writer.write_category(category)?;
            self.tracker.advance(records);
        }

        debug!("Finalizing {} output", self.writer.format());
        let bytes = self.writer.finalize()?;

        Ok(Rendered {
            bytes,
            categories: self.tracker.processed(),
            records: self.tracker.records(),
        })
    }

    /// Execute the export operation
    ///
    /// 1. Render the whole document in memory
    /// 2. Persist it atomically into `output_dir`
    ///
    /// # Returns
    /// * `Result<ExportResult>` - Export statistics or error
    pub fn execute(&mut self, hierarchy: &[Category], output_dir: &Path) -> Result<ExportResult> {
        let path = output_dir.join(self.writer.file_name());
        info!("Starting {} export to {}", self.writer.format(), path.display());

        let rendered = self.render(hierarchy)?;
        let file_size_bytes = persist(&path, &rendered.bytes)?;
        let elapsed_ms = self.tracker.elapsed_ms();

        info!(
            "{} contains {} bytes ({} categories, {} records, {} ms)",
            path.display(),
            file_size_bytes,
            rendered.categories,
            rendered.records,
            elapsed_ms
        );

        Ok(ExportResult {
            format: self.writer.format(),
            path,
            categories_exported: rendered.categories,
            records_exported: rendered.records,
            file_size_bytes,
            elapsed_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NorthwindError;
    use crate::model::Product;

    // Mock format writer for testing
    struct MockWriter {
        written: Vec<i32>,
        fail_on: Option<i32>,
    }

    impl FormatWriter for MockWriter {
        fn format(&self) -> ExportFormat {
            ExportFormat::Json
        }

        fn file_name(&self) -> String {
            "mock.out".to_string()
        }

        fn begin(&mut self) -> Result<()> {
            Ok(())
        }

        fn write_category(&mut self, category: &Category) -> Result<usize> {
            if self.fail_on == Some(category.id) {
                return Err(NorthwindError::Serialization("boom".to_string()));
            }
            self.written.push(category.id);
            Ok(category.product_count())
        }

        fn finalize(&mut self) -> Result<Vec<u8>> {
            Ok(format!("{:?}", self.written).into_bytes())
        }
    }

    fn hierarchy() -> Vec<Category> {
        vec![
            Category::new(1, "Beverages")
                .with_products(vec![Product::new(1, "Chai", 1), Product::new(2, "Chang", 1)]),
            Category::new(2, "Condiments").with_products(Vec::new()),
        ]
    }

    #[test]
    fn test_coordinator_basic() {
        let dir = tempfile::tempdir().unwrap();
        let writer = Box::new(MockWriter { written: Vec::new(), fail_on: None });
        let mut coordinator = ExportCoordinator::new(writer, ProgressTracker::new(Some(2), false));

        let result = coordinator.execute(&hierarchy(), dir.path()).unwrap();

        assert_eq!(result.categories_exported, 2);
        assert_eq!(result.records_exported, 2);
        assert_eq!(result.path, dir.path().join("mock.out"));
        assert_eq!(std::fs::read_to_string(&result.path).unwrap(), "[1, 2]");
        assert_eq!(result.file_size_bytes, 6);
    }

    #[test]
    fn test_coordinator_failure_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let writer = Box::new(MockWriter { written: Vec::new(), fail_on: Some(2) });
        let mut coordinator = ExportCoordinator::new(writer, ProgressTracker::new(None, false));

        assert!(coordinator.execute(&hierarchy(), dir.path()).is_err());
        assert!(!dir.path().join("mock.out").exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_coordinator_empty_hierarchy() {
        let writer = Box::new(MockWriter { written: Vec::new(), fail_on: None });
        let mut coordinator = ExportCoordinator::new(writer, ProgressTracker::new(None, false));
        let rendered = coordinator.render(&[]).unwrap();
        assert_eq!(rendered.categories, 0);
        assert_eq!(rendered.bytes, b"[]");
    }
}
