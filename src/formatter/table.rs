//! Table formatting using tabled
//!
//! Renders two kinds of tables for the console:
//! - product listings (`ID, Product Name, Cost, Stock, Disc.`)
//! - export run summaries, one line per format

use tabled::{
    Table,
    builder::Builder,
    settings::{Alignment, Modify, Style, object::Columns, object::Rows, width::Width},
};

use crate::export::ExportReport;
use crate::model::Product;

/// Maximum width for a single column (characters)
const DEFAULT_MAX_COLUMN_WIDTH: usize = 40;

/// Table formatter for console output
pub struct TableFormatter {
    /// Maximum column width
    max_column_width: usize,
}

impl TableFormatter {
    /// Create a new table formatter with default settings
    pub fn new() -> Self {
        Self {
            max_column_width: DEFAULT_MAX_COLUMN_WIDTH,
        }
    }

    /// Format products as a listing table
    ///
    /// # Arguments
    /// * `products` - Products in display order
    ///
    /// # Returns
    /// * `String` - Table string
    pub fn format_products(&self, products: &[Product]) -> String {
        if products.is_empty() {
            return "(no products)".to_string();
        }

        let mut builder = Builder::default();
        builder.push_record(["ID", "Product Name", "Cost", "Stock", "Disc."]);

        for product in products {
            builder.push_record([
                format!("{:03}", product.id),
                product.name.clone(),
                product
                    .cost
                    .map(|c| format!("${:.2}", c))
                    .unwrap_or_default(),
                product.stock.map(|s| s.to_string()).unwrap_or_default(),
                product.discontinued.to_string(),
            ]);
        }

        let mut table = builder.build();
        self.apply_style(&mut table, 5);
        table.with(Modify::new(Columns::new(2..=3)).with(Alignment::right()));
        table.to_string()
    }

    /// Format an export run summary
    ///
    /// # Arguments
    /// * `report` - Outcomes of an export run
    ///
    /// # Returns
    /// * `String` - Table string
    pub fn format_report(&self, report: &ExportReport) -> String {
        if report.outcomes.is_empty() {
            return "(nothing exported)".to_string();
        }

        let mut builder = Builder::default();
        builder.push_record(["Format", "File", "Bytes", "Records", "Status"]);

        for outcome in &report.outcomes {
            let row = match &outcome.result {
                Ok(result) => [
                    outcome.format.to_string(),
                    result.path.display().to_string(),
                    result.file_size_bytes.to_string(),
                    result.records_exported.to_string(),
                    "ok".to_string(),
                ],
                Err(e) => [
                    outcome.format.to_string(),
                    String::new(),
                    String::new(),
                    String::new(),
                    e.to_string(),
                ],
            };
            builder.push_record(row);
        }

        let mut table = builder.build();
        self.apply_style(&mut table, 5);
        table.to_string()
    }

    /// Apply style, column wrapping and header alignment
    fn apply_style(&self, table: &mut Table, columns: usize) {
        table.with(Style::modern());

        for i in 0..columns {
            table.with(Modify::new(Columns::new(i..=i)).with(Width::wrap(self.max_column_width)));
        }

        table.with(Modify::new(Rows::first()).with(Alignment::center()));
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExportFormat;
    use crate::error::NorthwindError;
    use crate::export::{ExportOutcome, ExportResult};
    use rust_decimal::Decimal;
    use std::path::PathBuf;

    #[test]
    fn test_format_products() {
        let products = vec![
            Product::new(38, "Côte de Blaye", 8)
                .with_cost(Decimal::new(26350, 2))
                .with_stock(17),
            Product::new(77, "Free Sample", 3),
        ];

        let table = TableFormatter::new().format_products(&products);
        assert!(table.contains("Product Name"));
        assert!(table.contains("038"));
        assert!(table.contains("$263.50"));
        assert!(table.contains("Free Sample"));
        assert!(table.contains("┌"));
    }

    #[test]
    fn test_format_empty_products() {
        assert_eq!(TableFormatter::new().format_products(&[]), "(no products)");
    }

    #[test]
    fn test_format_report() {
        let report = ExportReport {
            outcomes: vec![
                ExportOutcome {
                    format: ExportFormat::Csv,
                    result: Ok(ExportResult {
                        format: ExportFormat::Csv,
                        path: PathBuf::from("categories-and-products.csv"),
                        categories_exported: 8,
                        records_exported: 69,
                        file_size_bytes: 8390,
                        elapsed_ms: 3,
                    }),
                },
                ExportOutcome {
                    format: ExportFormat::Json,
                    result: Err(NorthwindError::Serialization("broken".to_string())),
                },
            ],
        };

        let table = TableFormatter::new().format_report(&report);
        assert!(table.contains("categories-and-products.csv"));
        assert!(table.contains("8390"));
        assert!(table.contains("Serialization error: broken"));
    }
}
