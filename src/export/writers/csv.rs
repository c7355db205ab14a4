//! CSV writer for export operations
//!
//! The CSV document is a denormalized join: one row per (category, product)
//! pair under a fixed header. Categories without products produce no rows.

use tracing::debug;

use crate::config::{ExportFormat, LineEnding};
use crate::error::Result;
use crate::model::Category;

use super::{FormatWriter, format_bool, format_cost, format_stock};

/// Column headers, in output order
pub const HEADERS: [&str; 8] = [
    "CategoryID",
    "CategoryName",
    "Description",
    "ProductID",
    "ProductName",
    "Cost",
    "Stock",
    "Discontinued",
];

/// Writer for CSV format
///
/// Text columns are always quoted; numeric and boolean columns never are.
pub struct CsvWriter {
    /// Rendered document
    buffer: String,
    /// Line terminator
    line_ending: &'static str,
    /// Number of data rows written
    written: usize,
}

impl CsvWriter {
    /// Create a new CSV writer
    ///
    /// # Arguments
    /// * `line_ending` - Terminator appended to every line
    pub fn new(line_ending: LineEnding) -> Self {
        Self {
            buffer: String::new(),
            line_ending: line_ending.as_str(),
            written: 0,
        }
    }

    fn push_line(&mut self, line: &str) {
        self.buffer.push_str(line);
        self.buffer.push_str(self.line_ending);
    }

    /// Wrap a text value in quotes, doubling any embedded quote
    ///
    /// # Arguments
    /// * `value` - Value to quote
    ///
    /// # Returns
    /// * `String` - Quoted value
    fn quote(value: &str) -> String {
        format!("\"{}\"", value.replace('"', "\"\""))
    }
}

impl FormatWriter for CsvWriter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Csv
    }

    fn file_name(&self) -> String {
        "categories-and-products.csv".to_string()
    }

    fn begin(&mut self) -> Result<()> {
        let header = HEADERS.join(",");
        self.push_line(&header);
        debug!("Wrote CSV headers: {} fields", HEADERS.len());
        Ok(())
    }

    fn write_category(&mut self, category: &Category) -> Result<usize> {
        let category_fields = format!(
            "{},{},{}",
            category.id,
            Self::quote(&category.name),
            Self::quote(category.description_or_empty())
        );

        let mut rows = 0;
        for product in &category.products {
            let row = format!(
                "{},{},{},{},{},{}",
                category_fields,
                product.id,
                Self::quote(&product.name),
                format_cost(product)?,
                format_stock(product),
                format_bool(product.discontinued)
            );
            self.push_line(&row);
            rows += 1;
        }

        self.written += rows;
        Ok(rows)
    }

    fn finalize(&mut self) -> Result<Vec<u8>> {
        debug!("Finalized CSV document ({} rows)", self.written);
        Ok(std::mem::take(&mut self.buffer).into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NorthwindError;
    use crate::model::Product;
    use rust_decimal::Decimal;

    fn render(categories: &[Category]) -> Result<String> {
        let mut writer = CsvWriter::new(LineEnding::Lf);
        writer.begin()?;
        for category in categories {
            writer.write_category(category)?;
        }
        Ok(String::from_utf8(writer.finalize()?).unwrap())
    }

    #[test]
    fn test_csv_beverages_row() {
        let category = Category::new(1, "Beverages").with_products(vec![
            Product::new(1, "Chai", 1)
                .with_cost(Decimal::new(1800, 2))
                .with_stock(39),
        ]);

        let csv = render(&[category]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines,
            vec![
                "CategoryID,CategoryName,Description,ProductID,ProductName,Cost,Stock,Discontinued",
                r#"1,"Beverages","",1,"Chai",18.00,39,False"#,
            ]
        );
    }

    #[test]
    fn test_csv_rows_per_product() {
        let categories = vec![
            Category::new(1, "Beverages").with_products(vec![
                Product::new(1, "Chai", 1).with_cost(Decimal::new(18, 0)),
                Product::new(2, "Chang", 1).with_cost(Decimal::new(19, 0)),
            ]),
            Category::new(2, "Empty").with_products(Vec::new()),
            Category::new(3, "Unloaded"),
        ];

        let csv = render(&categories).unwrap();
        assert_eq!(csv.lines().count(), 1 + 2);
    }

    #[test]
    fn test_csv_missing_stock_is_empty_field() {
        let category = Category::new(1, "Beverages").with_products(vec![
            Product::new(1, "Chai", 1).with_cost(Decimal::new(18, 0)),
        ]);
        let csv = render(&[category]).unwrap();
        assert!(csv.contains(r#"1,"Chai",18.00,,False"#));
    }

    #[test]
    fn test_csv_quotes_text() {
        let category = Category::new(1, "Beverages")
            .with_description("Teas, \"fine\" coffees")
            .with_products(vec![Product::new(1, "Chai", 1).with_cost(Decimal::new(18, 0))]);
        let csv = render(&[category]).unwrap();
        assert!(csv.contains(r#""Teas, ""fine"" coffees""#));
    }

    #[test]
    fn test_csv_crlf() {
        let mut writer = CsvWriter::new(LineEnding::CrLf);
        writer.begin().unwrap();
        let bytes = writer.finalize().unwrap();
        assert!(bytes.ends_with(b"Discontinued\r\n"));
    }

    #[test]
    fn test_csv_missing_cost() {
        let category = Category::new(1, "Beverages").with_products(vec![Product::new(1, "Chai", 1)]);
        assert!(matches!(render(&[category]), Err(NorthwindError::DataIntegrity(_))));
    }
}
