//! Format writers for export operations
//!
//! Each writer renders the category hierarchy into an in-memory buffer.
//! Nothing touches the destination until the whole document has rendered,
//! so a record that fails validation never leaves a truncated file behind.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use rust_decimal::Decimal;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::config::{ExportConfig, ExportFormat};
use crate::error::{NorthwindError, Result};
use crate::model::{Category, Product};

pub mod csv;
pub mod json;
pub mod xml;

pub use csv::CsvWriter;
pub use json::JsonWriter;
pub use xml::XmlWriter;

/// Trait for rendering the hierarchy in one output format
pub trait FormatWriter {
    /// Format produced by this writer
    fn format(&self) -> ExportFormat;

    /// File name of the produced document
    fn file_name(&self) -> String;

    /// Write anything that precedes the first category (declaration, header row)
    fn begin(&mut self) -> Result<()>;

    /// Render one category and its products
    ///
    /// # Returns
    /// * `Result<usize>` - Number of records emitted for this category
    fn write_category(&mut self, category: &Category) -> Result<usize>;

    /// Close the document and hand over the rendered bytes
    fn finalize(&mut self) -> Result<Vec<u8>>;
}

/// Build the writer for `format` using the export options in `config`
pub fn for_format(format: ExportFormat, config: &ExportConfig) -> Box<dyn FormatWriter> {
    match format {
        ExportFormat::Xml => Box::new(XmlWriter::new(config.markup_encoding, config.xml_indent)),
        ExportFormat::Csv => Box::new(CsvWriter::new(config.line_ending)),
        ExportFormat::Json => Box::new(JsonWriter::new(config.pretty_json)),
    }
}

/// Cost with at least two decimal places, as in `18.00`
///
/// Costs carrying more places (`12.3456`) keep their full scale.
pub(crate) fn format_cost(product: &Product) -> Result<String> {
    let mut cost: Decimal = product.required_cost()?;
    if cost.scale() < 2 {
        cost.rescale(2);
    }
    Ok(cost.to_string())
}

/// Stock count, or the empty string when unknown
pub(crate) fn format_stock(product: &Product) -> String {
    product.stock.map(|s| s.to_string()).unwrap_or_default()
}

pub(crate) fn format_bool(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

/// Check that the destination directory exists
pub(crate) fn validate_path(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("Directory does not exist: {}", parent.display()),
            )
            .into());
        }
    }
    Ok(())
}

/// Write `bytes` to `path` through a temporary file in the same directory
///
/// # Returns
/// * `Result<u64>` - Size of the persisted file in bytes
pub(crate) fn persist(path: &Path, bytes: &[u8]) -> Result<u64> {
    validate_path(path)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(NorthwindError::from)?;

    let size = fs::metadata(path)?.len();
    debug!("Persisted {} ({} bytes)", path.display(), size);
    Ok(size)
}
