//! JSON writer for export operations
//!
//! Emits one object with a `categories` array. Numbers, booleans and nulls
//! use native JSON types.

use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use tracing::debug;

use crate::config::ExportFormat;
use crate::error::{NorthwindError, Result};
use crate::model::{Category, Product};

use super::FormatWriter;

#[derive(Debug, Serialize)]
struct JsonDocument<'a> {
    categories: &'a [JsonCategory],
}

#[derive(Debug, Serialize)]
struct JsonCategory {
    id: i32,
    name: String,
    desc: String,
    product_count: usize,
    products: Vec<JsonProduct>,
}

#[derive(Debug, Serialize)]
struct JsonProduct {
    id: i32,
    name: String,
    cost: f64,
    stock: Option<i16>,
    discontinued: bool,
}

impl JsonProduct {
    fn from_product(product: &Product) -> Result<Self> {
        let cost = product.required_cost()?;
        let cost = cost.to_f64().ok_or_else(|| {
            NorthwindError::Serialization(format!(
                "JSON: cost {} of product {} is not representable",
                cost, product.id
            ))
        })?;

        Ok(Self {
            id: product.id,
            name: product.name.clone(),
            cost,
            stock: product.stock,
            discontinued: product.discontinued,
        })
    }
}

/// Writer for JSON format
pub struct JsonWriter {
    categories: Vec<JsonCategory>,
    pretty: bool,
}

impl JsonWriter {
    /// Create a new JSON writer
    ///
    /// # Arguments
    /// * `pretty` - Indent the document instead of emitting one line
    pub fn new(pretty: bool) -> Self {
        Self {
            categories: Vec::new(),
            pretty,
        }
    }
}

impl FormatWriter for JsonWriter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Json
    }

    fn file_name(&self) -> String {
        "categories-and-products.json".to_string()
    }

    fn begin(&mut self) -> Result<()> {
        self.categories.clear();
        Ok(())
    }

    fn write_category(&mut self, category: &Category) -> Result<usize> {
        let products = category
            .products
            .iter()
            .map(JsonProduct::from_product)
            .collect::<Result<Vec<_>>>()?;

        let count = products.len();
        self.categories.push(JsonCategory {
            id: category.id,
            name: category.name.clone(),
            desc: category.description_or_empty().to_string(),
            product_count: category.product_count(),
            products,
        });
        Ok(count)
    }

    fn finalize(&mut self) -> Result<Vec<u8>> {
        let categories = std::mem::take(&mut self.categories);
        let document = JsonDocument {
            categories: &categories,
        };

        let bytes = if self.pretty {
            serde_json::to_vec_pretty(&document)?
        } else {
            serde_json::to_vec(&document)?
        };

        debug!("Finalized JSON document ({} categories)", categories.len());
        Ok(bytes)
    }
}
