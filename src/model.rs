//! Entity model for the category/product hierarchy.
//!
//! A [`Category`] owns its products through [`Products`], which records
//! whether the collection has been fetched from the data store at all. A
//! [`Product`] refers back to its category by id only.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{IntegrityError, Result};

/// Maximum length of `Category::name`.
pub const CATEGORY_NAME_MAX: usize = 15;

/// Maximum length of `Product::name`.
pub const PRODUCT_NAME_MAX: usize = 40;

/// A product category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(skip)]
    pub products: Products,
}

/// A single product row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i32,
    pub name: String,
    /// Unit price; `None` means no price has been set.
    #[serde(default)]
    pub cost: Option<Decimal>,
    /// Units in stock; `None` means unknown.
    #[serde(default)]
    pub stock: Option<i16>,
    #[serde(default)]
    pub discontinued: bool,
    /// Owning category, by id.
    pub category_id: i32,
}

/// The products collection of a category.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Products {
    /// Never fetched. Reads as empty.
    #[default]
    Unloaded,
    /// Fetched from the data store.
    Loaded(Vec<Product>),
}

impl Products {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Products::Loaded(_))
    }

    /// Products as a slice; empty while unloaded.
    pub fn as_slice(&self) -> &[Product] {
        match self {
            Products::Unloaded => &[],
            Products::Loaded(products) => products,
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Product> {
        self.as_slice().iter()
    }
}

impl<'a> IntoIterator for &'a Products {
    type Item = &'a Product;
    type IntoIter = std::slice::Iter<'a, Product>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Category {
    /// Create a category with no description and unloaded products.
    pub fn new(id: i32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            products: Products::Unloaded,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replace the products collection with a loaded set.
    pub fn with_products(mut self, products: Vec<Product>) -> Self {
        self.products = Products::Loaded(products);
        self
    }

    /// Number of products currently held, computed on every call.
    pub fn product_count(&self) -> usize {
        self.products.len()
    }

    /// Description or the empty string.
    pub fn description_or_empty(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    /// Check column constraints.
    pub fn validate(&self) -> Result<()> {
        check_length("category", self.id, "name", &self.name, CATEGORY_NAME_MAX)
    }
}

impl Product {
    pub fn new(id: i32, name: impl Into<String>, category_id: i32) -> Self {
        Self {
            id,
            name: name.into(),
            cost: None,
            stock: None,
            discontinued: false,
            category_id,
        }
    }

    pub fn with_cost(mut self, cost: Decimal) -> Self {
        self.cost = Some(cost);
        self
    }

    pub fn with_stock(mut self, stock: i16) -> Self {
        self.stock = Some(stock);
        self
    }

    pub fn discontinued(mut self, discontinued: bool) -> Self {
        self.discontinued = discontinued;
        self
    }

    /// The cost, or an integrity error when the product has no price.
    pub fn required_cost(&self) -> Result<Decimal> {
        self.cost.ok_or_else(|| {
            IntegrityError::MissingField {
                entity: "product",
                id: self.id,
                field: "cost",
            }
            .into()
        })
    }

    /// Check column constraints.
    pub fn validate(&self) -> Result<()> {
        check_length("product", self.id, "name", &self.name, PRODUCT_NAME_MAX)
    }
}

fn check_length(
    entity: &'static str,
    id: i32,
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<()> {
    let len = value.chars().count();
    if len > max {
        return Err(IntegrityError::FieldTooLong {
            entity,
            id,
            field,
            len,
            max,
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NorthwindError;

    #[test]
    fn test_unloaded_products_read_as_empty() {
        let category = Category::new(1, "Beverages");
        assert!(!category.products.is_loaded());
        assert_eq!(category.product_count(), 0);
        assert!(category.products.iter().next().is_none());
    }

    #[test]
    fn test_product_count_follows_collection() {
        let category = Category::new(1, "Beverages").with_products(vec![
            Product::new(1, "Chai", 1),
            Product::new(2, "Chang", 1),
        ]);
        assert!(category.products.is_loaded());
        assert_eq!(category.product_count(), 2);
    }

    #[test]
    fn test_required_cost_missing() {
        let product = Product::new(9, "Mystery", 1);
        let err = product.required_cost().unwrap_err();
        assert!(matches!(
            err,
            NorthwindError::DataIntegrity(IntegrityError::MissingField { field: "cost", .. })
        ));
    }

    #[test]
    fn test_name_length_limits() {
        assert!(Category::new(1, "Confections").validate().is_ok());
        assert!(Category::new(2, "Sixteen chars!!!").validate().is_err());
        assert!(Product::new(1, "a".repeat(40), 1).validate().is_ok());
        assert!(Product::new(2, "a".repeat(41), 1).validate().is_err());
    }

    #[test]
    fn test_product_deserialize_defaults() {
        let product: Product =
            serde_json::from_str(r#"{"id": 3, "name": "Aniseed Syrup", "category_id": 2}"#)
                .unwrap();
        assert_eq!(product.cost, None);
        assert_eq!(product.stock, None);
        assert!(!product.discontinued);
    }
}
