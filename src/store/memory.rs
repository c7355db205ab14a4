//! In-memory data store.
//!
//! Holds category and product rows in insertion order and enforces the
//! column constraints of the relational schema on insert. Discontinued
//! products are hidden by a default query filter, which can be lifted with
//! [`MemoryStore::ignore_query_filters`].

use std::cell::Cell;
use std::fs;
use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{IntegrityError, NorthwindError, NotFoundError, Result};
use crate::model::{Category, Product, Products};

use super::DataStore;

/// Serialized form of a store's rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub products: Vec<Product>,
}

/// Row store backed by two vectors.
#[derive(Debug, Default)]
pub struct MemoryStore {
    categories: Vec<Category>,
    products: Vec<Product>,
    include_discontinued: bool,
    category_queries: Cell<usize>,
    product_loads: Cell<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a dataset, validating every row.
    pub fn from_dataset(dataset: Dataset) -> Result<Self> {
        let mut store = Self::new();
        for category in dataset.categories {
            store.add_category(category)?;
        }
        for product in dataset.products {
            store.add_product(product)?;
        }
        Ok(store)
    }

    /// Load a JSON dataset file.
    ///
    /// # Arguments
    /// * `path` - Path to a file holding `{"categories": [...], "products": [...]}`
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let dataset: Dataset = serde_json::from_str(&content)?;
        info!(
            "Loaded dataset {} ({} categories, {} products)",
            path.display(),
            dataset.categories.len(),
            dataset.products.len()
        );
        Self::from_dataset(dataset)
    }

    /// A handful of rows from the Northwind sample database.
    pub fn northwind_sample() -> Self {
        let categories = vec![
            Category::new(1, "Beverages").with_description("Soft drinks, coffees, teas, beers, and ales"),
            Category::new(2, "Condiments")
                .with_description("Sweet and savory sauces, relishes, spreads, and seasonings"),
            Category::new(3, "Confections").with_description("Desserts, candies, and sweet breads"),
        ];
        let products = vec![
            Product::new(1, "Chai", 1).with_cost(Decimal::new(1800, 2)).with_stock(39),
            Product::new(2, "Chang", 1).with_cost(Decimal::new(1900, 2)).with_stock(17),
            Product::new(24, "Guaraná Fantástica", 1)
                .with_cost(Decimal::new(450, 2))
                .with_stock(20)
                .discontinued(true),
            Product::new(3, "Aniseed Syrup", 2).with_cost(Decimal::new(1000, 2)).with_stock(13),
            Product::new(4, "Chef Anton's Cajun Seasoning", 2)
                .with_cost(Decimal::new(2200, 2))
                .with_stock(53),
            Product::new(16, "Pavlova", 3).with_cost(Decimal::new(1745, 2)).with_stock(29),
        ];
        Self {
            categories,
            products,
            ..Self::default()
        }
    }

    /// Return a store that no longer hides discontinued products.
    pub fn ignore_query_filters(mut self) -> Self {
        self.include_discontinued = true;
        self
    }

    pub fn set_include_discontinued(&mut self, include: bool) {
        self.include_discontinued = include;
    }

    /// Number of `query_categories` calls served.
    pub fn category_queries(&self) -> usize {
        self.category_queries.get()
    }

    /// Number of `load_products` calls served.
    pub fn product_loads(&self) -> usize {
        self.product_loads.get()
    }

    pub fn dataset(&self) -> Dataset {
        Dataset {
            categories: self.categories.clone(),
            products: self.products.clone(),
        }
    }

    /// Insert a category.
    pub fn add_category(&mut self, mut category: Category) -> Result<()> {
        category.validate()?;
        if self.categories.iter().any(|c| c.id == category.id) {
            return Err(IntegrityError::DuplicateKey {
                entity: "category",
                id: category.id,
            }
            .into());
        }
        category.products = Products::Unloaded;
        self.categories.push(category);
        Ok(())
    }

    /// Insert a product, enforcing name length, key uniqueness and the
    /// foreign key to its category.
    pub fn add_product(&mut self, product: Product) -> Result<()> {
        product.validate()?;
        if !self.categories.iter().any(|c| c.id == product.category_id) {
            return Err(IntegrityError::UnknownCategory {
                product_id: product.id,
                category_id: product.category_id,
            }
            .into());
        }
        if self.products.iter().any(|p| p.id == product.id) {
            return Err(IntegrityError::DuplicateKey {
                entity: "product",
                id: product.id,
            }
            .into());
        }
        debug!("Added product {} to category {}", product.id, product.category_id);
        self.products.push(product);
        Ok(())
    }

    /// Categories with only the products holding at least `min_stock` units.
    ///
    /// Products with unknown stock never match.
    pub fn categories_with_min_stock(&self, min_stock: i16) -> Vec<Category> {
        self.categories
            .iter()
            .map(|c| {
                let products = self
                    .filtered()
                    .filter(|p| p.category_id == c.id)
                    .filter(|p| p.stock.is_some_and(|s| s >= min_stock))
                    .cloned()
                    .collect();
                c.clone().with_products(products)
            })
            .collect()
    }

    /// Products priced above `price`, most expensive first.
    pub fn products_costing_more_than(&self, price: Decimal) -> Vec<Product> {
        let mut products: Vec<Product> = self
            .filtered()
            .filter(|p| p.cost.is_some_and(|c| c > price))
            .cloned()
            .collect();
        products.sort_by(|a, b| b.cost.cmp(&a.cost));
        products
    }

    /// Products whose name contains `fragment`, ignoring ASCII case.
    pub fn products_name_containing(&self, fragment: &str) -> Vec<Product> {
        let needle = fragment.to_ascii_lowercase();
        self.filtered()
            .filter(|p| p.name.to_ascii_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    /// All visible products, most expensive first; unpriced products last.
    pub fn products_by_cost_desc(&self) -> Vec<Product> {
        let mut products: Vec<Product> = self.filtered().cloned().collect();
        products.sort_by(|a, b| b.cost.cmp(&a.cost));
        products
    }

    /// Raise the price of the first visible product whose name starts with
    /// `prefix`. An unpriced product stays unpriced.
    ///
    /// # Returns
    /// * `Result<Option<Decimal>>` - The new cost
    pub fn increase_product_price(&mut self, prefix: &str, amount: Decimal) -> Result<Option<Decimal>> {
        let include_discontinued = self.include_discontinued;
        let product = self
            .products
            .iter_mut()
            .filter(|p| include_discontinued || !p.discontinued)
            .find(|p| p.name.starts_with(prefix))
            .ok_or_else(|| NorthwindError::from(NotFoundError::ProductPrefix(prefix.to_string())))?;

        product.cost = product.cost.map(|c| c + amount);
        info!("Product {} now costs {:?}", product.id, product.cost);
        Ok(product.cost)
    }

    /// Delete every visible product whose name starts with `prefix`.
    ///
    /// # Returns
    /// * `usize` - Number of rows removed
    pub fn delete_products_starting_with(&mut self, prefix: &str) -> usize {
        let include_discontinued = self.include_discontinued;
        let before = self.products.len();
        self.products
            .retain(|p| !((include_discontinued || !p.discontinued) && p.name.starts_with(prefix)));
        let affected = before - self.products.len();
        info!("Deleted {} products starting with '{}'", affected, prefix);
        affected
    }

    fn filtered(&self) -> impl Iterator<Item = &Product> + '_ {
        let include_discontinued = self.include_discontinued;
        self.products
            .iter()
            .filter(move |p| include_discontinued || !p.discontinued)
    }

    fn products_of(&self, category_id: i32) -> Vec<Product> {
        self.filtered()
            .filter(|p| p.category_id == category_id)
            .cloned()
            .collect()
    }
}

impl DataStore for MemoryStore {
    fn query_categories(&self, include_products: bool) -> Result<Vec<Category>> {
        self.category_queries.set(self.category_queries.get() + 1);
        debug!(
            "Querying {} categories (include products: {})",
            self.categories.len(),
            include_products
        );

        let categories = self
            .categories
            .iter()
            .map(|c| {
                if include_products {
                    c.clone().with_products(self.products_of(c.id))
                } else {
                    c.clone()
                }
            })
            .collect();
        Ok(categories)
    }

    fn load_products(&self, category: &Category) -> Result<Vec<Product>> {
        self.product_loads.set(self.product_loads.get() + 1);
        let products = self.products_of(category.id);
        debug!("Loaded {} products for category {}", products.len(), category.id);
        Ok(products)
    }
}
