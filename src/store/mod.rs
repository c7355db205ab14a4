//! Data store abstraction consumed by the loading session.
//!
//! The session only needs two primitives: fetch the categories (optionally
//! with their products) and load one category's products on demand. Query
//! filters, ordering and constraint enforcement belong to the store.

use crate::error::Result;
use crate::model::{Category, Product};

pub mod memory;

pub use memory::{Dataset, MemoryStore};

/// Source of categories and products.
pub trait DataStore {
    /// Fetch every category in store order.
    ///
    /// With `include_products` each category arrives with its filtered
    /// products loaded; otherwise its products are left unloaded.
    fn query_categories(&self, include_products: bool) -> Result<Vec<Category>>;

    /// Fetch the filtered products of one category.
    ///
    /// Must be safe to call repeatedly for the same category.
    fn load_products(&self, category: &Category) -> Result<Vec<Product>>;
}

impl<S: DataStore + ?Sized> DataStore for &S {
    fn query_categories(&self, include_products: bool) -> Result<Vec<Category>> {
        (**self).query_categories(include_products)
    }

    fn load_products(&self, category: &Category) -> Result<Vec<Product>> {
        (**self).load_products(category)
    }
}
