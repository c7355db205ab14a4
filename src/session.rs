//! Loading session: chooses how a category's products get populated.
//!
//! A [`Session`] records one [`LoadingStrategy`] and caches the hierarchy it
//! fetched. The strategy may be changed freely until the first fetch; after
//! that it is fixed for the life of the session.
//!
//! - **Eager**: categories are fetched together with their products.
//! - **Deferred**: automatic loading on access is turned off, so products
//!   stay unloaded and read as empty.
//! - **Explicit**: categories are fetched alone and [`Session::resolve`]
//!   loads one category's products on request. A category is fetched at most
//!   once per session.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ConfigError, NotFoundError, Result};
use crate::model::{Category, Product, Products};
use crate::store::DataStore;

/// How related products are fetched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadingStrategy {
    #[default]
    Eager,
    Deferred,
    Explicit,
}

impl fmt::Display for LoadingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadingStrategy::Eager => write!(f, "eager"),
            LoadingStrategy::Deferred => write!(f, "deferred"),
            LoadingStrategy::Explicit => write!(f, "explicit"),
        }
    }
}

/// One traversal over the store's categories.
pub struct Session<S: DataStore> {
    store: S,
    strategy: LoadingStrategy,
    hierarchy: Option<Vec<Category>>,
}

impl<S: DataStore> Session<S> {
    /// Create a session using the default (eager) strategy.
    pub fn new(store: S) -> Self {
        Self::with_strategy(store, LoadingStrategy::default())
    }

    pub fn with_strategy(store: S, strategy: LoadingStrategy) -> Self {
        Self {
            store,
            strategy,
            hierarchy: None,
        }
    }

    pub fn strategy(&self) -> LoadingStrategy {
        self.strategy
    }

    /// Whether the hierarchy has been fetched.
    pub fn is_started(&self) -> bool {
        self.hierarchy.is_some()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Record the loading strategy for this session.
    ///
    /// # Errors
    /// * `ConfigError::TraversalStarted` - The hierarchy was already fetched
    pub fn select_strategy(&mut self, strategy: LoadingStrategy) -> Result<()> {
        if self.is_started() {
            return Err(ConfigError::TraversalStarted {
                active: self.strategy,
                requested: strategy,
            }
            .into());
        }
        debug!("Loading strategy set to {}", strategy);
        self.strategy = strategy;
        Ok(())
    }

    /// Fetch the hierarchy if that has not happened yet.
    pub fn begin(&mut self) -> Result<()> {
        self.ensure_started()?;
        Ok(())
    }

    /// The categories of this traversal, fetching them on first use.
    pub fn categories(&mut self) -> Result<&[Category]> {
        Ok(self.ensure_started()?.as_slice())
    }

    /// Load the products of one category.
    ///
    /// Under `Explicit` the products are fetched the first time and served
    /// from the cache afterwards. Under `Eager` and `Deferred` nothing is
    /// fetched and the current state is returned as is.
    ///
    /// # Errors
    /// * `NotFoundError::Category` - No category with this id in the hierarchy
    pub fn resolve(&mut self, category_id: i32) -> Result<&[Product]> {
        let strategy = self.strategy;
        let store = &self.store;
        let categories = Self::started(&mut self.hierarchy, store, strategy)?;

        let category = categories
            .iter_mut()
            .find(|c| c.id == category_id)
            .ok_or(NotFoundError::Category(category_id))?;

        if strategy == LoadingStrategy::Explicit && !category.products.is_loaded() {
            let products = store.load_products(category)?;
            debug!(
                "Explicitly loaded {} products for {}",
                products.len(),
                category.name
            );
            category.products = Products::Loaded(products);
        }

        Ok(category.products.as_slice())
    }

    /// Resolve every category accepted by `predicate`.
    ///
    /// # Returns
    /// * `Result<usize>` - Number of categories accepted
    pub fn resolve_where<F>(&mut self, mut predicate: F) -> Result<usize>
    where
        F: FnMut(&Category) -> bool,
    {
        let ids: Vec<i32> = self
            .categories()?
            .iter()
            .filter(|c| predicate(*c))
            .map(|c| c.id)
            .collect();

        for id in &ids {
            self.resolve(*id)?;
        }
        Ok(ids.len())
    }

    /// Resolve every category in the hierarchy.
    pub fn resolve_all(&mut self) -> Result<usize> {
        self.resolve_where(|_| true)
    }

    /// Finish the traversal and hand the resolved hierarchy to the caller.
    pub fn into_hierarchy(mut self) -> Result<Vec<Category>> {
        self.ensure_started()?;
        Ok(self.hierarchy.unwrap_or_default())
    }

    fn ensure_started(&mut self) -> Result<&mut Vec<Category>> {
        Self::started(&mut self.hierarchy, &self.store, self.strategy)
    }

    fn started<'a>(
        hierarchy: &'a mut Option<Vec<Category>>,
        store: &S,
        strategy: LoadingStrategy,
    ) -> Result<&'a mut Vec<Category>> {
        if hierarchy.is_none() {
            let include_products = strategy == LoadingStrategy::Eager;
            let categories = store.query_categories(include_products)?;
            info!(
                "Fetched {} categories using {} loading",
                categories.len(),
                strategy
            );
            *hierarchy = Some(categories);
        }
        Ok(hierarchy.get_or_insert_with(Vec::new))
    }
}
