//! In-memory product inventory store.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::models::Product;

/// Keyed container for inventory state.
#[derive(Debug, Default)]
pub struct ProductStore {
    products: RwLock<HashMap<String, Product>>,
}

impl ProductStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-loaded with the given catalog.
    #[must_use]
    pub fn with_products(catalog: impl IntoIterator<Item = Product>) -> Self {
        let products = catalog
            .into_iter()
            .map(|p| (p.id.clone(), p))
            .collect::<HashMap<_, _>>();
        Self {
            products: RwLock::new(products),
        }
    }

    /// Returns a copy of the product with the given id, if one exists.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<Product> {
        self.products.read().get(id).cloned()
    }

    /// Returns true if a product with the given id exists.
    #[must_use]
    pub fn exists(&self, id: &str) -> bool {
        self.products.read().contains_key(id)
    }

    /// Create or update a product.
    pub fn upsert(&self, product: Product) {
        self.products.write().insert(product.id.clone(), product);
    }

    /// Returns all products, sorted by id.
    #[must_use]
    pub fn find_all(&self) -> Vec<Product> {
        let mut all: Vec<Product> = self.products.read().values().cloned().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }

    /// Number of products in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.read().len()
    }

    /// Returns true if the store holds no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.read().is_empty()
    }
}
