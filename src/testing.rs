use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::Mutex;

use crate::models::{Category, CategoryId, Favorite, Product, ProductId, UserId};
use crate::resolver::Picker;
use crate::store::{Store, StoreError};

pub(crate) fn product(id: ProductId, name: &str, category_id: CategoryId) -> Product {
    Product {
        id,
        name: name.to_string(),
        image: format!("https://images.example/{}.jpg", id),
        url: format!("https://world.openfoodfacts.org/product/{}", id),
        nutriscore: Some("c".to_string()),
        energy: Some(250.0),
        fat: Some(10.5),
        saturated_fat: Some(4.0),
        sugars: Some(3.2),
        salt: Some(1.1),
        category_id,
    }
}

/// "Burger" (searchable, products 1-3) and "Burger-Alt" (substitutes A, B, C as 10-12).
pub(crate) fn burger_store() -> MemoryStore {
    let store = MemoryStore::default();
    let burger = store.add_category("Burger", false);
    let alt = store.add_category("Burger-Alt", true);
    store.add_product(product(1, "Cheeseburger", burger));
    store.add_product(product(2, "Double burger", burger));
    store.add_product(product(3, "Veggie burger", burger));
    store.add_product(product(10, "A", alt));
    store.add_product(product(11, "B", alt));
    store.add_product(product(12, "C", alt));
    store
}

/// Always takes the first candidate.
pub(crate) struct FirstPicker;

impl Picker for FirstPicker {
    fn pick(&self, len: usize) -> Option<usize> {
        if len == 0 {
            None
        } else {
            Some(0)
        }
    }
}

#[derive(Default)]
struct Tables {
    categories: BTreeMap<CategoryId, Category>,
    // a product may be listed under several categories to exercise dedup
    products: BTreeMap<CategoryId, Vec<Product>>,
    favorites: Vec<Favorite>,
}

#[derive(Default)]
pub(crate) struct MemoryStore {
    tables: Mutex<Tables>,
    next_id: AtomicI32,
    unavailable: AtomicBool,
}

impl MemoryStore {
    fn next_id(&self) -> i32 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable)
        } else {
            Ok(())
        }
    }

    pub(crate) fn add_category(&self, name: &str, alternative: bool) -> CategoryId {
        let id = self.next_id();
        self.tables.lock().unwrap().categories.insert(
            id,
            Category {
                id,
                name: name.to_string(),
                alternative,
            },
        );
        id
    }

    pub(crate) fn add_product(&self, product: Product) {
        let mut tables = self.tables.lock().unwrap();
        tables
            .products
            .entry(product.category_id)
            .or_default()
            .push(product);
    }

    /// Lists an existing product under one more category.
    pub(crate) fn link_product(&self, product_id: ProductId, category_id: CategoryId) {
        let existing = self.product_by_id(product_id).unwrap().unwrap();
        let mut tables = self.tables.lock().unwrap();
        tables.products.entry(category_id).or_default().push(existing);
    }

    pub(crate) fn add_favorite(&self, user_id: UserId, product_id: ProductId) {
        self.create_favorite(user_id, product_id).unwrap();
    }

    /// Bypasses the uniqueness check, like rows inserted before the constraint existed.
    pub(crate) fn add_favorite_unchecked(&self, user_id: UserId, product_id: ProductId) {
        let id = self.next_id();
        self.tables.lock().unwrap().favorites.push(Favorite {
            id,
            user_id,
            product_id,
        });
    }

    pub(crate) fn fail_with_unavailable(&self) {
        self.unavailable.store(true, Ordering::SeqCst);
    }

    fn matching(&self, name_substring: &str, alternative: bool) -> Vec<Category> {
        let needle = name_substring.to_lowercase();
        self.tables
            .lock()
            .unwrap()
            .categories
            .values()
            .filter(|c| c.alternative == alternative && c.name.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }
}

impl Store for MemoryStore {
    fn find_category(
        &self,
        name_substring: &str,
        alternative: bool,
    ) -> Result<Option<Category>, StoreError> {
        self.check()?;
        Ok(self.matching(name_substring, alternative).into_iter().next())
    }

    fn find_categories(
        &self,
        name_substring: &str,
        alternative: bool,
    ) -> Result<Vec<Category>, StoreError> {
        self.check()?;
        Ok(self.matching(name_substring, alternative))
    }

    fn products_of(&self, category_id: CategoryId) -> Result<Vec<Product>, StoreError> {
        self.check()?;
        Ok(self
            .tables
            .lock()
            .unwrap()
            .products
            .get(&category_id)
            .cloned()
            .unwrap_or_default())
    }

    fn favorites_of(&self, user_id: UserId) -> Result<Vec<Favorite>, StoreError> {
        self.check()?;
        Ok(self
            .tables
            .lock()
            .unwrap()
            .favorites
            .iter()
            .filter(|f| f.user_id == user_id)
            .cloned()
            .collect())
    }

    fn create_favorite(&self, user_id: UserId, product_id: ProductId) -> Result<bool, StoreError> {
        self.check()?;
        let id = self.next_id();
        let mut tables = self.tables.lock().unwrap();
        let exists = tables
            .favorites
            .iter()
            .any(|f| f.user_id == user_id && f.product_id == product_id);
        if exists {
            return Ok(false);
        }
        tables.favorites.push(Favorite {
            id,
            user_id,
            product_id,
        });
        Ok(true)
    }

    fn favorite_exists(&self, user_id: UserId, product_id: ProductId) -> Result<bool, StoreError> {
        self.check()?;
        Ok(self
            .tables
            .lock()
            .unwrap()
            .favorites
            .iter()
            .any(|f| f.user_id == user_id && f.product_id == product_id))
    }

    fn product_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .products
            .values()
            .flatten()
            .find(|p| p.id == id)
            .cloned())
    }
}
