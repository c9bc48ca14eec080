use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::{Category, Product, ProductId, UserId};
use crate::pagination::{Page, Paginator, PAGE_SIZE};
use crate::store::{Store, StoreError};

/// Name fragments of products that are not sold in the French market.
pub(crate) const DENYLIST: [&str; 2] = ["Hamburguesa", "Bebida"];

/// Source of the arbitrary choices the resolver makes.
pub(crate) trait Picker: Send + Sync {
    /// An index in `0..len`, or `None` when `len` is 0.
    fn pick(&self, len: usize) -> Option<usize>;
}

pub(crate) struct RandomPicker {
    rng: Mutex<StdRng>,
}

impl RandomPicker {
    pub(crate) fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub(crate) fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Picker for RandomPicker {
    fn pick(&self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        Some(rng.gen_range(0..len))
    }
}

#[derive(Debug, PartialEq)]
pub(crate) enum Resolution {
    /// No searchable category matches the query.
    NotFound,
    /// The category exists but every substitute was filtered out.
    NoAlternatives {
        category: Category,
        illustration: Option<Product>,
    },
    Found {
        category: Category,
        illustration: Option<Product>,
        page: Page<Product>,
    },
}

#[derive(Debug, PartialEq)]
pub(crate) enum FavoritesListing {
    NoFavorites,
    Found(Page<Product>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SaveResult {
    Saved,
    AlreadySaved,
}

fn is_denylisted(name: &str) -> bool {
    DENYLIST.iter().any(|fragment| name.contains(fragment))
}

#[derive(Clone)]
pub(crate) struct AlternativeResolver {
    store: Arc<dyn Store>,
    picker: Arc<dyn Picker>,
}

impl AlternativeResolver {
    pub(crate) fn new(store: Arc<dyn Store>, picker: Arc<dyn Picker>) -> Self {
        Self { store, picker }
    }

    /// Finds substitutes for `query`: products of the alternative categories
    /// matching the same text, minus the user's favorites and denylisted
    /// names, in first-seen order.
    pub(crate) fn resolve(
        &self,
        query: &str,
        requesting_user: Option<UserId>,
        page: Option<&str>,
    ) -> Result<Resolution, StoreError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Resolution::NotFound);
        }

        let category = match self.store.find_category(query, false)? {
            Some(category) => category,
            None => {
                debug!("no category matches {:?}", query);
                return Ok(Resolution::NotFound);
            }
        };

        let illustration = self.pick_illustration(&category)?;
        let substitutes = self.store.find_categories(query, true)?;

        let favorites: HashSet<ProductId> = match requesting_user {
            Some(user) => self
                .store
                .favorites_of(user)?
                .into_iter()
                .map(|favorite| favorite.product_id)
                .collect(),
            None => HashSet::new(),
        };

        let mut seen = HashSet::new();
        let mut products = Vec::new();
        for substitute in &substitutes {
            for product in self.store.products_of(substitute.id)? {
                if favorites.contains(&product.id) || is_denylisted(&product.name) {
                    continue;
                }
                if seen.insert(product.id) {
                    products.push(product);
                }
            }
        }
        debug!(
            "{:?}: {} substitute categories, {} products kept",
            query,
            substitutes.len(),
            products.len()
        );

        if products.is_empty() {
            return Ok(Resolution::NoAlternatives {
                category,
                illustration,
            });
        }

        Ok(Resolution::Found {
            category,
            illustration,
            page: Paginator::new(products, PAGE_SIZE).get_page(page),
        })
    }

    fn pick_illustration(&self, category: &Category) -> Result<Option<Product>, StoreError> {
        let mut products = self.store.products_of(category.id)?;
        Ok(self
            .picker
            .pick(products.len())
            .map(|index| products.swap_remove(index)))
    }

    pub(crate) fn list_favorites(
        &self,
        user: UserId,
        page: Option<&str>,
    ) -> Result<FavoritesListing, StoreError> {
        let mut seen = HashSet::new();
        let mut products = Vec::new();
        for favorite in self.store.favorites_of(user)? {
            if !seen.insert(favorite.product_id) {
                continue;
            }
            match self.store.product_by_id(favorite.product_id)? {
                Some(product) => products.push(product),
                None => warn!(
                    "favorite {} of user {} points to missing product {}",
                    favorite.id, user, favorite.product_id
                ),
            }
        }

        if products.is_empty() {
            return Ok(FavoritesListing::NoFavorites);
        }
        Ok(FavoritesListing::Found(
            Paginator::new(products, PAGE_SIZE).get_page(page),
        ))
    }

    pub(crate) fn save(&self, user: UserId, product: ProductId) -> Result<SaveResult, StoreError> {
        if self.store.favorite_exists(user, product)? {
            return Ok(SaveResult::AlreadySaved);
        }
        // a concurrent save can land between the check and the insert
        if self.store.create_favorite(user, product)? {
            Ok(SaveResult::Saved)
        } else {
            Ok(SaveResult::AlreadySaved)
        }
    }

    pub(crate) fn product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        self.store.product_by_id(id)
    }
}
