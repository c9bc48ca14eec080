use thiserror::Error;

use crate::models::{Category, CategoryId, Favorite, Product, ProductId, UserId};

#[derive(Debug, Error)]
pub(crate) enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),

    #[error("database is not responding")]
    Unavailable,
}

/// Read access to the catalog plus the single favorite write path.
///
/// Name lookups are case-insensitive substring matches. Lists come back in
/// store order (ascending id).
pub(crate) trait Store: Send + Sync {
    fn find_category(
        &self,
        name_substring: &str,
        alternative: bool,
    ) -> Result<Option<Category>, StoreError>;

    fn find_categories(
        &self,
        name_substring: &str,
        alternative: bool,
    ) -> Result<Vec<Category>, StoreError>;

    fn products_of(&self, category_id: CategoryId) -> Result<Vec<Product>, StoreError>;

    fn favorites_of(&self, user_id: UserId) -> Result<Vec<Favorite>, StoreError>;

    /// Inserts the pair unless it already exists. Returns whether a row was created.
    fn create_favorite(&self, user_id: UserId, product_id: ProductId) -> Result<bool, StoreError>;

    fn favorite_exists(&self, user_id: UserId, product_id: ProductId) -> Result<bool, StoreError>;

    fn product_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError>;
}

/// Builds a LIKE pattern matching `term` anywhere, lowercased, with wildcards escaped.
pub(crate) fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
