use diesel::dsl::exists;
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager};
use diesel::sql_types::Text;
use failsafe::backoff::EqualJittered;
use failsafe::failure_policy::{ConsecutiveFailures, OrElse, SuccessRateOverTimeWindow};
use failsafe::{CircuitBreaker, StateMachine};
use log::debug;

use crate::cache::ProductCache;
use crate::models::{Category, CategoryId, Favorite, NewFavorite, Product, ProductId, UserId};
use crate::store::{contains_pattern, Store, StoreError};

pub(crate) type DbPool = r2d2::Pool<ConnectionManager<MysqlConnection>>;

pub(crate) type CircuitBreakerType = StateMachine<
    OrElse<SuccessRateOverTimeWindow<EqualJittered>, ConsecutiveFailures<EqualJittered>>,
    (),
>;

sql_function!(fn lower(x: Text) -> Text);

pub(crate) fn find_category(
    conn: &MysqlConnection,
    term: &str,
    alternative: bool,
) -> Result<Option<Category>, StoreError> {
    use crate::schema::category::dsl;

    let found = dsl::category
        .filter(lower(dsl::name).like(contains_pattern(term)))
        .filter(dsl::alternative.eq(alternative))
        .order(dsl::id.asc())
        .first::<Category>(conn)
        .optional()?;
    Ok(found)
}

pub(crate) fn find_categories(
    conn: &MysqlConnection,
    term: &str,
    alternative: bool,
) -> Result<Vec<Category>, StoreError> {
    use crate::schema::category::dsl;

    let found = dsl::category
        .filter(lower(dsl::name).like(contains_pattern(term)))
        .filter(dsl::alternative.eq(alternative))
        .order(dsl::id.asc())
        .load::<Category>(conn)?;
    Ok(found)
}

pub(crate) fn find_products_of(
    conn: &MysqlConnection,
    category: CategoryId,
) -> Result<Vec<Product>, StoreError> {
    use crate::schema::product::dsl;

    let products = dsl::product
        .filter(dsl::category_id.eq(category))
        .order(dsl::id.asc())
        .load::<Product>(conn)?;
    Ok(products)
}

pub(crate) fn find_favorites_of(
    conn: &MysqlConnection,
    user: UserId,
) -> Result<Vec<Favorite>, StoreError> {
    use crate::schema::favourite_product::dsl;

    let favorites = dsl::favourite_product
        .filter(dsl::user_id.eq(user))
        .order(dsl::id.asc())
        .load::<Favorite>(conn)?;
    Ok(favorites)
}

pub(crate) fn insert_favorite(
    conn: &MysqlConnection,
    user: UserId,
    product: ProductId,
) -> Result<bool, StoreError> {
    use crate::schema::favourite_product::dsl;

    // INSERT IGNORE against the (user_id, product_id) unique key
    let inserted = diesel::insert_or_ignore_into(dsl::favourite_product)
        .values(&NewFavorite {
            user_id: user,
            product_id: product,
        })
        .execute(conn)?;
    Ok(inserted > 0)
}

pub(crate) fn find_favorite_exists(
    conn: &MysqlConnection,
    user: UserId,
    product: ProductId,
) -> Result<bool, StoreError> {
    use crate::schema::favourite_product::dsl;

    let found = diesel::select(exists(
        dsl::favourite_product
            .filter(dsl::user_id.eq(user))
            .filter(dsl::product_id.eq(product)),
    ))
    .get_result::<bool>(conn)?;
    Ok(found)
}

pub(crate) fn find_product(
    conn: &MysqlConnection,
    product: ProductId,
) -> Result<Option<Product>, StoreError> {
    use crate::schema::product::dsl;

    let found = dsl::product.find(product).first::<Product>(conn).optional()?;
    Ok(found)
}

/// MySQL-backed store. Every query runs through one shared circuit breaker so a
/// struggling database gets rejected calls instead of a queue of blocked workers.
pub(crate) struct MysqlStore {
    pool: DbPool,
    cache: Option<ProductCache>,
    circuit_breaker: CircuitBreakerType,
}

impl MysqlStore {
    pub(crate) fn new(
        pool: DbPool,
        cache: Option<ProductCache>,
        circuit_breaker: CircuitBreakerType,
    ) -> Self {
        Self {
            pool,
            cache,
            circuit_breaker,
        }
    }

    fn guarded<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&MysqlConnection) -> Result<T, StoreError>,
    {
        let result = self.circuit_breaker.call(|| {
            let conn = self.pool.get()?;
            f(&*conn)
        });
        match result {
            Ok(value) => Ok(value),
            Err(failsafe::Error::Inner(err)) => Err(err),
            //rejected which means sql db is not responsive
            Err(failsafe::Error::Rejected) => Err(StoreError::Unavailable),
        }
    }
}

impl Store for MysqlStore {
    fn find_category(
        &self,
        name_substring: &str,
        alternative: bool,
    ) -> Result<Option<Category>, StoreError> {
        self.guarded(|conn| find_category(conn, name_substring, alternative))
    }

    fn find_categories(
        &self,
        name_substring: &str,
        alternative: bool,
    ) -> Result<Vec<Category>, StoreError> {
        self.guarded(|conn| find_categories(conn, name_substring, alternative))
    }

    fn products_of(&self, category_id: CategoryId) -> Result<Vec<Product>, StoreError> {
        if let Some(products) = self.cache.as_ref().and_then(|c| c.products_of(category_id)) {
            return Ok(products);
        }
        let products = self.guarded(|conn| find_products_of(conn, category_id))?;
        if let Some(cache) = &self.cache {
            debug!("caching {} products of category {}", products.len(), category_id);
            cache.store_products_of(category_id, &products);
        }
        Ok(products)
    }

    fn favorites_of(&self, user_id: UserId) -> Result<Vec<Favorite>, StoreError> {
        self.guarded(|conn| find_favorites_of(conn, user_id))
    }

    fn create_favorite(&self, user_id: UserId, product_id: ProductId) -> Result<bool, StoreError> {
        self.guarded(|conn| insert_favorite(conn, user_id, product_id))
    }

    fn favorite_exists(&self, user_id: UserId, product_id: ProductId) -> Result<bool, StoreError> {
        self.guarded(|conn| find_favorite_exists(conn, user_id, product_id))
    }

    fn product_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        self.guarded(|conn| find_product(conn, id))
    }
}
