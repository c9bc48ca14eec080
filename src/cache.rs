use std::ops::DerefMut;
use std::time::Duration;

use log::{debug, warn};
use r2d2_redis::redis::{Commands, RedisError};
use r2d2_redis::{r2d2, RedisConnectionManager};

use crate::models::{CategoryId, Product};

pub(crate) type RedisPool = r2d2::Pool<RedisConnectionManager>;

const CACHE_POOL_MAX_OPEN: u32 = 16;
const CACHE_POOL_MIN_IDLE: u32 = 8;
const CACHE_POOL_EXPIRE_SECONDS: u64 = 60;
const CACHE_CONNECT_TIMEOUT_MILLIS: u64 = 100;
const PRODUCTS_TTL_SECONDS: usize = 10 * 60;

/// Builds the pool without connecting; an unreachable redis only disables caching.
pub(crate) fn build_pool(redis_url: &str) -> Result<RedisPool, RedisError> {
    let manager = RedisConnectionManager::new(redis_url)?;
    Ok(r2d2::Pool::builder()
        .max_size(CACHE_POOL_MAX_OPEN)
        .max_lifetime(Some(Duration::from_secs(CACHE_POOL_EXPIRE_SECONDS)))
        .min_idle(Some(CACHE_POOL_MIN_IDLE))
        .connection_timeout(Duration::from_millis(CACHE_CONNECT_TIMEOUT_MILLIS))
        .build_unchecked(manager))
}

fn products_key(category_id: CategoryId) -> String {
    format!("products:{}", category_id)
}

/// Read-through cache of the products of each category.
///
/// Categories and products are only written by the catalog import, so entries
/// are never invalidated here, they just expire. Every failure is logged and
/// reported as a miss.
#[derive(Clone)]
pub(crate) struct ProductCache {
    pool: RedisPool,
}

impl ProductCache {
    pub(crate) fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    pub(crate) fn products_of(&self, category_id: CategoryId) -> Option<Vec<Product>> {
        let mut conn = match self.pool.get() {
            Ok(conn) => conn,
            Err(err) => {
                warn!("redis pool unavailable: {}", err);
                return None;
            }
        };
        let key = products_key(category_id);
        let value: Result<Option<Vec<u8>>, RedisError> = conn.deref_mut().get(&key);
        match value {
            Ok(Some(bytes)) => match Product::list_from_u8(&bytes) {
                Ok(products) => {
                    debug!("cache hit for {}", key);
                    Some(products)
                }
                Err(err) => {
                    warn!("dropping undecodable cache entry {}: {}", key, err);
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                warn!("redis read of {} failed: {}", key, err);
                None
            }
        }
    }

    pub(crate) fn store_products_of(&self, category_id: CategoryId, products: &[Product]) {
        let bytes = match Product::list_to_u8(products) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!("could not encode products of category {}: {}", category_id, err);
                return;
            }
        };
        let mut conn = match self.pool.get() {
            Ok(conn) => conn,
            Err(err) => {
                warn!("redis pool unavailable: {}", err);
                return;
            }
        };
        let key = products_key(category_id);
        let written: Result<(), RedisError> =
            conn.deref_mut().set_ex(&key, bytes, PRODUCTS_TTL_SECONDS);
        if let Err(err) = written {
            warn!("redis write of {} failed: {}", key, err);
        }
    }
}
