#[macro_use]
extern crate diesel;

use std::sync::Arc;

use actix_web::{middleware, web, App, HttpServer};
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager};

mod cache;
mod config;
mod error;
mod identity;
mod models;
mod pagination;
mod query;
mod resolver;
mod routes;
mod schema;
mod store;
mod views;

#[cfg(test)]
mod testing;

use crate::cache::ProductCache;
use crate::config::Config;
use crate::query::MysqlStore;
use crate::resolver::{AlternativeResolver, Picker, RandomPicker};
use crate::store::Store;

fn io_error<E: std::fmt::Display>(context: &str, err: E) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, format!("{}: {}", context, err))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::load().map_err(|err| io_error("invalid configuration", err))?;

    // set up database connection pool
    let manager = ConnectionManager::<MysqlConnection>::new(config.database_url.as_str());
    let pool = r2d2::Pool::builder()
        .build(manager)
        .map_err(|err| io_error("failed to create database pool", err))?;

    let cache = match &config.redis_url {
        Some(url) => {
            let redis_pool =
                cache::build_pool(url).map_err(|err| io_error("invalid REDIS_URL", err))?;
            Some(ProductCache::new(redis_pool))
        }
        None => None,
    };

    let circuit_breaker = failsafe::Config::new().build();
    let store: Arc<dyn Store> = Arc::new(MysqlStore::new(pool, cache, circuit_breaker));

    let picker: Arc<dyn Picker> = match config.random_seed {
        Some(seed) => {
            log::info!("illustration picks seeded with {}", seed);
            Arc::new(RandomPicker::seeded(seed))
        }
        None => Arc::new(RandomPicker::from_entropy()),
    };

    let resolver = web::Data::new(AlternativeResolver::new(store, picker));

    let address = (config.bind_address.clone(), config.port);
    log::info!("starting HTTP server at http://{}:{}", address.0, address.1);

    // Start HTTP server
    HttpServer::new(move || {
        App::new()
            .app_data(resolver.clone())
            .wrap(middleware::Logger::default())
            .configure(routes::configure)
    })
    .bind(address)?
    .run()
    .await
}
