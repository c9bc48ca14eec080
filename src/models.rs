use serde::{Deserialize, Serialize};

use crate::schema::favourite_product;

pub(crate) type CategoryId = i32;
pub(crate) type ProductId = i32;
pub(crate) type UserId = i32;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Queryable)]
pub(crate) struct Category {
    pub id: CategoryId,
    pub name: String,
    /// true for substitute groupings, false for searchable terms
    pub alternative: bool,
}

// nutrition values are per 100g, absent when the import had none
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Queryable)]
pub(crate) struct Product {
    pub id: ProductId,
    pub name: String,
    pub image: String,
    pub url: String,
    pub nutriscore: Option<String>,
    pub energy: Option<f32>,
    pub fat: Option<f32>,
    pub saturated_fat: Option<f32>,
    pub sugars: Option<f32>,
    pub salt: Option<f32>,
    pub category_id: CategoryId,
}

impl Product {
    pub(crate) fn list_from_u8(bytes: &[u8]) -> Result<Vec<Self>, bincode::Error> {
        bincode::deserialize(bytes)
    }

    pub(crate) fn list_to_u8(products: &[Self]) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(products)
    }
}

#[derive(Debug, Clone, PartialEq, Queryable)]
pub(crate) struct Favorite {
    pub id: i32,
    pub user_id: UserId,
    pub product_id: ProductId,
}

#[derive(Debug, Insertable)]
#[table_name = "favourite_product"]
pub(crate) struct NewFavorite {
    pub user_id: UserId,
    pub product_id: ProductId,
}
