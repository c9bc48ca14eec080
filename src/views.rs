//! JSON payloads handed to the rendering layer.

use serde::Serialize;

use crate::models::Product;
use crate::pagination::Page;
use crate::resolver::{FavoritesListing, Resolution, SaveResult};

const SEARCH_AGAIN: &str = "Essayez une nouvelle recherche avec un autre produit.";

#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub(crate) enum Status {
    Found,
    NotFound,
    NoAlternatives,
    NoFavorites,
}

#[derive(Debug, Serialize)]
pub(crate) struct ListingView {
    pub status: Status,
    pub h1_tag: String,
    pub h2_tag: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub searched_product: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub searched_product_img: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt_products: Option<Page<Product>>,
    pub paginate: bool,
}

impl ListingView {
    pub(crate) fn alternatives(searched: String, resolution: Resolution) -> Self {
        let mut view = ListingView {
            status: Status::NotFound,
            h1_tag: searched.clone(),
            h2_tag: "Votre recherche n'a retourné aucun résultat",
            message: Some(SEARCH_AGAIN),
            searched_product: Some(searched),
            searched_product_img: None,
            alt_products: None,
            paginate: false,
        };
        match resolution {
            Resolution::NotFound => {}
            Resolution::NoAlternatives { illustration, .. } => {
                view.status = Status::NoAlternatives;
                view.h2_tag = "Aucun produit alternatif n'a été trouvé :(";
                view.searched_product_img = illustration.map(|p| p.image);
            }
            Resolution::Found {
                illustration, page, ..
            } => {
                view.status = Status::Found;
                view.h2_tag = "Vous pouvez remplacer cet aliment par :";
                view.message = None;
                view.searched_product_img = illustration.map(|p| p.image);
                view.paginate = page.is_paginated();
                view.alt_products = Some(page);
            }
        }
        view
    }

    pub(crate) fn favorites(listing: FavoritesListing) -> Self {
        let h1_tag = "Les alternatives gardées au chaud".to_string();
        match listing {
            FavoritesListing::NoFavorites => ListingView {
                status: Status::NoFavorites,
                h1_tag,
                h2_tag: "Pas de produit enregistré pour le moment",
                message: Some("Faites vite une recherche !"),
                searched_product: None,
                searched_product_img: None,
                alt_products: None,
                paginate: false,
            },
            FavoritesListing::Found(page) => ListingView {
                status: Status::Found,
                h1_tag,
                h2_tag: "Très bon choix :)",
                message: None,
                searched_product: None,
                searched_product_img: None,
                paginate: page.is_paginated(),
                alt_products: Some(page),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ProductView {
    pub h1_tag: String,
    pub h2_tag: &'static str,
    pub searched_product_img: String,
    pub product: Product,
}

impl ProductView {
    pub(crate) fn new(name: String, product: Product) -> Self {
        Self {
            h1_tag: name,
            h2_tag: "Informations nutritionnelles",
            searched_product_img: product.image.clone(),
            product,
        }
    }
}

/// The two-case body the save button script expects.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub(crate) enum SaveView {
    SuccessMessage(&'static str),
    ErrorMessage(&'static str),
}

impl SaveView {
    pub(crate) fn refused() -> Self {
        SaveView::ErrorMessage("Impossible de sauvegarder le produit")
    }
}

impl From<SaveResult> for SaveView {
    fn from(result: SaveResult) -> Self {
        match result {
            SaveResult::Saved => SaveView::SuccessMessage("Produit sauvegardé"),
            SaveResult::AlreadySaved => SaveView::ErrorMessage("Produit déjà sauvegardé"),
        }
    }
}
