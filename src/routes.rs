use actix_web::error::InternalError;
use actix_web::{get, web, HttpResponse};
use serde::Deserialize;

use crate::error::AppError;
use crate::identity::CurrentUser;
use crate::models::ProductId;
use crate::resolver::{AlternativeResolver, SaveResult};
use crate::store::StoreError;
use crate::views::{ListingView, ProductView, SaveView};

#[derive(Debug, Deserialize)]
pub(crate) struct SearchParams {
    produit: Option<String>,
    page: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PageParams {
    page: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SaveForm {
    product_id: ProductId,
}

pub(crate) fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health)
        .service(alternative)
        .service(favorites)
        .service(product_detail)
        .service(
            web::resource("/sauvegarder")
                .app_data(web::FormConfig::default().error_handler(|err, _req| {
                    // the save script only understands the json body
                    InternalError::from_response(
                        err,
                        HttpResponse::BadRequest().json(SaveView::refused()),
                    )
                    .into()
                }))
                .route(web::post().to(save_product))
                .default_service(web::route().to(save_refused)),
        );
}

#[get("/health")]
async fn health() -> HttpResponse {
    HttpResponse::Ok().body("ok")
}

#[get("/alternative")]
async fn alternative(
    resolver: web::Data<AlternativeResolver>,
    user: CurrentUser,
    params: web::Query<SearchParams>,
) -> Result<HttpResponse, AppError> {
    let SearchParams { produit, page } = params.into_inner();
    let searched = produit.unwrap_or_default();
    let query = searched.clone();
    let resolution =
        web::block(move || resolver.resolve(&query, user.id(), page.as_deref())).await??;
    Ok(HttpResponse::Ok().json(ListingView::alternatives(searched, resolution)))
}

#[get("/favoris")]
async fn favorites(
    resolver: web::Data<AlternativeResolver>,
    user: CurrentUser,
    params: web::Query<PageParams>,
) -> Result<HttpResponse, AppError> {
    let user = user.required()?;
    let page = params.into_inner().page;
    let listing = web::block(move || resolver.list_favorites(user, page.as_deref())).await??;
    Ok(HttpResponse::Ok().json(ListingView::favorites(listing)))
}

//name is only there for readable urls, many products share one
#[get("/produit/{product_id}/{product_name}")]
async fn product_detail(
    resolver: web::Data<AlternativeResolver>,
    path: web::Path<(ProductId, String)>,
) -> Result<HttpResponse, AppError> {
    let (product_id, product_name) = path.into_inner();
    let product = web::block(move || resolver.product(product_id))
        .await??
        .ok_or(AppError::ProductNotFound(product_id))?;
    Ok(HttpResponse::Ok().json(ProductView::new(product_name, product)))
}

async fn save_product(
    resolver: web::Data<AlternativeResolver>,
    user: CurrentUser,
    form: web::Form<SaveForm>,
) -> Result<HttpResponse, AppError> {
    let user = match user.id() {
        Some(user) => user,
        None => return Ok(HttpResponse::Unauthorized().json(SaveView::refused())),
    };
    let product_id = form.into_inner().product_id;
    let saved = web::block(move || -> Result<Option<SaveResult>, StoreError> {
        if resolver.product(product_id)?.is_none() {
            return Ok(None);
        }
        resolver.save(user, product_id).map(Some)
    })
    .await??;
    match saved {
        Some(result) => Ok(HttpResponse::Ok().json(SaveView::from(result))),
        None => Ok(HttpResponse::NotFound().json(SaveView::refused())),
    }
}

async fn save_refused() -> HttpResponse {
    HttpResponse::Ok().json(SaveView::refused())
}
