use axum::extract::State;
use axum::response::{Html, Response};
use axum::Form;
use serde::Deserialize;

use crate::database::ProductRepository;
use crate::error::{ServiceError, ServiceResult};
use crate::models::{Product, PRODUCT_PLACEHOLDER_IMAGE};
use crate::request_state::{LoggedAccount, RecordId};
use crate::web::utils::{found, is_checked, normalize_price, EmptyToNone, Page};
use crate::web::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FormProduct {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "precio")]
    pub price: String,
    #[serde(rename = "imagen_url")]
    pub image_url: Option<String>,
    pub stock: Option<String>,
}

/// GET route for `/menu/`
pub async fn get_products(
    State(state): State<AppState>,
    logged_account: LoggedAccount,
) -> ServiceResult<Html<String>> {
    let products = state.db.get_all_products().await?;

    Page::new("menu")
        .with_account(&logged_account)
        .with_data("products", &products)
        .render(&state)
}

/// GET route for `/menu/nuevo/`
pub async fn get_product_create(
    State(state): State<AppState>,
    logged_account: LoggedAccount,
) -> ServiceResult<Html<String>> {
    Page::new("product_form")
        .with_account(&logged_account)
        .with_data("title", &"New product")
        .render(&state)
}

/// POST route for `/menu/nuevo/`
pub async fn post_product_create(
    State(state): State<AppState>,
    Form(form): Form<FormProduct>,
) -> ServiceResult<Response> {
    let product = Product {
        id: 0,
        name: form.name,
        image_url: form
            .image_url
            .empty_to_none()
            .or_else(|| Some(PRODUCT_PLACEHOLDER_IMAGE.to_owned())),
        price: normalize_price(&form.price),
        in_stock: is_checked(&form.stock),
    };

    let product = state.db.store_product(product).await?;
    log::info!("Created product {} '{}'", product.id, product.name);

    Ok(found("/menu/"))
}

/// GET route for `/menu/editar/{id}/`
pub async fn get_product_edit(
    State(state): State<AppState>,
    logged_account: LoggedAccount,
    RecordId(id): RecordId,
) -> ServiceResult<Html<String>> {
    let product = state
        .db
        .get_product_by_id(id)
        .await?
        .ok_or(ServiceError::NotFound)?;

    Page::new("product_form")
        .with_account(&logged_account)
        .with_data("title", &"Edit product")
        .with_data("product", &product)
        .render(&state)
}

/// POST route for `/menu/editar/{id}/`
///
/// Unlike creation, a blank image url is stored as submitted.
pub async fn post_product_edit(
    State(state): State<AppState>,
    RecordId(id): RecordId,
    Form(form): Form<FormProduct>,
) -> ServiceResult<Response> {
    let mut product = state
        .db
        .get_product_by_id(id)
        .await?
        .ok_or(ServiceError::NotFound)?;

    product.name = form.name;
    product.price = normalize_price(&form.price);
    product.image_url = form.image_url;
    product.in_stock = is_checked(&form.stock);

    let product = state.db.store_product(product).await?;
    log::info!("Updated product {} '{}'", product.id, product.name);

    Ok(found("/menu/"))
}

/// GET route for `/menu/eliminar/{id}/`
pub async fn get_product_delete(
    State(state): State<AppState>,
    RecordId(id): RecordId,
) -> ServiceResult<Response> {
    let product = state
        .db
        .get_product_by_id(id)
        .await?
        .ok_or(ServiceError::NotFound)?;

    state.db.delete_product(product.id).await?;
    log::info!("Deleted product {} '{}'", product.id, product.name);

    Ok(found("/menu/"))
}
