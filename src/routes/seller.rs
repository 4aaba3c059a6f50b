use axum::{
    Extension, Json,
    extract::State,
};
use http::StatusCode;

use crate::{
    AppState,
    error::{AppError, Result},
    models::{Product, ProductRequest},
    queries::products_queries,
    services::inventory,
    utils::{
        extractors::{ensure_shop_access, extract_shop_id, shop_scope},
        jwt::Claims,
        request::{AppJson, AppPath},
    },
};

pub async fn my_products(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<Product>>> {
    let shop_id = shop_scope(&claims)?;
    let products = products_queries::list_products(&state.db, shop_id, false).await?;

    Ok(Json(products))
}

pub async fn create_product(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    AppJson(payload): AppJson<ProductRequest>,
) -> Result<Json<Product>> {
    let shop_id = extract_shop_id(&claims)?;
    validate_new_product(&payload)?;

    let product = products_queries::create_product(&state.db, shop_id, &payload).await?;

    tracing::info!("Shop {} listed product {}", shop_id, product.id);

    Ok(Json(product))
}

pub async fn update_product(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<ProductRequest>,
) -> Result<Json<Product>> {
    let existing = products_queries::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product with id {} not found", id)))?;

    ensure_shop_access(&claims, existing.shop_id)?;
    validate_product_update(&payload)?;

    let product = products_queries::update_product(&state.db, id, &payload).await?;

    Ok(Json(product))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    AppPath(id): AppPath<i32>,
) -> Result<StatusCode> {
    let existing = products_queries::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    ensure_shop_access(&claims, existing.shop_id)?;
    products_queries::disable_product(&state.db, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

fn validate_new_product(payload: &ProductRequest) -> Result<()> {
    if payload.name.as_deref().map_or(true, |n| n.trim().is_empty()) {
        return Err(AppError::BadRequest("name is required".to_string()));
    }

    if payload.category.as_deref().map_or(true, |c| c.trim().is_empty()) {
        return Err(AppError::BadRequest("category is required".to_string()));
    }

    let sizes = payload
        .sizes
        .as_deref()
        .ok_or_else(|| AppError::BadRequest("sizes are required".to_string()))?;

    inventory::validate_sizes(sizes)
}

fn validate_product_update(payload: &ProductRequest) -> Result<()> {
    if payload.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(AppError::BadRequest("name cannot be empty".to_string()));
    }

    if payload.category.as_deref().is_some_and(|c| c.trim().is_empty()) {
        return Err(AppError::BadRequest("category cannot be empty".to_string()));
    }

    match payload.sizes.as_deref() {
        Some(sizes) => inventory::validate_sizes(sizes),
        None => Ok(()),
    }
}
