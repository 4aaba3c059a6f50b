use axum::{
    Extension, Json,
    extract::State,
};
use http::StatusCode;
use rust_decimal::Decimal;

use crate::{
    AppState,
    error::{AppError, Result},
    models::{AddToCartRequest, CartItem, CartLine, CartResponse},
    queries::{cart_queries, products_queries},
    services::inventory,
    utils::{
        extractors::extract_user_id,
        jwt::Claims,
        request::{AppJson, AppPath},
    },
};

pub async fn get_cart(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<CartResponse>> {
    let user_id = extract_user_id(&claims)?;
    let items = cart_queries::get_cart(&state.db, user_id).await?;

    let product_ids: Vec<i32> = items.iter().map(|i| i.product_id).collect();
    let products = products_queries::find_by_ids(&state.db, &product_ids).await?;

    // Lines whose product or size disappeared since they were added are hidden.
    let lines: Vec<CartLine> = items
        .into_iter()
        .filter_map(|item| {
            let product = products.get(&item.product_id).filter(|p| p.enabled)?;
            let unit_price = product.size(&item.size)?.price;
            Some(CartLine {
                item_id: item.id,
                product_id: item.product_id,
                product_name: product.name.clone(),
                size: item.size,
                quantity: item.quantity,
                unit_price,
                line_total: unit_price * Decimal::from(item.quantity),
            })
        })
        .collect();

    let total: Decimal = lines.iter().map(|l| l.line_total).sum();

    Ok(Json(CartResponse { items: lines, total }))
}

pub async fn add_to_cart(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    AppJson(payload): AppJson<AddToCartRequest>,
) -> Result<Json<CartItem>> {
    let user_id = extract_user_id(&claims)?;

    let size = payload
        .size
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest("Please select a size".to_string()))?;

    if payload.quantity <= 0 {
        return Err(AppError::BadRequest(
            "Quantity must be greater than zero".to_string(),
        ));
    }

    let product = products_queries::find_by_id(&state.db, payload.product_id)
        .await?
        .filter(|p| p.enabled)
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    let already = cart_queries::find_item(&state.db, user_id, product.id, size)
        .await?
        .map_or(0, |item| item.quantity);
    let wanted = inventory::accumulate_quantity(&product, size, already, payload.quantity)?;

    let item = cart_queries::upsert_item(&state.db, user_id, product.id, size, wanted).await?;

    Ok(Json(item))
}

pub async fn remove_item(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    AppPath(item_id): AppPath<i32>,
) -> Result<StatusCode> {
    let user_id = extract_user_id(&claims)?;

    if cart_queries::remove_item(&state.db, user_id, item_id).await? == 0 {
        return Err(AppError::NotFound("Cart item not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
