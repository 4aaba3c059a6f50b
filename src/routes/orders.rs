use std::collections::HashMap;

use axum::{
    Extension, Json,
    extract::State,
};

use crate::{
    AppState,
    error::{AppError, Result},
    models::{CheckoutRequest, Order, OrderResponse, OrderStatusUpdate},
    queries::{cart_queries, order_queries, products_queries},
    services::inventory,
    utils::{
        extractors::extract_user_id,
        jwt::Claims,
        request::{AppJson, AppPath},
    },
};

pub async fn checkout(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    AppJson(payload): AppJson<CheckoutRequest>,
) -> Result<Json<OrderResponse>> {
    let user_id = extract_user_id(&claims)?;

    if payload.address.trim().is_empty() {
        return Err(AppError::BadRequest("Address is required".to_string()));
    }

    if payload.phone.trim().is_empty() {
        return Err(AppError::BadRequest("Phone number is required".to_string()));
    }

    let mut tx = state.db.begin().await?;

    let cart = cart_queries::get_cart(&mut *tx, user_id).await?;
    if cart.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".to_string()));
    }

    let mut product_ids: Vec<i32> = cart.iter().map(|i| i.product_id).collect();
    product_ids.sort_unstable();
    product_ids.dedup();

    let mut products = products_queries::lock_by_ids(&mut *tx, &product_ids).await?;

    let (total, order_items) = inventory::price_cart(&cart, &mut products)?;

    for id in &product_ids {
        if let Some(product) = products.get(id) {
            products_queries::update_sizes(&mut *tx, product.id, &product.sizes).await?;
        }
    }

    let order = order_queries::insert_order(&mut *tx, user_id, total, &payload).await?;
    let items = order_queries::insert_items(&mut *tx, order.id, &order_items).await?;
    cart_queries::clear_cart(&mut *tx, user_id).await?;

    tx.commit().await?;

    tracing::info!(
        "Order {} placed by user {} with {} items, total {}",
        order.id,
        user_id,
        items.len(),
        order.total
    );

    Ok(Json(OrderResponse { order, items }))
}

pub async fn get_orders(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<OrderResponse>>> {
    let user_id = extract_user_id(&claims)?;
    let orders = order_queries::get_user_orders(&state.db, user_id).await?;

    let order_ids: Vec<i32> = orders.iter().map(|o| o.id).collect();
    let all_items = order_queries::get_items_for_orders(&state.db, &order_ids).await?;

    let mut items_map: HashMap<i32, Vec<_>> = HashMap::new();
    for item in all_items {
        items_map.entry(item.order_id).or_default().push(item);
    }

    let response = orders
        .into_iter()
        .map(|order| {
            let items = items_map.remove(&order.id).unwrap_or_default();
            OrderResponse { order, items }
        })
        .collect();

    Ok(Json(response))
}

pub async fn update_order_status(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<OrderStatusUpdate>,
) -> Result<Json<Order>> {
    let order = order_queries::update_status(&state.db, id, payload.status)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Order with id {} not found", id)))?;

    tracing::info!("Order {} moved to {:?}", order.id, order.status);

    Ok(Json(order))
}
