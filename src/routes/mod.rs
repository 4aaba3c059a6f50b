mod api_directory;
mod bids;
mod cart;
mod comments;
mod health;
mod orders;
mod products;
mod reports;
mod reservations;
mod seller;

use axum::{
    Router,
    http::header,
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post, put},
};

use crate::{
    AppState,
    middleware::{admin_middleware, auth_middleware, seller_middleware},
};

pub use api_directory::{API_DIRECTORY, ApiEndpoint};

pub fn create_router(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/api", get(api_directory::list_endpoints))
        .route("/products", get(products::list_products))
        .route("/products/{id}", get(products::get_product))
        .route("/products/category/{category}", get(products::list_by_category))
        .route("/products/{id}/comments", get(comments::list_comments))
        .route("/shops/{shop_id}/products", get(products::list_shop_products))
        .route("/bids", get(bids::list_bids))
        .route("/bids/{id}", get(bids::get_bid));

    let customer = Router::new()
        .route("/cart", get(cart::get_cart).post(cart::add_to_cart))
        .route("/cart/{item_id}", delete(cart::remove_item))
        .route("/checkout", post(orders::checkout))
        .route("/orders", get(orders::get_orders))
        .route(
            "/reservations",
            get(reservations::my_reservations).post(reservations::create_reservation),
        )
        .route("/reservations/{code}/receipt", get(reservations::download_receipt))
        .route("/comments", post(comments::create_comment))
        .route("/comments/{id}", delete(comments::delete_comment))
        .route("/comments/{id}/like", post(comments::like_comment))
        .route("/comments/{id}/flag", post(comments::flag_comment))
        .route("/bids/{id}/offers", post(bids::place_offer))
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    let seller = Router::new()
        .route(
            "/seller/products",
            get(seller::my_products).post(seller::create_product),
        )
        .route(
            "/seller/products/{id}",
            put(seller::update_product).delete(seller::delete_product),
        )
        .route("/seller/reservations", get(reservations::shop_reservations))
        .route("/seller/reservations/{id}/status", patch(reservations::update_status))
        .route("/seller/bids", post(bids::create_bid))
        .route("/seller/bids/{id}/close", post(bids::close_bid))
        .route("/seller/reports/{kind}", get(reports::seller_report))
        .route_layer(from_fn_with_state(state.clone(), seller_middleware));

    let admin = Router::new()
        .route("/admin/orders/{id}/status", patch(orders::update_order_status))
        .route("/admin/comments/flagged", get(comments::flagged_comments))
        .route("/admin/reports/{kind}", get(reports::admin_report))
        .route_layer(from_fn_with_state(state.clone(), admin_middleware));

    public.merge(customer).merge(seller).merge(admin)
}

/// Binary body sent as a named download.
pub(crate) fn attachment(bytes: Vec<u8>, content_type: &'static str, file_name: &str) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        bytes,
    )
        .into_response()
}
