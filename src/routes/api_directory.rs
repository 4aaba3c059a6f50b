use axum::Json;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ApiEndpoint {
    pub name: &'static str,
    pub method: &'static str,
    pub path: &'static str,
}

const fn endpoint(name: &'static str, method: &'static str, path: &'static str) -> ApiEndpoint {
    ApiEndpoint { name, method, path }
}

/// Every route the server mounts, in the order the router declares them.
pub const API_DIRECTORY: &[ApiEndpoint] = &[
    endpoint("health", "GET", "/health"),
    endpoint("readiness", "GET", "/health/ready"),
    endpoint("apiDirectory", "GET", "/api"),
    endpoint("listProducts", "GET", "/products"),
    endpoint("productDetail", "GET", "/products/{id}"),
    endpoint("productsByCategory", "GET", "/products/category/{category}"),
    endpoint("productComments", "GET", "/products/{id}/comments"),
    endpoint("shopProducts", "GET", "/shops/{shop_id}/products"),
    endpoint("listBids", "GET", "/bids"),
    endpoint("bidDetail", "GET", "/bids/{id}"),
    endpoint("getCart", "GET", "/cart"),
    endpoint("addToCart", "POST", "/cart"),
    endpoint("removeFromCart", "DELETE", "/cart/{item_id}"),
    endpoint("checkout", "POST", "/checkout"),
    endpoint("myOrders", "GET", "/orders"),
    endpoint("myReservations", "GET", "/reservations"),
    endpoint("createReservation", "POST", "/reservations"),
    endpoint("reservationReceipt", "GET", "/reservations/{code}/receipt"),
    endpoint("postComment", "POST", "/comments"),
    endpoint("deleteComment", "DELETE", "/comments/{id}"),
    endpoint("likeComment", "POST", "/comments/{id}/like"),
    endpoint("flagComment", "POST", "/comments/{id}/flag"),
    endpoint("placeOffer", "POST", "/bids/{id}/offers"),
    endpoint("sellerProducts", "GET", "/seller/products"),
    endpoint("createProduct", "POST", "/seller/products"),
    endpoint("updateProduct", "PUT", "/seller/products/{id}"),
    endpoint("deleteProduct", "DELETE", "/seller/products/{id}"),
    endpoint("shopReservations", "GET", "/seller/reservations"),
    endpoint("reservationStatus", "PATCH", "/seller/reservations/{id}/status"),
    endpoint("createBid", "POST", "/seller/bids"),
    endpoint("closeBid", "POST", "/seller/bids/{id}/close"),
    endpoint("sellerReport", "GET", "/seller/reports/{kind}"),
    endpoint("orderStatus", "PATCH", "/admin/orders/{id}/status"),
    endpoint("flaggedComments", "GET", "/admin/comments/flagged"),
    endpoint("adminReport", "GET", "/admin/reports/{kind}"),
];

pub async fn list_endpoints() -> Json<&'static [ApiEndpoint]> {
    Json(API_DIRECTORY)
}
