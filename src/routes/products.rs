use axum::{
    Json,
    extract::State,
};

use crate::{
    AppState,
    error::{AppError, Result},
    models::{Product, ProductListResponse, ProductQuery},
    queries::products_queries,
    services::catalog::{self, CatalogPage},
    utils::request::{AppPath, AppQuery},
};

fn to_response(page: CatalogPage) -> ProductListResponse {
    ProductListResponse {
        products: page.products,
        total: page.total,
        limit: page.limit,
        offset: page.offset,
    }
}

pub async fn list_products(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ProductQuery>,
) -> Result<Json<ProductListResponse>> {
    let products = products_queries::list_products(&state.db, None, true).await?;

    Ok(Json(to_response(catalog::build_page(products, &params))))
}

pub async fn list_by_category(
    State(state): State<AppState>,
    AppPath(category): AppPath<String>,
    AppQuery(mut params): AppQuery<ProductQuery>,
) -> Result<Json<ProductListResponse>> {
    params.category = Some(category);
    let products = products_queries::list_products(&state.db, None, true).await?;

    Ok(Json(to_response(catalog::build_page(products, &params))))
}

pub async fn list_shop_products(
    State(state): State<AppState>,
    AppPath(shop_id): AppPath<i32>,
    AppQuery(params): AppQuery<ProductQuery>,
) -> Result<Json<ProductListResponse>> {
    let products = products_queries::list_products(&state.db, Some(shop_id), true).await?;

    Ok(Json(to_response(catalog::build_page(products, &params))))
}

pub async fn get_product(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<Product>> {
    let product = products_queries::find_by_id(&state.db, id)
        .await?
        .filter(|p| p.enabled)
        .ok_or(AppError::NotFound("Product not found".to_string()))?;

    Ok(Json(product))
}
