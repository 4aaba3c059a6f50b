use std::collections::HashMap;

use sqlx::{PgExecutor, PgPool, Postgres, QueryBuilder, types::Json};

use crate::{
    error::Result,
    models::{Product, ProductRequest, ProductSize},
};

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(product)
}

pub async fn find_by_ids(pool: &PgPool, ids: &[i32]) -> Result<HashMap<i32, Product>> {
    let products = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = ANY($1)")
        .bind(ids)
        .fetch_all(pool)
        .await?;

    Ok(products.into_iter().map(|p| (p.id, p)).collect())
}

/// Catalog source rows. Filtering, ordering and paging happen in
/// `services::catalog` over this set.
pub async fn list_products(
    pool: &PgPool,
    shop_id: Option<i32>,
    enabled_only: bool,
) -> Result<Vec<Product>> {
    let mut query: QueryBuilder<Postgres> = QueryBuilder::new("SELECT * FROM products WHERE 1=1");

    if enabled_only {
        query.push(" AND enabled = TRUE");
    }

    if let Some(shop_id) = shop_id {
        query.push(" AND shop_id = ");
        query.push_bind(shop_id);
    }

    query.push(" ORDER BY created_at DESC");

    let products = query.build_query_as::<Product>().fetch_all(pool).await?;

    Ok(products)
}

/// Locks the given rows for the rest of the transaction, in id order so
/// concurrent checkouts cannot deadlock each other.
pub async fn lock_by_ids<'e>(
    db: impl PgExecutor<'e>,
    ids: &[i32],
) -> Result<HashMap<i32, Product>> {
    let products = sqlx::query_as::<_, Product>(
        "SELECT * FROM products WHERE id = ANY($1) ORDER BY id FOR UPDATE",
    )
    .bind(ids)
    .fetch_all(db)
    .await?;

    Ok(products.into_iter().map(|p| (p.id, p)).collect())
}

pub async fn update_sizes<'e>(db: impl PgExecutor<'e>, id: i32, sizes: &[ProductSize]) -> Result<()> {
    sqlx::query("UPDATE products SET sizes = $1, updated_at = NOW() WHERE id = $2")
        .bind(Json(sizes))
        .bind(id)
        .execute(db)
        .await?;

    Ok(())
}

pub async fn create_product(pool: &PgPool, shop_id: i32, req: &ProductRequest) -> Result<Product> {
    let product = sqlx::query_as::<_, Product>(
        r#"
        INSERT INTO products (shop_id, name, description, category, images, sizes, enabled)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(shop_id)
    .bind(&req.name)
    .bind(&req.description)
    .bind(&req.category)
    .bind(req.images.clone().unwrap_or_default())
    .bind(Json(req.sizes.clone().unwrap_or_default()))
    .bind(req.enabled.unwrap_or(true))
    .fetch_one(pool)
    .await?;

    Ok(product)
}

pub async fn update_product(pool: &PgPool, id: i32, req: &ProductRequest) -> Result<Product> {
    let product = sqlx::query_as::<_, Product>(
        r#"
        UPDATE products
        SET
            name = COALESCE($1, name),
            description = COALESCE($2, description),
            category = COALESCE($3, category),
            images = COALESCE($4, images),
            sizes = COALESCE($5, sizes),
            enabled = COALESCE($6, enabled),
            updated_at = NOW()
        WHERE id = $7
        RETURNING *
        "#,
    )
    .bind(&req.name)
    .bind(&req.description)
    .bind(&req.category)
    .bind(&req.images)
    .bind(req.sizes.as_ref().map(Json))
    .bind(req.enabled)
    .bind(id)
    .fetch_one(pool)
    .await?;

    Ok(product)
}

/// Products stay referenced by orders and reservations, so removal only
/// takes them off the storefront.
pub async fn disable_product(pool: &PgPool, id: i32) -> Result<u64> {
    let result = sqlx::query("UPDATE products SET enabled = FALSE, updated_at = NOW() WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
