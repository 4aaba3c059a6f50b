use sqlx::{PgExecutor, PgPool};

use crate::{error::Result, models::CartItem};

pub async fn get_cart<'e>(db: impl PgExecutor<'e>, user_id: i32) -> Result<Vec<CartItem>> {
    let items = sqlx::query_as::<_, CartItem>(
        "SELECT * FROM cart_items WHERE user_id = $1 ORDER BY created_at ASC",
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;

    Ok(items)
}

pub async fn find_item(
    pool: &PgPool,
    user_id: i32,
    product_id: i32,
    size: &str,
) -> Result<Option<CartItem>> {
    let item = sqlx::query_as::<_, CartItem>(
        "SELECT * FROM cart_items WHERE user_id = $1 AND product_id = $2 AND size = $3",
    )
    .bind(user_id)
    .bind(product_id)
    .bind(size)
    .fetch_optional(pool)
    .await?;

    Ok(item)
}

/// Sets the line to `quantity`, creating it when absent.
pub async fn upsert_item(
    pool: &PgPool,
    user_id: i32,
    product_id: i32,
    size: &str,
    quantity: i32,
) -> Result<CartItem> {
    let item = sqlx::query_as::<_, CartItem>(
        "INSERT INTO cart_items (user_id, product_id, size, quantity)
         VALUES ($1, $2, $3, $4)
         ON CONFLICT (user_id, product_id, size) DO UPDATE SET quantity = EXCLUDED.quantity
         RETURNING *",
    )
    .bind(user_id)
    .bind(product_id)
    .bind(size)
    .bind(quantity)
    .fetch_one(pool)
    .await?;

    Ok(item)
}

pub async fn remove_item(pool: &PgPool, user_id: i32, item_id: i32) -> Result<u64> {
    let result = sqlx::query("DELETE FROM cart_items WHERE id = $1 AND user_id = $2")
        .bind(item_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

pub async fn clear_cart<'e>(db: impl PgExecutor<'e>, user_id: i32) -> Result<()> {
    sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
        .bind(user_id)
        .execute(db)
        .await?;

    Ok(())
}
