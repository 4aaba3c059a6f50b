use rust_decimal::Decimal;
use sqlx::{PgExecutor, PgPool};

use crate::{
    error::Result,
    models::{CheckoutRequest, Order, OrderItem, OrderItemData, OrderStatus},
};

pub async fn insert_order<'e>(
    db: impl PgExecutor<'e>,
    user_id: i32,
    total: Decimal,
    req: &CheckoutRequest,
) -> Result<Order> {
    let order = sqlx::query_as::<_, Order>(
        "INSERT INTO orders (user_id, total, address, phone)
         VALUES ($1, $2, $3, $4)
         RETURNING *",
    )
    .bind(user_id)
    .bind(total)
    .bind(req.address.trim())
    .bind(req.phone.trim())
    .fetch_one(db)
    .await?;

    Ok(order)
}

pub async fn insert_items<'e>(
    db: impl PgExecutor<'e>,
    order_id: i32,
    items: &[OrderItemData],
) -> Result<Vec<OrderItem>> {
    let product_ids: Vec<i32> = items.iter().map(|i| i.product_id).collect();
    let shop_ids: Vec<i32> = items.iter().map(|i| i.shop_id).collect();
    let product_names: Vec<&str> = items.iter().map(|i| i.product_name.as_str()).collect();
    let sizes: Vec<&str> = items.iter().map(|i| i.size.as_str()).collect();
    let quantities: Vec<i32> = items.iter().map(|i| i.quantity).collect();
    let prices: Vec<Decimal> = items.iter().map(|i| i.unit_price).collect();

    let rows = sqlx::query_as::<_, OrderItem>(
        "INSERT INTO order_items (order_id, product_id, shop_id, product_name, size, quantity, unit_price)
         SELECT $1, unnest($2::int[]), unnest($3::int[]), unnest($4::varchar[]), unnest($5::varchar[]), unnest($6::int[]), unnest($7::numeric[])
         RETURNING *",
    )
    .bind(order_id)
    .bind(&product_ids)
    .bind(&shop_ids)
    .bind(&product_names)
    .bind(&sizes)
    .bind(&quantities)
    .bind(&prices)
    .fetch_all(db)
    .await?;

    Ok(rows)
}

pub async fn get_user_orders(pool: &PgPool, user_id: i32) -> Result<Vec<Order>> {
    let orders = sqlx::query_as::<_, Order>(
        "SELECT * FROM orders WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(orders)
}

pub async fn get_items_for_orders(pool: &PgPool, order_ids: &[i32]) -> Result<Vec<OrderItem>> {
    let items = sqlx::query_as::<_, OrderItem>(
        "SELECT * FROM order_items WHERE order_id = ANY($1) ORDER BY id",
    )
    .bind(order_ids)
    .fetch_all(pool)
    .await?;

    Ok(items)
}

pub async fn update_status(pool: &PgPool, id: i32, status: OrderStatus) -> Result<Option<Order>> {
    let order = sqlx::query_as::<_, Order>(
        "UPDATE orders SET status = $1, updated_at = NOW() WHERE id = $2 RETURNING *",
    )
    .bind(status)
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(order)
}
