use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    error::Result,
    models::{CommentEntry, RevenueEntry},
};

/// Revenue per non-cancelled order. Scoped to a shop, only that shop's
/// lines count toward the amount.
pub async fn revenue_entries(pool: &PgPool, shop_id: Option<i32>) -> Result<Vec<RevenueEntry>> {
    let entries = match shop_id {
        Some(shop_id) => {
            sqlx::query_as::<_, RevenueEntry>(
                "SELECT o.id AS order_id, SUM(oi.unit_price * oi.quantity) AS amount, o.created_at
                 FROM orders o
                 JOIN order_items oi ON oi.order_id = o.id
                 WHERE o.status <> 'cancelled' AND oi.shop_id = $1
                 GROUP BY o.id
                 ORDER BY o.created_at",
            )
            .bind(shop_id)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, RevenueEntry>(
                "SELECT id AS order_id, total AS amount, created_at
                 FROM orders
                 WHERE status <> 'cancelled'
                 ORDER BY created_at",
            )
            .fetch_all(pool)
            .await?
        }
    };

    Ok(entries)
}

pub async fn comment_entries(pool: &PgPool, shop_id: Option<i32>) -> Result<Vec<CommentEntry>> {
    let mut query: QueryBuilder<Postgres> = QueryBuilder::new(
        "SELECT c.product_id, p.name AS product_name, c.rating, c.flagged, c.created_at
         FROM comments c
         JOIN products p ON p.id = c.product_id
         WHERE 1=1",
    );

    if let Some(shop_id) = shop_id {
        query.push(" AND p.shop_id = ");
        query.push_bind(shop_id);
    }

    query.push(" ORDER BY c.created_at");

    let entries = query.build_query_as::<CommentEntry>().fetch_all(pool).await?;

    Ok(entries)
}
