use sqlx::{PgExecutor, PgPool, Postgres, QueryBuilder};

use crate::{
    error::Result,
    models::{NewReservation, Reservation, ReservationReceipt, ReservationStatus},
};

pub async fn insert_reservation(
    pool: &PgPool,
    code: &str,
    new: &NewReservation,
) -> Result<Reservation> {
    let reservation = sqlx::query_as::<_, Reservation>(
        "INSERT INTO reservations (reservation_code, product_id, shop_id, user_id, customer_name,
         customer_email, size, quantity, unit_price)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
         RETURNING *",
    )
    .bind(code)
    .bind(new.product_id)
    .bind(new.shop_id)
    .bind(new.user_id)
    .bind(&new.customer_name)
    .bind(&new.customer_email)
    .bind(&new.size)
    .bind(new.quantity)
    .bind(new.unit_price)
    .fetch_one(pool)
    .await?;

    Ok(reservation)
}

pub async fn find_receipt(pool: &PgPool, code: &str) -> Result<Option<ReservationReceipt>> {
    let receipt = sqlx::query_as::<_, ReservationReceipt>(
        "SELECT r.*, p.name AS product_name, s.name AS shop_name
         FROM reservations r
         JOIN products p ON p.id = r.product_id
         LEFT JOIN shops s ON s.id = r.shop_id
         WHERE r.reservation_code = $1",
    )
    .bind(code)
    .fetch_optional(pool)
    .await?;

    Ok(receipt)
}

pub async fn list_for_user(pool: &PgPool, user_id: i32) -> Result<Vec<Reservation>> {
    let reservations = sqlx::query_as::<_, Reservation>(
        "SELECT * FROM reservations WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(reservations)
}

/// All reservations of one shop, or of every shop when `shop_id` is `None`.
pub async fn list_for_shop(pool: &PgPool, shop_id: Option<i32>) -> Result<Vec<Reservation>> {
    let mut query: QueryBuilder<Postgres> =
        QueryBuilder::new("SELECT * FROM reservations WHERE 1=1");

    if let Some(shop_id) = shop_id {
        query.push(" AND shop_id = ");
        query.push_bind(shop_id);
    }

    query.push(" ORDER BY created_at DESC");

    let reservations = query.build_query_as::<Reservation>().fetch_all(pool).await?;

    Ok(reservations)
}

pub async fn lock_by_id<'e>(db: impl PgExecutor<'e>, id: i32) -> Result<Option<Reservation>> {
    let reservation =
        sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(db)
            .await?;

    Ok(reservation)
}

pub async fn set_status<'e>(
    db: impl PgExecutor<'e>,
    id: i32,
    status: ReservationStatus,
) -> Result<Reservation> {
    let reservation = sqlx::query_as::<_, Reservation>(
        "UPDATE reservations SET status = $1, updated_at = NOW() WHERE id = $2 RETURNING *",
    )
    .bind(status)
    .bind(id)
    .fetch_one(db)
    .await?;

    Ok(reservation)
}
