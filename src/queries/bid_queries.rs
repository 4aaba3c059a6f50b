use rust_decimal::Decimal;
use sqlx::{PgExecutor, PgPool, Postgres, QueryBuilder};

use crate::{
    error::Result,
    models::{Bid, BidOffer, BidRequest, BidStatus, BidSummary},
};

pub async fn list_summaries(
    pool: &PgPool,
    shop_id: Option<i32>,
    status: Option<BidStatus>,
) -> Result<Vec<BidSummary>> {
    let mut query: QueryBuilder<Postgres> = QueryBuilder::new(
        "SELECT b.*, COUNT(o.id) AS offer_count, MAX(o.amount) AS highest_offer
         FROM bids b
         LEFT JOIN bid_offers o ON o.bid_id = b.id
         WHERE 1=1",
    );

    if let Some(shop_id) = shop_id {
        query.push(" AND b.shop_id = ");
        query.push_bind(shop_id);
    }

    if let Some(status) = status {
        query.push(" AND b.status = ");
        query.push_bind(status);
    }

    query.push(" GROUP BY b.id ORDER BY b.closes_at ASC");

    let bids = query.build_query_as::<BidSummary>().fetch_all(pool).await?;

    Ok(bids)
}

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Bid>> {
    let bid = sqlx::query_as::<_, Bid>("SELECT * FROM bids WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(bid)
}

pub async fn offers_for_bid(pool: &PgPool, bid_id: i32) -> Result<Vec<BidOffer>> {
    let offers = sqlx::query_as::<_, BidOffer>(
        "SELECT * FROM bid_offers WHERE bid_id = $1 ORDER BY amount DESC, created_at ASC",
    )
    .bind(bid_id)
    .fetch_all(pool)
    .await?;

    Ok(offers)
}

pub async fn create_bid(pool: &PgPool, shop_id: i32, req: &BidRequest) -> Result<Bid> {
    let bid = sqlx::query_as::<_, Bid>(
        "INSERT INTO bids (product_id, shop_id, title, starting_price, closes_at)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING *",
    )
    .bind(req.product_id)
    .bind(shop_id)
    .bind(req.title.trim())
    .bind(req.starting_price)
    .bind(req.closes_at)
    .fetch_one(pool)
    .await?;

    Ok(bid)
}

pub async fn lock_bid<'e>(db: impl PgExecutor<'e>, id: i32) -> Result<Option<Bid>> {
    let bid = sqlx::query_as::<_, Bid>("SELECT * FROM bids WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(db)
        .await?;

    Ok(bid)
}

pub async fn highest_offer<'e>(db: impl PgExecutor<'e>, bid_id: i32) -> Result<Option<Decimal>> {
    let highest = sqlx::query_scalar::<_, Option<Decimal>>(
        "SELECT MAX(amount) FROM bid_offers WHERE bid_id = $1",
    )
    .bind(bid_id)
    .fetch_one(db)
    .await?;

    Ok(highest)
}

pub async fn insert_offer<'e>(
    db: impl PgExecutor<'e>,
    bid_id: i32,
    user_id: i32,
    amount: Decimal,
) -> Result<BidOffer> {
    let offer = sqlx::query_as::<_, BidOffer>(
        "INSERT INTO bid_offers (bid_id, user_id, amount) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(bid_id)
    .bind(user_id)
    .bind(amount)
    .fetch_one(db)
    .await?;

    Ok(offer)
}

/// Only open auctions are closed; `None` means missing or already closed.
pub async fn close_bid(pool: &PgPool, id: i32) -> Result<Option<Bid>> {
    let bid = sqlx::query_as::<_, Bid>(
        "UPDATE bids SET status = 'closed' WHERE id = $1 AND status = 'open' RETURNING *",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(bid)
}
