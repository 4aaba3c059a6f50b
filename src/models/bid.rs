use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "bid_status", rename_all = "lowercase")]
pub enum BidStatus {
    Open,
    Closed,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Bid {
    pub id: i32,
    pub product_id: i32,
    pub shop_id: i32,
    pub title: String,
    pub starting_price: Decimal,
    pub closes_at: DateTime<Utc>,
    pub status: BidStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BidOffer {
    pub id: i32,
    pub bid_id: i32,
    pub user_id: i32,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

/// A bid row with its offers already aggregated by the database.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct BidSummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub bid: Bid,
    pub offer_count: i64,
    pub highest_offer: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
pub struct BidRequest {
    pub product_id: i32,
    pub title: String,
    pub starting_price: Decimal,
    pub closes_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct OfferRequest {
    pub amount: Decimal,
}

#[derive(Debug, Serialize)]
pub struct BidDetail {
    #[serde(flatten)]
    pub bid: Bid,
    pub offers: Vec<BidOffer>,
    pub highest_offer: Option<Decimal>,
    pub winner_id: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BidListQuery {
    pub status: Option<BidStatus>,
}
