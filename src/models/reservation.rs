use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "reservation_status", rename_all = "snake_case")]
pub enum ReservationStatus {
    NotVisited,
    Confirmed,
    Rejected,
}

impl ReservationStatus {
    pub fn label(self) -> &'static str {
        match self {
            ReservationStatus::NotVisited => "Not visited",
            ReservationStatus::Confirmed => "Confirmed",
            ReservationStatus::Rejected => "Rejected",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Reservation {
    pub id: i32,
    pub reservation_code: String,
    pub product_id: i32,
    pub shop_id: i32,
    pub user_id: i32,
    pub customer_name: String,
    pub customer_email: String,
    pub size: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    pub fn total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Everything a receipt prints, joined from the reservation, its product
/// and its shop.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ReservationReceipt {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub reservation: Reservation,
    pub product_name: String,
    pub shop_name: Option<String>,
}

/// A validated reservation waiting for its code.
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub product_id: i32,
    pub shop_id: i32,
    pub user_id: i32,
    pub customer_name: String,
    pub customer_email: String,
    pub size: String,
    pub quantity: i32,
    pub unit_price: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct ReservationRequest {
    pub product_id: i32,
    pub size: Option<String>,
    pub quantity: i32,
}

#[derive(Debug, Serialize)]
pub struct ReservationResponse {
    pub success: bool,
    pub reservation_code: String,
    pub reservation: Reservation,
    pub receipt_url: String,
}

#[derive(Debug, Deserialize)]
pub struct ReservationStatusUpdate {
    pub status: ReservationStatus,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReservationQuery {
    pub status: Option<ReservationStatus>,
    pub search: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}
