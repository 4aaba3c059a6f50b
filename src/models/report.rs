use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::{Decimal, prelude::ToPrimitive};
use serde::{Deserialize, Serialize};

use crate::models::ReservationStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Json,
    Pdf,
    Excel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Revenue,
    Bids,
    Reservations,
    Comments,
}

impl ReportKind {
    pub fn slug(self) -> &'static str {
        match self {
            ReportKind::Revenue => "revenue",
            ReportKind::Bids => "bids",
            ReportKind::Reservations => "reservations",
            ReportKind::Comments => "comments",
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub format: Option<ReportFormat>,
    pub year: Option<i32>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub search: Option<String>,
}

// Source rows fetched for aggregation

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RevenueEntry {
    pub order_id: i32,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CommentEntry {
    pub product_id: i32,
    pub product_name: String,
    pub rating: i16,
    pub flagged: bool,
    pub created_at: DateTime<Utc>,
}

// Aggregated rows

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueBucket {
    pub period: String,
    pub revenue: Decimal,
    pub orders: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusCount {
    pub status: ReservationStatus,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayCount {
    pub day: NaiveDate,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReservationReport {
    pub total: i64,
    pub by_status: Vec<StatusCount>,
    pub by_day: Vec<DayCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentReportRow {
    pub product_id: i32,
    pub product_name: String,
    pub comments: i64,
    pub average_rating: f64,
    pub flagged: i64,
}

/// One exported cell. Numbers keep their printed form next to the value
/// written into spreadsheets.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportCell {
    Text(String),
    Number { value: f64, shown: String },
}

impl ReportCell {
    pub fn text(value: impl Into<String>) -> Self {
        ReportCell::Text(value.into())
    }

    pub fn integer(value: i64) -> Self {
        ReportCell::Number {
            value: value as f64,
            shown: value.to_string(),
        }
    }

    pub fn decimal(value: Decimal, dp: u32) -> Self {
        let rounded = value.round_dp(dp);
        match rounded.to_f64() {
            Some(number) => ReportCell::Number {
                value: number,
                shown: rounded.to_string(),
            },
            None => ReportCell::Text(rounded.to_string()),
        }
    }

    pub fn float(value: f64, dp: usize) -> Self {
        ReportCell::Number {
            value,
            shown: format!("{:.*}", dp, value),
        }
    }

    pub fn as_text(&self) -> &str {
        match self {
            ReportCell::Text(text) => text,
            ReportCell::Number { shown, .. } => shown,
        }
    }
}

/// Flat, already formatted table handed to the PDF and Excel writers.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportTable {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<ReportCell>>,
}
