use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};

use crate::error::{AppError, Result};

/// Inclusive calendar window used by every dashboard list and report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateWindow {
    pub year: Option<i32>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateWindow {
    pub fn new(year: Option<i32>, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<Self> {
        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err(AppError::BadRequest(
                    "'from' must not be after 'to'".to_string(),
                ));
            }
        }

        Ok(Self { year, from, to })
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        let day = at.date_naive();

        self.year.map_or(true, |year| day.year() == year)
            && self.from.map_or(true, |from| day >= from)
            && self.to.map_or(true, |to| day <= to)
    }

    /// True when any day of the calendar month lies inside the window.
    pub fn overlaps_month(&self, year: i32, month: u32) -> bool {
        let first = match NaiveDate::from_ymd_opt(year, month, 1) {
            Some(day) => day,
            None => return false,
        };
        let last = first
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(first);

        self.year.map_or(true, |y| y == year)
            && self.from.map_or(true, |from| last >= from)
            && self.to.map_or(true, |to| first <= to)
    }
}

/// Case-insensitive substring match against any of the given fields. A
/// missing or blank term matches everything.
pub fn matches_search(term: Option<&str>, fields: &[&str]) -> bool {
    let term = match term.map(str::trim) {
        Some(t) if !t.is_empty() => t.to_lowercase(),
        _ => return true,
    };

    fields.iter().any(|f| f.to_lowercase().contains(&term))
}
