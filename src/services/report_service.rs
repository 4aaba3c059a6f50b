use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::{
    models::{
        BidSummary, CommentEntry, CommentReportRow, DayCount, RatingSummary, ReportCell, ReportTable,
        RevenueBucket, RevenueEntry, Reservation, ReservationReport, ReservationStatus,
        StatusCount,
    },
    utils::filters::{DateWindow, matches_search},
};

const STATUSES: [ReservationStatus; 3] = [
    ReservationStatus::NotVisited,
    ReservationStatus::Confirmed,
    ReservationStatus::Rejected,
];

/// Monthly revenue buckets. A year filter zero fills every month of that
/// year that still falls inside `from`/`to`.
pub fn revenue_by_month(entries: &[RevenueEntry], window: &DateWindow) -> Vec<RevenueBucket> {
    let mut buckets: BTreeMap<(i32, u32), (Decimal, i64)> = BTreeMap::new();

    if let Some(year) = window.year {
        for month in (1..=12).filter(|&m| window.overlaps_month(year, m)) {
            buckets.insert((year, month), (Decimal::ZERO, 0));
        }
    }

    for entry in entries.iter().filter(|e| window.contains(e.created_at)) {
        let bucket = buckets
            .entry((entry.created_at.year(), entry.created_at.month()))
            .or_insert((Decimal::ZERO, 0));
        bucket.0 += entry.amount;
        bucket.1 += 1;
    }

    buckets
        .into_iter()
        .map(|((year, month), (revenue, orders))| RevenueBucket {
            period: format!("{:04}-{:02}", year, month),
            revenue,
            orders,
        })
        .collect()
}

pub fn filter_reservations(
    reservations: Vec<Reservation>,
    status: Option<ReservationStatus>,
    search: Option<&str>,
    window: &DateWindow,
) -> Vec<Reservation> {
    reservations
        .into_iter()
        .filter(|r| status.map_or(true, |s| r.status == s))
        .filter(|r| window.contains(r.created_at))
        .filter(|r| {
            matches_search(
                search,
                &[
                    r.reservation_code.as_str(),
                    r.customer_name.as_str(),
                    r.customer_email.as_str(),
                    r.size.as_str(),
                ],
            )
        })
        .collect()
}

pub fn reservation_report(reservations: &[Reservation]) -> ReservationReport {
    let by_status = STATUSES
        .iter()
        .map(|&status| StatusCount {
            status,
            count: reservations.iter().filter(|r| r.status == status).count() as i64,
        })
        .collect();

    let mut days: BTreeMap<NaiveDate, i64> = BTreeMap::new();
    for r in reservations {
        *days.entry(r.created_at.date_naive()).or_insert(0) += 1;
    }

    ReservationReport {
        total: reservations.len() as i64,
        by_status,
        by_day: days
            .into_iter()
            .map(|(day, count)| DayCount { day, count })
            .collect(),
    }
}

pub fn filter_bids(bids: Vec<BidSummary>, search: Option<&str>, window: &DateWindow) -> Vec<BidSummary> {
    bids.into_iter()
        .filter(|b| window.contains(b.bid.created_at))
        .filter(|b| matches_search(search, &[b.bid.title.as_str()]))
        .collect()
}

pub fn comment_report(
    entries: &[CommentEntry],
    search: Option<&str>,
    window: &DateWindow,
) -> Vec<CommentReportRow> {
    let mut grouped: BTreeMap<i32, (String, Vec<i16>, i64)> = BTreeMap::new();

    for entry in entries
        .iter()
        .filter(|e| window.contains(e.created_at))
        .filter(|e| matches_search(search, &[e.product_name.as_str()]))
    {
        let group = grouped
            .entry(entry.product_id)
            .or_insert_with(|| (entry.product_name.clone(), Vec::new(), 0));
        group.1.push(entry.rating);
        if entry.flagged {
            group.2 += 1;
        }
    }

    let mut rows: Vec<CommentReportRow> = grouped
        .into_iter()
        .map(|(product_id, (product_name, ratings, flagged))| CommentReportRow {
            product_id,
            product_name,
            comments: ratings.len() as i64,
            average_rating: average_rating(&ratings).unwrap_or(0.0),
            flagged,
        })
        .collect();

    rows.sort_by(|a, b| b.comments.cmp(&a.comments).then(a.product_id.cmp(&b.product_id)));
    rows
}

/// Mean rating rounded to one decimal place.
pub fn average_rating(ratings: &[i16]) -> Option<f64> {
    if ratings.is_empty() {
        return None;
    }

    let sum: f64 = ratings.iter().map(|&r| f64::from(r)).sum();
    let mean = sum / ratings.len() as f64;
    Some((mean * 10.0).round() / 10.0)
}

pub fn rating_summary(ratings: &[i16]) -> RatingSummary {
    RatingSummary {
        count: ratings.len(),
        average: average_rating(ratings),
    }
}

// Tables for file exports

pub fn revenue_table(buckets: &[RevenueBucket]) -> ReportTable {
    ReportTable {
        title: "Revenue report".to_string(),
        headers: vec!["Period".into(), "Orders".into(), "Revenue".into()],
        rows: buckets
            .iter()
            .map(|b| {
                vec![
                    ReportCell::text(b.period.clone()),
                    ReportCell::integer(b.orders),
                    ReportCell::decimal(b.revenue, 2),
                ]
            })
            .collect(),
    }
}

pub fn bids_table(bids: &[BidSummary]) -> ReportTable {
    ReportTable {
        title: "Bids report".to_string(),
        headers: vec![
            "Auction".into(),
            "Status".into(),
            "Starting price".into(),
            "Offers".into(),
            "Highest offer".into(),
            "Closes at".into(),
        ],
        rows: bids
            .iter()
            .map(|b| {
                vec![
                    ReportCell::text(b.bid.title.clone()),
                    ReportCell::text(format!("{:?}", b.bid.status)),
                    ReportCell::decimal(b.bid.starting_price, 2),
                    ReportCell::integer(b.offer_count),
                    b.highest_offer
                        .map_or_else(|| ReportCell::text("-"), |h| ReportCell::decimal(h, 2)),
                    ReportCell::text(b.bid.closes_at.format("%Y-%m-%d %H:%M").to_string()),
                ]
            })
            .collect(),
    }
}

pub fn reservations_table(report: &ReservationReport) -> ReportTable {
    let mut rows: Vec<Vec<ReportCell>> = report
        .by_status
        .iter()
        .map(|s| vec![ReportCell::text(s.status.label()), ReportCell::integer(s.count)])
        .collect();
    rows.extend(report.by_day.iter().map(|d| {
        vec![
            ReportCell::text(d.day.format("%Y-%m-%d").to_string()),
            ReportCell::integer(d.count),
        ]
    }));
    rows.push(vec![ReportCell::text("Total"), ReportCell::integer(report.total)]);

    ReportTable {
        title: "Reservations report".to_string(),
        headers: vec!["Group".into(), "Reservations".into()],
        rows,
    }
}

pub fn comments_table(rows: &[CommentReportRow]) -> ReportTable {
    ReportTable {
        title: "Comments report".to_string(),
        headers: vec![
            "Product".into(),
            "Comments".into(),
            "Average rating".into(),
            "Flagged".into(),
        ],
        rows: rows
            .iter()
            .map(|r| {
                vec![
                    ReportCell::text(r.product_name.clone()),
                    ReportCell::integer(r.comments),
                    ReportCell::float(r.average_rating, 1),
                    ReportCell::integer(r.flagged),
                ]
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Bid, BidStatus};
    use chrono::{DateTime, TimeZone, Utc};

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 9, 30, 0).unwrap()
    }

    fn entry(order_id: i32, amount: i64, created_at: DateTime<Utc>) -> RevenueEntry {
        RevenueEntry {
            order_id,
            amount: Decimal::from(amount),
            created_at,
        }
    }

    fn reservation(id: i32, status: ReservationStatus, created_at: DateTime<Utc>) -> Reservation {
        Reservation {
            id,
            reservation_code: format!("CODE{:016}", id),
            product_id: 1,
            shop_id: 1,
            user_id: 5,
            customer_name: "Nino".to_string(),
            customer_email: "nino@example.com".to_string(),
            size: "M".to_string(),
            quantity: 1,
            unit_price: Decimal::from(30),
            status,
            created_at,
            updated_at: created_at,
        }
    }

    #[test]
    fn revenue_with_year_fills_twelve_months() {
        let entries = vec![
            entry(1, 100, at(2024, 3, 2)),
            entry(2, 50, at(2024, 3, 20)),
            entry(3, 70, at(2024, 11, 1)),
            entry(4, 999, at(2023, 3, 1)),
        ];
        let window = DateWindow::new(Some(2024), None, None).unwrap();
        let buckets = revenue_by_month(&entries, &window);

        assert_eq!(buckets.len(), 12);
        assert_eq!(buckets[2].period, "2024-03");
        assert_eq!(buckets[2].revenue, Decimal::from(150));
        assert_eq!(buckets[2].orders, 2);
        assert_eq!(buckets[0].orders, 0);
        assert_eq!(buckets[10].revenue, Decimal::from(70));
    }

    #[test]
    fn revenue_without_year_lists_only_active_months_in_order() {
        let entries = vec![entry(1, 10, at(2024, 1, 5)), entry(2, 20, at(2023, 12, 5))];
        let buckets = revenue_by_month(&entries, &DateWindow::default());

        let periods: Vec<&str> = buckets.iter().map(|b| b.period.as_str()).collect();
        assert_eq!(periods, vec!["2023-12", "2024-01"]);
    }

    #[test]
    fn reservation_report_counts_every_status() {
        let list = vec![
            reservation(1, ReservationStatus::NotVisited, at(2024, 5, 1)),
            reservation(2, ReservationStatus::Confirmed, at(2024, 5, 1)),
            reservation(3, ReservationStatus::Confirmed, at(2024, 5, 3)),
        ];
        let report = reservation_report(&list);

        assert_eq!(report.total, 3);
        assert_eq!(report.by_status.len(), 3);
        assert_eq!(report.by_status[1].count, 2);
        assert_eq!(report.by_status[2].count, 0);
        assert_eq!(report.by_day.len(), 2);
        assert_eq!(report.by_day[0].count, 2);
    }

    #[test]
    fn reservation_filters_compose() {
        let list = vec![
            reservation(1, ReservationStatus::NotVisited, at(2024, 5, 1)),
            reservation(2, ReservationStatus::Confirmed, at(2024, 6, 1)),
        ];
        let window = DateWindow::new(Some(2024), None, None).unwrap();

        let confirmed = filter_reservations(list.clone(), Some(ReservationStatus::Confirmed), None, &window);
        assert_eq!(confirmed.len(), 1);

        let by_code = filter_reservations(list, None, Some("code0000000000000001"), &window);
        assert_eq!(by_code.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn comment_report_groups_by_product() {
        let entries = vec![
            CommentEntry { product_id: 2, product_name: "Scarf".into(), rating: 4, flagged: false, created_at: at(2024, 1, 1) },
            CommentEntry { product_id: 2, product_name: "Scarf".into(), rating: 5, flagged: true, created_at: at(2024, 1, 2) },
            CommentEntry { product_id: 1, product_name: "Boots".into(), rating: 3, flagged: false, created_at: at(2024, 1, 3) },
        ];
        let rows = comment_report(&entries, None, &DateWindow::default());

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].product_id, 2);
        assert_eq!(rows[0].average_rating, 4.5);
        assert_eq!(rows[0].flagged, 1);

        let boots = comment_report(&entries, Some("boot"), &DateWindow::default());
        assert_eq!(boots.len(), 1);
    }

    #[test]
    fn average_rating_rounds_to_one_decimal() {
        assert_eq!(average_rating(&[]), None);
        assert_eq!(average_rating(&[5, 4, 4]), Some(4.3));
        assert_eq!(rating_summary(&[1, 2]).count, 2);
    }

    #[test]
    fn bid_filter_uses_title_and_window() {
        let summary = |id: i32, title: &str, created: DateTime<Utc>| BidSummary {
            bid: Bid {
                id,
                product_id: 1,
                shop_id: 1,
                title: title.to_string(),
                starting_price: Decimal::from(10),
                closes_at: created,
                status: BidStatus::Open,
                created_at: created,
            },
            offer_count: 0,
            highest_offer: None,
        };
        let bids = vec![summary(1, "Silk dress", at(2024, 2, 1)), summary(2, "Wool coat", at(2023, 2, 1))];
        let window = DateWindow::new(Some(2024), None, None).unwrap();

        assert_eq!(filter_bids(bids.clone(), None, &window).len(), 1);
        assert_eq!(filter_bids(bids, Some("coat"), &DateWindow::default())[0].bid.id, 2);
    }

    #[test]
    fn tables_have_one_cell_per_header() {
        let buckets = revenue_by_month(&[entry(1, 5, at(2024, 1, 1))], &DateWindow::default());
        let table = revenue_table(&buckets);

        assert!(table.rows.iter().all(|r| r.len() == table.headers.len()));
        let shown: Vec<&str> = table.rows[0].iter().map(ReportCell::as_text).collect();
        assert_eq!(shown, vec!["2024-01", "1", "5"]);
        assert_eq!(
            table.rows[0][2],
            ReportCell::Number { value: 5.0, shown: "5".to_string() }
        );
    }

    #[test]
    fn revenue_zero_fill_stays_inside_date_range() {
        let from = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let to = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        let window = DateWindow::new(Some(2024), Some(from), Some(to)).unwrap();

        let buckets = revenue_by_month(&[entry(1, 40, at(2024, 4, 10))], &window);
        let periods: Vec<&str> = buckets.iter().map(|b| b.period.as_str()).collect();

        assert_eq!(periods, vec!["2024-03", "2024-04", "2024-05"]);
        assert_eq!(buckets[1].revenue, Decimal::from(40));
    }

    #[test]
    fn numeric_looking_titles_stay_text() {
        let summary = BidSummary {
            bid: Bid {
                id: 1,
                product_id: 1,
                shop_id: 1,
                title: "NaN".to_string(),
                starting_price: Decimal::new(1250, 2),
                closes_at: at(2024, 2, 1),
                status: BidStatus::Open,
                created_at: at(2024, 1, 1),
            },
            offer_count: 3,
            highest_offer: None,
        };
        let table = bids_table(&[summary]);

        assert_eq!(table.rows[0][0], ReportCell::text("NaN"));
        assert_eq!(table.rows[0][2].as_text(), "12.50");
        assert!(matches!(table.rows[0][3], ReportCell::Number { value, .. } if value == 3.0));
        assert_eq!(table.rows[0][4], ReportCell::text("-"));
    }
}
