use axum::{
    Extension, Json,
    extract::State,
    response::{IntoResponse, Response},
};
use chrono::Utc;

use crate::{
    AppState,
    error::Result,
    models::{ReportFormat, ReportKind, ReportQuery, ReportTable},
    queries::{bid_queries, report_queries, reservation_queries},
    routes::attachment,
    services::{export_service, report_service},
    utils::{
        extractors::extract_shop_id,
        filters::DateWindow,
        jwt::Claims,
        request::{AppPath, AppQuery},
    },
};

pub async fn admin_report(
    State(state): State<AppState>,
    AppPath(kind): AppPath<ReportKind>,
    AppQuery(params): AppQuery<ReportQuery>,
) -> Result<Response> {
    build_report(&state, kind, None, &params).await
}

pub async fn seller_report(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    AppPath(kind): AppPath<ReportKind>,
    AppQuery(params): AppQuery<ReportQuery>,
) -> Result<Response> {
    let shop_id = extract_shop_id(&claims)?;
    build_report(&state, kind, Some(shop_id), &params).await
}

/// Aggregates one report and answers with JSON rows or a file download.
async fn build_report(
    state: &AppState,
    kind: ReportKind,
    shop_id: Option<i32>,
    params: &ReportQuery,
) -> Result<Response> {
    let window = DateWindow::new(params.year, params.from, params.to)?;
    let format = params.format.unwrap_or_default();
    let search = params.search.as_deref();

    let (json, table) = match kind {
        ReportKind::Revenue => {
            let entries = report_queries::revenue_entries(&state.db, shop_id).await?;
            let buckets = report_service::revenue_by_month(&entries, &window);
            (Json(&buckets).into_response(), report_service::revenue_table(&buckets))
        }
        ReportKind::Bids => {
            let bids = bid_queries::list_summaries(&state.db, shop_id, None).await?;
            let bids = report_service::filter_bids(bids, search, &window);
            (Json(&bids).into_response(), report_service::bids_table(&bids))
        }
        ReportKind::Reservations => {
            let reservations = reservation_queries::list_for_shop(&state.db, shop_id).await?;
            let reservations =
                report_service::filter_reservations(reservations, None, search, &window);
            let report = report_service::reservation_report(&reservations);
            (Json(&report).into_response(), report_service::reservations_table(&report))
        }
        ReportKind::Comments => {
            let entries = report_queries::comment_entries(&state.db, shop_id).await?;
            let rows = report_service::comment_report(&entries, search, &window);
            (Json(&rows).into_response(), report_service::comments_table(&rows))
        }
    };

    if format == ReportFormat::Json {
        return Ok(json);
    }

    download(state, kind, shop_id, format, &table)
}

fn download(
    state: &AppState,
    kind: ReportKind,
    shop_id: Option<i32>,
    format: ReportFormat,
    table: &ReportTable,
) -> Result<Response> {
    let today = Utc::now().date_naive();
    let base_name = match shop_id {
        Some(shop_id) => format!("{}-report-shop-{}-{}", kind.slug(), shop_id, today),
        None => format!("{}-report-{}", kind.slug(), today),
    };

    let file = export_service::export_table(
        table,
        format,
        &base_name,
        &generated_for(&state.shop_name, today),
    )?;

    tracing::info!("Exported {} ({} bytes)", file.file_name, file.bytes.len());

    Ok(attachment(file.bytes, file.content_type, &file.file_name))
}

fn generated_for(shop_name: &str, day: chrono::NaiveDate) -> String {
    let name = match shop_name.trim() {
        "" => "Marketplace",
        name => name,
    };

    format!("{} - generated {}", name, day.format("%Y-%m-%d"))
}
