use axum::{
    Extension, Json,
    extract::State,
    response::Response,
};

use crate::{
    AppState,
    error::{AppError, Result},
    models::{
        NewReservation, Reservation, ReservationQuery, ReservationRequest, ReservationResponse,
        ReservationStatus, ReservationStatusUpdate, UserRole,
    },
    queries::{products_queries, reservation_queries},
    routes::attachment,
    services::{
        export_service::PDF_CONTENT_TYPE, inventory, receipt_service, report_service,
        reservation_code,
    },
    utils::{
        extractors::{ensure_shop_access, extract_user_id, shop_scope},
        filters::DateWindow,
        jwt::Claims,
        request::{AppJson, AppPath, AppQuery},
    },
};

const MAX_CODE_ATTEMPTS: usize = 5;

/// Checks that need no stored data. Returns the selected size.
fn validate_request(payload: &ReservationRequest) -> Result<&str> {
    let size = payload
        .size
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest("Please select a size".to_string()))?;

    if payload.quantity <= 0 {
        return Err(AppError::BadRequest(
            "Quantity must be greater than zero".to_string(),
        ));
    }

    Ok(size)
}

/// Reservations are decided once: `NotVisited` may become `Confirmed` or
/// `Rejected`, nothing else moves.
fn check_transition(from: ReservationStatus, to: ReservationStatus) -> Result<()> {
    if to == ReservationStatus::NotVisited {
        return Err(AppError::BadRequest(
            "A reservation cannot be reset to not visited".to_string(),
        ));
    }

    if from != ReservationStatus::NotVisited {
        return Err(AppError::Conflict(format!(
            "Reservation is already {}",
            from.label().to_lowercase()
        )));
    }

    Ok(())
}

async fn insert_with_fresh_code(state: &AppState, new: &NewReservation) -> Result<Reservation> {
    for attempt in 1..=MAX_CODE_ATTEMPTS {
        let code = reservation_code::generate_code();

        match reservation_queries::insert_reservation(&state.db, &code, new).await {
            Err(e) if e.is_unique_violation() => {
                tracing::warn!("Reservation code collision on attempt {}, regenerating", attempt);
            }
            other => return other,
        }
    }

    Err(AppError::InternalError(
        "Could not allocate a unique reservation code".to_string(),
    ))
}

pub async fn create_reservation(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    AppJson(payload): AppJson<ReservationRequest>,
) -> Result<Json<ReservationResponse>> {
    let size = validate_request(&payload)?;
    let user_id = extract_user_id(&claims)?;

    let product = products_queries::find_by_id(&state.db, payload.product_id)
        .await?
        .filter(|p| p.enabled)
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    let entry = inventory::check_availability(&product, size, payload.quantity)?;

    let new = NewReservation {
        product_id: product.id,
        shop_id: product.shop_id,
        user_id,
        customer_name: claims.name.clone(),
        customer_email: claims.email.clone(),
        size: entry.size.clone(),
        quantity: payload.quantity,
        unit_price: entry.price,
    };

    let reservation = insert_with_fresh_code(&state, &new).await?;

    tracing::info!(
        "Reservation {} created by user {} for product {} ({} x {})",
        reservation.reservation_code,
        user_id,
        product.id,
        reservation.quantity,
        reservation.size
    );

    Ok(Json(ReservationResponse {
        success: true,
        receipt_url: format!("/reservations/{}/receipt", reservation.reservation_code),
        reservation_code: reservation.reservation_code.clone(),
        reservation,
    }))
}

pub async fn my_reservations(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<Reservation>>> {
    let user_id = extract_user_id(&claims)?;
    let reservations = reservation_queries::list_for_user(&state.db, user_id).await?;

    Ok(Json(reservations))
}

pub async fn download_receipt(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    AppPath(code): AppPath<String>,
) -> Result<Response> {
    if !reservation_code::is_valid_code(&code) {
        return Err(AppError::NotFound("Reservation not found".to_string()));
    }

    let receipt = reservation_queries::find_receipt(&state.db, &code)
        .await?
        .ok_or_else(|| AppError::NotFound("Reservation not found".to_string()))?;

    let user_id = extract_user_id(&claims)?;
    if receipt.reservation.user_id != user_id {
        ensure_shop_access(&claims, receipt.reservation.shop_id)?;
    }

    let bytes = receipt_service::render_receipt(&receipt, &state.shop_name)?;

    Ok(attachment(
        bytes,
        PDF_CONTENT_TYPE,
        &receipt_service::receipt_file_name(&code),
    ))
}

pub async fn shop_reservations(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    AppQuery(params): AppQuery<ReservationQuery>,
) -> Result<Json<Vec<Reservation>>> {
    let window = DateWindow::new(None, params.from, params.to)?;
    let shop_id = shop_scope(&claims)?;

    let reservations = reservation_queries::list_for_shop(&state.db, shop_id).await?;
    let filtered = report_service::filter_reservations(
        reservations,
        params.status,
        params.search.as_deref(),
        &window,
    );

    Ok(Json(filtered))
}

pub async fn update_status(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<ReservationStatusUpdate>,
) -> Result<Json<Reservation>> {
    let mut tx = state.db.begin().await?;

    let reservation = reservation_queries::lock_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Reservation with id {} not found", id)))?;

    ensure_shop_access(&claims, reservation.shop_id)?;
    check_transition(reservation.status, payload.status)?;

    if payload.status == ReservationStatus::Confirmed {
        let mut products =
            products_queries::lock_by_ids(&mut *tx, &[reservation.product_id]).await?;
        let product = products
            .get_mut(&reservation.product_id)
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

        if !inventory::take_stock(&mut product.sizes, &reservation.size, reservation.quantity) {
            return Err(AppError::Conflict(
                "Not enough stock left to confirm this reservation".to_string(),
            ));
        }

        products_queries::update_sizes(&mut *tx, product.id, &product.sizes).await?;
    }

    let updated = reservation_queries::set_status(&mut *tx, id, payload.status).await?;
    tx.commit().await?;

    tracing::info!(
        "Reservation {} marked {:?} by {} user {}",
        updated.reservation_code,
        updated.status,
        if claims.role == UserRole::Admin { "admin" } else { "seller" },
        claims.sub
    );

    Ok(Json(updated))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(size: Option<&str>, quantity: i32) -> ReservationRequest {
        ReservationRequest {
            product_id: 1,
            size: size.map(str::to_string),
            quantity,
        }
    }

    #[test]
    fn missing_or_blank_size_is_rejected() {
        assert!(validate_request(&request(None, 1)).is_err());
        assert!(validate_request(&request(Some("   "), 1)).is_err());
    }

    #[test]
    fn non_positive_quantity_is_rejected() {
        for q in [0, -1, i32::MIN] {
            assert!(matches!(
                validate_request(&request(Some("M"), q)),
                Err(AppError::BadRequest(_))
            ));
        }
    }

    #[test]
    fn valid_request_yields_trimmed_size() {
        assert_eq!(validate_request(&request(Some(" M "), 2)).unwrap(), "M");
    }

    #[test]
    fn only_pending_reservations_change() {
        use ReservationStatus::*;

        assert!(check_transition(NotVisited, Confirmed).is_ok());
        assert!(check_transition(NotVisited, Rejected).is_ok());
        assert!(matches!(check_transition(Confirmed, Rejected), Err(AppError::Conflict(_))));
        assert!(matches!(check_transition(Rejected, Confirmed), Err(AppError::Conflict(_))));
        assert!(matches!(check_transition(NotVisited, NotVisited), Err(AppError::BadRequest(_))));
    }
}
