use axum::{
    Extension, Json,
    extract::State,
};
use chrono::Utc;

use crate::{
    AppState,
    error::{AppError, Result},
    models::{
        Bid, BidDetail, BidListQuery, BidOffer, BidRequest, BidSummary, OfferRequest,
    },
    queries::{bid_queries, products_queries},
    services::bidding,
    utils::{
        extractors::{ensure_shop_access, extract_user_id},
        jwt::Claims,
        request::{AppJson, AppPath, AppQuery},
    },
};

pub async fn list_bids(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<BidListQuery>,
) -> Result<Json<Vec<BidSummary>>> {
    let bids = bid_queries::list_summaries(&state.db, None, params.status).await?;

    Ok(Json(bids))
}

pub async fn get_bid(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<BidDetail>> {
    let bid = bid_queries::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Auction with id {} not found", id)))?;

    let offers = bid_queries::offers_for_bid(&state.db, id).await?;
    let highest_offer = bidding::winning_offer(&offers).map(|o| o.amount);
    let winner_id = bidding::decided_winner(&bid, &offers, Utc::now()).map(|o| o.user_id);

    Ok(Json(BidDetail {
        bid,
        offers,
        highest_offer,
        winner_id,
    }))
}

pub async fn place_offer(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<OfferRequest>,
) -> Result<Json<BidOffer>> {
    let user_id = extract_user_id(&claims)?;

    let mut tx = state.db.begin().await?;

    let bid = bid_queries::lock_bid(&mut *tx, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Auction with id {} not found", id)))?;

    let highest = bid_queries::highest_offer(&mut *tx, id).await?;
    bidding::validate_offer(&bid, highest, payload.amount, claims.shop_id, Utc::now())?;

    let offer = bid_queries::insert_offer(&mut *tx, id, user_id, payload.amount).await?;
    tx.commit().await?;

    tracing::info!("User {} offered {} on auction {}", user_id, offer.amount, id);

    Ok(Json(offer))
}

pub async fn create_bid(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    AppJson(payload): AppJson<BidRequest>,
) -> Result<Json<Bid>> {
    bidding::validate_new_bid(&payload, Utc::now())?;

    let product = products_queries::find_by_id(&state.db, payload.product_id)
        .await?
        .filter(|p| p.enabled)
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    ensure_shop_access(&claims, product.shop_id)?;

    let bid = bid_queries::create_bid(&state.db, product.shop_id, &payload).await?;

    tracing::info!("Auction {} opened for product {}", bid.id, product.id);

    Ok(Json(bid))
}

pub async fn close_bid(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<BidDetail>> {
    let bid = bid_queries::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Auction with id {} not found", id)))?;

    ensure_shop_access(&claims, bid.shop_id)?;

    let closed = bid_queries::close_bid(&state.db, id)
        .await?
        .ok_or_else(|| AppError::Conflict("This auction is already closed".to_string()))?;

    let offers = bid_queries::offers_for_bid(&state.db, id).await?;
    let winner = bidding::winning_offer(&offers);
    let highest_offer = winner.map(|o| o.amount);
    let winner_id = winner.map(|o| o.user_id);

    tracing::info!("Auction {} closed, winner {:?}", id, winner_id);

    Ok(Json(BidDetail {
        bid: closed,
        offers,
        highest_offer,
        winner_id,
    }))
}
