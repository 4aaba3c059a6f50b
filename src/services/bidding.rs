use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::{
    error::{AppError, Result},
    models::{Bid, BidOffer, BidRequest, BidStatus},
};

pub fn is_accepting_offers(bid: &Bid, now: DateTime<Utc>) -> bool {
    bid.status == BidStatus::Open && now < bid.closes_at
}

/// An offer must be strictly above both the starting price and the best
/// offer so far.
pub fn validate_offer(
    bid: &Bid,
    highest: Option<Decimal>,
    amount: Decimal,
    bidder_shop: Option<i32>,
    now: DateTime<Utc>,
) -> Result<()> {
    if !is_accepting_offers(bid, now) {
        return Err(AppError::Conflict("This auction is closed".to_string()));
    }

    if bidder_shop == Some(bid.shop_id) {
        return Err(AppError::Forbidden(
            "Sellers cannot bid on their own auctions".to_string(),
        ));
    }

    let floor = highest.map_or(bid.starting_price, |h| h.max(bid.starting_price));
    if amount <= floor {
        return Err(AppError::BadRequest(format!(
            "Offer must be greater than {}",
            floor
        )));
    }

    Ok(())
}

pub fn validate_new_bid(req: &BidRequest, now: DateTime<Utc>) -> Result<()> {
    if req.title.trim().is_empty() {
        return Err(AppError::BadRequest("Title is required".to_string()));
    }

    if req.starting_price <= Decimal::ZERO {
        return Err(AppError::BadRequest(
            "Starting price must be positive".to_string(),
        ));
    }

    if req.closes_at <= now {
        return Err(AppError::BadRequest(
            "Closing date must be in the future".to_string(),
        ));
    }

    Ok(())
}

/// Highest amount wins; among equal amounts the earlier offer wins.
pub fn winning_offer(offers: &[BidOffer]) -> Option<&BidOffer> {
    offers.iter().max_by(|a, b| {
        a.amount
            .cmp(&b.amount)
            .then_with(|| b.created_at.cmp(&a.created_at))
    })
}

/// The winner is known once an auction stops taking offers, whether it was
/// closed by the seller or simply ran past `closes_at`.
pub fn decided_winner<'a>(bid: &Bid, offers: &'a [BidOffer], now: DateTime<Utc>) -> Option<&'a BidOffer> {
    if is_accepting_offers(bid, now) {
        return None;
    }

    winning_offer(offers)
}
