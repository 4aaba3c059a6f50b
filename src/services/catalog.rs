use std::cmp::Ordering;

use crate::{
    models::{Product, ProductQuery, ProductSort},
    utils::filters::matches_search,
};

pub const DEFAULT_PAGE_SIZE: i64 = 12;
pub const MAX_PAGE_SIZE: i64 = 100;
const ALL_CATEGORIES: &str = "all";

/// Narrowed, ordered and paged view of the catalog.
#[derive(Debug)]
pub struct CatalogPage {
    pub products: Vec<Product>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// `None` for "all" or a blank value, otherwise the category to keep.
pub fn category_filter(category: Option<&str>) -> Option<&str> {
    category
        .map(str::trim)
        .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case(ALL_CATEGORIES))
}

pub fn filter_products(products: Vec<Product>, params: &ProductQuery) -> Vec<Product> {
    let category = category_filter(params.category.as_deref());

    products
        .into_iter()
        .filter(|p| category.map_or(true, |c| p.category.eq_ignore_ascii_case(c)))
        .filter(|p| {
            matches_search(
                params.search.as_deref(),
                &[
                    p.name.as_str(),
                    p.description.as_deref().unwrap_or_default(),
                    p.category.as_str(),
                ],
            )
        })
        .collect()
}

pub fn sort_products(products: &mut [Product], sort: ProductSort) {
    match sort {
        ProductSort::Newest => products.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        ProductSort::PriceLow => products.sort_by(|a, b| {
            unpriced_last(a, b).then_with(|| a.listing_price().cmp(&b.listing_price()))
        }),
        ProductSort::PriceHigh => products.sort_by(|a, b| {
            unpriced_last(a, b).then_with(|| b.listing_price().cmp(&a.listing_price()))
        }),
        ProductSort::Name => {
            products.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        }
    }
}

// Products without sizes have no price and go to the end.
fn unpriced_last(a: &Product, b: &Product) -> Ordering {
    a.listing_price()
        .is_none()
        .cmp(&b.listing_price().is_none())
}

pub fn build_page(products: Vec<Product>, params: &ProductQuery) -> CatalogPage {
    let mut filtered = filter_products(products, params);
    sort_products(&mut filtered, params.sort.unwrap_or_default());

    let total = filtered.len() as i64;
    let limit = params.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let offset = params.offset.unwrap_or(0).max(0);

    let products = filtered
        .into_iter()
        .skip(offset as usize)
        .take(limit as usize)
        .collect();

    CatalogPage {
        products,
        total,
        limit,
        offset,
    }
}
