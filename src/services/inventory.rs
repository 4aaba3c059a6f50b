use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::{
    error::{AppError, Result},
    models::{CartItem, OrderItemData, Product, ProductSize},
};

/// Checks that `quantity` units of `size` can be taken from `product` and
/// returns the matching size entry.
pub fn check_availability<'a>(
    product: &'a Product,
    size: &str,
    quantity: i32,
) -> Result<&'a ProductSize> {
    if quantity <= 0 {
        return Err(AppError::BadRequest(
            "Quantity must be greater than zero".to_string(),
        ));
    }

    let entry = product.size(size).ok_or_else(|| {
        AppError::BadRequest(format!(
            "Size {} is not available for product {}",
            size, product.id
        ))
    })?;

    if quantity > entry.quantity {
        return Err(AppError::BadRequest(format!(
            "Only {} items left in size {}",
            entry.quantity, size
        )));
    }

    Ok(entry)
}

/// Removes stock from a size list in place. Returns false, leaving the list
/// untouched, when the size is missing or short.
pub fn take_stock(sizes: &mut [ProductSize], size: &str, quantity: i32) -> bool {
    match sizes.iter_mut().find(|s| s.size == size) {
        Some(entry) if quantity > 0 && entry.quantity >= quantity => {
            entry.quantity -= quantity;
            true
        }
        _ => false,
    }
}

/// Quantity of a cart line after adding `extra` units, re-validated against
/// the stock of that size.
pub fn accumulate_quantity(product: &Product, size: &str, already: i32, extra: i32) -> Result<i32> {
    if extra <= 0 {
        return Err(AppError::BadRequest(
            "Quantity must be greater than zero".to_string(),
        ));
    }

    let wanted = already
        .checked_add(extra)
        .ok_or_else(|| AppError::BadRequest("Quantity is too large".to_string()))?;

    check_availability(product, size, wanted)?;

    Ok(wanted)
}

/// Prices every cart line and takes its stock from the locked rows in
/// `products`. Lines on the same product draw from one stock.
pub fn price_cart(
    cart: &[CartItem],
    products: &mut HashMap<i32, Product>,
) -> Result<(Decimal, Vec<OrderItemData>)> {
    let mut total = Decimal::ZERO;
    let mut items = Vec::with_capacity(cart.len());

    for line in cart {
        let product = products
            .get_mut(&line.product_id)
            .filter(|p| p.enabled)
            .ok_or_else(|| {
                AppError::BadRequest(format!("Product {} is no longer available", line.product_id))
            })?;

        let unit_price = check_availability(product, &line.size, line.quantity)?.price;
        take_stock(&mut product.sizes, &line.size, line.quantity);

        total = unit_price
            .checked_mul(Decimal::from(line.quantity))
            .and_then(|line_total| total.checked_add(line_total))
            .ok_or_else(|| AppError::BadRequest("Order total is too large".to_string()))?;

        items.push(OrderItemData {
            product_id: product.id,
            shop_id: product.shop_id,
            product_name: product.name.clone(),
            size: line.size.clone(),
            quantity: line.quantity,
            unit_price,
        });
    }

    Ok((total, items))
}

pub fn validate_sizes(sizes: &[ProductSize]) -> Result<()> {
    if sizes.is_empty() {
        return Err(AppError::BadRequest(
            "At least one size is required".to_string(),
        ));
    }

    for (idx, entry) in sizes.iter().enumerate() {
        if entry.size.trim().is_empty() {
            return Err(AppError::BadRequest("Size label cannot be empty".to_string()));
        }

        if entry.quantity < 0 {
            return Err(AppError::BadRequest(format!(
                "Quantity for size {} cannot be negative",
                entry.size
            )));
        }

        if entry.price <= Decimal::ZERO {
            return Err(AppError::BadRequest(format!(
                "Price for size {} must be positive",
                entry.size
            )));
        }

        if sizes[..idx].iter().any(|s| s.size == entry.size) {
            return Err(AppError::BadRequest(format!(
                "Size {} is listed twice",
                entry.size
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    pub(crate) fn size(label: &str, quantity: i32, price: i64) -> ProductSize {
        ProductSize {
            size: label.to_string(),
            quantity,
            price: Decimal::from(price),
        }
    }

    pub(crate) fn product(id: i32, sizes: Vec<ProductSize>) -> Product {
        Product {
            id,
            shop_id: 1,
            name: format!("Product {}", id),
            description: None,
            category: "dresses".to_string(),
            images: Vec::new(),
            sizes,
            enabled: true,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn quantity_within_stock_is_accepted() {
        let p = product(1, vec![size("S", 3, 40), size("M", 1, 45)]);

        for q in 1..=3 {
            assert_eq!(check_availability(&p, "S", q).unwrap().price, Decimal::from(40));
        }
        assert!(check_availability(&p, "M", 1).is_ok());
    }

    #[test]
    fn quantity_outside_stock_is_rejected() {
        let p = product(1, vec![size("S", 3, 40)]);

        for q in [-1, 0, 4, 100] {
            assert!(matches!(
                check_availability(&p, "S", q),
                Err(AppError::BadRequest(_))
            ));
        }
    }

    #[test]
    fn unknown_size_is_rejected() {
        let p = product(1, vec![size("S", 3, 40)]);
        assert!(check_availability(&p, "XL", 1).is_err());
    }

    #[test]
    fn take_stock_only_mutates_on_success() {
        let mut sizes = vec![size("S", 2, 10), size("M", 5, 10)];

        assert!(take_stock(&mut sizes, "M", 5));
        assert_eq!(sizes[1].quantity, 0);

        assert!(!take_stock(&mut sizes, "S", 3));
        assert!(!take_stock(&mut sizes, "L", 1));
        assert_eq!(sizes[0].quantity, 2);
    }

    fn line(id: i32, product_id: i32, size: &str, quantity: i32) -> CartItem {
        CartItem {
            id,
            user_id: 3,
            product_id,
            size: size.to_string(),
            quantity,
            created_at: Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn adding_to_cart_accumulates_and_revalidates() {
        let p = product(1, vec![size("M", 5, 30)]);

        assert_eq!(accumulate_quantity(&p, "M", 0, 2).unwrap(), 2);
        assert_eq!(accumulate_quantity(&p, "M", 3, 2).unwrap(), 5);
        assert!(matches!(
            accumulate_quantity(&p, "M", 4, 2),
            Err(AppError::BadRequest(_))
        ));
        assert!(accumulate_quantity(&p, "M", 1, 0).is_err());
    }

    #[test]
    fn accumulated_quantity_overflow_is_bad_request() {
        let p = product(1, vec![size("M", i32::MAX, 30)]);

        let err = accumulate_quantity(&p, "M", 1, i32::MAX).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref msg) if msg.contains("too large")));
    }

    #[test]
    fn cart_lines_share_product_stock() {
        let mut products = HashMap::from([(1, product(1, vec![size("M", 3, 30)]))]);
        let cart = vec![line(1, 1, "M", 2), line(2, 1, "M", 2)];

        assert!(matches!(
            price_cart(&cart, &mut products),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn priced_cart_deducts_stock_and_totals_lines() {
        let mut products = HashMap::from([
            (1, product(1, vec![size("S", 4, 20), size("M", 3, 30)])),
            (2, product(2, vec![size("L", 1, 55)])),
        ]);
        let cart = vec![line(1, 1, "M", 2), line(2, 1, "S", 1), line(3, 2, "L", 1)];

        let (total, items) = price_cart(&cart, &mut products).unwrap();

        assert_eq!(total, Decimal::from(2 * 30 + 20 + 55));
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].unit_price, Decimal::from(30));
        assert_eq!(products[&1].size("M").unwrap().quantity, 1);
        assert_eq!(products[&1].size("S").unwrap().quantity, 3);
        assert_eq!(products[&2].size("L").unwrap().quantity, 0);
    }

    #[test]
    fn disabled_product_blocks_checkout() {
        let mut disabled = product(1, vec![size("M", 3, 30)]);
        disabled.enabled = false;
        let mut products = HashMap::from([(1, disabled)]);

        assert!(price_cart(&[line(1, 1, "M", 1)], &mut products).is_err());
        assert!(price_cart(&[line(1, 9, "M", 1)], &mut products).is_err());
    }

    #[test]
    fn size_lists_are_validated() {
        assert!(validate_sizes(&[size("S", 0, 10)]).is_ok());
        assert!(validate_sizes(&[]).is_err());
        assert!(validate_sizes(&[size("S", 1, 0)]).is_err());
        assert!(validate_sizes(&[size("S", -1, 10)]).is_err());
        assert!(validate_sizes(&[size(" ", 1, 10)]).is_err());
        assert!(validate_sizes(&[size("S", 1, 10), size("S", 2, 12)]).is_err());
    }
}
