use crate::{
    error::Result,
    models::ReservationReceipt,
    services::export_service::PdfWriter,
};

pub fn receipt_file_name(code: &str) -> String {
    format!("reservation-{}.pdf", code)
}

/// Label/value pairs printed on a reservation receipt, in print order.
pub fn receipt_lines(receipt: &ReservationReceipt) -> Vec<(&'static str, String)> {
    let r = &receipt.reservation;
    let shop = receipt
        .shop_name
        .clone()
        .unwrap_or_else(|| format!("Shop #{}", r.shop_id));

    vec![
        ("Reservation code", r.reservation_code.clone()),
        ("Date", r.created_at.format("%Y-%m-%d %H:%M UTC").to_string()),
        ("Shop", shop),
        ("Customer", format!("{} <{}>", r.customer_name, r.customer_email)),
        ("Product", receipt.product_name.clone()),
        ("Size", r.size.clone()),
        ("Unit price", r.unit_price.round_dp(2).to_string()),
        ("Quantity", r.quantity.to_string()),
        ("Total", r.total().round_dp(2).to_string()),
        ("Status", r.status.label().to_string()),
    ]
}

pub fn render_receipt(receipt: &ReservationReceipt, marketplace: &str) -> Result<Vec<u8>> {
    let title = format!("{} reservation receipt", marketplace);
    let mut pdf = PdfWriter::new(&title)?;
    pdf.title(&title);

    for (label, value) in receipt_lines(receipt) {
        pdf.field(label, &value);
    }

    pdf.line("");
    pdf.line("Present this code in store. The shop confirms the reservation on your visit.");

    pdf.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Reservation, ReservationStatus};
    use crate::services::export_service::tests::pdf_shows;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    fn receipt(shop_name: Option<&str>) -> ReservationReceipt {
        let created = Utc.with_ymd_and_hms(2024, 9, 14, 16, 5, 0).unwrap();
        ReservationReceipt {
            reservation: Reservation {
                id: 1,
                reservation_code: "K3Z9Q0ABCD12EF34GH56".to_string(),
                product_id: 8,
                shop_id: 2,
                user_id: 4,
                customer_name: "Levan".to_string(),
                customer_email: "levan@example.com".to_string(),
                size: "L".to_string(),
                quantity: 3,
                unit_price: Decimal::new(2499, 2),
                status: ReservationStatus::NotVisited,
                created_at: created,
                updated_at: created,
            },
            product_name: "Denim jacket".to_string(),
            shop_name: shop_name.map(str::to_string),
        }
    }

    #[test]
    fn receipt_carries_code_and_total() {
        let lines = receipt_lines(&receipt(Some("Atelier")));

        assert_eq!(lines[0], ("Reservation code", "K3Z9Q0ABCD12EF34GH56".to_string()));
        assert!(lines.contains(&("Shop", "Atelier".to_string())));
        assert!(lines.contains(&("Total", "74.97".to_string())));
        assert!(lines.contains(&("Quantity", "3".to_string())));
    }

    #[test]
    fn missing_shop_name_falls_back_to_id() {
        let lines = receipt_lines(&receipt(None));
        assert!(lines.contains(&("Shop", "Shop #2".to_string())));
    }

    #[test]
    fn rendered_receipt_shows_reservation_code() {
        let bytes = render_receipt(&receipt(Some("Atelier")), "Marketplace").unwrap();

        assert!(bytes.starts_with(b"%PDF"));
        assert!(pdf_shows(&bytes, "K3Z9Q0ABCD12EF34GH56"));
        assert!(pdf_shows(&bytes, "74.97"));
        assert_eq!(receipt_file_name("K3Z9Q0ABCD12EF34GH56"), "reservation-K3Z9Q0ABCD12EF34GH56.pdf");
    }

    #[test]
    fn rendered_receipt_prints_georgian_names() {
        let mut georgian = receipt(Some("თბილისი"));
        georgian.reservation.customer_name = "ნინო".to_string();
        georgian.reservation.customer_email = "n@x.ge".to_string();
        georgian.product_name = "ქართული კაბა".to_string();

        let bytes = render_receipt(&georgian, "Vitrine").unwrap();

        assert!(pdf_shows(&bytes, "თბილისი"));
        assert!(pdf_shows(&bytes, "ნინო <n@x.ge>"));
        assert!(pdf_shows(&bytes, "ქართული კაბა"));
        assert!(pdf_shows(&bytes, "K3Z9Q0ABCD12EF34GH56"));
    }
}
