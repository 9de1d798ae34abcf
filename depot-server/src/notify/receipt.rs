//! Order receipt rendering

use std::fmt::Write;

use rust_decimal::Decimal;
use shared::models::OrderView;
use shared::util::format_ringgit;

use super::Notification;

pub const RECEIPT_SUBJECT: &str = "Order Processing";

/// Render the plain-text receipt for a confirmed order
pub fn render_receipt(view: &OrderView, to: &str) -> Notification {
    let mut body = String::new();
    let items_total: Decimal = view.items.iter().map(|i| i.item.sub_total).sum();
    let delivery_fee = view.order.total_price - items_total;

    let _ = writeln!(body, "Dear {},", view.customer.name);
    let _ = writeln!(body);
    let _ = writeln!(body, "Your order {} is being processed.", view.order.id);
    let _ = writeln!(body, "Deliver to: {}", view.order.delivery_address);
    let _ = writeln!(
        body,
        "Expected delivery: {}",
        view.order.delivery_datetime.format("%Y-%m-%d %H:%M UTC")
    );
    let _ = writeln!(body, "Fulfilled by: {}", view.warehouse.name);
    let _ = writeln!(body);
    let _ = writeln!(
        body,
        "{:<24} {:<32} {:>8} {:>12} {:>12}",
        "Item", "Description", "Quantity", "Price", "Subtotal"
    );

    for line in &view.items {
        let unit_price = if line.item.quantity > 0 {
            (line.item.sub_total / Decimal::from(line.item.quantity)).round_dp(2)
        } else {
            line.product.price
        };
        let _ = writeln!(
            body,
            "{:<24} {:<32} {:>8} {:>12} {:>12}",
            line.product.name,
            line.product.description,
            line.item.quantity,
            format_ringgit(unit_price),
            format_ringgit(line.item.sub_total),
        );
    }

    let _ = writeln!(body);
    let _ = writeln!(body, "{:<66} {:>12}", "Delivery fee", format_ringgit(delivery_fee));
    let _ = writeln!(body, "{:<66} {:>12}", "Total", format_ringgit(view.order.total_price));

    Notification {
        to: to.to_string(),
        subject: RECEIPT_SUBJECT.to_string(),
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use shared::models::{
        Customer, Gender, Order, OrderItemView, OrderLineItem, OrderStatus, Product, Warehouse,
    };
    use uuid::Uuid;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn sample_view() -> OrderView {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let order_id = Uuid::new_v4();
        let product = Product {
            id: Uuid::new_v4(),
            name: "Teh Tarik".into(),
            description: "Instant tea 3-in-1".into(),
            price: dec("10.00"),
            category_id: Uuid::new_v4(),
            supplier_id: Uuid::new_v4(),
            stock: 3,
            is_delete: false,
            created_by: Uuid::nil(),
            created_at: now,
            updated_by: None,
            updated_at: None,
        };
        OrderView {
            order: Order {
                id: order_id,
                customer_id: Uuid::new_v4(),
                warehouse_id: Uuid::new_v4(),
                delivery_address: "1 Jalan Ampang".into(),
                latitude: dec("3.06"),
                longitude: dec("101.56"),
                delivery_datetime: now + chrono::Duration::days(3),
                status: OrderStatus::Confirmed,
                total_price: dec("25.00"),
                is_delete: false,
                created_by: Uuid::nil(),
                created_at: now,
                updated_by: None,
                updated_at: None,
            },
            customer: Customer {
                id: Uuid::new_v4(),
                name: "Aisyah".into(),
                gender: Gender::Female,
                date_of_birth: chrono::NaiveDate::from_ymd_opt(1995, 2, 14).unwrap(),
                address: String::new(),
                phone_no: "0123456789".into(),
                email: "aisyah@example.my".into(),
                password_hash: String::new(),
                is_active: true,
                created_at: now,
                updated_at: None,
            },
            warehouse: Warehouse {
                id: Uuid::new_v4(),
                name: "Shah Alam Hub".into(),
                address: "Seksyen 15".into(),
                latitude: dec("3.05"),
                longitude: dec("101.55"),
                phone_no: "0355550000".into(),
                is_delete: false,
                created_by: Uuid::nil(),
                created_at: now,
                updated_by: None,
                updated_at: None,
            },
            items: vec![OrderItemView {
                item: OrderLineItem {
                    id: Uuid::new_v4(),
                    order_id,
                    product_id: product.id,
                    quantity: 2,
                    sub_total: dec("20.00"),
                    is_delete: false,
                    created_by: Uuid::nil(),
                    created_at: now,
                    updated_by: None,
                    updated_at: None,
                },
                product,
            }],
        }
    }

    #[test]
    fn test_receipt_lists_items_fee_and_total() {
        let n = render_receipt(&sample_view(), "orders@depot.test");

        assert_eq!(n.subject, "Order Processing");
        assert_eq!(n.to, "orders@depot.test");
        assert!(n.body.starts_with("Dear Aisyah,"));
        assert!(n.body.contains("Teh Tarik"));
        assert!(n.body.contains("Instant tea 3-in-1"));
        assert!(n.body.contains("RM 10.00"));
        assert!(n.body.contains("RM 20.00"));
        assert!(n.body.contains("RM 5.00"));
        assert!(n.body.contains("RM 25.00"));
        assert!(n.body.contains("2024-05-04 09:00 UTC"));
    }
}
