use std::fmt;
use std::str::FromStr;

use bigdecimal::{BigDecimal, RoundingMode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::DomainError;

/// Largest page size a caller may request.
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Decimal places kept for stored money amounts.
pub const MONEY_SCALE: i64 = 2;

/// Money columns are `NUMERIC(12, 2)`: amounts must stay below 10^10.
const MONEY_DIGITS_BEFORE_POINT: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Paid,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::Paid,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Paid => "PAID",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| DomainError::ValidationFailed(format!("unknown order status '{s}'")))
    }
}

/// One requested line of a new order, as sent by the client.
#[derive(Debug, Clone)]
pub struct OrderItemInput {
    pub product_id: String,
    pub quantity: i32,
}

/// A line of a new order with its price already resolved from the product service.
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: String,
    pub quantity: i32,
    pub price: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub total_amount: BigDecimal,
    pub total_items: i32,
    pub status: OrderStatus,
    pub items: Vec<NewOrderItem>,
}

impl NewOrder {
    /// Builds a pending order and computes its totals from the priced items.
    ///
    /// Prices are rounded half-up to cents first, so the totals match the
    /// snapshots that get stored.
    pub fn pending(mut items: Vec<NewOrderItem>) -> Result<Self, DomainError> {
        for item in &mut items {
            item.price = round_money(&item.price);
        }
        let (total_amount, total_items) = order_totals(&items)?;
        check_money_range(&total_amount)?;
        Ok(Self {
            total_amount,
            total_items,
            status: OrderStatus::Pending,
            items,
        })
    }
}

#[derive(Debug, Clone)]
pub struct OrderItemView {
    pub product_id: String,
    pub quantity: i32,
    pub price: BigDecimal,
    /// Product display name; joined from a product lookup, never persisted.
    pub name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: Uuid,
    pub total_amount: BigDecimal,
    pub total_items: i32,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub items: Vec<OrderItemView>,
}

impl OrderView {
    /// Distinct product ids referenced by the order, in first-seen order.
    pub fn product_ids(&self) -> Vec<String> {
        distinct_product_ids(self.items.iter().map(|i| i.product_id.as_str()))
    }
}

/// Drops repeated ids, keeping the first occurrence of each.
pub fn distinct_product_ids<'a>(ids: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut distinct: Vec<String> = Vec::new();
    for id in ids {
        if !distinct.iter().any(|seen| seen == id) {
            distinct.push(id.to_string());
        }
    }
    distinct
}

#[derive(Debug, Clone)]
pub struct ListResult {
    pub items: Vec<OrderView>,
    pub total: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageMeta {
    pub total: i64,
    pub page: i64,
    pub last_page: i64,
}

impl PageMeta {
    pub fn new(total: i64, page: i64, limit: i64) -> Self {
        Self {
            total,
            page,
            last_page: last_page(total, limit),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OrderPage {
    pub data: Vec<OrderView>,
    pub meta: PageMeta,
}

/// `ceil(total / limit)`; zero when there are no rows.
pub fn last_page(total: i64, limit: i64) -> i64 {
    if total <= 0 || limit <= 0 {
        return 0;
    }
    (total + limit - 1) / limit
}

pub fn validate_pagination(page: i64, limit: i64) -> Result<(), DomainError> {
    if page < 1 {
        return Err(DomainError::ValidationFailed(format!(
            "page must be >= 1, got {page}"
        )));
    }
    if !(1..=MAX_PAGE_LIMIT).contains(&limit) {
        return Err(DomainError::ValidationFailed(format!(
            "limit must be between 1 and {MAX_PAGE_LIMIT}, got {limit}"
        )));
    }
    Ok(())
}

pub fn validate_items(items: &[OrderItemInput]) -> Result<(), DomainError> {
    if items.is_empty() {
        return Err(DomainError::ValidationFailed(
            "an order needs at least one item".to_string(),
        ));
    }
    for item in items {
        if item.product_id.trim().is_empty() {
            return Err(DomainError::ValidationFailed(
                "product id must not be empty".to_string(),
            ));
        }
        if item.quantity <= 0 {
            return Err(DomainError::ValidationFailed(format!(
                "quantity for product '{}' must be positive, got {}",
                item.product_id, item.quantity
            )));
        }
    }
    Ok(())
}

pub fn round_money(amount: &BigDecimal) -> BigDecimal {
    amount.with_scale_round(MONEY_SCALE, RoundingMode::HalfUp)
}

fn check_money_range(amount: &BigDecimal) -> Result<(), DomainError> {
    let limit = BigDecimal::from(10u64.pow(MONEY_DIGITS_BEFORE_POINT));
    if amount.abs() >= limit {
        return Err(DomainError::ValidationFailed(format!(
            "order total {amount} exceeds the storable maximum"
        )));
    }
    Ok(())
}

/// Sum of `price * quantity` and sum of `quantity` over every item.
pub fn order_totals(items: &[NewOrderItem]) -> Result<(BigDecimal, i32), DomainError> {
    let mut total_amount = BigDecimal::from(0);
    let mut total_items: i32 = 0;
    for item in items {
        total_amount += &item.price * &BigDecimal::from(item.quantity);
        total_items = total_items.checked_add(item.quantity).ok_or_else(|| {
            DomainError::ValidationFailed("total item count overflows".to_string())
        })?;
    }
    Ok((total_amount, total_items))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(product_id: &str, quantity: i32, price: &str) -> NewOrderItem {
        NewOrderItem {
            product_id: product_id.to_string(),
            quantity,
            price: BigDecimal::from_str(price).expect("valid decimal"),
        }
    }

    #[test]
    fn status_round_trips_through_its_wire_name() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
    }

    #[test]
    fn unknown_status_is_a_validation_failure() {
        let err = "SHIPPED".parse::<OrderStatus>().unwrap_err();
        assert!(matches!(err, DomainError::ValidationFailed(_)));
    }

    #[test]
    fn status_defaults_to_pending() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
    }

    #[test]
    fn status_serializes_upper_case() {
        let json = serde_json::to_string(&OrderStatus::Delivered).unwrap();
        assert_eq!(json, "\"DELIVERED\"");
    }

    #[test]
    fn totals_sum_every_line() {
        let items = vec![item("A", 2, "10"), item("B", 3, "1.50"), item("C", 1, "0.25")];
        let (amount, count) = order_totals(&items).unwrap();
        assert_eq!(amount, BigDecimal::from_str("24.75").unwrap());
        assert_eq!(count, 6);
    }

    #[test]
    fn single_line_totals() {
        let (amount, count) = order_totals(&[item("A", 2, "10")]).unwrap();
        assert_eq!(amount, BigDecimal::from(20));
        assert_eq!(count, 2);
    }

    #[test]
    fn total_item_overflow_is_rejected() {
        let items = vec![item("A", i32::MAX, "1"), item("B", 1, "1")];
        assert!(matches!(
            order_totals(&items),
            Err(DomainError::ValidationFailed(_))
        ));
    }

    #[test]
    fn prices_are_rounded_to_cents_before_totalling() {
        let order = NewOrder::pending(vec![item("A", 2, "0.125"), item("B", 1, "3.004")]).unwrap();

        assert_eq!(order.items[0].price, BigDecimal::from_str("0.13").unwrap());
        assert_eq!(order.items[1].price, BigDecimal::from_str("3.00").unwrap());
        assert_eq!(order.total_amount, BigDecimal::from_str("3.26").unwrap());
        let recomputed = order
            .items
            .iter()
            .fold(BigDecimal::from(0), |acc, i| {
                acc + &i.price * &BigDecimal::from(i.quantity)
            });
        assert_eq!(order.total_amount, recomputed);
    }

    #[test]
    fn total_beyond_storable_range_is_rejected() {
        let err = NewOrder::pending(vec![item("A", 2, "5000000000")]).unwrap_err();
        assert!(matches!(err, DomainError::ValidationFailed(_)));

        assert!(NewOrder::pending(vec![item("A", 1, "9999999999.99")]).is_ok());
    }

    #[test]
    fn distinct_ids_keep_first_occurrence_order() {
        assert_eq!(distinct_product_ids(["B", "A", "B", "C", "A"]), vec!["B", "A", "C"]);
        assert!(distinct_product_ids(Vec::<&str>::new()).is_empty());
    }

    #[test]
    fn last_page_rounds_up() {
        assert_eq!(last_page(25, 10), 3);
        assert_eq!(last_page(20, 10), 2);
        assert_eq!(last_page(1, 10), 1);
        assert_eq!(last_page(0, 10), 0);
    }

    #[test]
    fn pagination_bounds() {
        assert!(validate_pagination(1, 1).is_ok());
        assert!(validate_pagination(3, MAX_PAGE_LIMIT).is_ok());
        assert!(validate_pagination(0, 10).is_err());
        assert!(validate_pagination(1, 0).is_err());
        assert!(validate_pagination(1, MAX_PAGE_LIMIT + 1).is_err());
    }

    #[test]
    fn items_must_be_present_and_positive() {
        assert!(validate_items(&[]).is_err());
        let zero = OrderItemInput {
            product_id: "A".to_string(),
            quantity: 0,
        };
        assert!(validate_items(&[zero]).is_err());
        let blank = OrderItemInput {
            product_id: "  ".to_string(),
            quantity: 1,
        };
        assert!(validate_items(&[blank]).is_err());
        let ok = OrderItemInput {
            product_id: "A".to_string(),
            quantity: 1,
        };
        assert!(validate_items(&[ok]).is_ok());
    }
}
