use bigdecimal::BigDecimal;

/// A product record as resolved by the product service.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: BigDecimal,
}
