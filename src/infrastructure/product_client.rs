use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;

use crate::domain::errors::DomainError;
use crate::domain::ports::ProductLookup;
use crate::domain::product::Product;

impl From<reqwest::Error> for DomainError {
    fn from(e: reqwest::Error) -> Self {
        DomainError::UpstreamUnavailable(e.to_string())
    }
}

/// Product record as returned by the product service. Ids may arrive as
/// numbers and prices as either JSON numbers or decimal strings.
#[derive(Debug, Deserialize)]
struct ProductRecord {
    #[serde(deserialize_with = "string_or_number")]
    id: String,
    name: String,
    #[serde(deserialize_with = "decimal")]
    price: BigDecimal,
}

impl From<ProductRecord> for Product {
    fn from(r: ProductRecord) -> Self {
        Product {
            id: r.id,
            name: r.name,
            price: r.price,
        }
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    match Value::deserialize(d)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!(
            "expected a string or a number, got {other}"
        ))),
    }
}

fn decimal<'de, D: Deserializer<'de>>(d: D) -> Result<BigDecimal, D::Error> {
    let raw = string_or_number(d)?;
    BigDecimal::from_str(&raw).map_err(de::Error::custom)
}

/// [`ProductLookup`] backed by the product service's `POST /products/validate`.
pub struct HttpProductLookup {
    client: reqwest::Client,
    validate_url: String,
}

impl HttpProductLookup {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            validate_url: format!("{}/products/validate", base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl ProductLookup for HttpProductLookup {
    async fn get_by_ids(&self, ids: &[String]) -> Result<Vec<Product>, DomainError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        log::debug!("Resolving {} product(s) via {}", ids.len(), self.validate_url);

        let response = self.client.post(&self.validate_url).json(ids).send().await?;

        let status = response.status();
        if status.is_client_error() {
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::ValidationFailed(format!(
                "product service rejected ids {ids:?} ({status}): {body}"
            )));
        }
        if !status.is_success() {
            return Err(DomainError::UpstreamUnavailable(format!(
                "product service answered {status}"
            )));
        }

        let records: Vec<ProductRecord> = response.json().await?;
        Ok(records.into_iter().map(Product::from).collect())
    }
}
