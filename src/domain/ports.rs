use async_trait::async_trait;
use uuid::Uuid;

use super::errors::DomainError;
use super::order::{ListResult, NewOrder, OrderStatus, OrderView};
use super::product::Product;

/// Transactional order storage. Implementations are blocking.
pub trait OrderRepository: Send + Sync + 'static {
    /// Inserts the order and all of its items atomically.
    fn create(&self, order: NewOrder) -> Result<OrderView, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<OrderView>, DomainError>;
    /// Newest first. Listed orders carry no items.
    fn list(
        &self,
        page: i64,
        limit: i64,
        status: Option<OrderStatus>,
    ) -> Result<ListResult, DomainError>;
    fn update_status(&self, id: Uuid, status: OrderStatus) -> Result<OrderView, DomainError>;
}

/// Resolves product ids against the product service.
///
/// Ids that do not exist are simply absent from the result.
#[async_trait]
pub trait ProductLookup: Send + Sync + 'static {
    async fn get_by_ids(&self, ids: &[String]) -> Result<Vec<Product>, DomainError>;
}
