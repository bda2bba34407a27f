use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{ListResult, NewOrder, OrderItemView, OrderStatus, OrderView};
use crate::domain::ports::OrderRepository;

/// Process-local order storage, kept in insertion order.
///
/// Every operation holds a single lock for its whole duration, so a create is
/// observed either completely or not at all.
#[derive(Default)]
pub struct InMemoryOrderRepository {
    orders: Mutex<Vec<OrderView>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<OrderView>>, DomainError> {
        self.orders
            .lock()
            .map_err(|_| DomainError::Internal("order store lock poisoned".to_string()))
    }
}

impl OrderRepository for InMemoryOrderRepository {
    fn create(&self, order: NewOrder) -> Result<OrderView, DomainError> {
        let now = Utc::now();
        let view = OrderView {
            id: Uuid::new_v4(),
            total_amount: order.total_amount,
            total_items: order.total_items,
            status: order.status,
            created_at: now,
            updated_at: now,
            items: order
                .items
                .into_iter()
                .map(|i| OrderItemView {
                    product_id: i.product_id,
                    quantity: i.quantity,
                    price: i.price,
                    name: None,
                })
                .collect(),
        };
        self.lock()?.push(view.clone());
        Ok(view)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<OrderView>, DomainError> {
        Ok(self.lock()?.iter().find(|o| o.id == id).cloned())
    }

    fn list(
        &self,
        page: i64,
        limit: i64,
        status: Option<OrderStatus>,
    ) -> Result<ListResult, DomainError> {
        let orders = self.lock()?;
        let matching: Vec<&OrderView> = orders
            .iter()
            .rev()
            .filter(|o| status.map_or(true, |s| o.status == s))
            .collect();

        let offset = usize::try_from((page - 1) * limit).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(ListResult {
            total: matching.len() as i64,
            items: matching
                .into_iter()
                .skip(offset)
                .take(limit)
                .map(|o| OrderView {
                    items: vec![],
                    ..o.clone()
                })
                .collect(),
        })
    }

    fn update_status(&self, id: Uuid, status: OrderStatus) -> Result<OrderView, DomainError> {
        let mut orders = self.lock()?;
        let order = orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(DomainError::NotFound(id))?;
        order.status = status;
        order.updated_at = Utc::now();
        Ok(order.clone())
    }
}
