use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{
    distinct_product_ids, validate_items, validate_pagination, NewOrder, NewOrderItem,
    OrderItemInput, OrderPage, OrderStatus, OrderView, PageMeta,
};
use crate::domain::ports::{OrderRepository, ProductLookup};
use crate::domain::product::Product;

/// The four order operations, composed from a repository and a product lookup.
///
/// Repository calls are blocking and run on the blocking thread pool. They run
/// to completion even if the caller goes away, so a create is never half done.
#[derive(Clone)]
pub struct OrderService {
    repo: Arc<dyn OrderRepository>,
    products: Arc<dyn ProductLookup>,
}

impl OrderService {
    pub fn new(repo: Arc<dyn OrderRepository>, products: Arc<dyn ProductLookup>) -> Self {
        Self { repo, products }
    }

    pub async fn create_order(&self, items: Vec<OrderItemInput>) -> Result<OrderView, DomainError> {
        validate_items(&items)?;

        let ids = distinct_product_ids(items.iter().map(|i| i.product_id.as_str()));
        let products = self.products.get_by_ids(&ids).await?;
        let catalog = index_by_id(&products);

        let priced = items
            .into_iter()
            .map(|item| {
                let product = catalog.get(item.product_id.as_str()).ok_or_else(|| {
                    DomainError::ValidationFailed(format!(
                        "product '{}' not found",
                        item.product_id
                    ))
                })?;
                Ok(NewOrderItem {
                    product_id: item.product_id,
                    quantity: item.quantity,
                    price: product.price.clone(),
                })
            })
            .collect::<Result<Vec<_>, DomainError>>()?;
        let new_order = NewOrder::pending(priced)?;

        let mut order = self.blocking(move |repo| repo.create(new_order)).await?;
        attach_names(&mut order, &catalog);
        log::info!(
            "Created order {} ({} items, total {})",
            order.id,
            order.total_items,
            order.total_amount
        );
        Ok(order)
    }

    pub async fn list_orders(
        &self,
        page: i64,
        limit: i64,
        status: Option<OrderStatus>,
    ) -> Result<OrderPage, DomainError> {
        validate_pagination(page, limit)?;

        let result = self
            .blocking(move |repo| repo.list(page, limit, status))
            .await?;
        Ok(OrderPage {
            meta: PageMeta::new(result.total, page, limit),
            data: result.items,
        })
    }

    /// Items whose product no longer resolves keep their stored price and get
    /// no name. The lookup being down is still an error.
    pub async fn get_order(&self, id: Uuid) -> Result<OrderView, DomainError> {
        let mut order = self.find(id).await?;

        let products = match self.products.get_by_ids(&order.product_ids()).await {
            Ok(products) => products,
            Err(DomainError::ValidationFailed(reason)) => {
                log::warn!("Order {} references unknown products: {}", id, reason);
                vec![]
            }
            Err(e) => return Err(e),
        };
        attach_names(&mut order, &index_by_id(&products));
        Ok(order)
    }

    /// Setting the current status is a no-op that still returns the order.
    pub async fn change_order_status(
        &self,
        id: Uuid,
        status: OrderStatus,
    ) -> Result<OrderView, DomainError> {
        let order = self.find(id).await?;
        if order.status == status {
            return Ok(order);
        }

        let updated = self
            .blocking(move |repo| repo.update_status(id, status))
            .await?;
        log::info!("Order {} moved {} -> {}", id, order.status, updated.status);
        Ok(updated)
    }

    async fn find(&self, id: Uuid) -> Result<OrderView, DomainError> {
        self.blocking(move |repo| repo.find_by_id(id))
            .await?
            .ok_or(DomainError::NotFound(id))
    }

    async fn blocking<T, F>(&self, f: F) -> Result<T, DomainError>
    where
        T: Send + 'static,
        F: FnOnce(&dyn OrderRepository) -> Result<T, DomainError> + Send + 'static,
    {
        let repo = Arc::clone(&self.repo);
        tokio::task::spawn_blocking(move || f(repo.as_ref()))
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))?
    }
}

fn index_by_id(products: &[Product]) -> HashMap<&str, &Product> {
    products.iter().map(|p| (p.id.as_str(), p)).collect()
}

fn attach_names(order: &mut OrderView, catalog: &HashMap<&str, &Product>) {
    for item in &mut order.items {
        item.name = catalog
            .get(item.product_id.as_str())
            .map(|p| p.name.clone());
    }
}
