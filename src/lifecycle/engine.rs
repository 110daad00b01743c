use std::sync::Arc;

use tracing::{debug, error, info, instrument};

use crate::domain::{Order, OrderCreate, OrderFilter, OrderId, OrderItem, OrderStatus, Page, PageRequest};
use crate::order_actor::OrderError;
use crate::sequence::SequenceAllocator;
use crate::store::{OrderStore, StoreError};

use super::validation::validate_create;

/// Entry point for every request-driven order operation.
///
/// Business rule violations come back as [`OrderError`] values; nothing here
/// retries or swallows an error.
#[derive(Clone)]
pub struct OrderLifecycleEngine {
    store: Arc<dyn OrderStore>,
    sequence: Arc<SequenceAllocator>,
}

impl OrderLifecycleEngine {
    pub fn new(store: Arc<dyn OrderStore>, sequence: Arc<SequenceAllocator>) -> Self {
        Self { store, sequence }
    }

    /// Validates the request, allocates an order number and stores a `PENDING` order.
    ///
    /// Nothing is written when validation fails.
    #[instrument(skip(self, request), fields(customer = %request.customer_name, items = request.items.len()))]
    pub async fn create(&self, request: OrderCreate) -> Result<Order, OrderError> {
        debug!("Processing create_order request");

        if let Err(e) = validate_create(&request) {
            error!(error = %e, "Order validation failed");
            return Err(e);
        }

        let order_number = self.sequence.next()?;
        debug!(%order_number, "Generated order number");

        if self.store.exists_by_order_number(&order_number).await? {
            error!(%order_number, "Generated order number is already stored");
            return Err(StoreError::Conflict(format!("order number {} already exists", order_number)).into());
        }

        let items = request.items.into_iter().map(OrderItem::from).collect();
        let order = Order::new(order_number, request.customer_name, request.customer_email, items)?;
        let saved = self.store.save(order).await?;

        info!(
            order_number = %saved.order_number(),
            total = %saved.total_amount(),
            "Order created successfully"
        );
        Ok(saved)
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: OrderId) -> Result<Order, OrderError> {
        debug!("Fetching order by id");
        match self.store.find_by_id(id).await? {
            Some(order) => Ok(order),
            None => {
                error!("Order not found");
                Err(OrderError::NotFound(format!("id {}", id)))
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn get_by_order_number(&self, order_number: &str) -> Result<Order, OrderError> {
        debug!("Fetching order by order number");
        match self.store.find_by_order_number(order_number).await? {
            Some(order) => Ok(order),
            None => {
                error!("Order not found");
                Err(OrderError::NotFound(format!("order number {}", order_number)))
            }
        }
    }

    /// Applies one forward step of the status machine. The stored order is left
    /// untouched when the move is not allowed.
    #[instrument(skip(self))]
    pub async fn update_status(&self, id: OrderId, new_status: OrderStatus) -> Result<(), OrderError> {
        let mut order = self.get_by_id(id).await?;

        let from = match order.transition_to(new_status) {
            Ok(from) => from,
            Err(e) => {
                error!(order_number = %order.order_number(), error = %e, "Status transition rejected");
                return Err(e);
            }
        };

        let saved = self.store.save(order).await?;
        info!(order_number = %saved.order_number(), %from, to = %new_status, "Order status updated");
        Ok(())
    }

    /// Permanently removes a `PENDING` order. Any other status is rejected.
    #[instrument(skip(self))]
    pub async fn cancel(&self, id: OrderId) -> Result<(), OrderError> {
        let order = self.get_by_id(id).await?;

        if order.status() != OrderStatus::Pending {
            error!(order_number = %order.order_number(), status = %order.status(), "Cannot cancel order");
            return Err(OrderError::cancel_rejected(order.status()));
        }

        self.store.delete(&order).await?;
        info!(order_number = %order.order_number(), "Order cancelled");
        Ok(())
    }

    /// Pages through orders, optionally only those in `status`.
    pub async fn list(&self, status: Option<OrderStatus>, page: PageRequest) -> Result<Page<Order>, OrderError> {
        self.search(OrderFilter::with_status(status), page).await
    }

    #[instrument(skip(self))]
    pub async fn search(&self, filter: OrderFilter, page: PageRequest) -> Result<Page<Order>, OrderError> {
        let orders = self.store.find_page(filter, page).await?;
        debug!(total = orders.total_elements, "Found orders");
        Ok(orders)
    }
}
