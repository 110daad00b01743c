//! Periodic promotion of `PENDING` orders to `PROCESSING`.
//!
//! Failure policy: an error while fetching or saving aborts the current run
//! only. It is logged and swallowed, and the next tick starts a fresh scan, so
//! orders left `PENDING` by a failed run are picked up later. Runs never retry
//! internally.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, instrument};

use crate::domain::{OrderFilter, OrderId, OrderStatus, PageRequest};
use crate::order_actor::OrderError;
use crate::store::{OrderStore, StoreError};

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(300);
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Outcome of a single run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PromotionReport {
    pub promoted: usize,
    pub pages_fetched: usize,
}

pub struct BatchPromoter {
    store: Arc<dyn OrderStore>,
    interval: Duration,
    page_size: usize,
}

impl BatchPromoter {
    pub fn new(store: Arc<dyn OrderStore>, interval: Duration, page_size: usize) -> Self {
        Self {
            store,
            interval: interval.max(Duration::from_millis(1)),
            page_size: page_size.max(1),
        }
    }

    /// Promotes every order that is `PENDING` when the run reaches it.
    ///
    /// Promoted orders leave the `PENDING` result set, so each fetch asks for
    /// the first page of what is still pending. The run ends on the first empty
    /// page. Seeing an order twice means the store did not keep the promotion,
    /// which aborts the run instead of looping on it.
    #[instrument(name = "promote_pending_orders", skip(self), fields(page_size = self.page_size))]
    pub async fn run_once(&self) -> Result<PromotionReport, OrderError> {
        let filter = OrderFilter::with_status(Some(OrderStatus::Pending));
        let mut report = PromotionReport::default();
        let mut promoted: HashSet<OrderId> = HashSet::new();

        loop {
            let page = self
                .store
                .find_page(filter.clone(), PageRequest::first(self.page_size))
                .await?;
            report.pages_fetched += 1;
            if page.is_empty() {
                break;
            }

            for mut order in page.content {
                let id = order.id().ok_or_else(|| {
                    StoreError::Rejected(format!("order {} has no id", order.order_number()))
                })?;
                if !promoted.insert(id) {
                    return Err(StoreError::Conflict(format!(
                        "order {} is still PENDING after promotion",
                        order.order_number()
                    ))
                    .into());
                }

                order.transition_to(OrderStatus::Processing)?;
                let saved = self.store.save(order).await?;
                report.promoted += 1;
                debug!(order_number = %saved.order_number(), "Order updated from PENDING to PROCESSING");
            }
        }

        if report.promoted > 0 {
            info!(promoted = report.promoted, "Orders updated from PENDING to PROCESSING");
        } else {
            debug!("No pending orders to process");
        }
        Ok(report)
    }

    /// Fires [`run_once`](Self::run_once) every interval until `shutdown` turns
    /// true or its sender is dropped. The first run starts immediately.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!(
            interval_secs = self.interval.as_secs_f64(),
            page_size = self.page_size,
            "BatchPromoter starting"
        );
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.run_once().await {
                        error!(error = %e, "Error occurred during scheduled order processing");
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        info!("BatchPromoter stopped");
    }
}
