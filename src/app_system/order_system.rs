use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::actor_framework::ResourceActor;
use crate::app_system::{Config, ConfigError};
use crate::clients::OrderClient;
use crate::domain::Order;
use crate::lifecycle::OrderLifecycleEngine;
use crate::order_actor::OrderError;
use crate::promoter::{BatchPromoter, PromotionReport};
use crate::sequence::SequenceAllocator;
use crate::store::OrderStore;

/// The main application system that wires the store actor, the lifecycle
/// engine and the background promoter together.
///
/// Responsible for starting the tasks and shutting them down in order.
pub struct OrderSystem {
    pub engine: OrderLifecycleEngine,
    store: Arc<dyn OrderStore>,
    promoter_page_size: usize,
    shutdown: watch::Sender<bool>,
    promoter_handle: Option<JoinHandle<()>>,
    store_handle: JoinHandle<()>,
}

impl OrderSystem {
    pub fn start(config: &Config) -> Result<Self, ConfigError> {
        info!("Starting order system");

        // 1. Order store actor
        let order_id_counter = Arc::new(AtomicU64::new(1));
        let next_order_id = move || order_id_counter.fetch_add(1, Ordering::SeqCst);

        let (order_actor, order_resource_client) =
            ResourceActor::<Order>::new(config.store.buffer_size, next_order_id);
        let store: Arc<dyn OrderStore> = Arc::new(OrderClient::new(order_resource_client));
        let store_handle = tokio::spawn(order_actor.run());

        // 2. Order number allocator, one per process
        let sequence = Arc::new(SequenceAllocator::new(
            config.sequence.prefix.clone(),
            config.sequence.offset()?,
        ));

        // 3. Lifecycle engine
        let engine = OrderLifecycleEngine::new(store.clone(), sequence);

        // 4. Background promoter
        let (shutdown, shutdown_rx) = watch::channel(false);
        let promoter_handle = if config.promoter.enabled {
            let promoter = BatchPromoter::new(store.clone(), config.promoter.interval(), config.promoter.page_size);
            Some(tokio::spawn(promoter.run(shutdown_rx)))
        } else {
            info!("BatchPromoter disabled");
            None
        };

        Ok(Self {
            engine,
            store,
            promoter_page_size: config.promoter.page_size,
            shutdown,
            promoter_handle,
            store_handle,
        })
    }

    /// Runs one promotion pass now, outside the schedule.
    pub async fn promote_pending(&self) -> Result<PromotionReport, OrderError> {
        BatchPromoter::new(self.store.clone(), Duration::from_secs(1), self.promoter_page_size)
            .run_once()
            .await
    }

    /// Stops the promoter, then the store actor.
    ///
    /// The store actor only exits once every engine clone has been dropped.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");
        let OrderSystem {
            engine,
            store,
            promoter_page_size: _,
            shutdown,
            promoter_handle,
            store_handle,
        } = self;

        let _ = shutdown.send(true);
        if let Some(handle) = promoter_handle {
            if let Err(e) = handle.await {
                error!("Promoter task failed: {:?}", e);
                return Err(format!("Promoter task failed: {:?}", e));
            }
        }

        // Dropping the last client closes the actor's channel.
        drop(engine);
        drop(store);
        if let Err(e) = store_handle.await {
            error!("Actor task failed: {:?}", e);
            return Err(format!("Actor task failed: {:?}", e));
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
