use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::hash::Hash;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument};

use crate::domain::{Page, PageRequest};

// =============================================================================
// 1. THE ABSTRACTION (Entity trait with store hooks)
// =============================================================================

/// Trait that any domain entity must implement to be managed by ResourceActor
pub trait Entity: Clone + Debug + Send + Sync + 'static {
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;
    type Filter: Send + Sync + Debug;
    type SortKey: Ord;

    /// `None` until the actor has stored the entity once.
    fn id(&self) -> Option<Self::Id>;

    /// Unique, immutable business key (indexed by the actor).
    fn natural_key(&self) -> &str;

    fn sort_key(&self) -> Self::SortKey;

    fn matches(&self, filter: &Self::Filter) -> bool;

    // --- Lifecycle Hooks ---

    fn on_create(&mut self, id: Self::Id, now: DateTime<Utc>) -> Result<(), String>;
    fn on_update(&mut self, _now: DateTime<Utc>) -> Result<(), String> { Ok(()) }
    fn on_delete(&self) -> Result<(), String> { Ok(()) }
}

/// Errors surfaced by the actor or its channels.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped")]
    ActorDropped,
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),
    #[error("Key of item {0} cannot change")]
    ImmutableKey(String),
    #[error("Rejected by lifecycle hook: {0}")]
    HookRejected(String),
}

// =============================================================================
// 2. THE GENERIC MESSAGES
// =============================================================================

pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

#[derive(Debug)]
pub enum ResourceRequest<T: Entity> {
    /// Insert when the entity has no id yet, replace otherwise.
    Save {
        entity: T,
        respond_to: Response<T>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    FindByKey {
        key: String,
        respond_to: Response<Option<T>>,
    },
    ExistsByKey {
        key: String,
        respond_to: Response<bool>,
    },
    Query {
        filter: T::Filter,
        page: PageRequest,
        respond_to: Response<Page<T>>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<()>,
    },
}

// =============================================================================
// 3. THE GENERIC ACTOR SERVER
// =============================================================================

pub struct ResourceActor<T: Entity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, T>,
    keys: HashMap<String, T::Id>,
    next_id_fn: Box<dyn Fn() -> T::Id + Send + Sync>,
}

impl<T: Entity> ResourceActor<T> {
    pub fn new(
        buffer_size: usize,
        next_id_fn: impl Fn() -> T::Id + Send + Sync + 'static
    ) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
            keys: HashMap::new(),
            next_id_fn: Box::new(next_id_fn),
        };
        let client = ResourceClient::new(sender);
        (actor, client)
    }

    /// Serves requests until every client has been dropped.
    pub async fn run(mut self) {
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Save { entity, respond_to } => {
                    let _ = respond_to.send(self.save(entity));
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::FindByKey { key, respond_to } => {
                    let item = self.keys.get(&key).and_then(|id| self.store.get(id)).cloned();
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::ExistsByKey { key, respond_to } => {
                    let _ = respond_to.send(Ok(self.keys.contains_key(&key)));
                }
                ResourceRequest::Query { filter, page, respond_to } => {
                    let _ = respond_to.send(Ok(self.query(&filter, page)));
                }
                ResourceRequest::Delete { id, respond_to } => {
                    let _ = respond_to.send(self.delete(&id));
                }
            }
        }
        debug!(items = self.store.len(), "Resource actor stopped");
    }

    fn save(&mut self, mut entity: T) -> Result<T, FrameworkError> {
        let now = Utc::now();
        match entity.id() {
            None => {
                let key = entity.natural_key().to_string();
                if self.keys.contains_key(&key) {
                    return Err(FrameworkError::DuplicateKey(key));
                }
                let id = (self.next_id_fn)();
                entity.on_create(id.clone(), now).map_err(FrameworkError::HookRejected)?;
                self.keys.insert(key, id.clone());
                self.store.insert(id, entity.clone());
                Ok(entity)
            }
            Some(id) => {
                let existing = self
                    .store
                    .get(&id)
                    .ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;
                if existing.natural_key() != entity.natural_key() {
                    return Err(FrameworkError::ImmutableKey(id.to_string()));
                }
                entity.on_update(now).map_err(FrameworkError::HookRejected)?;
                self.store.insert(id, entity.clone());
                Ok(entity)
            }
        }
    }

    fn query(&self, filter: &T::Filter, request: PageRequest) -> Page<T> {
        let mut matching: Vec<&T> = self.store.values().filter(|item| item.matches(filter)).collect();
        matching.sort_by_key(|item| item.sort_key());
        let total = matching.len();
        let content = matching
            .into_iter()
            .skip(request.offset())
            .take(request.size)
            .cloned()
            .collect();
        Page::new(content, request, total)
    }

    fn delete(&mut self, id: &T::Id) -> Result<(), FrameworkError> {
        let item = self
            .store
            .get(id)
            .ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;
        item.on_delete().map_err(FrameworkError::HookRejected)?;
        let key = item.natural_key().to_string();
        self.store.remove(id);
        self.keys.remove(&key);
        Ok(())
    }
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

/// Generate client methods with oneshot channel boilerplate and automatic tracing.
macro_rules! resource_method {
    (fn $method:ident($($param:ident: $param_type:ty),*) -> $return_type:ty as $variant:ident) => {
        #[instrument(level = "debug", skip(self))]
        pub async fn $method(&self, $($param: $param_type),*) -> Result<$return_type, FrameworkError> {
            debug!("Sending request");
            let (respond_to, response) = oneshot::channel();
            self.sender
                .send(ResourceRequest::$variant {
                    $($param,)*
                    respond_to,
                })
                .await
                .map_err(|_| FrameworkError::ActorClosed)?;
            response.await.map_err(|_| FrameworkError::ActorDropped)?
        }
    };
}

#[derive(Clone)]
pub struct ResourceClient<T: Entity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

impl<T: Entity> ResourceClient<T> {
    pub(crate) fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    resource_method!(fn save(entity: T) -> T as Save);
    resource_method!(fn get(id: T::Id) -> Option<T> as Get);
    resource_method!(fn find_by_key(key: String) -> Option<T> as FindByKey);
    resource_method!(fn exists_by_key(key: String) -> bool as ExistsByKey);
    resource_method!(fn query(filter: T::Filter, page: PageRequest) -> Page<T> as Query);
    resource_method!(fn delete(id: T::Id) -> () as Delete);
}

// =============================================================================
// 5. EXAMPLE USAGE (Test)
// =============================================================================
