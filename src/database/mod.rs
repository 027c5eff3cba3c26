pub mod memory;
pub mod mongo;

pub use memory::MemoryStore;
pub use mongo::MongoDB;

use crate::models::{Message, MessagePatch, User};
use crate::utils::AppError;
use async_trait::async_trait;
use std::sync::Arc;

pub type StoreResult<T> = Result<T, AppError>;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with `Conflict` on a duplicate `_id` or username.
    async fn insert(&self, user: &User) -> StoreResult<()>;

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<User>>;

    /// Ids with no matching user are skipped.
    async fn find_by_ids(&self, ids: &[String]) -> StoreResult<Vec<User>>;

    async fn delete_by_username(&self, username: &str) -> StoreResult<u64>;

    async fn ping(&self) -> StoreResult<()>;
}

#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Ordered by `created_at`, then `_id`.
    async fn list(&self) -> StoreResult<Vec<Message>>;

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Message>>;

    async fn find_by_title(&self, title: &str) -> StoreResult<Option<Message>>;

    /// Fails with `Conflict` on a duplicate `_id`.
    async fn insert(&self, message: &Message) -> StoreResult<()>;

    /// Returns the record after the update, `None` if `id` is unknown.
    async fn update(&self, id: &str, patch: &MessagePatch) -> StoreResult<Option<Message>>;

    /// Returns the removed record, `None` if `id` is unknown.
    async fn delete(&self, id: &str) -> StoreResult<Option<Message>>;

    async fn delete_by_titles(&self, titles: &[String]) -> StoreResult<u64>;

    async fn ping(&self) -> StoreResult<()>;
}

/// Store handles shared with every handler through `web::Data<Stores>`.
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub messages: Arc<dyn MessageStore>,
}

impl Stores {
    pub fn mongo(db: MongoDB) -> Self {
        let db = Arc::new(db);
        Self {
            users: db.clone(),
            messages: db,
        }
    }

    pub fn memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            users: store.clone(),
            messages: store,
        }
    }

    pub async fn ping(&self) -> StoreResult<()> {
        self.users.ping().await?;
        self.messages.ping().await
    }
}
