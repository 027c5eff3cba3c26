use super::{MessageStore, StoreResult, UserStore};
use crate::models::{Message, MessagePatch, User};
use crate::utils::AppError;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-process store used by the test suite and by `STORAGE=memory`.
/// Each instance is isolated; nothing is shared between instances.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<String, User>>,
    messages: RwLock<HashMap<String, Message>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert(&self, user: &User) -> StoreResult<()> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.id) {
            return Err(AppError::Conflict(format!("User '{}' already exists", user.id)));
        }
        if users.values().any(|u| u.username == user.username) {
            return Err(AppError::Conflict(format!(
                "Username '{}' is already taken",
                user.username
            )));
        }
        users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<User>> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_ids(&self, ids: &[String]) -> StoreResult<Vec<User>> {
        let users = self.users.read().await;
        Ok(ids.iter().filter_map(|id| users.get(id).cloned()).collect())
    }

    async fn delete_by_username(&self, username: &str) -> StoreResult<u64> {
        let mut users = self.users.write().await;
        let id = users
            .values()
            .find(|u| u.username == username)
            .map(|u| u.id.clone());
        Ok(match id {
            Some(id) => users.remove(&id).map_or(0, |_| 1),
            None => 0,
        })
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn list(&self) -> StoreResult<Vec<Message>> {
        let mut all: Vec<Message> = self.messages.read().await.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(all)
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Message>> {
        Ok(self.messages.read().await.get(id).cloned())
    }

    async fn find_by_title(&self, title: &str) -> StoreResult<Option<Message>> {
        Ok(self
            .messages
            .read()
            .await
            .values()
            .find(|m| m.title == title)
            .cloned())
    }

    async fn insert(&self, message: &Message) -> StoreResult<()> {
        let mut messages = self.messages.write().await;
        if messages.contains_key(&message.id) {
            return Err(AppError::Conflict(format!(
                "Message '{}' already exists",
                message.id
            )));
        }
        messages.insert(message.id.clone(), message.clone());
        Ok(())
    }

    async fn update(&self, id: &str, patch: &MessagePatch) -> StoreResult<Option<Message>> {
        let now = chrono::Utc::now().timestamp_millis();
        let mut messages = self.messages.write().await;
        Ok(messages.get_mut(id).map(|message| {
            message.apply(patch, now);
            message.clone()
        }))
    }

    async fn delete(&self, id: &str) -> StoreResult<Option<Message>> {
        Ok(self.messages.write().await.remove(id))
    }

    async fn delete_by_titles(&self, titles: &[String]) -> StoreResult<u64> {
        let mut messages = self.messages.write().await;
        let before = messages.len();
        messages.retain(|_, m| !titles.contains(&m.title));
        Ok((before - messages.len()) as u64)
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
