use super::{MessageStore, StoreResult, UserStore};
use crate::models::{Message, MessagePatch, User};
use crate::utils::AppError;
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::options::{IndexOptions, ReturnDocument};
use mongodb::{Client, Collection, Database, IndexModel};

pub const USERS_COLLECTION: &str = "users";
pub const MESSAGES_COLLECTION: &str = "messages";

#[derive(Clone)]
pub struct MongoDB {
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str, db_name: &str) -> Result<Self, AppError> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(5);
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300));

        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        let client = Client::with_options(client_options)?;
        let db = client.database(db_name);

        // Test connection
        db.list_collection_names().await?;

        let mongodb = Self { db };
        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    /// Creates the indexes backing username uniqueness and title lookups
    async fn ensure_indexes(&self) -> Result<(), AppError> {
        log::info!("🔧 Creating database indexes...");

        let users = self.collection::<Document>(USERS_COLLECTION);
        let username_index = IndexModel::builder()
            .keys(doc! { "username": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        users.create_index(username_index).await?;
        log::info!("   ✅ Index ready: users(username) unique");

        let messages = self.collection::<Document>(MESSAGES_COLLECTION);
        for key in ["title", "author"] {
            let mut keys = Document::new();
            keys.insert(key, 1);
            let index = IndexModel::builder().keys(keys).build();
            match messages.create_index(index).await {
                Ok(_) => log::info!("   ✅ Index ready: messages({})", key),
                Err(e) => log::debug!("   ℹ️  Index messages({}) not created: {}", key, e),
            }
        }

        log::info!("✅ Database indexes ready");
        Ok(())
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    fn users(&self) -> Collection<User> {
        self.collection(USERS_COLLECTION)
    }

    fn messages(&self) -> Collection<Message> {
        self.collection(MESSAGES_COLLECTION)
    }

    async fn run_ping(&self) -> StoreResult<()> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}

/// Builds the `$set` document for a partial update.
pub fn update_document(patch: &MessagePatch, now: i64) -> Document {
    let mut set = doc! { "updated_at": now };
    if let Some(title) = &patch.title {
        set.insert("title", title.as_str());
    }
    if let Some(body) = &patch.body {
        set.insert("body", body.as_str());
    }
    if let Some(author) = &patch.author {
        set.insert("author", author.as_str());
    }
    doc! { "$set": set }
}

#[async_trait]
impl UserStore for MongoDB {
    async fn insert(&self, user: &User) -> StoreResult<()> {
        self.users().insert_one(user).await?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<User>> {
        Ok(self.users().find_one(doc! { "_id": id }).await?)
    }

    async fn find_by_ids(&self, ids: &[String]) -> StoreResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let cursor = self
            .users()
            .find(doc! { "_id": { "$in": ids.to_vec() } })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn delete_by_username(&self, username: &str) -> StoreResult<u64> {
        let result = self
            .users()
            .delete_one(doc! { "username": username })
            .await?;
        Ok(result.deleted_count)
    }

    async fn ping(&self) -> StoreResult<()> {
        self.run_ping().await
    }
}

#[async_trait]
impl MessageStore for MongoDB {
    async fn list(&self) -> StoreResult<Vec<Message>> {
        let cursor = self
            .messages()
            .find(doc! {})
            .sort(doc! { "created_at": 1, "_id": 1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Message>> {
        Ok(self.messages().find_one(doc! { "_id": id }).await?)
    }

    async fn find_by_title(&self, title: &str) -> StoreResult<Option<Message>> {
        Ok(self.messages().find_one(doc! { "title": title }).await?)
    }

    async fn insert(&self, message: &Message) -> StoreResult<()> {
        self.messages().insert_one(message).await?;
        Ok(())
    }

    async fn update(&self, id: &str, patch: &MessagePatch) -> StoreResult<Option<Message>> {
        let now = chrono::Utc::now().timestamp_millis();
        let updated = self
            .messages()
            .find_one_and_update(doc! { "_id": id }, update_document(patch, now))
            .return_document(ReturnDocument::After)
            .await?;
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> StoreResult<Option<Message>> {
        Ok(self.messages().find_one_and_delete(doc! { "_id": id }).await?)
    }

    async fn delete_by_titles(&self, titles: &[String]) -> StoreResult<u64> {
        let result = self
            .messages()
            .delete_many(doc! { "title": { "$in": titles.to_vec() } })
            .await?;
        Ok(result.deleted_count)
    }

    async fn ping(&self) -> StoreResult<()> {
        self.run_ping().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_document_sets_only_supplied_fields() {
        let patch = MessagePatch {
            title: Some("test title three".into()),
            ..Default::default()
        };
        let update = update_document(&patch, 42);
        assert_eq!(
            update,
            doc! { "$set": { "updated_at": 42_i64, "title": "test title three" } }
        );
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_mongodb_connection() {
        dotenv::dotenv().ok();
        let _ = env_logger::builder().is_test(true).try_init();

        let uri = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let db = MongoDB::new(&uri, "message_board_test").await;
        assert!(db.is_ok());

        let db = db.unwrap();
        assert!(MessageStore::ping(&db).await.is_ok());
    }
}
