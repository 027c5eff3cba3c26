use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Mensagem (armazenada no MongoDB, collection `messages`)
///
/// `author` is always the referenced user's `_id`. It is resolved to an
/// [`AuthorSummary`] when the message is rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub body: String,
    pub author: String,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

impl Message {
    pub fn new(
        id: Option<String>,
        title: impl Into<String>,
        body: impl Into<String>,
        author: impl Into<String>,
    ) -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        Self {
            id: id.unwrap_or_else(|| ObjectId::new().to_hex()),
            title: title.into(),
            body: body.into(),
            author: author.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies the supplied fields of `patch` in place.
    pub fn apply(&mut self, patch: &MessagePatch, now: i64) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(body) = &patch.body {
            self.body = body.clone();
        }
        if let Some(author) = &patch.author {
            self.author = author.clone();
        }
        self.updated_at = now;
    }
}

/// Author as accepted on input: a bare user id, or an embedded user
/// object of which only `_id` is kept.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(untagged)]
pub enum AuthorRef {
    Id(String),
    Embedded(EmbeddedAuthor),
}

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct EmbeddedAuthor {
    #[serde(rename = "_id")]
    pub id: String,
}

impl AuthorRef {
    pub fn into_id(self) -> String {
        match self {
            AuthorRef::Id(id) => id,
            AuthorRef::Embedded(author) => author.id,
        }
    }
}

/// Request para criar mensagem
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateMessageRequest {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    pub title: String,
    pub body: String,
    pub author: AuthorRef,
}

/// Request para atualizar mensagem (parcial)
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct UpdateMessageRequest {
    pub title: Option<String>,
    pub body: Option<String>,
    pub author: Option<AuthorRef>,
}

/// Validated, normalized form of an update. Only `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessagePatch {
    pub title: Option<String>,
    pub body: Option<String>,
    pub author: Option<String>,
}

impl MessagePatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.body.is_none() && self.author.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct AuthorSummary {
    #[serde(rename = "_id")]
    pub id: String,
    /// `None` when the referenced user no longer exists
    pub username: Option<String>,
}

/// Response de mensagem
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MessageResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub body: String,
    pub author: AuthorSummary,
    pub created_at: i64,
    pub updated_at: i64,
}

impl MessageResponse {
    pub fn new(message: Message, username: Option<String>) -> Self {
        MessageResponse {
            id: message.id,
            title: message.title,
            body: message.body,
            author: AuthorSummary {
                id: message.author,
                username,
            },
            created_at: message.created_at,
            updated_at: message.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ListMessagesResponse {
    pub messages: Vec<MessageResponse>,
    pub count: usize,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct DeleteMessageResponse {
    pub message: String,
    #[serde(rename = "_id")]
    pub id: String,
}
