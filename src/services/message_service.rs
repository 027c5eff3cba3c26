// ==================== MESSAGES ====================
// Validação, normalização do autor e resolução do autor na leitura

use crate::{
    database::Stores,
    models::{
        CreateMessageRequest, DeleteMessageResponse, Message, MessagePatch, MessageResponse,
        UpdateMessageRequest,
    },
    utils::AppError,
};
use std::collections::HashMap;

pub const DELETED_MESSAGE: &str = "Successfully deleted.";

fn required(field: &str, value: String) -> Result<String, AppError> {
    if value.trim().is_empty() {
        return Err(AppError::InvalidRequest(format!("'{}' must not be empty", field)));
    }
    Ok(value)
}

fn optional(field: &str, value: Option<String>) -> Result<Option<String>, AppError> {
    value.map(|v| required(field, v)).transpose()
}

async fn ensure_author_exists(stores: &Stores, author_id: &str) -> Result<(), AppError> {
    match stores.users.find_by_id(author_id).await? {
        Some(_) => Ok(()),
        None => Err(AppError::InvalidRequest(format!(
            "Author '{}' does not exist",
            author_id
        ))),
    }
}

/// Resolves every author id in one lookup and renders the messages.
async fn render(stores: &Stores, messages: Vec<Message>) -> Result<Vec<MessageResponse>, AppError> {
    let mut ids: Vec<String> = messages.iter().map(|m| m.author.clone()).collect();
    ids.sort();
    ids.dedup();

    let usernames: HashMap<String, String> = stores
        .users
        .find_by_ids(&ids)
        .await?
        .into_iter()
        .map(|u| (u.id, u.username))
        .collect();

    Ok(messages
        .into_iter()
        .map(|m| {
            let username = usernames.get(&m.author).cloned();
            MessageResponse::new(m, username)
        })
        .collect())
}

async fn render_one(stores: &Stores, message: Message) -> Result<MessageResponse, AppError> {
    let username = stores
        .users
        .find_by_id(&message.author)
        .await?
        .map(|u| u.username);
    Ok(MessageResponse::new(message, username))
}

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Message '{}' not found", id))
}

/// GET /messages
pub async fn list_messages(stores: &Stores) -> Result<Vec<MessageResponse>, AppError> {
    let messages = stores.messages.list().await?;
    render(stores, messages).await
}

/// GET /messages/{id}
pub async fn get_message(stores: &Stores, id: &str) -> Result<MessageResponse, AppError> {
    let message = stores
        .messages
        .find_by_id(id)
        .await?
        .ok_or_else(|| not_found(id))?;
    render_one(stores, message).await
}

/// POST /messages
pub async fn create_message(
    stores: &Stores,
    request: CreateMessageRequest,
) -> Result<MessageResponse, AppError> {
    let id = optional("_id", request.id)?;
    let title = required("title", request.title)?;
    let body = required("body", request.body)?;
    let author = required("author", request.author.into_id())?;

    ensure_author_exists(stores, &author).await?;

    let message = Message::new(id, title, body, author);
    stores.messages.insert(&message).await?;

    log::info!("✅ Message {} created by {}", message.id, message.author);
    render_one(stores, message).await
}

/// PUT /messages/{id}
pub async fn update_message(
    stores: &Stores,
    id: &str,
    request: UpdateMessageRequest,
) -> Result<MessageResponse, AppError> {
    let patch = MessagePatch {
        title: optional("title", request.title)?,
        body: optional("body", request.body)?,
        author: optional("author", request.author.map(|a| a.into_id()))?,
    };

    if patch.is_empty() {
        return Err(AppError::InvalidRequest("No fields to update".to_string()));
    }

    if let Some(author) = &patch.author {
        ensure_author_exists(stores, author).await?;
    }

    let updated = stores
        .messages
        .update(id, &patch)
        .await?
        .ok_or_else(|| not_found(id))?;

    log::info!("✅ Message {} updated", updated.id);
    render_one(stores, updated).await
}

/// DELETE /messages/{id}
///
/// Deleting an id that is already gone is a `NotFound`, not a silent success.
pub async fn delete_message(stores: &Stores, id: &str) -> Result<DeleteMessageResponse, AppError> {
    let removed = stores
        .messages
        .delete(id)
        .await?
        .ok_or_else(|| not_found(id))?;

    log::info!("🗑️  Message {} deleted", removed.id);
    Ok(DeleteMessageResponse {
        message: DELETED_MESSAGE.to_string(),
        id: removed.id,
    })
}
