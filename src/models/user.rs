use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// User (armazenado no MongoDB, collection `users`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    /// Stored as given.
    pub password: String,
    #[serde(default)]
    pub created_at: i64,
}

impl User {
    pub fn new(id: Option<String>, username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            id: id.unwrap_or_else(|| ObjectId::new().to_hex()),
            username: username.into(),
            password: password.into(),
            created_at: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// Request para criar usuário
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateUserRequest {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    pub username: String,
    pub password: String,
}

/// Response de usuário (nunca inclui a senha)
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UserResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub created_at: i64,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        UserResponse {
            id: u.id,
            username: u.username,
            created_at: u.created_at,
        }
    }
}
