use crate::{
    database::Stores,
    models::{CreateUserRequest, User, UserResponse},
    utils::AppError,
};

/// POST /users
pub async fn create_user(stores: &Stores, request: CreateUserRequest) -> Result<UserResponse, AppError> {
    if request.username.trim().is_empty() || request.password.is_empty() {
        return Err(AppError::InvalidRequest(
            "'username' and 'password' must not be empty".to_string(),
        ));
    }
    if request.id.as_deref().is_some_and(|id| id.trim().is_empty()) {
        return Err(AppError::InvalidRequest("'_id' must not be empty".to_string()));
    }

    let user = User::new(request.id, request.username, request.password);
    stores.users.insert(&user).await?;

    log::info!("✅ User {} created ({})", user.id, user.username);
    Ok(UserResponse::from(user))
}

/// GET /users/{id}
pub async fn get_user(stores: &Stores, id: &str) -> Result<UserResponse, AppError> {
    stores
        .users
        .find_by_id(id)
        .await?
        .map(UserResponse::from)
        .ok_or_else(|| AppError::NotFound(format!("User '{}' not found", id)))
}
