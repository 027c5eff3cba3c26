use actix_web::{web, HttpResponse, Responder, ResponseError};

use crate::{
    database::Stores,
    models::{CreateUserRequest, UserResponse},
    services::user_service,
};

/// POST /users - Cria usuário
#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Missing username or password"),
        (status = 409, description = "Duplicate id or username")
    )
)]
pub async fn create_user(
    stores: web::Data<Stores>,
    body: web::Json<CreateUserRequest>,
) -> impl Responder {
    match user_service::create_user(&stores, body.into_inner()).await {
        Ok(user) => HttpResponse::Created().json(user),
        Err(e) => {
            log::warn!("⚠️ Failed to create user: {}", e);
            e.error_response()
        }
    }
}

/// GET /users/{id} - Busca usuário (sem senha)
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "The user", body = UserResponse),
        (status = 404, description = "Unknown id")
    )
)]
pub async fn get_user(stores: web::Data<Stores>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();

    match user_service::get_user(&stores, &id).await {
        Ok(user) => HttpResponse::Ok().json(user),
        Err(e) => {
            log::warn!("⚠️ GET /users/{} failed: {}", id, e);
            e.error_response()
        }
    }
}
