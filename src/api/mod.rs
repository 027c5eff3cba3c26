pub mod health;
pub mod messages;
pub mod metrics;
pub mod swagger;
pub mod users;

use actix_web::web;

use crate::utils::AppError;

/// Registers every route. Shared by `main` and the HTTP tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::InvalidRequest(err.to_string()).into()
    }))
    .route("/health", web::get().to(health::health_check))
    .route("/metrics", web::get().to(metrics::get_metrics))
    .service(
        web::scope("/messages")
            .route("", web::get().to(messages::list_messages))
            .route("", web::post().to(messages::create_message))
            .route("/{id}", web::get().to(messages::get_message))
            .route("/{id}", web::put().to(messages::update_message))
            .route("/{id}", web::delete().to(messages::delete_message)),
    )
    .service(
        web::scope("/users")
            .route("", web::post().to(users::create_user))
            .route("/{id}", web::get().to(users::get_user)),
    );
}
