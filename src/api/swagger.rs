use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Message Board API",
        version = "1.0.0",
        description = "CRUD API for messages and their authors.\n\n**Errors:** every failure responds with `{ \"success\": false, \"error\": \"...\" }`."
    ),
    paths(
        // Messages
        crate::api::messages::list_messages,
        crate::api::messages::get_message,
        crate::api::messages::create_message,
        crate::api::messages::update_message,
        crate::api::messages::delete_message,

        // Users
        crate::api::users::create_user,
        crate::api::users::get_user,

        // Health & Metrics
        crate::api::health::health_check,
        crate::api::metrics::get_metrics,
    ),
    components(
        schemas(
            crate::models::CreateMessageRequest,
            crate::models::UpdateMessageRequest,
            crate::models::AuthorRef,
            crate::models::EmbeddedAuthor,
            crate::models::AuthorSummary,
            crate::models::MessageResponse,
            crate::models::ListMessagesResponse,
            crate::models::DeleteMessageResponse,
            crate::models::CreateUserRequest,
            crate::models::UserResponse,
            crate::api::health::HealthResponse,
        )
    ),
    tags(
        (name = "Messages", description = "List, read, create, update and delete messages."),
        (name = "Users", description = "Message authors."),
        (name = "Health", description = "Health check and request counters."),
    )
)]
pub struct ApiDoc;
