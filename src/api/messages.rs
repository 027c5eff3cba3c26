use actix_web::{web, HttpResponse, Responder, ResponseError};

use crate::{
    database::Stores,
    models::{
        CreateMessageRequest, DeleteMessageResponse, ListMessagesResponse, MessageResponse,
        UpdateMessageRequest,
    },
    services::message_service,
};

/// GET /messages - Lista todas as mensagens
#[utoipa::path(
    get,
    path = "/messages",
    tag = "Messages",
    responses(
        (status = 200, description = "All messages", body = ListMessagesResponse)
    )
)]
pub async fn list_messages(stores: web::Data<Stores>) -> impl Responder {
    match message_service::list_messages(&stores).await {
        Ok(messages) => {
            log::info!("📋 GET /messages - {} messages", messages.len());
            HttpResponse::Ok().json(ListMessagesResponse {
                count: messages.len(),
                messages,
            })
        }
        Err(e) => {
            log::error!("❌ Error listing messages: {}", e);
            e.error_response()
        }
    }
}

/// GET /messages/{id} - Busca mensagem específica
#[utoipa::path(
    get,
    path = "/messages/{id}",
    tag = "Messages",
    params(("id" = String, Path, description = "Message id")),
    responses(
        (status = 200, description = "The message", body = MessageResponse),
        (status = 404, description = "Unknown id")
    )
)]
pub async fn get_message(stores: web::Data<Stores>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();

    match message_service::get_message(&stores, &id).await {
        Ok(message) => HttpResponse::Ok().json(message),
        Err(e) => {
            log::warn!("⚠️ GET /messages/{} failed: {}", id, e);
            e.error_response()
        }
    }
}

/// POST /messages - Cria nova mensagem
#[utoipa::path(
    post,
    path = "/messages",
    tag = "Messages",
    request_body = CreateMessageRequest,
    responses(
        (status = 201, description = "Message created", body = MessageResponse),
        (status = 400, description = "Missing fields or unknown author"),
        (status = 409, description = "Duplicate id")
    )
)]
pub async fn create_message(
    stores: web::Data<Stores>,
    body: web::Json<CreateMessageRequest>,
) -> impl Responder {
    log::info!("📝 POST /messages - '{}'", body.title);

    match message_service::create_message(&stores, body.into_inner()).await {
        Ok(message) => HttpResponse::Created().json(message),
        Err(e) => {
            log::warn!("⚠️ Failed to create message: {}", e);
            e.error_response()
        }
    }
}

/// PUT /messages/{id} - Atualiza mensagem (parcial)
#[utoipa::path(
    put,
    path = "/messages/{id}",
    tag = "Messages",
    params(("id" = String, Path, description = "Message id")),
    request_body = UpdateMessageRequest,
    responses(
        (status = 200, description = "Message updated", body = MessageResponse),
        (status = 400, description = "Empty patch or unknown author"),
        (status = 404, description = "Unknown id")
    )
)]
pub async fn update_message(
    stores: web::Data<Stores>,
    path: web::Path<String>,
    body: web::Json<UpdateMessageRequest>,
) -> impl Responder {
    let id = path.into_inner();
    log::info!("🔧 PUT /messages/{}", id);

    match message_service::update_message(&stores, &id, body.into_inner()).await {
        Ok(message) => HttpResponse::Ok().json(message),
        Err(e) => {
            log::warn!("⚠️ Failed to update message {}: {}", id, e);
            e.error_response()
        }
    }
}

/// DELETE /messages/{id} - Remove mensagem
#[utoipa::path(
    delete,
    path = "/messages/{id}",
    tag = "Messages",
    params(("id" = String, Path, description = "Message id")),
    responses(
        (status = 200, description = "Message deleted", body = DeleteMessageResponse),
        (status = 404, description = "Unknown or already deleted id")
    )
)]
pub async fn delete_message(stores: web::Data<Stores>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();
    log::info!("🗑️  DELETE /messages/{}", id);

    match message_service::delete_message(&stores, &id).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => {
            log::warn!("⚠️ Failed to delete message {}: {}", id, e);
            e.error_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::api::configure;
    use crate::database::Stores;
    use crate::models::{Message, User};
    use actix_web::{http::StatusCode, test, web, App};
    use serde_json::{json, Value};

    const SAMPLE_USER_ID: &str = "bbbbbbbbbbbb";
    const SAMPLE_MESSAGE_ID: &str = "cccccccccccc";
    const FIXTURE_TITLES: [&str; 3] = ["test title one", "test title two", "test title three"];

    async fn set_up() -> Stores {
        let stores = Stores::memory();

        let sample_user = User::new(Some(SAMPLE_USER_ID.into()), "myuser", "mypassword");
        stores.users.insert(&sample_user).await.unwrap();

        let sample_message = Message::new(
            Some(SAMPLE_MESSAGE_ID.into()),
            "test title one",
            "this is a test of the message body",
            sample_user.id.clone(),
        );
        stores.messages.insert(&sample_message).await.unwrap();

        stores
    }

    async fn tear_down(stores: &Stores) {
        let titles: Vec<String> = FIXTURE_TITLES.iter().map(|t| t.to_string()).collect();
        stores.messages.delete_by_titles(&titles).await.unwrap();
        stores.users.delete_by_username("myuser").await.unwrap();
    }

    macro_rules! app {
        ($stores:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($stores.clone()))
                    .configure(configure),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_should_load_all_messages() {
        let stores = set_up().await;
        let app = app!(stores);

        let req = test::TestRequest::get().uri("/messages").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        let messages = body["messages"].as_array().expect("messages is an array");
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["_id"], SAMPLE_MESSAGE_ID);
        assert_eq!(messages[0]["author"]["username"], "myuser");
        assert_eq!(body["count"], 1);

        tear_down(&stores).await;
    }

    #[actix_web::test]
    async fn test_empty_store_lists_empty_array() {
        let stores = Stores::memory();
        let app = app!(stores);

        let req = test::TestRequest::get().uri("/messages").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["messages"], json!([]));
    }

    #[actix_web::test]
    async fn test_should_get_one_specific_message() {
        let stores = set_up().await;
        let app = app!(stores);

        let req = test::TestRequest::get()
            .uri(&format!("/messages/{}", SAMPLE_MESSAGE_ID))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert!(body.is_object());
        assert_eq!(body["title"], "test title one");
        assert_eq!(body["body"], "this is a test of the message body");
        assert_eq!(body["author"]["_id"], SAMPLE_USER_ID);

        tear_down(&stores).await;
    }

    #[actix_web::test]
    async fn test_unknown_message_is_not_found() {
        let stores = set_up().await;
        let app = app!(stores);

        let req = test::TestRequest::get().uri("/messages/doesnotexist").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("doesnotexist"));

        tear_down(&stores).await;
    }

    #[actix_web::test]
    async fn test_should_post_a_new_message() {
        let stores = set_up().await;
        let app = app!(stores);

        let req = test::TestRequest::post()
            .uri("/messages")
            .set_json(json!({
                "title": "test title two",
                "body": "this is ANOTHER test of the message body",
                "author": SAMPLE_USER_ID
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body: Value = test::read_body_json(resp).await;
        assert!(body.is_object());
        assert_eq!(body["title"], "test title two");

        // check that message is actually inserted into the store
        let stored = stores.messages.find_by_title("test title two").await.unwrap();
        let stored = stored.expect("message was persisted");
        assert_eq!(stored.author, SAMPLE_USER_ID);
        assert_eq!(body["_id"], stored.id);

        // and retrievable through the API
        let req = test::TestRequest::get()
            .uri(&format!("/messages/{}", stored.id))
            .to_request();
        let fetched: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(fetched["title"], "test title two");
        assert_eq!(fetched["body"], "this is ANOTHER test of the message body");

        tear_down(&stores).await;
    }

    #[actix_web::test]
    async fn test_post_with_embedded_author_stores_id() {
        let stores = set_up().await;
        let app = app!(stores);

        let req = test::TestRequest::post()
            .uri("/messages")
            .set_json(json!({
                "title": "test title two",
                "body": "embedded author",
                "author": { "_id": SAMPLE_USER_ID, "username": "myuser" }
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let stored = stores
            .messages
            .find_by_title("test title two")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.author, SAMPLE_USER_ID);

        tear_down(&stores).await;
    }

    #[actix_web::test]
    async fn test_post_validation_errors() {
        let stores = set_up().await;
        let app = app!(stores);

        // missing body
        let req = test::TestRequest::post()
            .uri("/messages")
            .set_json(json!({ "title": "test title two", "author": SAMPLE_USER_ID }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);

        // unknown author
        let req = test::TestRequest::post()
            .uri("/messages")
            .set_json(json!({ "title": "test title two", "body": "b", "author": "nobody" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        // duplicate id
        let req = test::TestRequest::post()
            .uri("/messages")
            .set_json(json!({
                "_id": SAMPLE_MESSAGE_ID,
                "title": "test title two",
                "body": "b",
                "author": SAMPLE_USER_ID
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        assert!(stores.messages.find_by_title("test title two").await.unwrap().is_none());

        tear_down(&stores).await;
    }

    #[actix_web::test]
    async fn test_should_update_a_message() {
        let stores = set_up().await;
        let app = app!(stores);

        let req = test::TestRequest::put()
            .uri(&format!("/messages/{}", SAMPLE_MESSAGE_ID))
            .set_json(json!({ "title": "test title three" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert!(body.is_object());
        assert_eq!(body["title"], "test title three");
        assert_eq!(body["_id"], SAMPLE_MESSAGE_ID);

        // check that the message is actually updated in the store
        let stored = stores
            .messages
            .find_by_title("test title three")
            .await
            .unwrap()
            .expect("updated message is findable by its new title");
        assert_eq!(stored.id, SAMPLE_MESSAGE_ID);
        assert_eq!(stored.body, "this is a test of the message body");
        assert_eq!(stored.author, SAMPLE_USER_ID);
        assert!(stores.messages.find_by_title("test title one").await.unwrap().is_none());

        tear_down(&stores).await;
    }

    #[actix_web::test]
    async fn test_update_validation_errors_leave_record_unchanged() {
        let stores = set_up().await;
        let app = app!(stores);
        let before = stores.messages.find_by_id(SAMPLE_MESSAGE_ID).await.unwrap().unwrap();

        for patch in [
            json!({ "title": "  " }),
            json!({ "body": "" }),
            json!({ "author": "nobody" }),
            json!({}),
        ] {
            let req = test::TestRequest::put()
                .uri(&format!("/messages/{}", SAMPLE_MESSAGE_ID))
                .set_json(&patch)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "patch {}", patch);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["success"], false);
        }

        let req = test::TestRequest::put()
            .uri(&format!("/messages/{}", SAMPLE_MESSAGE_ID))
            .insert_header(("content-type", "application/json"))
            .set_payload("{ \"title\": ")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);

        let after = stores.messages.find_by_id(SAMPLE_MESSAGE_ID).await.unwrap().unwrap();
        assert_eq!(after, before);

        tear_down(&stores).await;
    }

    #[actix_web::test]
    async fn test_post_with_blank_id_is_rejected() {
        let stores = set_up().await;
        let app = app!(stores);

        let req = test::TestRequest::post()
            .uri("/messages")
            .set_json(json!({
                "_id": " ",
                "title": "test title two",
                "body": "b",
                "author": SAMPLE_USER_ID
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(stores.messages.find_by_title("test title two").await.unwrap().is_none());

        tear_down(&stores).await;
    }

    #[actix_web::test]
    async fn test_update_unknown_message_is_not_found() {
        let stores = set_up().await;
        let app = app!(stores);

        let req = test::TestRequest::put()
            .uri("/messages/doesnotexist")
            .set_json(json!({ "title": "test title three" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        tear_down(&stores).await;
    }

    #[actix_web::test]
    async fn test_should_delete_a_message() {
        let stores = set_up().await;
        let app = app!(stores);

        let req = test::TestRequest::delete()
            .uri(&format!("/messages/{}", SAMPLE_MESSAGE_ID))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Successfully deleted.");
        assert_eq!(body["_id"], SAMPLE_MESSAGE_ID);

        // check that the message is actually gone
        assert!(stores.messages.find_by_title("test title one").await.unwrap().is_none());

        // a second delete of the same id is a 404
        let req = test::TestRequest::delete()
            .uri(&format!("/messages/{}", SAMPLE_MESSAGE_ID))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        tear_down(&stores).await;
    }
}
