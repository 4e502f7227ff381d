use actix_web::{delete, get, post, put, web, HttpResponse};
use charybdis::types::Uuid;
use serde::Deserialize;
use serde_json::json;

use crate::api::types::Response;
use crate::app::App;
use crate::errors::PortfolioError;
use crate::models::message::{Message, MessageParams};
use crate::store::MessageStore;

#[derive(Deserialize)]
pub struct DeleteMessageQuery {
    id: Option<String>,
}

#[get("")]
pub async fn get_messages(app: web::Data<App>) -> Response {
    let messages = app.store.messages().await?;

    Ok(HttpResponse::Ok().json(messages))
}

#[post("")]
pub async fn create_message(app: web::Data<App>, params: web::Json<MessageParams>) -> Response {
    let message = Message::from_submission(params.into_inner())?;

    app.store.insert_message(&message).await?;

    Ok(HttpResponse::Ok().json(message))
}

#[put("")]
pub async fn update_message(app: web::Data<App>, params: web::Json<MessageParams>) -> Response {
    let update = params.into_inner();
    let mut message = app.store.find_message(update.message_id()?).await?;

    message.apply_update(update)?;
    app.store.update_message(&message).await?;

    Ok(HttpResponse::Ok().json(message))
}

#[delete("")]
pub async fn delete_message(app: web::Data<App>, query: web::Query<DeleteMessageQuery>) -> Response {
    let id = query
        .id
        .as_deref()
        .ok_or_else(|| PortfolioError::InvalidRequest("Message ID is required".to_string()))?;
    let id = Uuid::parse_str(id).map_err(|_| PortfolioError::InvalidRequest(format!("`{}` is not a message id", id)))?;

    app.store.delete_message(id).await?;

    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}
