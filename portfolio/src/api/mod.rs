pub mod types;

mod like_api;
mod message_api;

pub use like_api::*;
pub use message_api::*;

use actix_web::web;

use crate::errors::PortfolioError;

/// Registers every endpoint. Malformed JSON bodies and query strings surface as `InvalidRequest`.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default().error_handler(|err, _req| PortfolioError::InvalidRequest(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default().error_handler(|err, _req| PortfolioError::InvalidRequest(err.to_string()).into()),
    )
    .service(toggle_like)
    .service(liked_ids)
    .service(like_status)
    .service(like_count)
    .service(recount_likes)
    .service(
        web::scope("/messages")
            .service(get_messages)
            .service(create_message)
            .service(update_message)
            .service(delete_message),
    );
}
