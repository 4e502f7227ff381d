use actix_web::{HttpResponse, ResponseError};
use charybdis::errors::CharybdisError;
use colored::Colorize;
use log::error;
use scylla::errors::{ExecutionError, IntoRowsResultError, MaybeFirstRowError, SingleRowError};
use serde_json::json;
use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum PortfolioError {
    // 400s
    InvalidRequest(String),
    NotFound(String),
    // 400 | 500
    CharybdisError(CharybdisError),
    // 500
    StoreFailure(String),
}

impl fmt::Display for PortfolioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortfolioError::InvalidRequest(e) => write!(f, "Invalid Request: {}", e),
            PortfolioError::NotFound(e) => write!(f, "Not Found: {}", e),
            PortfolioError::CharybdisError(e) => write!(f, "Charybdis Error: \n{}", e),
            PortfolioError::StoreFailure(e) => write!(f, "Store Failure: {}", e),
        }
    }
}

impl Error for PortfolioError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PortfolioError::CharybdisError(e) => Some(e),
            PortfolioError::InvalidRequest(_) => None,
            PortfolioError::NotFound(_) => None,
            PortfolioError::StoreFailure(_) => None,
        }
    }
}

impl ResponseError for PortfolioError {
    fn error_response(&self) -> HttpResponse {
        match self {
            PortfolioError::InvalidRequest(e) => HttpResponse::BadRequest().json(json!({
                "status": 400,
                "message": e
            })),
            PortfolioError::NotFound(e) => HttpResponse::NotFound().json(json!({
                "status": 404,
                "message": e
            })),
            PortfolioError::CharybdisError(CharybdisError::NotFoundError(e)) => HttpResponse::NotFound().json(json!({
                "status": 404,
                "message": e.to_string()
            })),
            _ => {
                error!("Internal Server Error: {}", self.to_string().red());

                HttpResponse::InternalServerError().json(json!({
                    "status": 500,
                    "message": self.to_string()
                }))
            }
        }
    }
}

impl From<CharybdisError> for PortfolioError {
    fn from(e: CharybdisError) -> Self {
        PortfolioError::CharybdisError(e)
    }
}

impl From<ExecutionError> for PortfolioError {
    fn from(e: ExecutionError) -> Self {
        PortfolioError::StoreFailure(e.to_string())
    }
}

impl From<IntoRowsResultError> for PortfolioError {
    fn from(e: IntoRowsResultError) -> Self {
        PortfolioError::StoreFailure(e.to_string())
    }
}

impl From<MaybeFirstRowError> for PortfolioError {
    fn from(e: MaybeFirstRowError) -> Self {
        PortfolioError::StoreFailure(e.to_string())
    }
}

impl From<SingleRowError> for PortfolioError {
    fn from(e: SingleRowError) -> Self {
        PortfolioError::StoreFailure(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn invalid_request_maps_to_bad_request() {
        let res = PortfolioError::InvalidRequest("user_identifier is required".to_string()).error_response();

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn store_failure_maps_to_internal_server_error() {
        let res = PortfolioError::StoreFailure("timeout".to_string()).error_response();

        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
