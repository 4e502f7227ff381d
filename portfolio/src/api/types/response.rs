use actix_web::HttpResponse;

use crate::errors::PortfolioError;

pub type Response = Result<HttpResponse, PortfolioError>;
