use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum ClientError {
    InvalidBaseUrl(String),
    Http(reqwest::Error),
    /// Non-success response; carries the status code and body.
    Status(u16, String),
    Io(std::io::Error),
    Serde(serde_json::Error),
    IdentityStorage(String),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::InvalidBaseUrl(e) => write!(f, "Invalid base url: {}", e),
            ClientError::Http(e) => write!(f, "Http Error: {}", e),
            ClientError::Status(status, body) => write!(f, "Request failed with {}: {}", status, body),
            ClientError::Io(e) => write!(f, "IO Error: {}", e),
            ClientError::Serde(e) => write!(f, "Serde Error: {}", e),
            ClientError::IdentityStorage(e) => write!(f, "Identity Storage Error: {}", e),
        }
    }
}

impl Error for ClientError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ClientError::Http(e) => Some(e),
            ClientError::Io(e) => Some(e),
            ClientError::Serde(e) => Some(e),
            ClientError::InvalidBaseUrl(_) => None,
            ClientError::Status(_, _) => None,
            ClientError::IdentityStorage(_) => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Http(e)
    }
}

impl From<std::io::Error> for ClientError {
    fn from(e: std::io::Error) -> Self {
        ClientError::Io(e)
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Serde(e)
    }
}

impl<T> From<std::sync::PoisonError<T>> for ClientError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        ClientError::IdentityStorage(e.to_string())
    }
}
