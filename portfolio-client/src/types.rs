use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::Display;

#[derive(Serialize, Deserialize, Display, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ContentType {
    Blog,
    Project,
}

/// Blogs are keyed by strings, projects by integers.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum ContentId {
    Int(i64),
    Text(String),
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentId::Int(id) => write!(f, "{}", id),
            ContentId::Text(id) => write!(f, "{}", id),
        }
    }
}

impl From<i64> for ContentId {
    fn from(id: i64) -> Self {
        ContentId::Int(id)
    }
}

impl From<&str> for ContentId {
    fn from(id: &str) -> Self {
        ContentId::Text(id.to_string())
    }
}

#[derive(Deserialize)]
pub(crate) struct LikedResponse {
    pub liked: bool,
}

#[derive(Deserialize)]
pub(crate) struct LikedIdsResponse {
    pub liked_ids: Vec<ContentId>,
}

#[derive(Deserialize)]
pub(crate) struct LikeCountResponse {
    pub likes: i64,
}
