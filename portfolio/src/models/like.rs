use crate::constants::{BATCH_CHUNK_SIZE, MAX_IDENTIFIER_LENGTH};
use crate::errors::PortfolioError;
use charybdis::macros::charybdis_model;
use charybdis::types::{Text, Timestamp};
use scylla::client::caching_session::CachingSession;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use strum_macros::{Display, EnumString};

/// Membership row: `user_identifier` currently likes the content item.
#[charybdis_model(
    table_name = likes,
    partition_keys = [content_type, content_id],
    clustering_keys = [user_identifier],
    global_secondary_indexes = []
)]
#[derive(Serialize, Deserialize, Default, Clone, Debug)]
pub struct Like {
    pub content_type: Text,
    pub content_id: Text,
    pub user_identifier: Text,

    #[serde(default = "chrono::Utc::now")]
    pub created_at: Timestamp,
}

impl Like {
    pub const INSERT_IF_NOT_EXISTS_QUERY: &'static str = "INSERT INTO likes (content_type, content_id, user_identifier, \
         created_at) VALUES (?, ?, ?, ?) IF NOT EXISTS";

    pub const DELETE_IF_EXISTS_QUERY: &'static str =
        "DELETE FROM likes WHERE content_type = ? AND content_id = ? AND user_identifier = ? IF EXISTS";

    pub const COUNT_QUERY: &'static str = "SELECT COUNT(*) FROM likes WHERE content_type = ? AND content_id = ?";

    /// Content ids from `content_ids` that `user_identifier` likes.
    pub async fn find_liked_content_ids(
        db_session: &CachingSession,
        user_identifier: &str,
        content_type: ContentType,
        content_ids: &[Text],
    ) -> Result<HashSet<Text>, PortfolioError> {
        let mut liked = HashSet::new();

        for chunk in content_ids.chunks(BATCH_CHUNK_SIZE) {
            let likes = find_like!(
                "content_type = ? AND content_id IN ? AND user_identifier = ?",
                (content_type.to_string(), chunk.to_vec(), user_identifier.to_string())
            )
            .execute(db_session)
            .await?
            .try_collect()
            .await?;

            liked.extend(likes.into_iter().map(|like| like.content_id));
        }

        Ok(liked)
    }
}

#[derive(Deserialize, Serialize, EnumString, Display, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ContentType {
    Blog,
    Project,
}

/// Content id as it travels over the wire. Blogs use string ids, projects use integer ids.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum ContentId {
    Int(i64),
    Text(String),
}

impl ContentType {
    /// Normalizes a raw id into the text form stored in `likes`.
    pub fn canonical_id(&self, raw: &str) -> Result<Text, PortfolioError> {
        if raw.is_empty() {
            return Err(PortfolioError::InvalidRequest("content id must not be empty".to_string()));
        }

        if raw.trim() != raw {
            return Err(PortfolioError::InvalidRequest(format!(
                "content id must not have surrounding whitespace, got `{}`",
                raw
            )));
        }

        match self {
            ContentType::Blog => Ok(raw.to_string()),
            ContentType::Project => raw
                .parse::<i64>()
                .map(|id| id.to_string())
                .map_err(|_| PortfolioError::InvalidRequest(format!("project id must be an integer, got `{}`", raw))),
        }
    }

    pub fn canonical_wire_id(&self, id: &ContentId) -> Result<Text, PortfolioError> {
        match id {
            ContentId::Int(id) => Ok(id.to_string()),
            ContentId::Text(id) => self.canonical_id(id),
        }
    }

    /// Converts a stored id back to the id type callers use for this content type.
    pub fn wire_id(&self, stored: &str) -> Option<ContentId> {
        match self {
            ContentType::Blog => Some(ContentId::Text(stored.to_string())),
            ContentType::Project => stored.parse().ok().map(ContentId::Int),
        }
    }
}

/// A content item that owns a like counter.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LikeTarget {
    pub content_type: ContentType,
    pub content_id: Text,
}

impl LikeTarget {
    pub fn new(content_type: ContentType, raw_id: &str) -> Result<Self, PortfolioError> {
        Ok(Self {
            content_type,
            content_id: content_type.canonical_id(raw_id)?,
        })
    }

    pub fn like(&self, user_identifier: &str) -> Like {
        Like {
            content_type: self.content_type.to_string(),
            content_id: self.content_id.clone(),
            user_identifier: user_identifier.to_string(),
            created_at: chrono::Utc::now(),
        }
    }
}

/// Validates an anonymous identity sent by a client.
pub fn validate_identifier(identifier: Option<&str>) -> Result<&str, PortfolioError> {
    let identifier = identifier.unwrap_or_default();

    if identifier.trim().is_empty() {
        return Err(PortfolioError::InvalidRequest("user_identifier is required".to_string()));
    }

    if identifier.trim() != identifier {
        return Err(PortfolioError::InvalidRequest(
            "user_identifier must not have surrounding whitespace".to_string(),
        ));
    }

    if identifier.chars().count() > MAX_IDENTIFIER_LENGTH {
        return Err(PortfolioError::InvalidRequest(format!(
            "user_identifier must be at most {} characters",
            MAX_IDENTIFIER_LENGTH
        )));
    }

    Ok(identifier)
}
