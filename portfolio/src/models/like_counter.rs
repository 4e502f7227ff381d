use charybdis::errors::CharybdisError;
use charybdis::macros::charybdis_model;
use charybdis::operations::Find;
use charybdis::types::{Counter, Text};
use scylla::client::caching_session::CachingSession;
use serde::{Deserialize, Serialize};

use crate::errors::PortfolioError;
use crate::models::like::LikeTarget;

// CQL limitation is to have counters in a separate table
// https://docs.datastax.com/en/cql-oss/3.3/cql/cql_using/useCounters.html
#[charybdis_model(
    table_name = like_counters,
    partition_keys = [content_type, content_id],
    clustering_keys = [],
    global_secondary_indexes = []
)]
#[derive(Serialize, Deserialize, Default, Debug)]
pub struct LikeCounter {
    pub content_type: Text,
    pub content_id: Text,
    pub like_count: Option<Counter>,
}

impl LikeCounter {
    fn for_target(target: &LikeTarget) -> Self {
        Self {
            content_type: target.content_type.to_string(),
            content_id: target.content_id.clone(),
            ..Default::default()
        }
    }

    pub async fn increment_like(db_session: &CachingSession, target: &LikeTarget) -> Result<(), PortfolioError> {
        Self::adjust(db_session, target, 1).await
    }

    pub async fn decrement_like(db_session: &CachingSession, target: &LikeTarget) -> Result<(), PortfolioError> {
        Self::adjust(db_session, target, -1).await
    }

    pub async fn adjust(db_session: &CachingSession, target: &LikeTarget, delta: i64) -> Result<(), PortfolioError> {
        if delta == 0 {
            return Ok(());
        }

        Self::for_target(target)
            .increment_like_count(delta)
            .execute(db_session)
            .await?;

        Ok(())
    }

    pub async fn like_count(db_session: &CachingSession, target: &LikeTarget) -> Result<i64, PortfolioError> {
        let res = Self::find_by_primary_key_value((target.content_type.to_string(), target.content_id.clone()))
            .execute(db_session)
            .await;

        match res {
            Ok(c) => Ok(c.like_count.unwrap_or(Counter(0)).0),
            Err(CharybdisError::NotFoundError(_)) => Ok(0),
            Err(e) => Err(e.into()),
        }
    }
}
