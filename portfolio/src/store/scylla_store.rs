use std::collections::HashSet;
use std::time::Duration;

use charybdis::errors::CharybdisError;
use charybdis::operations::{Delete, Find, Insert, Update};
use charybdis::types::{Text, Uuid};
use log::{error, warn};
use scylla::client::caching_session::CachingSession;
use scylla::client::session::Session;
use scylla::client::session_builder::SessionBuilder;
use scylla::serialize::row::SerializeRow;
use scylla::value::{CqlValue, Row};

use crate::config::ScyllaConfig;
use crate::constants::{INBOX, PREPARED_STATEMENT_CACHE_SIZE, TOGGLE_MAX_ATTEMPTS};
use crate::errors::PortfolioError;
use crate::models::like::{ContentType, Like, LikeTarget};
use crate::models::like_counter::LikeCounter;
use crate::models::message::Message;
use crate::store::{LikeStore, MessageStore};

pub struct ScyllaStore {
    db_session: CachingSession,
}

impl ScyllaStore {
    pub async fn init(config: &ScyllaConfig) -> Self {
        let session: Session = SessionBuilder::new()
            .known_nodes(&config.hosts)
            .connection_timeout(Duration::from_secs(config.connection_timeout_secs))
            .use_keyspace(&config.keyspace, false)
            .build()
            .await
            .unwrap_or_else(|e| {
                panic!(
                    "Unable to connect to scylla hosts: {:?}. \nError: {}",
                    config.hosts, e
                )
            });

        Self {
            db_session: CachingSession::from(session, PREPARED_STATEMENT_CACHE_SIZE),
        }
    }

    /// Runs a lightweight transaction and reports whether its condition held.
    async fn execute_lwt(&self, query: &'static str, values: impl SerializeRow) -> Result<bool, PortfolioError> {
        let row = self
            .db_session
            .execute_unpaged(query, values)
            .await?
            .into_rows_result()?
            .maybe_first_row::<Row>()?;

        match row.and_then(|row| row.columns.into_iter().next().flatten()) {
            Some(CqlValue::Boolean(applied)) => Ok(applied),
            _ => Err(PortfolioError::StoreFailure(format!(
                "missing [applied] column in result of `{}`",
                query
            ))),
        }
    }

    async fn adjust_counter(
        &self,
        user_identifier: &str,
        target: &LikeTarget,
        delta: i64,
    ) -> Result<(), PortfolioError> {
        LikeCounter::adjust(&self.db_session, target, delta)
            .await
            .map_err(|e| {
                error!(
                    "Like counter of {} {} is out of sync after toggle by {}: {}",
                    target.content_type, target.content_id, user_identifier, e
                );

                e
            })
    }
}

impl LikeStore for ScyllaStore {
    async fn toggle_like(&self, user_identifier: &str, target: &LikeTarget) -> Result<bool, PortfolioError> {
        let like = target.like(user_identifier);
        let key = (&like.content_type, &like.content_id, &like.user_identifier);

        // Each branch is a conditional write, so only the toggle whose condition held moves the counter.
        for attempt in 1..=TOGGLE_MAX_ATTEMPTS {
            if self.execute_lwt(Like::DELETE_IF_EXISTS_QUERY, key).await? {
                self.adjust_counter(user_identifier, target, -1).await?;

                return Ok(false);
            }

            let values = (
                &like.content_type,
                &like.content_id,
                &like.user_identifier,
                like.created_at,
            );

            if self.execute_lwt(Like::INSERT_IF_NOT_EXISTS_QUERY, values).await? {
                self.adjust_counter(user_identifier, target, 1).await?;

                return Ok(true);
            }

            warn!(
                "Like toggle by {} on {} {} lost a race (attempt {})",
                user_identifier, target.content_type, target.content_id, attempt
            );
        }

        Err(PortfolioError::StoreFailure(format!(
            "like toggle on {} {} did not settle after {} attempts",
            target.content_type, target.content_id, TOGGLE_MAX_ATTEMPTS
        )))
    }

    async fn is_liked(&self, user_identifier: &str, target: &LikeTarget) -> Result<bool, PortfolioError> {
        let like = target.like(user_identifier);
        let res = Like::find_by_primary_key_value((like.content_type, like.content_id, like.user_identifier))
            .execute(&self.db_session)
            .await;

        match res {
            Ok(_) => Ok(true),
            Err(CharybdisError::NotFoundError(_)) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn liked_content_ids(
        &self,
        user_identifier: &str,
        content_type: ContentType,
        content_ids: &[Text],
    ) -> Result<HashSet<Text>, PortfolioError> {
        Like::find_liked_content_ids(&self.db_session, user_identifier, content_type, content_ids).await
    }

    async fn like_count(&self, target: &LikeTarget) -> Result<i64, PortfolioError> {
        LikeCounter::like_count(&self.db_session, target).await
    }

    async fn recount_likes(&self, target: &LikeTarget) -> Result<i64, PortfolioError> {
        let (records,) = self
            .db_session
            .execute_unpaged(
                Like::COUNT_QUERY,
                (target.content_type.to_string(), &target.content_id),
            )
            .await?
            .into_rows_result()?
            .single_row::<(i64,)>()?;

        let stored = LikeCounter::like_count(&self.db_session, target).await?;

        if stored != records {
            warn!(
                "Repairing like counter of {} {}: stored {}, records {}",
                target.content_type, target.content_id, stored, records
            );

            LikeCounter::adjust(&self.db_session, target, records - stored).await?;
        }

        Ok(records)
    }
}

impl MessageStore for ScyllaStore {
    async fn messages(&self) -> Result<Vec<Message>, PortfolioError> {
        let mut messages = Message::find_by_partition_key_value((INBOX.to_string(),))
            .execute(&self.db_session)
            .await?
            .try_collect()
            .await?;

        messages.sort_by(Message::newest_first);

        Ok(messages)
    }

    async fn find_message(&self, id: Uuid) -> Result<Message, PortfolioError> {
        let res = Message::find_by_primary_key_value((INBOX.to_string(), id))
            .execute(&self.db_session)
            .await;

        match res {
            Ok(message) => Ok(message),
            Err(CharybdisError::NotFoundError(_)) => Err(PortfolioError::NotFound(format!("message {} not found", id))),
            Err(e) => Err(e.into()),
        }
    }

    async fn insert_message(&self, message: &Message) -> Result<(), PortfolioError> {
        message.insert().execute(&self.db_session).await?;

        Ok(())
    }

    async fn update_message(&self, message: &Message) -> Result<(), PortfolioError> {
        // updates on a missing row would upsert it
        self.find_message(message.id).await?;

        message.update().execute(&self.db_session).await?;

        Ok(())
    }

    async fn delete_message(&self, id: Uuid) -> Result<(), PortfolioError> {
        Message {
            inbox: INBOX.to_string(),
            id,
            ..Default::default()
        }
        .delete()
        .execute(&self.db_session)
        .await?;

        Ok(())
    }
}
