//! Persistence behind the like and inbox endpoints.
//!
//! [`Store`] dispatches to the backend selected in config: Scylla for deployments,
//! an in-process map for local development and tests.

mod memory;
mod scylla_store;

use std::collections::HashSet;

use charybdis::types::{Text, Uuid};

use crate::errors::PortfolioError;
use crate::models::like::{ContentType, LikeTarget};
use crate::models::message::Message;

pub use memory::MemoryStore;
pub use scylla_store::ScyllaStore;

pub trait LikeStore {
    /// Flips the like state of `user_identifier` on `target` and adjusts the target's counter.
    /// Returns the new state. Concurrent toggles on the same pair each flip exactly once.
    async fn toggle_like(&self, user_identifier: &str, target: &LikeTarget) -> Result<bool, PortfolioError>;

    async fn is_liked(&self, user_identifier: &str, target: &LikeTarget) -> Result<bool, PortfolioError>;

    /// Subset of `content_ids` liked by `user_identifier`.
    async fn liked_content_ids(
        &self,
        user_identifier: &str,
        content_type: ContentType,
        content_ids: &[Text],
    ) -> Result<HashSet<Text>, PortfolioError>;

    async fn like_count(&self, target: &LikeTarget) -> Result<i64, PortfolioError>;

    /// Re-derives the counter from membership rows and returns the repaired value.
    async fn recount_likes(&self, target: &LikeTarget) -> Result<i64, PortfolioError>;
}

pub trait MessageStore {
    /// All messages, newest first.
    async fn messages(&self) -> Result<Vec<Message>, PortfolioError>;

    async fn find_message(&self, id: Uuid) -> Result<Message, PortfolioError>;

    async fn insert_message(&self, message: &Message) -> Result<(), PortfolioError>;

    async fn update_message(&self, message: &Message) -> Result<(), PortfolioError>;

    /// Deleting an unknown id is not an error.
    async fn delete_message(&self, id: Uuid) -> Result<(), PortfolioError>;
}

pub enum Store {
    Scylla(ScyllaStore),
    Memory(MemoryStore),
}

impl LikeStore for Store {
    async fn toggle_like(&self, user_identifier: &str, target: &LikeTarget) -> Result<bool, PortfolioError> {
        match self {
            Store::Scylla(store) => store.toggle_like(user_identifier, target).await,
            Store::Memory(store) => store.toggle_like(user_identifier, target).await,
        }
    }

    async fn is_liked(&self, user_identifier: &str, target: &LikeTarget) -> Result<bool, PortfolioError> {
        match self {
            Store::Scylla(store) => store.is_liked(user_identifier, target).await,
            Store::Memory(store) => store.is_liked(user_identifier, target).await,
        }
    }

    async fn liked_content_ids(
        &self,
        user_identifier: &str,
        content_type: ContentType,
        content_ids: &[Text],
    ) -> Result<HashSet<Text>, PortfolioError> {
        match self {
            Store::Scylla(store) => {
                store
                    .liked_content_ids(user_identifier, content_type, content_ids)
                    .await
            }
            Store::Memory(store) => {
                store
                    .liked_content_ids(user_identifier, content_type, content_ids)
                    .await
            }
        }
    }

    async fn like_count(&self, target: &LikeTarget) -> Result<i64, PortfolioError> {
        match self {
            Store::Scylla(store) => store.like_count(target).await,
            Store::Memory(store) => store.like_count(target).await,
        }
    }

    async fn recount_likes(&self, target: &LikeTarget) -> Result<i64, PortfolioError> {
        match self {
            Store::Scylla(store) => store.recount_likes(target).await,
            Store::Memory(store) => store.recount_likes(target).await,
        }
    }
}

impl MessageStore for Store {
    async fn messages(&self) -> Result<Vec<Message>, PortfolioError> {
        match self {
            Store::Scylla(store) => store.messages().await,
            Store::Memory(store) => store.messages().await,
        }
    }

    async fn find_message(&self, id: Uuid) -> Result<Message, PortfolioError> {
        match self {
            Store::Scylla(store) => store.find_message(id).await,
            Store::Memory(store) => store.find_message(id).await,
        }
    }

    async fn insert_message(&self, message: &Message) -> Result<(), PortfolioError> {
        match self {
            Store::Scylla(store) => store.insert_message(message).await,
            Store::Memory(store) => store.insert_message(message).await,
        }
    }

    async fn update_message(&self, message: &Message) -> Result<(), PortfolioError> {
        match self {
            Store::Scylla(store) => store.update_message(message).await,
            Store::Memory(store) => store.update_message(message).await,
        }
    }

    async fn delete_message(&self, id: Uuid) -> Result<(), PortfolioError> {
        match self {
            Store::Scylla(store) => store.delete_message(id).await,
            Store::Memory(store) => store.delete_message(id).await,
        }
    }
}
