use std::collections::HashSet;

use charybdis::types::{Text, Uuid};
use dashmap::DashMap;

use crate::errors::PortfolioError;
use crate::models::like::{ContentType, LikeTarget};
use crate::models::message::Message;
use crate::store::{LikeStore, MessageStore};

#[derive(Default, Debug)]
struct ContentLikes {
    likers: HashSet<Text>,
    count: i64,
}

impl ContentLikes {
    fn is_vacant(&self) -> bool {
        self.likers.is_empty() && self.count == 0
    }
}

/// In-process backend. Each content item's likers and counter live in one map entry, so a
/// toggle flips membership and counter under the same shard lock.
#[derive(Default)]
pub struct MemoryStore {
    likes: DashMap<LikeTarget, ContentLikes>,
    messages: DashMap<Uuid, Message>,
}

impl MemoryStore {
    /// Sets the stored counter of a content item, e.g. for counters that predate like records.
    pub fn seed_like_count(&self, target: &LikeTarget, count: i64) {
        self.likes.entry(target.clone()).or_default().count = count;
    }

    // re-checked under the shard lock, a concurrent toggle may have refilled the entry
    fn remove_if_vacant(&self, target: &LikeTarget) {
        self.likes.remove_if(target, |_, likes| likes.is_vacant());
    }
}

impl LikeStore for MemoryStore {
    async fn toggle_like(&self, user_identifier: &str, target: &LikeTarget) -> Result<bool, PortfolioError> {
        let (liked, vacant) = {
            let mut entry = self.likes.entry(target.clone()).or_default();

            let liked = if entry.likers.remove(user_identifier) {
                entry.count -= 1;

                false
            } else {
                entry.likers.insert(user_identifier.to_string());
                entry.count += 1;

                true
            };

            (liked, entry.is_vacant())
        };

        if vacant {
            self.remove_if_vacant(target);
        }

        Ok(liked)
    }

    async fn is_liked(&self, user_identifier: &str, target: &LikeTarget) -> Result<bool, PortfolioError> {
        Ok(self
            .likes
            .get(target)
            .is_some_and(|entry| entry.likers.contains(user_identifier)))
    }

    async fn liked_content_ids(
        &self,
        user_identifier: &str,
        content_type: ContentType,
        content_ids: &[Text],
    ) -> Result<HashSet<Text>, PortfolioError> {
        let liked = content_ids
            .iter()
            .filter(|content_id| {
                let target = LikeTarget {
                    content_type,
                    content_id: (*content_id).clone(),
                };

                self.likes
                    .get(&target)
                    .is_some_and(|entry| entry.likers.contains(user_identifier))
            })
            .cloned()
            .collect();

        Ok(liked)
    }

    async fn like_count(&self, target: &LikeTarget) -> Result<i64, PortfolioError> {
        Ok(self.likes.get(target).map_or(0, |entry| entry.count))
    }

    async fn recount_likes(&self, target: &LikeTarget) -> Result<i64, PortfolioError> {
        let count = match self.likes.get_mut(target) {
            Some(mut entry) => {
                entry.count = entry.likers.len() as i64;

                entry.count
            }
            None => return Ok(0),
        };

        if count == 0 {
            self.remove_if_vacant(target);
        }

        Ok(count)
    }
}

impl MessageStore for MemoryStore {
    async fn messages(&self) -> Result<Vec<Message>, PortfolioError> {
        let mut messages: Vec<Message> = self.messages.iter().map(|m| m.value().clone()).collect();
        messages.sort_by(Message::newest_first);

        Ok(messages)
    }

    async fn find_message(&self, id: Uuid) -> Result<Message, PortfolioError> {
        self.messages
            .get(&id)
            .map(|m| m.value().clone())
            .ok_or_else(|| PortfolioError::NotFound(format!("message {} not found", id)))
    }

    async fn insert_message(&self, message: &Message) -> Result<(), PortfolioError> {
        self.messages.insert(message.id, message.clone());

        Ok(())
    }

    async fn update_message(&self, message: &Message) -> Result<(), PortfolioError> {
        match self.messages.get_mut(&message.id) {
            Some(mut stored) => {
                *stored = message.clone();

                Ok(())
            }
            None => Err(PortfolioError::NotFound(format!("message {} not found", message.id))),
        }
    }

    async fn delete_message(&self, id: Uuid) -> Result<(), PortfolioError> {
        self.messages.remove(&id);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn blog(id: &str) -> LikeTarget {
        LikeTarget::new(ContentType::Blog, id).unwrap()
    }

    #[tokio::test]
    async fn toggle_twice_restores_seeded_counter() {
        let store = MemoryStore::default();
        let target = blog("blog-42");
        store.seed_like_count(&target, 5);

        assert!(store.toggle_like("anon_1", &target).await.unwrap());
        assert_eq!(store.like_count(&target).await.unwrap(), 6);
        assert!(store.is_liked("anon_1", &target).await.unwrap());

        assert!(!store.toggle_like("anon_1", &target).await.unwrap());
        assert_eq!(store.like_count(&target).await.unwrap(), 5);
        assert!(!store.is_liked("anon_1", &target).await.unwrap());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_toggles_keep_counter_equal_to_likers() {
        let store = Arc::new(MemoryStore::default());
        let target = blog("blog-1");

        let handles: Vec<_> = (0..51)
            .map(|i| {
                let store = store.clone();
                let target = target.clone();

                tokio::spawn(async move {
                    let user_identifier = format!("anon_{}", i % 3);
                    let liked = store.toggle_like(&user_identifier, &target).await;

                    liked
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let count = store.like_count(&target).await.unwrap();
        let likers = store.likes.get(&target).unwrap().likers.len() as i64;

        // 17 toggles per identity, so every identity ends up liking the item.
        assert_eq!(count, 3);
        assert_eq!(count, likers);
    }

    #[tokio::test]
    async fn liked_ids_are_a_subset_of_the_request() {
        let store = MemoryStore::default();
        store.toggle_like("anon_1", &blog("blog-2")).await.unwrap();
        store.toggle_like("anon_1", &blog("blog-9")).await.unwrap();
        store.toggle_like("anon_2", &blog("blog-1")).await.unwrap();

        let ids = vec!["blog-1".to_string(), "blog-2".to_string(), "blog-3".to_string()];
        let liked = store
            .liked_content_ids("anon_1", ContentType::Blog, &ids)
            .await
            .unwrap();

        assert_eq!(liked, HashSet::from(["blog-2".to_string()]));

        let unknown = store
            .liked_content_ids("anon_404", ContentType::Blog, &ids)
            .await
            .unwrap();
        assert!(unknown.is_empty());
    }

    #[tokio::test]
    async fn content_types_do_not_share_likes() {
        let store = MemoryStore::default();
        store
            .toggle_like("anon_1", &LikeTarget::new(ContentType::Project, "10").unwrap())
            .await
            .unwrap();

        assert!(!store.is_liked("anon_1", &blog("10")).await.unwrap());
    }

    #[tokio::test]
    async fn recount_repairs_drifted_counter() {
        let store = MemoryStore::default();
        let target = blog("blog-7");
        store.toggle_like("anon_1", &target).await.unwrap();
        store.seed_like_count(&target, 40);

        assert_eq!(store.recount_likes(&target).await.unwrap(), 1);
        assert_eq!(store.like_count(&target).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn vacant_entries_are_dropped() {
        let store = MemoryStore::default();
        let target = blog("blog-3");

        store.toggle_like("anon_1", &target).await.unwrap();
        assert_eq!(store.likes.len(), 1);

        store.toggle_like("anon_1", &target).await.unwrap();
        assert!(store.likes.is_empty());

        assert_eq!(store.recount_likes(&blog("blog-404")).await.unwrap(), 0);
        assert!(store.likes.is_empty());

        let seeded = blog("blog-5");
        store.seed_like_count(&seeded, 2);
        assert_eq!(store.recount_likes(&seeded).await.unwrap(), 0);
        assert!(store.likes.is_empty());
    }

    #[tokio::test]
    async fn update_of_unknown_message_is_not_found() {
        let store = MemoryStore::default();

        let res = store.update_message(&Message::default()).await;

        assert!(matches!(res, Err(PortfolioError::NotFound(_))));
        assert!(store.delete_message(Uuid::new_v4()).await.is_ok());
    }
}
