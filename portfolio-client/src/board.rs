use std::collections::{HashMap, HashSet};

use log::warn;

use crate::client::LikeApi;
use crate::errors::ClientError;
use crate::types::{ContentId, ContentType};

/// Liked set and counters for a rendered list of one content type.
pub struct LikeBoard {
    content_type: ContentType,
    liked: HashSet<ContentId>,
    counts: HashMap<ContentId, i64>,
}

impl LikeBoard {
    /// `counts` are the public counters shipped with the list items.
    pub fn new(content_type: ContentType, counts: impl IntoIterator<Item = (ContentId, i64)>) -> Self {
        Self {
            content_type,
            liked: HashSet::new(),
            counts: counts.into_iter().collect(),
        }
    }

    /// Marks the items the visitor already likes. A failed lookup leaves the board unliked.
    pub async fn load(&mut self, api: &impl LikeApi) {
        let ids: Vec<ContentId> = self.counts.keys().cloned().collect();

        match api.liked_ids(self.content_type, &ids).await {
            Ok(liked) => self.liked = liked.into_iter().collect(),
            Err(e) => warn!("failed to load liked {} ids: {}", self.content_type, e),
        }
    }

    pub fn is_liked(&self, content_id: &ContentId) -> bool {
        self.liked.contains(content_id)
    }

    pub fn count(&self, content_id: &ContentId) -> i64 {
        self.counts.get(content_id).copied().unwrap_or(0)
    }

    fn set_liked(&mut self, content_id: &ContentId, liked: bool) {
        if self.is_liked(content_id) == liked {
            return;
        }

        let count = self.counts.entry(content_id.clone()).or_insert(0);
        if liked {
            self.liked.insert(content_id.clone());
            *count += 1;
        } else {
            self.liked.remove(content_id);
            *count = (*count - 1).max(0);
        }
    }

    /// Flips the item locally, then settles on the server's answer.
    /// On failure the optimistic change is reverted and the error returned.
    pub async fn toggle(&mut self, api: &impl LikeApi, content_id: &ContentId) -> Result<bool, ClientError> {
        let was_liked = self.is_liked(content_id);
        let previous_count = self.count(content_id);

        self.set_liked(content_id, !was_liked);

        match api.toggle(self.content_type, content_id).await {
            Ok(liked) => {
                self.set_liked(content_id, liked);

                Ok(liked)
            }
            Err(e) => {
                self.set_liked(content_id, was_liked);
                self.counts.insert(content_id.clone(), previous_count);

                Err(e)
            }
        }
    }
}
