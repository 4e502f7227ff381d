use log::warn;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::errors::ClientError;
use crate::identity::{IdentityProvider, IdentityToken};
use crate::types::{ContentId, ContentType, LikeCountResponse, LikedIdsResponse, LikedResponse};

/// Operations a list view needs from the like service.
#[allow(async_fn_in_trait)]
pub trait LikeApi {
    async fn toggle(&self, content_type: ContentType, content_id: &ContentId) -> Result<bool, ClientError>;

    async fn liked_ids(
        &self,
        content_type: ContentType,
        content_ids: &[ContentId],
    ) -> Result<Vec<ContentId>, ClientError>;
}

pub struct LikesClient {
    http: Client,
    base_url: Url,
    identity: IdentityToken,
}

impl LikesClient {
    /// Resolves the visitor identity once; every request made by this client carries it.
    pub fn new(base_url: &str, identity_provider: &impl IdentityProvider) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url).map_err(|e| ClientError::InvalidBaseUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl(base_url.to_string()));
        }

        Ok(Self {
            http: Client::new(),
            base_url,
            identity: identity_provider.get_or_create_identity()?,
        })
    }

    pub fn identity(&self) -> &IdentityToken {
        &self.identity
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    async fn parse<T: DeserializeOwned>(res: Response) -> Result<T, ClientError> {
        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            warn!("like request failed with {}: {}", status, body);

            return Err(ClientError::Status(status.as_u16(), body));
        }

        Ok(res.json::<T>().await?)
    }

    /// Liked state for a single item. The server answers `false` on any lookup problem.
    pub async fn is_liked(&self, content_type: ContentType, content_id: &ContentId) -> Result<bool, ClientError> {
        let url = self.endpoint(&["like-status", &content_type.to_string(), &content_id.to_string()])?;
        let res = self
            .http
            .get(url)
            .query(&[("user_identifier", self.identity.as_str())])
            .send()
            .await?;

        Ok(Self::parse::<LikedResponse>(res).await?.liked)
    }

    pub async fn like_count(&self, content_type: ContentType, content_id: &ContentId) -> Result<i64, ClientError> {
        let url = self.endpoint(&["like-count", &content_type.to_string(), &content_id.to_string()])?;
        let res = self.http.get(url).send().await?;

        Ok(Self::parse::<LikeCountResponse>(res).await?.likes)
    }
}

impl LikeApi for LikesClient {
    async fn toggle(&self, content_type: ContentType, content_id: &ContentId) -> Result<bool, ClientError> {
        let url = self.endpoint(&["like-toggle", &content_type.to_string(), &content_id.to_string()])?;
        let res = self
            .http
            .post(url)
            .json(&json!({ "user_identifier": self.identity.as_str() }))
            .send()
            .await?;

        Ok(Self::parse::<LikedResponse>(res).await?.liked)
    }

    async fn liked_ids(
        &self,
        content_type: ContentType,
        content_ids: &[ContentId],
    ) -> Result<Vec<ContentId>, ClientError> {
        if content_ids.is_empty() {
            return Ok(vec![]);
        }

        let url = self.endpoint(&["likes-batch", &content_type.to_string()])?;
        let res = self
            .http
            .post(url)
            .json(&json!({
                "content_ids": content_ids,
                "user_identifier": self.identity.as_str(),
            }))
            .send()
            .await?;

        Ok(Self::parse::<LikedIdsResponse>(res).await?.liked_ids)
    }
}
