use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use shared::{
    domain::{Post, PostId, User},
    protocol::{post_path, POSTS_PATH, USERS_PATH},
};
use tracing::debug;
use url::Url;

pub mod author_list;
pub mod error;
pub mod post_detail;
pub mod post_list;
pub mod search;
pub mod view_state;

pub use author_list::AuthorListAggregator;
pub use error::FetchError;
pub use post_detail::{PostDetailAggregator, PostDetailData};
pub use post_list::{FeaturedSplit, PostListAggregator, PostListData};
pub use search::SearchTerm;
pub use view_state::{LoadTicket, PageSlot, ViewState};

/// Read access to the two remote collections.
#[async_trait]
pub trait BlogApi: Send + Sync {
    async fn list_posts(&self) -> Result<Vec<Post>, FetchError>;
    async fn list_users(&self) -> Result<Vec<User>, FetchError>;
    /// Any non-success status is reported as [`FetchError::NotFound`].
    async fn get_post(&self, post_id: PostId) -> Result<Post, FetchError>;
}

pub struct HttpBlogApi {
    http: Client,
    base_url: String,
}

impl HttpBlogApi {
    pub fn new(base_url: &Url, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("failed to build http client")?;
        Ok(Self {
            http,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T, FetchError> {
        debug!(%url, "GET");
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|err| FetchError::network(&url, err))?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                url,
                status: status.as_u16(),
            });
        }
        let body = response
            .bytes()
            .await
            .map_err(|err| FetchError::network(&url, err))?;
        serde_json::from_slice(&body).map_err(|err| FetchError::Decode {
            url,
            message: err.to_string(),
        })
    }
}

#[async_trait]
impl BlogApi for HttpBlogApi {
    async fn list_posts(&self) -> Result<Vec<Post>, FetchError> {
        self.get_json(self.endpoint(POSTS_PATH)).await
    }

    async fn list_users(&self) -> Result<Vec<User>, FetchError> {
        self.get_json(self.endpoint(USERS_PATH)).await
    }

    async fn get_post(&self, post_id: PostId) -> Result<Post, FetchError> {
        match self.get_json(self.endpoint(&post_path(post_id))).await {
            Err(FetchError::Http { .. }) => Err(FetchError::NotFound { post_id }),
            other => other,
        }
    }
}

/// Hands out one aggregator per page, all reading through the same API.
#[derive(Clone)]
pub struct BlogClient {
    api: Arc<dyn BlogApi>,
}

impl BlogClient {
    pub fn new(api: Arc<dyn BlogApi>) -> Self {
        Self { api }
    }

    pub fn over_http(base_url: &Url, timeout: Option<Duration>) -> Result<Self> {
        Ok(Self::new(Arc::new(HttpBlogApi::new(base_url, timeout)?)))
    }

    pub fn post_list(&self) -> PostListAggregator {
        PostListAggregator::new(Arc::clone(&self.api))
    }

    pub fn author_list(&self) -> AuthorListAggregator {
        AuthorListAggregator::new(Arc::clone(&self.api))
    }

    pub fn post_detail(&self) -> PostDetailAggregator {
        PostDetailAggregator::new(Arc::clone(&self.api))
    }
}

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
