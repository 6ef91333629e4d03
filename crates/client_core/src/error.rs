//! Failures of a single API request, before a page collapses them into one message.

use shared::{
    domain::PostId,
    error::{ApiError, ErrorCode, InvalidPostId},
    protocol::Page,
};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {message}")]
    Network { url: String, message: String },
    #[error("{url} returned HTTP {status}")]
    Http { url: String, status: u16 },
    #[error("post {post_id} not found")]
    NotFound { post_id: PostId },
    #[error("post id {raw:?} is not an integer")]
    InvalidPostId { raw: String },
    #[error("failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },
}

impl FetchError {
    pub fn network(url: impl Into<String>, err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "timed out".to_string()
        } else {
            err.to_string()
        };
        FetchError::Network {
            url: url.into(),
            message,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            FetchError::Network { .. } => ErrorCode::Network,
            FetchError::Http { .. } => ErrorCode::Http,
            FetchError::NotFound { .. } | FetchError::InvalidPostId { .. } => ErrorCode::NotFound,
            FetchError::Decode { .. } => ErrorCode::Decode,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.code() == ErrorCode::NotFound
    }

    /// Collapses the failure into what the page shows, keeping only the category.
    pub fn into_page_error(self, page: Page) -> ApiError {
        ApiError::new(self.code(), page.failure_message())
    }
}

impl From<InvalidPostId> for FetchError {
    fn from(value: InvalidPostId) -> Self {
        FetchError::InvalidPostId { raw: value.raw }
    }
}
