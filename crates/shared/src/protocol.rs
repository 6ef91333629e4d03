use std::{fmt, str::FromStr};

use crate::{domain::PostId, error::InvalidPostId};

pub const POSTS_PATH: &str = "/api/posts";
pub const USERS_PATH: &str = "/api/users";

pub fn post_path(post_id: PostId) -> String {
    format!("{POSTS_PATH}/{post_id}")
}

/// The three page kinds, independent of their parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    PostDetail,
    Authors,
}

impl Page {
    /// Generic message shown when any request behind this page fails.
    pub fn failure_message(&self) -> &'static str {
        match self {
            Page::Home => "Failed to load posts. Please try again later.",
            Page::PostDetail => "Failed to load post. Please try again later.",
            Page::Authors => "Failed to load authors. Please try again later.",
        }
    }
}

/// Client-side routes. Each one is backed by exactly one aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Post(PostId),
    Authors,
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Post(post_id) => format!("/post/{post_id}"),
            Route::Authors => "/authors".to_string(),
        }
    }

    pub fn page(&self) -> Page {
        match self {
            Route::Home => Page::Home,
            Route::Post(_) => Page::PostDetail,
            Route::Authors => Page::Authors,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    #[error("no page at {0:?}")]
    UnknownPath(String),
    #[error(transparent)]
    InvalidPostId(#[from] InvalidPostId),
}

impl FromStr for Route {
    type Err = RouteError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let path = raw.trim();
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Ok(Route::Home),
            "/authors" => Ok(Route::Authors),
            _ => match trimmed.strip_prefix("/post/") {
                Some(id) if !id.contains('/') => Ok(Route::Post(id.parse()?)),
                _ => Err(RouteError::UnknownPath(path.to_string())),
            },
        }
    }
}
