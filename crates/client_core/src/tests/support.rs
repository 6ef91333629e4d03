use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use async_trait::async_trait;
use shared::domain::{Post, PostId, User};

use crate::{error::FetchError, BlogApi};

pub(crate) fn post(id: i64, title: &str, desc: &str) -> Post {
    Post {
        id: PostId(id),
        title: title.to_string(),
        desc: desc.to_string(),
        date: "2024-01-15".to_string(),
    }
}

pub(crate) fn user(name: &str, email: &str, posts: &[i64]) -> User {
    User {
        name: name.to_string(),
        email: email.to_string(),
        phone: "555-0100".to_string(),
        age: 30,
        posts: posts.iter().copied().map(PostId).collect(),
    }
}

pub(crate) fn http_500(path: &str) -> FetchError {
    FetchError::Http {
        url: format!("http://test{path}"),
        status: 500,
    }
}

/// In-memory API. `get_post` looks the id up in the post collection.
pub(crate) struct FakeBlogApi {
    posts: Result<Vec<Post>, FetchError>,
    users: Result<Vec<User>, FetchError>,
    single_post_error: Option<FetchError>,
    pub(crate) calls: Arc<AtomicUsize>,
}

impl FakeBlogApi {
    pub(crate) fn new(posts: Vec<Post>, users: Vec<User>) -> Self {
        Self {
            posts: Ok(posts),
            users: Ok(users),
            single_post_error: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub(crate) fn failing_posts(mut self, err: FetchError) -> Self {
        self.posts = Err(err);
        self
    }

    pub(crate) fn failing_users(mut self, err: FetchError) -> Self {
        self.users = Err(err);
        self
    }

    pub(crate) fn failing_single_post(mut self, err: FetchError) -> Self {
        self.single_post_error = Some(err);
        self
    }

    pub(crate) fn shared(self) -> Arc<dyn BlogApi> {
        Arc::new(self)
    }
}

#[async_trait]
impl BlogApi for FakeBlogApi {
    async fn list_posts(&self) -> Result<Vec<Post>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.posts.clone()
    }

    async fn list_users(&self) -> Result<Vec<User>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.users.clone()
    }

    async fn get_post(&self, post_id: PostId) -> Result<Post, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = &self.single_post_error {
            return Err(err.clone());
        }
        self.posts
            .as_ref()
            .ok()
            .and_then(|posts| posts.iter().find(|post| post.id == post_id).cloned())
            .ok_or(FetchError::NotFound { post_id })
    }
}
