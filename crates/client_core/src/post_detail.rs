//! Single post page: the post, the user that lists it and a few more of their posts.

use std::{sync::Arc, time::Instant};

use serde::Serialize;
use shared::{
    domain::{Post, PostId, User},
    protocol::Page,
};
use tracing::{error, info, warn};

use crate::{error::FetchError, view_state::ViewState, BlogApi};

pub const RELATED_POSTS_LIMIT: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostDetailData {
    pub post: Post,
    pub author: Option<User>,
    pub related: Vec<Post>,
}

/// First user, in fetch order, whose post list contains `post_id`.
pub fn find_author(users: &[User], post_id: PostId) -> Option<&User> {
    users.iter().find(|user| user.owns_post(post_id))
}

/// Other posts of `author`, in source order, capped at [`RELATED_POSTS_LIMIT`].
pub fn related_posts(posts: &[Post], author: Option<&User>, post_id: PostId) -> Vec<Post> {
    let Some(author) = author else {
        return Vec::new();
    };
    posts
        .iter()
        .filter(|post| post.id != post_id && author.owns_post(post.id))
        .take(RELATED_POSTS_LIMIT)
        .cloned()
        .collect()
}

pub struct PostDetailAggregator {
    api: Arc<dyn BlogApi>,
}

impl PostDetailAggregator {
    pub fn new(api: Arc<dyn BlogApi>) -> Self {
        Self { api }
    }

    /// Fetches the post, all users and all posts at once. Only the post
    /// itself is required; the other two degrade to empty lists.
    pub async fn load(&self, post_id: PostId) -> Result<PostDetailData, FetchError> {
        let (post, users, posts) = tokio::join!(
            self.api.get_post(post_id),
            self.api.list_users(),
            self.api.list_posts(),
        );
        let post = post?;
        let users = users.unwrap_or_else(|err| {
            warn!(post_id = post_id.0, "users unavailable for post detail: {err}");
            Vec::new()
        });
        let posts = posts.unwrap_or_else(|err| {
            warn!(post_id = post_id.0, "posts unavailable for post detail: {err}");
            Vec::new()
        });

        let author = find_author(&users, post_id).cloned();
        let related = related_posts(&posts, author.as_ref(), post_id);
        Ok(PostDetailData {
            post,
            author,
            related,
        })
    }

    /// Entry point for a raw route parameter such as `"99"`.
    pub async fn load_param(&self, raw_post_id: &str) -> Result<PostDetailData, FetchError> {
        let post_id: PostId = raw_post_id.parse()?;
        self.load(post_id).await
    }

    pub async fn load_view(&self, post_id: PostId) -> ViewState<PostDetailData> {
        let started = Instant::now();
        match self.load(post_id).await {
            Ok(data) => {
                info!(
                    post_id = post_id.0,
                    has_author = data.author.is_some(),
                    related = data.related.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "post detail loaded"
                );
                ViewState::Ready(data)
            }
            Err(err) => {
                error!(post_id = post_id.0, "error fetching post: {err}");
                ViewState::Failed(err.into_page_error(Page::PostDetail))
            }
        }
    }

    pub async fn load_param_view(&self, raw_post_id: &str) -> ViewState<PostDetailData> {
        match raw_post_id.parse::<PostId>() {
            Ok(post_id) => self.load_view(post_id).await,
            Err(err) => {
                error!("error fetching post: {err}");
                ViewState::Failed(FetchError::from(err).into_page_error(Page::PostDetail))
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/post_detail_tests.rs"]
mod tests;
