//! Home page: every post joined with its author, searchable, with the first match featured.

use std::{collections::HashMap, sync::Arc, time::Instant};

use serde::Serialize;
use shared::{
    domain::{AuthoredPost, Post, PostId, User, UNKNOWN_AUTHOR},
    protocol::Page,
};
use tracing::{error, info};

use crate::{error::FetchError, search::SearchTerm, view_state::ViewState, BlogApi};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostListData {
    pub posts: Vec<AuthoredPost>,
    pub users: Vec<User>,
}

impl PostListData {
    pub fn filter(&self, term: &SearchTerm) -> Vec<&AuthoredPost> {
        filter_posts(&self.posts, term)
    }

    /// Users shown in the sidebar, in fetch order.
    pub fn popular_authors(&self, limit: usize) -> &[User] {
        &self.users[..self.users.len().min(limit)]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeaturedSplit<'a, T> {
    pub featured: Option<&'a T>,
    pub rest: &'a [T],
}

/// Maps every claimed post id to its author. When several users list the
/// same id, the earliest user in fetch order keeps it.
pub fn author_lookup(users: &[User]) -> HashMap<PostId, &str> {
    let mut lookup = HashMap::new();
    for user in users {
        for post_id in &user.posts {
            lookup.entry(*post_id).or_insert(user.name.as_str());
        }
    }
    lookup
}

pub fn attach_authors(posts: Vec<Post>, users: &[User]) -> Vec<AuthoredPost> {
    let lookup = author_lookup(users);
    posts
        .into_iter()
        .map(|post| {
            let author = lookup
                .get(&post.id)
                .copied()
                .unwrap_or(UNKNOWN_AUTHOR)
                .to_string();
            AuthoredPost { post, author }
        })
        .collect()
}

pub fn filter_posts<'a>(
    posts: impl IntoIterator<Item = &'a AuthoredPost>,
    term: &SearchTerm,
) -> Vec<&'a AuthoredPost> {
    posts
        .into_iter()
        .filter(|post| {
            term.matches_any([
                post.post.title.as_str(),
                post.post.desc.as_str(),
                post.author.as_str(),
            ])
        })
        .collect()
}

pub fn split_featured<T>(items: &[T]) -> FeaturedSplit<'_, T> {
    match items.split_first() {
        Some((featured, rest)) => FeaturedSplit {
            featured: Some(featured),
            rest,
        },
        None => FeaturedSplit {
            featured: None,
            rest: &[],
        },
    }
}

pub struct PostListAggregator {
    api: Arc<dyn BlogApi>,
}

impl PostListAggregator {
    pub fn new(api: Arc<dyn BlogApi>) -> Self {
        Self { api }
    }

    /// Fetches posts and users together; either failing fails the page.
    pub async fn load(&self) -> Result<PostListData, FetchError> {
        let (posts, users) = futures::try_join!(self.api.list_posts(), self.api.list_users())?;
        let posts = attach_authors(posts, &users);
        Ok(PostListData { posts, users })
    }

    pub async fn load_view(&self) -> ViewState<PostListData> {
        let started = Instant::now();
        match self.load().await {
            Ok(data) => {
                info!(
                    posts = data.posts.len(),
                    users = data.users.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "post list loaded"
                );
                ViewState::Ready(data)
            }
            Err(err) => {
                error!("error fetching posts: {err}");
                ViewState::Failed(err.into_page_error(Page::Home))
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/post_list_tests.rs"]
mod tests;
