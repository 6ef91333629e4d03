use std::{sync::Arc, time::Instant};

use shared::{
    domain::{PostId, User},
    protocol::Page,
};
use tracing::{error, info};

use crate::{error::FetchError, search::SearchTerm, view_state::ViewState, BlogApi};

/// Post ids listed on an author card.
pub const RECENT_POSTS_SHOWN: usize = 4;

pub fn filter_authors<'a>(
    users: impl IntoIterator<Item = &'a User>,
    term: &SearchTerm,
) -> Vec<&'a User> {
    users
        .into_iter()
        .filter(|user| term.matches_any([user.name.as_str(), user.email.as_str()]))
        .collect()
}

/// The first `limit` post ids of a user and how many were left out.
pub fn recent_posts(user: &User, limit: usize) -> (&[PostId], usize) {
    let shown = &user.posts[..user.posts.len().min(limit)];
    (shown, user.posts.len() - shown.len())
}

pub struct AuthorListAggregator {
    api: Arc<dyn BlogApi>,
}

impl AuthorListAggregator {
    pub fn new(api: Arc<dyn BlogApi>) -> Self {
        Self { api }
    }

    pub async fn load(&self) -> Result<Vec<User>, FetchError> {
        self.api.list_users().await
    }

    pub async fn load_view(&self) -> ViewState<Vec<User>> {
        let started = Instant::now();
        match self.load().await {
            Ok(users) => {
                info!(
                    users = users.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "author list loaded"
                );
                ViewState::Ready(users)
            }
            Err(err) => {
                error!("error fetching users: {err}");
                ViewState::Failed(err.into_page_error(Page::Authors))
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/author_list_tests.rs"]
mod tests;
