//! Text and JSON views of the three pages.
//!
//! Each page is first reduced to a serializable model borrowing from the
//! loaded data (search applied, featured post split off), then either printed
//! as plain text or dumped as JSON.

use std::fmt;

use chrono::{DateTime, NaiveDate};
use client_core::{
    author_list::{filter_authors, recent_posts, RECENT_POSTS_SHOWN},
    post_list::split_featured,
    PostDetailData, PostListData, SearchTerm, ViewState,
};
use serde::Serialize;
use shared::{
    domain::{AuthoredPost, Post, User},
    error::ApiError,
    protocol::Route,
};

pub const LIST_READ_TIME: &str = "5 min read";
pub const DETAIL_READ_TIME: &str = "8 min read";

fn parse_date(raw: &str) -> Option<NaiveDate> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .ok()
        .or_else(|| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
}

/// `1/15/2024`, or the raw value when it is not a date.
pub fn short_date(raw: &str) -> String {
    parse_date(raw)
        .map(|date| date.format("%-m/%-d/%Y").to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// `January 15, 2024`, or the raw value when it is not a date.
pub fn long_date(raw: &str) -> String {
    parse_date(raw)
        .map(|date| date.format("%B %-d, %Y").to_string())
        .unwrap_or_else(|| raw.to_string())
}

#[derive(Debug, Serialize)]
pub struct HomePage<'a> {
    pub search: &'a str,
    pub matches: usize,
    pub featured: Option<&'a AuthoredPost>,
    pub rest: Vec<&'a AuthoredPost>,
    pub popular_authors: &'a [User],
}

impl<'a> HomePage<'a> {
    pub fn build(data: &'a PostListData, search: &'a str, popular_authors: usize) -> Self {
        let filtered = data.filter(&SearchTerm::new(search));
        let split = split_featured(&filtered);
        Self {
            search,
            matches: filtered.len(),
            featured: split.featured.copied(),
            rest: split.rest.to_vec(),
            popular_authors: data.popular_authors(popular_authors),
        }
    }
}

impl fmt::Display for HomePage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Welcome to TravelBlog")?;
        if !self.search.is_empty() {
            writeln!(f, "Search: {:?}", self.search)?;
        }
        let noun = if self.matches == 1 { "story" } else { "stories" };
        writeln!(f, "{} {noun}", self.matches)?;
        writeln!(f)?;

        match self.featured {
            None => {
                writeln!(f, "No posts found")?;
                writeln!(f, "Try adjusting your search terms")?;
            }
            Some(featured) => {
                writeln!(f, "== Featured Story ==")?;
                writeln!(
                    f,
                    "[Featured] {}  {}",
                    short_date(&featured.post.date),
                    featured.post.title
                )?;
                writeln!(f, "  {}", featured.post.desc)?;
                writeln!(f, "  by {}  -> {}", featured.author, post_link(&featured.post))?;
            }
        }

        if !self.rest.is_empty() {
            writeln!(f)?;
            writeln!(f, "== Latest Stories ==")?;
            for post in &self.rest {
                writeln!(
                    f,
                    "{}  {}  ({LIST_READ_TIME})",
                    short_date(&post.post.date),
                    post.post.title
                )?;
                writeln!(f, "  by {}  -> {}", post.author, post_link(&post.post))?;
            }
        }

        if !self.popular_authors.is_empty() {
            writeln!(f)?;
            writeln!(f, "== Popular Authors ==")?;
            for user in self.popular_authors {
                writeln!(
                    f,
                    "[{}] {} - {} posts",
                    user.initial().unwrap_or(' '),
                    user.name,
                    user.post_count()
                )?;
            }
            writeln!(f, "View All Authors -> {}", Route::Authors)?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct AuthorsPage<'a> {
    pub search: &'a str,
    pub authors: Vec<&'a User>,
}

impl<'a> AuthorsPage<'a> {
    pub fn build(users: &'a [User], search: &'a str) -> Self {
        Self {
            search,
            authors: filter_authors(users, &SearchTerm::new(search)),
        }
    }
}

impl fmt::Display for AuthorsPage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Our Authors")?;
        if !self.search.is_empty() {
            writeln!(f, "Search: {:?}", self.search)?;
        }
        writeln!(f)?;

        if self.authors.is_empty() {
            writeln!(f, "No authors found")?;
            return writeln!(f, "Try adjusting your search terms");
        }

        let noun = if self.authors.len() == 1 { "Author" } else { "Authors" };
        writeln!(f, "{} Talented {noun}", self.authors.len())?;
        for user in &self.authors {
            writeln!(f)?;
            writeln!(f, "[{}] {} (Age {})", user.initials(), user.name, user.age)?;
            writeln!(f, "  Travel Writer & Storyteller")?;
            writeln!(f, "  email: {}", user.email)?;
            writeln!(f, "  phone: {}", user.phone)?;
            writeln!(f, "  {} articles published", user.post_count())?;

            let (shown, hidden) = recent_posts(user, RECENT_POSTS_SHOWN);
            if !shown.is_empty() {
                let ids: Vec<String> = shown.iter().map(|id| format!("#{id}")).collect();
                write!(f, "  Recent Articles: {}", ids.join(" "))?;
                if hidden > 0 {
                    write!(f, " +{hidden} more")?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct PostPage<'a> {
    #[serde(flatten)]
    pub data: &'a PostDetailData,
}

impl<'a> PostPage<'a> {
    pub fn build(data: &'a PostDetailData) -> Self {
        Self { data }
    }
}

impl fmt::Display for PostPage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let PostDetailData {
            post,
            author,
            related,
        } = self.data;
        writeln!(f, "<- Back to Home ({})", Route::Home)?;
        writeln!(f)?;
        writeln!(f, "Travel Story | {} | {DETAIL_READ_TIME}", long_date(&post.date))?;
        writeln!(f, "{}", post.title)?;
        if let Some(author) = author {
            writeln!(
                f,
                "[{}] {} - Travel Writer, Age {}",
                author.initial().unwrap_or(' '),
                author.name,
                author.age
            )?;
        }
        writeln!(f)?;
        for paragraph in post.paragraphs() {
            writeln!(f, "{paragraph}")?;
        }

        let Some(author) = author else {
            return Ok(());
        };
        if !related.is_empty() {
            writeln!(f)?;
            writeln!(f, "== More from {} ==", author.name)?;
            for related_post in related {
                writeln!(f, "{}  -> {}", related_post.title, post_link(related_post))?;
                writeln!(f, "  {}", related_post.desc)?;
            }
        }

        writeln!(f)?;
        writeln!(f, "== About the Author ==")?;
        writeln!(f, "{}", author.name)?;
        writeln!(f, "  email: {}", author.email)?;
        writeln!(f, "  phone: {}", author.phone)?;
        writeln!(f, "  {} articles published", author.post_count())?;
        writeln!(f, "View Profile -> {}", Route::Authors)
    }
}

fn post_link(post: &Post) -> Route {
    Route::Post(post.id)
}

fn render_state<T>(
    state: &ViewState<T>,
    loading: &str,
    failed: impl FnOnce(&ApiError) -> String,
    ready: impl FnOnce(&T) -> String,
) -> String {
    match state {
        ViewState::Idle | ViewState::Loading => format!("{loading}\n"),
        ViewState::Failed(err) => failed(err),
        ViewState::Ready(data) => ready(data),
    }
}

fn try_again(err: &ApiError) -> String {
    format!("{}\n[Try Again]\n", err.message)
}

pub fn render_home(state: &ViewState<PostListData>, search: &str, popular_authors: usize) -> String {
    render_state(state, "Loading posts...", try_again, |data| {
        HomePage::build(data, search, popular_authors).to_string()
    })
}

pub fn render_authors(state: &ViewState<Vec<User>>, search: &str) -> String {
    render_state(state, "Loading authors...", try_again, |users| {
        AuthorsPage::build(users, search).to_string()
    })
}

pub fn render_post(state: &ViewState<PostDetailData>) -> String {
    render_state(
        state,
        "Loading post...",
        |err| format!("<- Back to Home ({})\n{}\n", Route::Home, err.message),
        |data| PostPage::build(data).to_string(),
    )
}

pub fn home_json(
    state: &ViewState<PostListData>,
    search: &str,
    popular_authors: usize,
) -> serde_json::Result<String> {
    serde_json::to_string_pretty(
        &state
            .as_ref()
            .map(|data| HomePage::build(data, search, popular_authors)),
    )
}

pub fn authors_json(state: &ViewState<Vec<User>>, search: &str) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&state.as_ref().map(|users| AuthorsPage::build(users, search)))
}

pub fn post_json(state: &ViewState<PostDetailData>) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&state.as_ref().map(PostPage::build))
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
