use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::InvalidPostId;

/// Author name attached to posts that no user claims.
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PostId(pub i64);

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PostId {
    type Err = InvalidPostId;

    /// Route parameters arrive as text; this is the only place they become ids.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        raw.trim()
            .parse::<i64>()
            .map(PostId)
            .map_err(|_| InvalidPostId::new(raw))
    }
}

/// Treats an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub desc: String,
    /// ISO date as sent by the API; formatting is left to the front end.
    #[serde(default, deserialize_with = "null_as_default")]
    pub date: String,
}

impl Post {
    /// Body text split into display paragraphs, one per line.
    pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
        self.desc.split('\n')
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub age: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub posts: Vec<PostId>,
}

impl User {
    pub fn owns_post(&self, post_id: PostId) -> bool {
        self.posts.contains(&post_id)
    }

    pub fn post_count(&self) -> usize {
        self.posts.len()
    }

    /// Upper-cased first letter of the name, used as a compact avatar.
    pub fn initial(&self) -> Option<char> {
        self.name.chars().next().and_then(|c| c.to_uppercase().next())
    }

    /// First letter of every space separated name part, upper-cased.
    pub fn initials(&self) -> String {
        self.name
            .split(' ')
            .filter_map(|part| part.chars().next())
            .collect::<String>()
            .to_uppercase()
    }
}

/// A post joined with the display name of the user that lists it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthoredPost {
    #[serde(flatten)]
    pub post: Post,
    pub author: String,
}

impl AuthoredPost {
    pub fn id(&self) -> PostId {
        self.post.id
    }
}
