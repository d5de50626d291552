//! Domain DTOs for the posts API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently.
//! Post identifiers are opaque: the backend may hand out integers or strings,
//! and the client never invents one except for locally rendered drafts.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Image attached to every post created from the new-post form.
pub const PLACEHOLDER_IMAGE: &str = "https://c7.alamy.com/comp/RGH3WX/new-blog-post-sign-on-a-wooden-desk-with-a-stylish-living-room-on-a-blurry-background-RGH3WX.jpg";

/// Identifier shown on a draft that was rendered without a server round-trip.
pub const DRAFT_ID: &str = "new";

/// Server-assigned post identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum PostId {
    Int(u64),
    Text(String),
}

impl PostId {
    /// Recover an id from its rendered `data-id` attribute.
    ///
    /// All-digit values come back as integers so they compare equal to the
    /// ids decoded from JSON numbers.
    pub fn from_attr(value: &str) -> Self {
        match value.parse::<u64>() {
            Ok(n) if n.to_string() == value => PostId::Int(n),
            _ => PostId::Text(value.to_string()),
        }
    }

    pub fn draft() -> Self {
        PostId::Text(DRAFT_ID.to_string())
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostId::Int(n) => write!(f, "{n}"),
            PostId::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for PostId {
    fn from(n: u64) -> Self {
        PostId::Int(n)
    }
}

impl From<&str> for PostId {
    fn from(s: &str) -> Self {
        PostId::Text(s.to_string())
    }
}

/// A single post returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub image: String,
}

/// Request payload for creating a post. Has no id until the server assigns one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub author: String,
    pub content: String,
    pub image: String,
}

impl NewPost {
    /// Render-ready stand-in for a draft that never reached the server.
    pub fn into_local_post(self) -> Post {
        Post {
            id: PostId::draft(),
            title: self.title,
            author: self.author,
            content: self.content,
            image: self.image,
        }
    }
}

/// Request payload for updating an existing post. Only the fields present in
/// the JSON are applied; omitted fields remain unchanged on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Values read from the new-post form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewPostForm {
    pub title: String,
    pub author: String,
    pub content: String,
}

/// Values read from the edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditFields {
    pub title: String,
    pub content: String,
}
