//! Client configuration.
//!
//! Everything has a default matching the local development backend, so a
//! host only overrides what differs. The struct deserializes from JSON with
//! any subset of fields present.

use serde::Deserialize;

use crate::types::PLACEHOLDER_IMAGE;

/// Toggles separating the full client from the reduced one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Features {
    /// Show edit controls in the detail pane and accept edit submissions.
    pub edit: bool,
    /// Show delete controls in the detail pane and accept deletions.
    pub delete: bool,
    /// Display the first post's detail once the initial list arrives.
    pub initial_detail: bool,
    /// Send new posts to the backend instead of only rendering them locally.
    pub persist_new_posts: bool,
}

impl Features {
    pub const fn full() -> Self {
        Self {
            edit: true,
            delete: true,
            initial_detail: true,
            persist_new_posts: true,
        }
    }

    pub const fn reduced() -> Self {
        Self {
            edit: false,
            delete: false,
            initial_detail: false,
            persist_new_posts: false,
        }
    }
}

impl Default for Features {
    fn default() -> Self {
        Self::full()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Server origin, e.g. `http://localhost:3000`.
    pub base_url: String,
    /// Collection path segment appended to `base_url`.
    pub collection: String,
    /// Image given to every post created from the new-post form.
    pub placeholder_image: String,
    pub features: Features,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            ..Self::default()
        }
    }

    pub fn with_features(mut self, features: Features) -> Self {
        self.features = features;
        self
    }

    /// Full URL of the post collection, without a trailing slash.
    pub fn collection_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        let collection = self.collection.trim_matches('/');
        if collection.is_empty() {
            base.to_string()
        } else {
            format!("{base}/{collection}")
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            collection: "posts".to_string(),
            placeholder_image: PLACEHOLDER_IMAGE.to_string(),
            features: Features::full(),
        }
    }
}
