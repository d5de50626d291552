//! Stateless HTTP request builder and response parser for the posts API.
//!
//! # Design
//! `PostApi` holds only the collection URL and carries no mutable state
//! between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. The caller executes the actual HTTP round-trip.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{NewPost, Post, PostId, PostPatch};

/// Synchronous, stateless accessor for the post collection.
#[derive(Debug, Clone)]
pub struct PostApi {
    collection_url: String,
}

impl PostApi {
    /// `collection_url` is the full URL of the collection, e.g.
    /// `http://localhost:3000/posts`.
    pub fn new(collection_url: &str) -> Self {
        Self {
            collection_url: collection_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn build_list_posts(&self) -> HttpRequest {
        self.bare(HttpMethod::Get, self.collection_url.clone())
    }

    pub fn build_get_post(&self, id: &PostId) -> HttpRequest {
        self.bare(HttpMethod::Get, self.member_url(id))
    }

    pub fn build_create_post(&self, draft: &NewPost) -> Result<HttpRequest, ApiError> {
        self.with_json(HttpMethod::Post, self.collection_url.clone(), draft)
    }

    pub fn build_update_post(&self, id: &PostId, patch: &PostPatch) -> Result<HttpRequest, ApiError> {
        self.with_json(HttpMethod::Patch, self.member_url(id), patch)
    }

    pub fn build_delete_post(&self, id: &PostId) -> HttpRequest {
        self.bare(HttpMethod::Delete, self.member_url(id))
    }

    pub fn parse_list_posts(&self, response: HttpResponse) -> Result<Vec<Post>, ApiError> {
        decode(response)
    }

    pub fn parse_get_post(&self, response: HttpResponse) -> Result<Post, ApiError> {
        decode(response)
    }

    pub fn parse_create_post(&self, response: HttpResponse) -> Result<Post, ApiError> {
        decode(response)
    }

    pub fn parse_update_post(&self, response: HttpResponse) -> Result<Post, ApiError> {
        decode(response)
    }

    /// The response body is ignored; servers answer either 204 or 200 with `{}`.
    pub fn parse_delete_post(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    fn member_url(&self, id: &PostId) -> String {
        format!("{}/{id}", self.collection_url)
    }

    fn bare(&self, method: HttpMethod, path: String) -> HttpRequest {
        HttpRequest {
            method,
            path,
            headers: Vec::new(),
            body: None,
        }
    }

    fn with_json<T: Serialize>(
        &self,
        method: HttpMethod,
        path: String,
        payload: &T,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(payload).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method,
            path,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::Http {
        status: response.status,
        body: response.body.clone(),
    })
}

fn decode<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::Decode(e.to_string()))
}
