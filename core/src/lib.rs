//! Client core for a posts content-management backend.
//!
//! # Overview
//! Lists, shows, creates, edits and deletes posts over a plain REST API and
//! keeps a rendered list and detail pane in step with the server. Nothing in
//! this crate performs I/O: requests are built as data, responses are fed
//! back in, and view changes come out as `Effect`s for a host to apply.
//!
//! # Design
//! - `PostApi` splits each REST operation into `build_*` and `parse_*`.
//! - `render` turns posts into `view::Node` trees; it reads nothing but its
//!   arguments.
//! - `PostClient` sequences requests and renders in response to `UiEvent`s.
//!   `Features` switches between the full client and the reduced one.
//! - `Page` and `Session` give a blocking, headless host for tests and tools.

pub mod app;
pub mod client;
pub mod config;
pub mod edit;
pub mod error;
pub mod http;
pub mod page;
pub mod render;
pub mod session;
pub mod types;
pub mod view;

pub use app::{Effect, PostClient, Region, Ticket, UiEvent};
pub use client::PostApi;
pub use config::{ClientConfig, Features};
pub use edit::EditForm;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use page::Page;
pub use session::{Session, Transport};
pub use types::{EditFields, NewPost, NewPostForm, Post, PostId, PostPatch, DRAFT_ID, PLACEHOLDER_IMAGE};
pub use view::{Element, Node};
