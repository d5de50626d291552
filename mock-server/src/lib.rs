use std::path::Path as FsPath;
use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;

/// Ids are whatever the seed file used; new posts get the next free integer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PostId {
    Int(u64),
    Text(String),
}

impl PostId {
    fn matches(&self, raw: &str) -> bool {
        match self {
            PostId::Int(n) => n.to_string() == raw,
            PostId::Text(s) => s == raw,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
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

/// Body of POST and PUT requests.
#[derive(Deserialize)]
pub struct PostInput {
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub image: String,
}

/// Body of PATCH requests.
#[derive(Deserialize)]
pub struct PostChanges {
    pub title: Option<String>,
    pub author: Option<String>,
    pub content: Option<String>,
    pub image: Option<String>,
}

/// Posts in insertion order plus the next id to hand out.
#[derive(Debug, Default)]
pub struct Store {
    posts: Vec<Post>,
    next_id: u64,
}

impl Store {
    pub fn new(posts: Vec<Post>) -> Self {
        let next_id = posts
            .iter()
            .filter_map(|p| match p.id {
                PostId::Int(n) => Some(n),
                PostId::Text(_) => None,
            })
            .max()
            .map_or(1, |max| max + 1);
        Self { posts, next_id }
    }

    fn position(&self, raw: &str) -> Option<usize> {
        self.posts.iter().position(|p| p.id.matches(raw))
    }
}

pub type Db = Arc<RwLock<Store>>;

/// Shape of a json-server style `db.json`.
#[derive(Deserialize)]
#[serde(untagged)]
enum Seed {
    Document { posts: Vec<Post> },
    Bare(Vec<Post>),
}

/// Read seed posts from either `{"posts": [...]}` or a bare array.
pub fn load_seed(path: impl AsRef<FsPath>) -> Result<Vec<Post>, std::io::Error> {
    let raw = std::fs::read_to_string(path)?;
    parse_seed(&raw)
}

pub fn parse_seed(raw: &str) -> Result<Vec<Post>, std::io::Error> {
    let seed: Seed = serde_json::from_str(raw)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    Ok(match seed {
        Seed::Document { posts } | Seed::Bare(posts) => posts,
    })
}

pub fn app() -> Router {
    app_with(Vec::new())
}

pub fn app_with(posts: Vec<Post>) -> Router {
    let db: Db = Arc::new(RwLock::new(Store::new(posts)));
    Router::new()
        .route("/posts", get(list_posts).post(create_post))
        .route(
            "/posts/{id}",
            get(get_post)
                .patch(update_post)
                .put(replace_post)
                .delete(delete_post),
        )
        .layer(middleware::from_fn(cors))
        .with_state(db)
}

pub async fn run_with(listener: TcpListener, posts: Vec<Post>) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(posts)).await
}

/// Lets a page served from another origin call the API, preflight included.
async fn cors(request: Request, next: Next) -> Response {
    debug!(method = %request.method(), uri = %request.uri(), "request");
    let mut response = if *request.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(request).await
    };
    let headers = response.headers_mut();
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, PUT, PATCH, DELETE, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("content-type"),
    );
    response
}

async fn list_posts(State(db): State<Db>) -> Json<Vec<Post>> {
    Json(db.read().await.posts.clone())
}

async fn create_post(
    State(db): State<Db>,
    Json(input): Json<PostInput>,
) -> (StatusCode, Json<Post>) {
    let mut store = db.write().await;
    let post = Post {
        id: PostId::Int(store.next_id),
        title: input.title,
        author: input.author,
        content: input.content,
        image: input.image,
    };
    store.next_id += 1;
    store.posts.push(post.clone());
    (StatusCode::CREATED, Json(post))
}

async fn get_post(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<Post>, StatusCode> {
    let store = db.read().await;
    let index = store.position(&id).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(store.posts[index].clone()))
}

async fn update_post(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<PostChanges>,
) -> Result<Json<Post>, StatusCode> {
    let mut store = db.write().await;
    let index = store.position(&id).ok_or(StatusCode::NOT_FOUND)?;
    let post = &mut store.posts[index];
    if let Some(title) = input.title {
        post.title = title;
    }
    if let Some(author) = input.author {
        post.author = author;
    }
    if let Some(content) = input.content {
        post.content = content;
    }
    if let Some(image) = input.image {
        post.image = image;
    }
    Ok(Json(post.clone()))
}

async fn replace_post(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<PostInput>,
) -> Result<Json<Post>, StatusCode> {
    let mut store = db.write().await;
    let index = store.position(&id).ok_or(StatusCode::NOT_FOUND)?;
    let post = &mut store.posts[index];
    post.title = input.title;
    post.author = input.author;
    post.content = input.content;
    post.image = input.image;
    Ok(Json(post.clone()))
}

async fn delete_post(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let mut store = db.write().await;
    let index = store.position(&id).ok_or(StatusCode::NOT_FOUND)?;
    store.posts.remove(index);
    Ok(Json(serde_json::json!({})))
}
