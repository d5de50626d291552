use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with, Post, PostId};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

fn seeded() -> axum::Router {
    app_with(vec![
        Post {
            id: PostId::Int(1),
            title: "A".to_string(),
            author: "Ann".to_string(),
            content: "first".to_string(),
            image: "a.png".to_string(),
        },
        Post {
            id: PostId::Text("b2".to_string()),
            title: "B".to_string(),
            author: "Bob".to_string(),
            content: "second".to_string(),
            image: "b.png".to_string(),
        },
    ])
}

// --- list ---

#[tokio::test]
async fn list_posts_empty() {
    let resp = app().oneshot(empty_request("GET", "/posts")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let posts: Vec<Post> = body_json(resp).await;
    assert!(posts.is_empty());
}

#[tokio::test]
async fn list_posts_keeps_seed_order() {
    let resp = seeded().oneshot(empty_request("GET", "/posts")).await.unwrap();

    let posts: Vec<Post> = body_json(resp).await;
    let titles: Vec<&str> = posts.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, ["A", "B"]);
}

// --- create ---

#[tokio::test]
async fn create_post_returns_201_with_id() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/posts",
            r#"{"title":"T","author":"A","content":"C","image":"i.png"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let post: Post = body_json(resp).await;
    assert_eq!(post.id, PostId::Int(1));
    assert_eq!(post.title, "T");
    assert_eq!(post.image, "i.png");
}

#[tokio::test]
async fn create_post_continues_after_seeded_ids() {
    let resp = seeded()
        .oneshot(json_request("POST", "/posts", r#"{"title":"C"}"#))
        .await
        .unwrap();

    let post: Post = body_json(resp).await;
    assert_eq!(post.id, PostId::Int(2));
}

#[tokio::test]
async fn create_post_without_title_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/posts", r#"{"author":"A"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// --- get ---

#[tokio::test]
async fn get_post_by_text_id() {
    let resp = seeded().oneshot(empty_request("GET", "/posts/b2")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let post: Post = body_json(resp).await;
    assert_eq!(post.author, "Bob");
}

#[tokio::test]
async fn get_post_not_found() {
    let resp = seeded().oneshot(empty_request("GET", "/posts/99")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- update ---

#[tokio::test]
async fn patch_post_changes_only_given_fields() {
    let resp = seeded()
        .oneshot(json_request("PATCH", "/posts/1", r#"{"title":"A2"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let post: Post = body_json(resp).await;
    assert_eq!(post.title, "A2");
    assert_eq!(post.content, "first");
    assert_eq!(post.author, "Ann");
}

#[tokio::test]
async fn patch_post_not_found() {
    let resp = app()
        .oneshot(json_request("PATCH", "/posts/1", r#"{"title":"Nope"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn put_post_replaces_every_field() {
    let resp = seeded()
        .oneshot(json_request("PUT", "/posts/1", r#"{"title":"Z"}"#))
        .await
        .unwrap();

    let post: Post = body_json(resp).await;
    assert_eq!(post.title, "Z");
    assert!(post.author.is_empty());
    assert!(post.content.is_empty());
}

// --- delete ---

#[tokio::test]
async fn delete_post_not_found() {
    let resp = app().oneshot(empty_request("DELETE", "/posts/1")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- cors ---

#[tokio::test]
async fn preflight_is_answered_with_cors_headers() {
    let resp = app()
        .oneshot(empty_request("OPTIONS", "/posts/1"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        resp.headers()[http::header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
    assert!(resp.headers()[http::header::ACCESS_CONTROL_ALLOW_METHODS]
        .to_str()
        .unwrap()
        .contains("PATCH"));
}

#[tokio::test]
async fn regular_responses_allow_any_origin() {
    let resp = app().oneshot(empty_request("GET", "/posts")).await.unwrap();

    assert_eq!(
        resp.headers()[http::header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}

// --- full CRUD lifecycle ---

#[tokio::test]
async fn crud_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // create two
    let mut ids = Vec::new();
    for title in ["First", "Second"] {
        let resp = ServiceExt::ready(&mut app)
            .await
            .unwrap()
            .call(json_request(
                "POST",
                "/posts",
                &format!(r#"{{"title":"{title}","author":"Ann","content":"body","image":"i"}}"#),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: Post = body_json(resp).await;
        ids.push(created.id);
    }
    assert_eq!(ids, [PostId::Int(1), PostId::Int(2)]);

    // list — insertion order
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", "/posts"))
        .await
        .unwrap();
    let posts: Vec<Post> = body_json(resp).await;
    let titles: Vec<&str> = posts.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, ["First", "Second"]);

    // patch the second
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("PATCH", "/posts/2", r#"{"content":"edited"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Post = body_json(resp).await;
    assert_eq!(updated.title, "Second"); // unchanged
    assert_eq!(updated.content, "edited");

    // delete the first
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("DELETE", "/posts/1"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_bytes(resp).await;
    assert_eq!(&body[..], b"{}");

    // get after delete — 404
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", "/posts/1"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // list after delete — only the second remains
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", "/posts"))
        .await
        .unwrap();
    let posts: Vec<Post> = body_json(resp).await;
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].id, PostId::Int(2));
    assert_eq!(posts[0].content, "edited");
}
