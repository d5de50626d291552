//! Blocking host that runs a `PostClient` against a `Transport` and a `Page`.
//!
//! Requests are executed in the order they were issued, one at a time, until
//! no work remains. Hosts that want overlapping requests drive `PostClient`
//! directly instead.

use std::collections::VecDeque;

use crate::app::{Effect, PostClient, Ticket, UiEvent};
use crate::config::ClientConfig;
use crate::http::{HttpRequest, HttpResponse};
use crate::page::Page;

/// Executes one HTTP round-trip. `Err` means no response was received.
pub trait Transport {
    fn execute(&mut self, request: &HttpRequest) -> Result<HttpResponse, String>;
}

impl<F> Transport for F
where
    F: FnMut(&HttpRequest) -> Result<HttpResponse, String>,
{
    fn execute(&mut self, request: &HttpRequest) -> Result<HttpResponse, String> {
        self(request)
    }
}

pub struct Session<T> {
    client: PostClient,
    page: Page,
    transport: T,
}

impl<T: Transport> Session<T> {
    pub fn new(config: ClientConfig, transport: T) -> Self {
        Self {
            client: PostClient::new(config),
            page: Page::new(),
            transport,
        }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut Page {
        &mut self.page
    }

    pub fn client(&self) -> &PostClient {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Handle `event` and every request it causes, directly or transitively.
    pub fn dispatch(&mut self, event: UiEvent) {
        let effects = self.client.handle(event);
        let mut queue: VecDeque<(Ticket, HttpRequest)> = VecDeque::new();
        self.apply_all(effects, &mut queue);

        while let Some((ticket, request)) = queue.pop_front() {
            let outcome = self.transport.execute(&request);
            let effects = self.client.on_response(ticket, outcome);
            self.apply_all(effects, &mut queue);
        }
    }

    /// Submit the new-post form with whatever its fields currently hold.
    pub fn submit_new_post(&mut self) {
        let form = self.page.new_post_form.clone();
        self.dispatch(UiEvent::SubmitNewPost(form));
    }

    /// Submit the edit form with its current field values. No-op while hidden.
    pub fn submit_edit(&mut self) {
        if let Some(fields) = self.page.edit_form().cloned() {
            self.dispatch(UiEvent::SubmitEdit(fields));
        }
    }

    /// Activate the edit control of the post currently in the detail pane.
    pub fn edit_displayed(&mut self) {
        if let Some(post) = self.page.detail_post().cloned() {
            self.dispatch(UiEvent::BeginEdit(post));
        }
    }

    fn apply_all(&mut self, effects: Vec<Effect>, queue: &mut VecDeque<(Ticket, HttpRequest)>) {
        for effect in effects {
            match effect {
                Effect::Fetch { ticket, request } => queue.push_back((ticket, request)),
                other => self.page.apply(&other),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Region;
    use crate::config::Features;
    use crate::http::HttpMethod;
    use crate::render::DELETED_MESSAGE;
    use crate::types::{NewPost, Post, PostId, PostPatch, PLACEHOLDER_IMAGE};

    const BASE: &str = "http://localhost:3000/posts";

    /// In-memory backend speaking the posts REST contract.
    #[derive(Default)]
    struct FakeBackend {
        posts: Vec<Post>,
        next_id: u64,
        calls: Vec<HttpRequest>,
        offline: bool,
    }

    impl FakeBackend {
        fn seeded(titles: &[&str]) -> Self {
            let posts: Vec<Post> = titles
                .iter()
                .enumerate()
                .map(|(i, title)| Post {
                    id: PostId::Int(i as u64 + 1),
                    title: title.to_string(),
                    author: format!("author of {title}"),
                    content: format!("content of {title}"),
                    image: format!("https://img/{title}.png"),
                })
                .collect();
            Self {
                next_id: posts.len() as u64 + 1,
                posts,
                ..Self::default()
            }
        }

        fn calls_with(&self, method: HttpMethod) -> Vec<&HttpRequest> {
            self.calls.iter().filter(|r| r.method == method).collect()
        }

        fn route(&mut self, request: &HttpRequest) -> HttpResponse {
            let rest = request.path.strip_prefix(BASE).unwrap_or(&request.path);
            let id = rest.strip_prefix('/').map(PostId::from_attr);
            let body = request.body.as_deref().unwrap_or_default();

            match (request.method, id) {
                (HttpMethod::Get, None) => ok_json(&self.posts),
                (HttpMethod::Post, None) => {
                    let draft: NewPost = serde_json::from_str(body).unwrap();
                    let post = Post {
                        id: PostId::Int(self.next_id),
                        title: draft.title,
                        author: draft.author,
                        content: draft.content,
                        image: draft.image,
                    };
                    self.next_id += 1;
                    self.posts.push(post.clone());
                    HttpResponse::new(201, serde_json::to_string(&post).unwrap())
                }
                (method, Some(id)) => {
                    let Some(index) = self.posts.iter().position(|p| p.id == id) else {
                        return HttpResponse::new(404, "");
                    };
                    match method {
                        HttpMethod::Get => ok_json(&self.posts[index]),
                        HttpMethod::Patch => {
                            let patch: PostPatch = serde_json::from_str(body).unwrap();
                            let post = &mut self.posts[index];
                            if let Some(title) = patch.title {
                                post.title = title;
                            }
                            if let Some(content) = patch.content {
                                post.content = content;
                            }
                            ok_json(&self.posts[index])
                        }
                        HttpMethod::Delete => {
                            self.posts.remove(index);
                            HttpResponse::new(200, "{}")
                        }
                        HttpMethod::Post => HttpResponse::new(404, ""),
                    }
                }
                _ => HttpResponse::new(404, ""),
            }
        }
    }

    fn ok_json<T: serde::Serialize>(value: &T) -> HttpResponse {
        HttpResponse::new(200, serde_json::to_string(value).unwrap())
    }

    impl Transport for FakeBackend {
        fn execute(&mut self, request: &HttpRequest) -> Result<HttpResponse, String> {
            self.calls.push(request.clone());
            if self.offline {
                return Err("connection refused".to_string());
            }
            Ok(self.route(request))
        }
    }

    fn session(backend: FakeBackend) -> Session<FakeBackend> {
        Session::new(ClientConfig::default(), backend)
    }

    fn loaded(titles: &[&str]) -> Session<FakeBackend> {
        let mut s = session(FakeBackend::seeded(titles));
        s.dispatch(UiEvent::Load);
        s
    }

    #[test]
    fn load_shows_list_in_order_and_first_detail() {
        let s = loaded(&["A", "B"]);
        assert_eq!(s.page().list_titles(), ["A", "B"]);
        assert_eq!(s.page().list_ids(), ["1", "2"]);
        assert_eq!(s.page().detail_post().map(|p| &p.id), Some(&PostId::Int(1)));
        assert!(s.page().detail_text().contains("content of A"));
    }

    #[test]
    fn list_has_exactly_n_entries() {
        let s = loaded(&["A", "B", "C", "D", "E"]);
        assert_eq!(s.page().list().len(), 5);
        assert_eq!(s.page().list_ids(), ["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn selecting_entry_shows_exactly_that_post() {
        let mut s = loaded(&["A", "B", "C"]);
        s.dispatch(UiEvent::SelectPost(PostId::from_attr("2")));
        let html = s.page().detail_html();
        assert!(html.contains("<h2>B</h2>"));
        assert!(html.contains("src=\"https://img/B.png\""));
        assert!(html.contains("<p>content of B</p>"));
        assert!(html.contains("<strong>Author:</strong> author of B"));
        assert!(!html.contains("content of A"));
    }

    #[test]
    fn new_post_is_created_once_and_prepended() {
        let mut s = loaded(&["A", "B"]);
        s.page_mut().new_post_form.title = "T".to_string();
        s.page_mut().new_post_form.author = "A".to_string();
        s.page_mut().new_post_form.content = "C".to_string();
        s.submit_new_post();

        let posts = s.transport().calls_with(HttpMethod::Post);
        assert_eq!(posts.len(), 1);
        let body: serde_json::Value = serde_json::from_str(posts[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"title": "T", "author": "A", "content": "C", "image": PLACEHOLDER_IMAGE})
        );
        assert_eq!(s.page().list_titles(), ["T", "A", "B"]);
        assert_eq!(s.page().list_ids()[0], "3");
        assert!(s.page().new_post_form.title.is_empty());
    }

    #[test]
    fn edit_changes_only_target_post_and_rerenders() {
        let mut s = loaded(&["A", "B", "C"]);
        s.dispatch(UiEvent::SelectPost(PostId::Int(2)));
        s.edit_displayed();
        assert_eq!(s.page().edit_form().map(|f| f.title.as_str()), Some("B"));

        let fields = s.page_mut().edit_form_mut().unwrap();
        fields.title = "B2".to_string();
        fields.content = "new content".to_string();
        let before = s.transport().calls.len();
        s.submit_edit();

        assert!(s.page().edit_form().is_none());
        let after: Vec<(HttpMethod, String)> = s.transport().calls[before..]
            .iter()
            .map(|r| (r.method, r.path.clone()))
            .collect();
        assert_eq!(
            after,
            [
                (HttpMethod::Patch, format!("{BASE}/2")),
                (HttpMethod::Get, BASE.to_string()),
                (HttpMethod::Get, format!("{BASE}/2")),
            ]
        );
        assert_eq!(s.page().list_titles(), ["A", "B2", "C"]);
        assert!(s.page().detail_html().contains("<h2>B2</h2>"));

        let backend = s.transport();
        assert_eq!(backend.posts[0].title, "A");
        assert_eq!(backend.posts[0].content, "content of A");
        assert_eq!(backend.posts[2].title, "C");
        assert_eq!(backend.posts[1].author, "author of B");
    }

    #[test]
    fn delete_removes_post_and_shows_notice_even_if_not_displayed() {
        let mut s = loaded(&["A", "B"]);
        assert_eq!(s.page().detail_post().map(|p| &p.id), Some(&PostId::Int(1)));
        s.dispatch(UiEvent::Delete(PostId::Int(2)));
        assert_eq!(s.page().list_titles(), ["A"]);
        assert_eq!(s.page().detail_text(), DELETED_MESSAGE);
        assert!(s.page().detail_post().is_none());
    }

    #[test]
    fn reduced_variant_keeps_new_posts_local() {
        let backend = FakeBackend::seeded(&["A"]);
        let config = ClientConfig::default().with_features(Features::reduced());
        let mut s = Session::new(config, backend);
        s.dispatch(UiEvent::Load);
        assert!(s.page().detail_post().is_none());

        s.page_mut().new_post_form = crate::types::NewPostForm {
            title: "Local".to_string(),
            author: "Me".to_string(),
            content: "Body".to_string(),
        };
        s.submit_new_post();
        assert_eq!(s.page().list_ids(), ["new", "1"]);
        assert!(s.transport().calls_with(HttpMethod::Post).is_empty());
        assert_eq!(s.transport().posts.len(), 1);
    }

    #[test]
    fn offline_backend_surfaces_notice() {
        let mut backend = FakeBackend::seeded(&["A"]);
        backend.offline = true;
        let mut s = session(backend);
        s.dispatch(UiEvent::Load);
        assert!(s.page().list().is_empty());
        let notice = s.page().notice(Region::List).unwrap();
        assert!(notice.contains("connection refused"));

        s.dispatch(UiEvent::DismissNotice(Region::List));
        assert!(s.page().notice(Region::List).is_none());
    }

    #[test]
    fn editing_a_deleted_post_reports_not_found() {
        let mut s = loaded(&["A", "B"]);
        s.edit_displayed();
        s.transport.posts.clear();
        s.submit_edit();
        let notice = s.page().notice(Region::EditForm).unwrap();
        assert!(notice.contains("post not found"));
    }

    #[test]
    fn closure_transport_is_accepted() {
        let mut s = Session::new(ClientConfig::default(), |_: &HttpRequest| -> Result<HttpResponse, String> {
            Ok(HttpResponse::new(200, "[]"))
        });
        s.dispatch(UiEvent::Load);
        assert!(s.page().list().is_empty());
        assert_eq!(s.client().in_flight(), 0);
    }
}
