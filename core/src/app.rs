//! Event orchestration for the post client.
//!
//! # Design
//! `PostClient` is a sans-IO state machine. A host feeds it `UiEvent`s and
//! receives `Effect`s back. `Effect::Fetch` asks the host to execute a
//! request and report the outcome through `on_response` with the same
//! ticket; every other effect is a view mutation the host applies as-is.
//!
//! Tickets increase monotonically. A detail response is only rendered when
//! no newer detail fetch has been issued since, so the detail pane follows
//! the last selection rather than the last network reply. List responses
//! are ordered the same way against newer list fetches.

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, warn};

use crate::client::PostApi;
use crate::config::ClientConfig;
use crate::edit::EditForm;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::render;
use crate::types::{EditFields, NewPost, NewPostForm, Post, PostId};
use crate::view::Node;

/// Correlates a `Fetch` effect with its response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Page area a notice is shown next to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    List,
    Detail,
    NewPostForm,
    EditForm,
}

/// User-driven input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Load,
    SelectPost(PostId),
    SubmitNewPost(NewPostForm),
    BeginEdit(Post),
    SubmitEdit(EditFields),
    CancelEdit,
    Delete(PostId),
    DismissNotice(Region),
}

/// Work for the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Fetch { ticket: Ticket, request: HttpRequest },
    /// Replace every child of the list container.
    ReplaceList(Vec<Node>),
    /// Insert before the first child of the list container.
    PrependEntry(Node),
    /// Overwrite the detail container. `post` is the post now on display, if any.
    ReplaceDetail { post: Option<Post>, nodes: Vec<Node> },
    ShowEditForm(EditFields),
    HideEditForm,
    ResetNewPostForm,
    ShowNotice { region: Region, notice: Node },
    ClearNotice(Region),
}

#[derive(Debug)]
enum Pending {
    List { show_first: bool },
    Detail,
    Create,
    Update { id: PostId },
    Delete { id: PostId },
}

impl Pending {
    fn region(&self) -> Region {
        match self {
            Pending::List { .. } => Region::List,
            Pending::Detail | Pending::Delete { .. } => Region::Detail,
            Pending::Create => Region::NewPostForm,
            Pending::Update { .. } => Region::EditForm,
        }
    }
}

pub struct PostClient {
    api: PostApi,
    config: ClientConfig,
    edit: EditForm,
    next_ticket: u64,
    pending: HashMap<Ticket, Pending>,
    /// Detail responses with a ticket below this are stale.
    detail_floor: Ticket,
    /// List responses with a ticket below this are stale.
    list_floor: Ticket,
}

impl PostClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            api: PostApi::new(&config.collection_url()),
            config,
            edit: EditForm::default(),
            next_ticket: 0,
            pending: HashMap::new(),
            detail_floor: Ticket(0),
            list_floor: Ticket(0),
        }
    }

    pub fn edit_form(&self) -> &EditForm {
        &self.edit
    }

    /// Number of requests handed out and not yet answered.
    pub fn in_flight(&self) -> usize {
        self.pending.len()
    }

    pub fn handle(&mut self, event: UiEvent) -> Vec<Effect> {
        debug!(?event, "handling ui event");
        match event {
            UiEvent::Load => {
                let show_first = self.config.features.initial_detail;
                vec![self.fetch_list(show_first)]
            }
            UiEvent::SelectPost(id) => vec![self.fetch_detail(&id)],
            UiEvent::SubmitNewPost(form) => self.submit_new_post(form),
            UiEvent::BeginEdit(post) => {
                if !self.config.features.edit {
                    debug!("edit disabled, ignoring");
                    return Vec::new();
                }
                vec![Effect::ShowEditForm(self.edit.open(&post))]
            }
            UiEvent::SubmitEdit(fields) => self.submit_edit(fields),
            UiEvent::CancelEdit => {
                self.edit.cancel();
                vec![Effect::HideEditForm]
            }
            UiEvent::Delete(id) => {
                if !self.config.features.delete {
                    debug!("delete disabled, ignoring");
                    return Vec::new();
                }
                let request = self.api.build_delete_post(&id);
                vec![self.issue(request, Pending::Delete { id })]
            }
            UiEvent::DismissNotice(region) => vec![Effect::ClearNotice(region)],
        }
    }

    /// Report the outcome of a `Fetch`. `Err` carries a transport failure.
    pub fn on_response(&mut self, ticket: Ticket, outcome: Result<HttpResponse, String>) -> Vec<Effect> {
        let Some(pending) = self.pending.remove(&ticket) else {
            warn!(%ticket, "response for unknown ticket");
            return Vec::new();
        };

        match pending {
            Pending::Detail if ticket < self.detail_floor => {
                debug!(%ticket, floor = %self.detail_floor, "discarding stale detail response");
                return Vec::new();
            }
            Pending::List { .. } if ticket < self.list_floor => {
                debug!(%ticket, floor = %self.list_floor, "discarding stale list response");
                return Vec::new();
            }
            _ => {}
        }

        let region = pending.region();
        let response = match outcome {
            Ok(response) => response,
            Err(reason) => return fail(region, ApiError::Network(reason)),
        };

        match self.complete(pending, response) {
            Ok(effects) => effects,
            Err(err) => fail(region, err),
        }
    }

    fn complete(&mut self, pending: Pending, response: HttpResponse) -> Result<Vec<Effect>, ApiError> {
        match pending {
            Pending::List { show_first } => {
                let posts = self.api.parse_list_posts(response)?;
                let mut effects = vec![Effect::ReplaceList(render::post_list(&posts))];
                if show_first {
                    if let Some(first) = posts.first() {
                        effects.push(self.fetch_detail(&first.id));
                    }
                }
                Ok(effects)
            }
            Pending::Detail => {
                let post = self.api.parse_get_post(response)?;
                let nodes = render::post_detail(&post, &self.config.features);
                Ok(vec![Effect::ReplaceDetail {
                    post: Some(post),
                    nodes,
                }])
            }
            Pending::Create => {
                let post = self.api.parse_create_post(response)?;
                let mut effects = vec![Effect::PrependEntry(render::list_entry(&post))];
                // A list read still in flight may predate this post.
                if let Some(show_first) = self.outstanding_list() {
                    effects.push(self.fetch_list(show_first));
                }
                Ok(effects)
            }
            Pending::Update { id } => {
                self.api.parse_update_post(response)?;
                Ok(vec![self.fetch_list(false), self.fetch_detail(&id)])
            }
            Pending::Delete { id } => {
                self.api.parse_delete_post(response)?;
                // Outstanding detail fetches must not overwrite the notice.
                self.detail_floor = Ticket(self.next_ticket);
                let mut effects = vec![
                    self.fetch_list(false),
                    Effect::ReplaceDetail {
                        post: None,
                        nodes: render::deletion_notice(),
                    },
                ];
                if self.edit.editing() == Some(&id) {
                    self.edit.cancel();
                    effects.push(Effect::HideEditForm);
                }
                Ok(effects)
            }
        }
    }

    fn submit_new_post(&mut self, form: NewPostForm) -> Vec<Effect> {
        if let Err(err) = validate(&form) {
            return fail(Region::NewPostForm, err);
        }
        let draft = NewPost {
            title: form.title,
            author: form.author,
            content: form.content,
            image: self.config.placeholder_image.clone(),
        };

        if !self.config.features.persist_new_posts {
            let local = draft.into_local_post();
            return vec![
                Effect::PrependEntry(render::list_entry(&local)),
                Effect::ResetNewPostForm,
            ];
        }

        match self.api.build_create_post(&draft) {
            Ok(request) => vec![self.issue(request, Pending::Create), Effect::ResetNewPostForm],
            Err(err) => fail(Region::NewPostForm, err),
        }
    }

    fn submit_edit(&mut self, fields: EditFields) -> Vec<Effect> {
        if !self.config.features.edit {
            debug!("edit disabled, ignoring");
            return Vec::new();
        }
        let Some((id, patch)) = self.edit.submit(fields) else {
            debug!("edit form not open, ignoring submission");
            return Vec::new();
        };
        match self.api.build_update_post(&id, &patch) {
            Ok(request) => vec![self.issue(request, Pending::Update { id }), Effect::HideEditForm],
            Err(err) => {
                let mut effects = fail(Region::EditForm, err);
                effects.push(Effect::HideEditForm);
                effects
            }
        }
    }

    fn fetch_list(&mut self, show_first: bool) -> Effect {
        let request = self.api.build_list_posts();
        let effect = self.issue(request, Pending::List { show_first });
        if let Effect::Fetch { ticket, .. } = &effect {
            self.list_floor = *ticket;
        }
        effect
    }

    /// `show_first` of the current list fetch, if one is in flight.
    fn outstanding_list(&self) -> Option<bool> {
        self.pending.iter().find_map(|(ticket, pending)| match pending {
            Pending::List { show_first } if *ticket >= self.list_floor => Some(*show_first),
            _ => None,
        })
    }

    fn fetch_detail(&mut self, id: &PostId) -> Effect {
        let request = self.api.build_get_post(id);
        let effect = self.issue(request, Pending::Detail);
        if let Effect::Fetch { ticket, .. } = &effect {
            self.detail_floor = *ticket;
        }
        effect
    }

    fn issue(&mut self, request: HttpRequest, pending: Pending) -> Effect {
        let ticket = Ticket(self.next_ticket);
        self.next_ticket += 1;
        debug!(%ticket, method = %request.method, path = %request.path, "issuing request");
        self.pending.insert(ticket, pending);
        Effect::Fetch { ticket, request }
    }
}

fn validate(form: &NewPostForm) -> Result<(), ApiError> {
    let fields = [
        ("title", &form.title),
        ("author", &form.author),
        ("content", &form.content),
    ];
    for (name, value) in fields {
        if value.is_empty() {
            return Err(ApiError::Validation(name));
        }
    }
    Ok(())
}

fn fail(region: Region, err: ApiError) -> Vec<Effect> {
    warn!(?region, error = %err, "operation failed");
    vec![Effect::ShowNotice {
        region,
        notice: render::notice(&err),
    }]
}
