//! In-memory stand-in for the browser page.
//!
//! Applies the same view effects the browser host applies to the real DOM,
//! which makes it the observable state for headless hosts and tests.

use std::collections::HashMap;

use crate::app::{Effect, Region};
use crate::types::{EditFields, NewPostForm, Post};
use crate::view::{self, Node};

#[derive(Debug, Clone, Default)]
pub struct Page {
    list: Vec<Node>,
    detail: Vec<Node>,
    detail_post: Option<Post>,
    /// `None` while the edit form is hidden.
    edit_form: Option<EditFields>,
    pub new_post_form: NewPostForm,
    notices: HashMap<Region, Node>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one view effect. `Fetch` effects are not view mutations and are ignored.
    pub fn apply(&mut self, effect: &Effect) {
        match effect {
            Effect::Fetch { .. } => {}
            Effect::ReplaceList(nodes) => self.list = nodes.clone(),
            Effect::PrependEntry(node) => self.list.insert(0, node.clone()),
            Effect::ReplaceDetail { post, nodes } => {
                self.detail_post = post.clone();
                self.detail = nodes.clone();
            }
            Effect::ShowEditForm(fields) => self.edit_form = Some(fields.clone()),
            Effect::HideEditForm => self.edit_form = None,
            Effect::ResetNewPostForm => self.new_post_form = NewPostForm::default(),
            Effect::ShowNotice { region, notice } => {
                self.notices.insert(*region, notice.clone());
            }
            Effect::ClearNotice(region) => {
                self.notices.remove(region);
            }
        }
    }

    pub fn list(&self) -> &[Node] {
        &self.list
    }

    /// `data-id` of every list entry, top to bottom.
    pub fn list_ids(&self) -> Vec<String> {
        self.list
            .iter()
            .filter_map(|node| node.as_element()?.get_attr("data-id"))
            .map(str::to_string)
            .collect()
    }

    pub fn list_titles(&self) -> Vec<String> {
        self.list.iter().map(Node::text_content).collect()
    }

    pub fn list_html(&self) -> String {
        view::to_html(&self.list)
    }

    pub fn detail_post(&self) -> Option<&Post> {
        self.detail_post.as_ref()
    }

    pub fn detail_html(&self) -> String {
        view::to_html(&self.detail)
    }

    pub fn detail_text(&self) -> String {
        self.detail.iter().map(Node::text_content).collect()
    }

    pub fn edit_form(&self) -> Option<&EditFields> {
        self.edit_form.as_ref()
    }

    /// Mutable access to the visible edit form's fields, as a user typing would.
    pub fn edit_form_mut(&mut self) -> Option<&mut EditFields> {
        self.edit_form.as_mut()
    }

    pub fn notice(&self, region: Region) -> Option<String> {
        self.notices.get(&region).map(Node::text_content)
    }
}
