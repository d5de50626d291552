//! Edit form state machine.
//!
//! The form is either hidden or showing one post's editable fields. Opening
//! it for another post replaces whatever was being edited without asking.

use crate::types::{EditFields, Post, PostId, PostPatch};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditForm {
    #[default]
    Hidden,
    Visible {
        post_id: PostId,
        title: String,
        content: String,
    },
}

impl EditForm {
    pub fn is_visible(&self) -> bool {
        matches!(self, EditForm::Visible { .. })
    }

    pub fn editing(&self) -> Option<&PostId> {
        match self {
            EditForm::Visible { post_id, .. } => Some(post_id),
            EditForm::Hidden => None,
        }
    }

    /// Show the form pre-filled from `post`, discarding any edit in progress.
    pub fn open(&mut self, post: &Post) -> EditFields {
        *self = EditForm::Visible {
            post_id: post.id.clone(),
            title: post.title.clone(),
            content: post.content.clone(),
        };
        EditFields {
            title: post.title.clone(),
            content: post.content.clone(),
        }
    }

    /// Hide the form and hand back the patch for the post being edited.
    ///
    /// Returns `None` when the form was not visible.
    pub fn submit(&mut self, fields: EditFields) -> Option<(PostId, PostPatch)> {
        match std::mem::take(self) {
            EditForm::Visible { post_id, .. } => Some((
                post_id,
                PostPatch {
                    title: Some(fields.title),
                    content: Some(fields.content),
                    ..PostPatch::default()
                },
            )),
            EditForm::Hidden => None,
        }
    }

    pub fn cancel(&mut self) {
        *self = EditForm::Hidden;
    }
}
