//! Pure renderers from posts to markup.
//!
//! Every function here is a function of its arguments only: rendering the
//! same posts twice yields identical nodes.

use crate::config::Features;
use crate::error::ApiError;
use crate::types::Post;
use crate::view::{Element, Node};

pub const LIST_ENTRY_CLASS: &str = "post-title";
pub const DELETED_MESSAGE: &str = "Post deleted.";

/// One clickable entry per post, in the given order.
pub fn post_list(posts: &[Post]) -> Vec<Node> {
    posts.iter().map(list_entry).collect()
}

pub fn list_entry(post: &Post) -> Node {
    Element::new("div")
        .attr("class", LIST_ENTRY_CLASS)
        .attr("data-id", post.id.to_string())
        .text(post.title.as_str())
        .into()
}

/// Full detail template for one post.
///
/// Edit and delete buttons carry `data-action` and the post id so a host can
/// dispatch clicks without looking anything up.
pub fn post_detail(post: &Post, features: &Features) -> Vec<Node> {
    let mut nodes: Vec<Node> = vec![
        Element::new("h2").text(post.title.as_str()).into(),
        Element::new("img")
            .attr("src", post.image.as_str())
            .attr("alt", post.title.as_str())
            .attr("width", "150")
            .into(),
        Element::new("p").text(post.content.as_str()).into(),
        Element::new("p")
            .child(Element::new("strong").text("Author:"))
            .text(format!(" {}", post.author))
            .into(),
    ];
    if features.edit {
        nodes.push(control("edit-btn", "edit", "Edit", post));
    }
    if features.delete {
        nodes.push(control("delete-btn", "delete", "Delete", post));
    }
    nodes
}

fn control(id: &str, action: &str, label: &str, post: &Post) -> Node {
    Element::new("button")
        .attr("id", id)
        .attr("data-action", action)
        .attr("data-id", post.id.to_string())
        .text(label)
        .into()
}

pub fn deletion_notice() -> Vec<Node> {
    vec![Element::new("p").text(DELETED_MESSAGE).into()]
}

/// Dismissible inline message shown next to the container an error affected.
pub fn notice(error: &ApiError) -> Node {
    Element::new("div")
        .attr("class", "notice")
        .attr("role", "alert")
        .child(Element::new("span").text(error.to_string()))
        .child(
            Element::new("button")
                .attr("class", "dismiss")
                .attr("data-action", "dismiss")
                .text("Dismiss"),
        )
        .into()
}
