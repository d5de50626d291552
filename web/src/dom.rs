//! Thin helpers between `post_core::view` trees and the live document.

use post_core::{Node, Region};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlInputElement, HtmlTextAreaElement};

pub const LIST_ID: &str = "post-list";
pub const DETAIL_ID: &str = "post-detail";
pub const NEW_POST_FORM_ID: &str = "new-blog-post-form";
pub const EDIT_FORM_ID: &str = "edit-post-form";
pub const EDIT_TITLE_ID: &str = "edit-title";
pub const EDIT_CONTENT_ID: &str = "edit-content";
pub const CANCEL_EDIT_ID: &str = "cancel-edit";
pub const HIDDEN_CLASS: &str = "hidden";

pub fn document() -> Result<Document, JsValue> {
    web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("no document"))
}

pub fn by_id(document: &Document, id: &str) -> Result<Element, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing #{id}")))
}

/// Container a region's notices are placed after.
pub fn region_anchor(region: Region) -> &'static str {
    match region {
        Region::List => LIST_ID,
        Region::Detail => DETAIL_ID,
        Region::NewPostForm => NEW_POST_FORM_ID,
        Region::EditForm => EDIT_FORM_ID,
    }
}

pub fn notice_id(region: Region) -> String {
    format!("{}-notice", region_anchor(region))
}

pub fn build(document: &Document, node: &Node) -> Result<web_sys::Node, JsValue> {
    match node {
        Node::Text(text) => Ok(document.create_text_node(text).into()),
        Node::Element(element) => {
            let el = document.create_element(element.tag)?;
            for (name, value) in &element.attrs {
                el.set_attribute(name, value)?;
            }
            for child in &element.children {
                el.append_child(&build(document, child)?)?;
            }
            Ok(el.into())
        }
    }
}

/// Replace every child of `container` with `nodes`.
pub fn replace_children(document: &Document, container: &Element, nodes: &[Node]) -> Result<(), JsValue> {
    container.set_text_content(None);
    for node in nodes {
        container.append_child(&build(document, node)?)?;
    }
    Ok(())
}

/// Current value of an `<input>` or `<textarea>`.
pub fn field_value(element: &Element) -> String {
    if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
        input.value()
    } else if let Some(area) = element.dyn_ref::<HtmlTextAreaElement>() {
        area.value()
    } else {
        String::new()
    }
}

pub fn set_field_value(element: &Element, value: &str) {
    if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
        input.set_value(value);
    } else if let Some(area) = element.dyn_ref::<HtmlTextAreaElement>() {
        area.set_value(value);
    }
}

/// Value of the form control named `name` inside `form`, empty when absent.
pub fn named_value(form: &Element, name: &str) -> Result<String, JsValue> {
    let selector = format!("[name=\"{name}\"]");
    Ok(form
        .query_selector(&selector)?
        .map(|el| field_value(&el))
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notices_sit_after_their_container() {
        assert_eq!(notice_id(Region::List), "post-list-notice");
        assert_eq!(notice_id(Region::EditForm), "edit-post-form-notice");
        assert_eq!(region_anchor(Region::NewPostForm), NEW_POST_FORM_ID);
    }
}
