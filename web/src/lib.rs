//! Browser host for `post-core`.
//!
//! # Overview
//! Wires DOM events on the post page to `PostClient`, runs the requests it
//! asks for with `fetch`, and applies the resulting view effects to the live
//! document.
//!
//! # Design
//! - Listeners are attached once, to the long-lived containers, and find the
//!   clicked entry or control through `data-id` / `data-action` attributes.
//! - Each `Fetch` effect runs in its own `spawn_local` task, so responses may
//!   come back in any order; `PostClient` decides which ones still matter.
//! - The client is never borrowed across an `await`.

pub mod dom;
pub mod fetch;

use std::cell::RefCell;
use std::rc::Rc;

use post_core::{ClientConfig, EditFields, Effect, Features, NewPostForm, Post, PostClient, PostId, Region, UiEvent};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlFormElement};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    pub fn error(contents: &str);
}

struct App {
    client: RefCell<PostClient>,
    document: Document,
    /// Post currently shown in the detail pane; the edit control opens it.
    displayed: RefCell<Option<Post>>,
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));

    let document = dom::document()?;
    // Script may run before the body is parsed.
    if document.get_element_by_id(dom::LIST_ID).is_none() {
        let on_ready = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
            if let Err(err) = boot() {
                error(&format!("post client failed to start: {err:?}"));
            }
        });
        document.add_event_listener_with_callback("DOMContentLoaded", on_ready.as_ref().unchecked_ref())?;
        on_ready.forget();
        Ok(())
    } else {
        boot()
    }
}

/// Read configuration from `#post-list`'s `data-api-base` and `data-variant`.
fn read_config(document: &Document) -> Result<ClientConfig, JsValue> {
    let list = dom::by_id(document, dom::LIST_ID)?;
    let mut config = ClientConfig::default();
    if let Some(base) = list.get_attribute("data-api-base") {
        config.base_url = base;
    }
    if list.get_attribute("data-variant").as_deref() == Some("reduced") {
        config.features = Features::reduced();
    }
    Ok(config)
}

fn boot() -> Result<(), JsValue> {
    let document = dom::document()?;
    let config = read_config(&document)?;
    let app = Rc::new(App {
        client: RefCell::new(PostClient::new(config)),
        document,
        displayed: RefCell::new(None),
    });

    wire_list(&app)?;
    wire_detail(&app)?;
    wire_new_post_form(&app)?;
    wire_edit_form(&app)?;

    send(&app, UiEvent::Load);
    Ok(())
}

fn send(app: &Rc<App>, event: UiEvent) {
    let effects = app.client.borrow_mut().handle(event);
    run(app, effects);
}

fn run(app: &Rc<App>, effects: Vec<Effect>) {
    for effect in effects {
        if let Effect::Fetch { ticket, request } = effect {
            let app = Rc::clone(app);
            wasm_bindgen_futures::spawn_local(async move {
                let outcome = fetch::execute(request).await;
                let effects = app.client.borrow_mut().on_response(ticket, outcome);
                run(&app, effects);
            });
        } else if let Err(err) = apply(app, effect) {
            error(&format!("could not update page: {err:?}"));
        }
    }
}

fn apply(app: &Rc<App>, effect: Effect) -> Result<(), JsValue> {
    let document = &app.document;
    match effect {
        Effect::Fetch { .. } => {}
        Effect::ReplaceList(nodes) => {
            let list = dom::by_id(document, dom::LIST_ID)?;
            dom::replace_children(document, &list, &nodes)?;
        }
        Effect::PrependEntry(node) => {
            let list = dom::by_id(document, dom::LIST_ID)?;
            list.prepend_with_node_1(&dom::build(document, &node)?)?;
        }
        Effect::ReplaceDetail { post, nodes } => {
            let detail = dom::by_id(document, dom::DETAIL_ID)?;
            dom::replace_children(document, &detail, &nodes)?;
            *app.displayed.borrow_mut() = post;
        }
        Effect::ShowEditForm(fields) => {
            dom::set_field_value(&dom::by_id(document, dom::EDIT_TITLE_ID)?, &fields.title);
            dom::set_field_value(&dom::by_id(document, dom::EDIT_CONTENT_ID)?, &fields.content);
            dom::by_id(document, dom::EDIT_FORM_ID)?
                .class_list()
                .remove_1(dom::HIDDEN_CLASS)?;
        }
        Effect::HideEditForm => {
            dom::by_id(document, dom::EDIT_FORM_ID)?
                .class_list()
                .add_1(dom::HIDDEN_CLASS)?;
        }
        Effect::ResetNewPostForm => {
            dom::by_id(document, dom::NEW_POST_FORM_ID)?
                .dyn_into::<HtmlFormElement>()?
                .reset();
        }
        Effect::ShowNotice { region, notice } => show_notice(app, region, &notice)?,
        Effect::ClearNotice(region) => {
            if let Some(existing) = document.get_element_by_id(&dom::notice_id(region)) {
                existing.remove();
            }
        }
    }
    Ok(())
}

fn show_notice(app: &Rc<App>, region: Region, notice: &post_core::Node) -> Result<(), JsValue> {
    let document = &app.document;
    let id = dom::notice_id(region);
    if let Some(existing) = document.get_element_by_id(&id) {
        existing.remove();
    }

    let wrapper = document.create_element("div")?;
    wrapper.set_id(&id);
    wrapper.append_child(&dom::build(document, notice)?)?;
    dom::by_id(document, dom::region_anchor(region))?.insert_adjacent_element("afterend", &wrapper)?;

    let app = Rc::clone(app);
    let on_click = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        if action_of(&event).as_deref() == Some("dismiss") {
            send(&app, UiEvent::DismissNotice(region));
        }
    });
    wrapper.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
    on_click.forget();
    Ok(())
}

/// Nearest ancestor of the event target (inclusive) matching `selector`.
fn closest(event: &Event, selector: &str) -> Option<Element> {
    let target = event.target()?.dyn_into::<Element>().ok()?;
    target.closest(selector).ok().flatten()
}

fn action_of(event: &Event) -> Option<String> {
    closest(event, "[data-action]")?.get_attribute("data-action")
}

fn listen(target: &Element, kind: &str, handler: impl FnMut(Event) + 'static) -> Result<(), JsValue> {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn wire_list(app: &Rc<App>) -> Result<(), JsValue> {
    let list = dom::by_id(&app.document, dom::LIST_ID)?;
    let app = Rc::clone(app);
    listen(&list, "click", move |event| {
        let selector = format!(".{}", post_core::render::LIST_ENTRY_CLASS);
        if let Some(id) = closest(&event, &selector).and_then(|entry| entry.get_attribute("data-id")) {
            send(&app, UiEvent::SelectPost(PostId::from_attr(&id)));
        }
    })
}

fn wire_detail(app: &Rc<App>) -> Result<(), JsValue> {
    let detail = dom::by_id(&app.document, dom::DETAIL_ID)?;
    let app = Rc::clone(app);
    listen(&detail, "click", move |event| {
        let Some(control) = closest(&event, "button[data-action]") else {
            return;
        };
        let action = control.get_attribute("data-action");
        match action.as_deref() {
            Some("edit") => {
                let post = app.displayed.borrow().clone();
                if let Some(post) = post {
                    send(&app, UiEvent::BeginEdit(post));
                }
            }
            Some("delete") => {
                if let Some(id) = control.get_attribute("data-id") {
                    send(&app, UiEvent::Delete(PostId::from_attr(&id)));
                }
            }
            _ => {}
        }
    })
}

fn wire_new_post_form(app: &Rc<App>) -> Result<(), JsValue> {
    let form = dom::by_id(&app.document, dom::NEW_POST_FORM_ID)?;
    let app = Rc::clone(app);
    let fields = form.clone();
    listen(&form, "submit", move |event| {
        event.prevent_default();
        match read_new_post(&fields) {
            Ok(values) => send(&app, UiEvent::SubmitNewPost(values)),
            Err(err) => error(&format!("could not read new post form: {err:?}")),
        }
    })
}

fn read_new_post(form: &Element) -> Result<NewPostForm, JsValue> {
    Ok(NewPostForm {
        title: dom::named_value(form, "title")?,
        author: dom::named_value(form, "author")?,
        content: dom::named_value(form, "content")?,
    })
}

fn wire_edit_form(app: &Rc<App>) -> Result<(), JsValue> {
    let form = dom::by_id(&app.document, dom::EDIT_FORM_ID)?;
    let submit_app = Rc::clone(app);
    listen(&form, "submit", move |event| {
        event.prevent_default();
        match read_edit_fields(&submit_app.document) {
            Ok(fields) => send(&submit_app, UiEvent::SubmitEdit(fields)),
            Err(err) => error(&format!("could not read edit form: {err:?}")),
        }
    })?;

    let cancel = dom::by_id(&app.document, dom::CANCEL_EDIT_ID)?;
    let cancel_app = Rc::clone(app);
    listen(&cancel, "click", move |event| {
        event.prevent_default();
        send(&cancel_app, UiEvent::CancelEdit);
    })
}

fn read_edit_fields(document: &Document) -> Result<EditFields, JsValue> {
    Ok(EditFields {
        title: dom::field_value(&dom::by_id(document, dom::EDIT_TITLE_ID)?),
        content: dom::field_value(&dom::by_id(document, dom::EDIT_CONTENT_ID)?),
    })
}
