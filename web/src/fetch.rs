//! Executes core `HttpRequest` values with the browser's `fetch`.

use post_core::{HttpRequest, HttpResponse};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response};

/// Run one round-trip. `Err` means no HTTP response was obtained.
pub async fn execute(request: HttpRequest) -> Result<HttpResponse, String> {
    send(&request).await.map_err(describe)
}

async fn send(request: &HttpRequest) -> Result<HttpResponse, JsValue> {
    let init = RequestInit::new();
    init.set_method(request.method.as_str());

    let headers = Headers::new()?;
    for (name, value) in &request.headers {
        headers.set(name, value)?;
    }
    init.set_headers(&headers);

    if let Some(body) = &request.body {
        init.set_body(&JsValue::from_str(body));
    }

    let js_request = Request::new_with_str_and_init(&request.path, &init)?;
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let response: Response = JsFuture::from(window.fetch_with_request(&js_request))
        .await?
        .dyn_into()?;

    let body = JsFuture::from(response.text()?)
        .await?
        .as_string()
        .unwrap_or_default();

    Ok(HttpResponse::new(response.status(), body))
}

fn describe(err: JsValue) -> String {
    err.as_string()
        .unwrap_or_else(|| format!("{err:?}"))
}
