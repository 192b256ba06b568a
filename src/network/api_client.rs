use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use crate::error::AppError;
use crate::feed::cache::PageRequest;
use crate::feed::normalize::parse_page;
use crate::models::FeedPage;

use super::config;

// REST client for the remote feed source
pub struct ApiClient;

impl ApiClient {
    /// Fetch and normalize one page.
    pub async fn fetch_page(request: &PageRequest) -> Result<FeedPage, AppError> {
        let url = config::current().page_url(request.kind.endpoint(), request.offset, request.limit);
        debug_log!("Fetching {}", url);
        let body = Self::fetch_json(&url, "GET", None).await?;
        parse_page(request.kind, &body)
    }

    /// Perform a CORS request and return the body text.  Non-2xx statuses
    /// become `AppError::Http`, transport failures `AppError::Network`.
    pub async fn fetch_json(url: &str, method: &str, body: Option<&str>) -> Result<String, AppError> {
        use web_sys::{Headers, Request, RequestInit, RequestMode, Response};

        let opts = RequestInit::new();
        opts.set_method(method);
        opts.set_mode(RequestMode::Cors);

        let headers = Headers::new().map_err(|e| AppError::from_js("headers", &e))?;
        headers
            .append("Accept", "application/json")
            .map_err(|e| AppError::from_js("headers", &e))?;

        if let Some(data) = body {
            opts.set_body(&JsValue::from_str(data));
            headers
                .append("Content-Type", "application/json")
                .map_err(|e| AppError::from_js("headers", &e))?;
        }
        opts.set_headers(&headers);

        let request = Request::new_with_str_and_init(url, &opts)
            .map_err(|e| AppError::from_js("request", &e))?;

        let window = web_sys::window().ok_or_else(|| AppError::Network("no global window".into()))?;
        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| AppError::from_js("fetch failed", &e))?;
        let resp: Response = resp_value
            .dyn_into::<Response>()
            .map_err(|e| AppError::from_js("not a Response", &e))?;

        if !resp.ok() {
            let status = resp.status();
            warn_log!("API request failed: {} {}", status, resp.status_text());
            return Err(AppError::Http {
                status,
                message: resp.status_text(),
            });
        }

        let text_promise = resp.text().map_err(|e| AppError::from_js("body", &e))?;
        let text = JsFuture::from(text_promise)
            .await
            .map_err(|e| AppError::from_js("body", &e))?;
        Ok(text.as_string().unwrap_or_default())
    }
}
