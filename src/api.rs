//! Requests to the library server.
//!
//! Background calls go through `reqwest`'s fetch backend with the CSRF
//! header set; delete and hidden-field edits are plain form posts that
//! navigate away, built on the fly with `web_sys`.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::RequestBuilder;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use crate::config::AppConfig;
use crate::error::{ApiError, AppError};
use crate::state::profile::ProfileUpdate;
use crate::state::table::RowRecord;

const CSRF_HEADER: &str = "X-CSRFToken";
const CSRF_COOKIE: &str = "csrftoken";
const CSRF_FIELD: &str = "csrfmiddlewaretoken";

fn document() -> Option<web_sys::Document> {
    web_sys::window().and_then(|w| w.document())
}

/// Value of `name` in a `document.cookie` string.
pub fn cookie_value(cookies: &str, name: &str) -> Option<String> {
    cookies
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| {
            urlencoding::decode(value)
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| value.to_string())
        })
        .filter(|v| !v.is_empty())
}

/// CSRF token from the bootstrap, else the `csrftoken` cookie, else a
/// rendered `csrfmiddlewaretoken` input. Empty when none is present.
pub fn csrf_token(config: &AppConfig) -> String {
    if let Some(token) = config.csrf_token.as_ref().filter(|t| !t.is_empty()) {
        return token.clone();
    }
    let Some(doc) = document() else {
        return String::new();
    };
    let from_cookie = doc
        .dyn_ref::<web_sys::HtmlDocument>()
        .and_then(|html| html.cookie().ok())
        .and_then(|cookies| cookie_value(&cookies, CSRF_COOKIE));
    if let Some(token) = from_cookie {
        return token;
    }
    doc.query_selector(&format!("[name={}]", CSRF_FIELD))
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into::<web_sys::HtmlInputElement>().ok())
        .map(|input| input.value())
        .unwrap_or_default()
}

/// Resolve a site-relative path against the current page; fetch from wasm
/// needs absolute URLs.
fn absolute_url(path: &str) -> Result<url::Url, ApiError> {
    let href = web_sys::window()
        .and_then(|w| w.location().href().ok())
        .ok_or_else(|| ApiError::Request("page location unavailable".to_string()))?;
    url::Url::parse(&href)
        .and_then(|base| base.join(path))
        .map_err(|e| ApiError::Request(format!("bad URL {}: {}", path, e)))
}

fn post(config: &AppConfig, path: &str, timeout: Duration) -> Result<RequestBuilder, ApiError> {
    let url = absolute_url(path)?;
    Ok(reqwest::Client::new()
        .post(url)
        .header(CSRF_HEADER, csrf_token(config))
        .timeout(timeout))
}

/// Send and turn any non-2xx answer into a classified error.
async fn send(request: RequestBuilder) -> Result<String, ApiError> {
    let response = request.send().await?;
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    if status.is_success() {
        Ok(body)
    } else {
        tracing::warn!("Request failed with status {}", status);
        Err(ApiError::from_response(status.as_u16(), &body))
    }
}

/// Form-encoded profile update.
pub async fn update_profile(config: &AppConfig, update: &ProfileUpdate) -> Result<(), ApiError> {
    tracing::info!("Saving profile for {}", update.email);
    let request = post(config, &config.endpoints.update_profile, config.request_timeout())?.form(update);
    send(request).await.map(|_| ())
}

/// Multipart upload of the avatar photo under the `photo` field.
pub async fn upload_profile_photo(config: &AppConfig, file: &web_sys::File) -> Result<(), ApiError> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| ApiError::Request(format!("could not read file: {:?}", e)))?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    tracing::info!("Uploading photo {} ({} bytes)", file.name(), bytes.len());

    let part = Part::bytes(bytes)
        .file_name(file.name())
        .mime_str(&file.type_())?;
    let form = Form::new().part("photo", part);
    let request = post(config, &config.endpoints.upload_photo, config.request_timeout())?.multipart(form);
    send(request).await.map(|_| ())
}

/// `books_data=<url-encoded JSON>` body for the background update endpoint.
pub fn update_rows_body(records: &[RowRecord]) -> Result<String, ApiError> {
    let json = serde_json::to_string(records).map_err(|e| ApiError::Request(e.to_string()))?;
    Ok(format!("books_data={}", urlencoding::encode(&json)))
}

/// Background batch update; `url` is the list's update endpoint.
pub async fn update_rows(config: &AppConfig, url: &str, records: &[RowRecord]) -> Result<(), ApiError> {
    tracing::info!("Updating {} rows via {}", records.len(), url);
    let request = post(config, url, config.request_timeout())?
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(update_rows_body(records)?);
    send(request).await.map(|_| ())
}

/// Build a hidden POST form with `fields` plus the CSRF token and submit it.
/// The browser navigates to the response.
pub fn submit_form(config: &AppConfig, action: &str, fields: &[(&str, String)]) -> Result<(), AppError> {
    let browser = |what: &str| AppError::Browser(what.to_string());
    let doc = document().ok_or_else(|| browser("no document"))?;
    let body = doc.body().ok_or_else(|| browser("no body"))?;

    let form: web_sys::HtmlFormElement = doc
        .create_element("form")
        .map_err(|_| browser("create form"))?
        .dyn_into()
        .map_err(|_| browser("form element"))?;
    form.set_method("post");
    form.set_action(action);
    form.set_attribute("style", "display:none").map_err(|_| browser("style form"))?;

    let token = csrf_token(config);
    let all_fields = fields
        .iter()
        .map(|(name, value)| (*name, value.as_str()))
        .chain(std::iter::once((CSRF_FIELD, token.as_str())));
    for (name, value) in all_fields {
        let input: web_sys::HtmlInputElement = doc
            .create_element("input")
            .map_err(|_| browser("create input"))?
            .dyn_into()
            .map_err(|_| browser("input element"))?;
        input.set_type("hidden");
        input.set_name(name);
        input.set_value(value);
        form.append_child(&input).map_err(|_| browser("append input"))?;
    }

    body.append_child(&form).map_err(|_| browser("append form"))?;
    tracing::info!("Submitting {} field(s) to {}", fields.len(), action);
    form.submit().map_err(|_| browser("submit form"))
}

pub fn reload_page() {
    if let Some(window) = web_sys::window() {
        let _ = window.location().reload();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_value() {
        let cookies = "sessionid=abc; csrftoken=tok%3D1; theme=dark";
        assert_eq!(cookie_value(cookies, "csrftoken"), Some("tok=1".to_string()));
        assert_eq!(cookie_value(cookies, "theme"), Some("dark".to_string()));
        assert_eq!(cookie_value(cookies, "missing"), None);
        assert_eq!(cookie_value("csrftoken=", "csrftoken"), None);
        assert_eq!(cookie_value("", "csrftoken"), None);
    }

    #[test]
    fn test_update_rows_body_is_url_encoded_json() {
        let records = vec![RowRecord {
            id: "4".to_string(),
            fields: vec![("student_name", "Ann Lee".to_string()), ("issue_date", "2024-01-02".to_string())],
        }];
        let body = update_rows_body(&records).unwrap();
        assert!(body.starts_with("books_data="));
        let encoded = body.trim_start_matches("books_data=");
        assert!(!encoded.contains(' ') && !encoded.contains('"'));
        let decoded = urlencoding::decode(encoded).unwrap();
        assert_eq!(decoded, r#"[{"id":"4","student_name":"Ann Lee","issue_date":"2024-01-02"}]"#);
    }
}
