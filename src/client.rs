//! Shared HTTP client for the mood API.
//!
//! Every call goes through [`ApiClient::send`], which attaches the session's
//! bearer token and turns a 401 into token eviction plus a
//! [`SessionEvent::Expired`]. Other failures are returned to the caller
//! untouched.

use crate::errors::ApiError;
use crate::session::{Session, SessionEvent, SessionEvents};
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    events: SessionEvents,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration, events: SessionEvents) -> Result<Self, ApiError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ApiError::InvalidBaseUrl(base_url));
        }

        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url,
            events,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Starts a request against `path`, relative to the base url.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, format!("{}{}", self.base_url, path))
    }

    /// Sends `request` on behalf of `session`.
    pub async fn send(&self, session: &Session, request: RequestBuilder) -> Result<Response, ApiError> {
        let request = match session.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        debug!(url = %response.url(), %status, "api response");

        if status == StatusCode::UNAUTHORIZED {
            self.expire(session);
            return Err(ApiError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Rejected {
                status,
                message: server_message(&body),
            });
        }

        Ok(response)
    }

    /// Sends and decodes a JSON body.
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        session: &Session,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = self.send(session, request).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Sends a request whose success body is informational. Returns the body
    /// as JSON, a non-JSON body as a JSON string, or `None` when it is empty
    /// or `null`. A 2xx is never turned into an error here.
    pub async fn send_optional_json(
        &self,
        session: &Session,
        request: RequestBuilder,
    ) -> Result<Option<Value>, ApiError> {
        let response = self.send(session, request).await?;
        let body = response.text().await?;
        Ok(optional_body(&body))
    }

    fn expire(&self, session: &Session) {
        if !session.expire() {
            return;
        }
        let redirect = !session.on_login_route();
        warn!(route = session.route(), redirect, "session expired");
        self.events.publish(SessionEvent::Expired {
            route: session.route().to_string(),
            redirect,
        });
    }
}

fn optional_body(body: &str) -> Option<Value> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Null) => None,
        Ok(value) => Some(value),
        Err(_) => Some(Value::String(body.to_string())),
    }
}

/// Pulls a human readable message out of an error body: the `message` field
/// of a JSON object, a JSON string, or non-empty plain text.
pub fn server_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => map
            .get("message")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|message| !message.is_empty())
            .map(str::to_string),
        Ok(Value::String(message)) => Some(message).filter(|message| !message.trim().is_empty()),
        Ok(_) => None,
        Err(_) => Some(body.to_string()),
    }
}
