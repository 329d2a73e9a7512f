use crate::client::{ApiClient, server_message};
use crate::errors::ApiError;
use crate::models::{ChangePasswordRequest, LoginRequest, LoginResponse, RegisterRequest};
use crate::session::Session;
use reqwest::Method;
use serde_json::Value;
use tracing::{info, warn};

/// Exchanges credentials for a token and stores it in `session`.
pub async fn login(
    api: &ApiClient,
    session: &Session,
    email: &str,
    password: &str,
) -> Result<LoginResponse, ApiError> {
    let request = api
        .request(Method::POST, "/api/auth/login")
        .json(&LoginRequest { email, password });
    let response: LoginResponse = api.send_json(session, request).await?;
    if response.token.is_empty() {
        return Err(ApiError::Decode("login response carried an empty token".into()));
    }

    session.store(response.token.clone());
    info!(email, "signed in");
    Ok(response)
}

/// Returns whatever user-like record the API answers with.
pub async fn register(
    api: &ApiClient,
    session: &Session,
    first_name: &str,
    last_name: &str,
    email: &str,
    password: &str,
) -> Result<Option<Value>, ApiError> {
    let request = api
        .request(Method::POST, "/api/auth/register")
        .json(&RegisterRequest {
            first_name,
            last_name,
            email,
            password,
        });
    let user = api.send_optional_json(session, request).await?;
    info!(email, "registered");
    Ok(user)
}

/// The confirmation comes back as plain text, a JSON string, `{message}` or
/// `{token}` depending on the backend build. Returns the message when there
/// is one.
pub async fn change_password(
    api: &ApiClient,
    session: &Session,
    email: &str,
    new_password: &str,
) -> Result<Option<String>, ApiError> {
    let request = api
        .request(Method::POST, "/api/auth/change-password")
        .json(&ChangePasswordRequest {
            email,
            new_password,
        });
    let response = api.send(session, request).await?;
    let body = response.text().await?;
    info!(email, "password changed");
    Ok(server_message(&body))
}

/// Tells the API the session is over and forgets the token. The API call is
/// best effort; the local token is always cleared.
pub async fn logout(api: &ApiClient, session: &Session) {
    let request = api.request(Method::POST, "/api/auth/logout");
    if let Err(err) = api.send(session, request).await {
        warn!(error = %err, "logout notification failed");
    }
    session.clear();
}
