//! Page controllers. Each request builds a [`Session`] from the cookie jar,
//! runs its API calls through it and hands it to [`respond`], which is where
//! an expired session turns into a redirect to the login page.

pub mod auth;
pub mod dashboard;
pub mod stats;

use crate::session::{LOGIN_ROUTE, Session};
use crate::state::AppState;
use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use tracing::warn;

pub async fn index() -> Redirect {
    Redirect::to("/dashboard")
}

pub async fn health() -> &'static str {
    "ok"
}

/// Signed-out visitors of protected pages are sent to the login page.
pub async fn require_session(jar: CookieJar, request: Request, next: Next) -> Response {
    let session = Session::from_jar(request.uri().path(), &jar);
    if !session.is_authenticated() {
        warn!(path = %request.uri().path(), "no session, redirecting to login");
        return Redirect::to(LOGIN_ROUTE).into_response();
    }
    next.run(request).await
}

/// Finishes a page request: writes token changes to the cookie jar, and
/// replaces the page with a login redirect when the API reported the session
/// as expired.
pub(crate) fn respond(
    state: &AppState,
    jar: CookieJar,
    session: &Session,
    page: impl IntoResponse,
) -> (CookieJar, Response) {
    let jar = session.persist(jar, state.config.secure_cookies);
    if session.needs_login_redirect() {
        return (jar, Redirect::to(LOGIN_ROUTE).into_response());
    }
    (jar, page.into_response())
}
