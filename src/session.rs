//! Session token storage and the "session expired" signal.
//!
//! The browser keeps the bearer token in the `jwt` session cookie. For the
//! duration of one page request the token is copied into a [`Session`]; the
//! API client reads it before every call and evicts it on a 401, and the view
//! layer writes the outcome back to the cookie jar when the response is built.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::sync::Mutex;
use tokio::sync::broadcast;

pub const TOKEN_COOKIE: &str = "jwt";
pub const LOGIN_ROUTE: &str = "/login";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The API answered 401; the token has been evicted. `redirect` is false
    /// when the user is already on the login page.
    Expired { route: String, redirect: bool },
}

/// Broadcasts [`SessionEvent`]s to whoever subscribed (the background logger
/// in `main`, tests).
#[derive(Debug, Clone)]
pub struct SessionEvents {
    tx: broadcast::Sender<SessionEvent>,
}

impl SessionEvents {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(64);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.tx.subscribe()
    }

    pub fn publish(&self, event: SessionEvent) {
        // No subscribers is fine.
        let _ = self.tx.send(event);
    }
}

impl Default for SessionEvents {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Default)]
struct TokenSlot {
    token: Option<String>,
    changed: bool,
    expired: bool,
}

/// Per-request view of the session token and the route being rendered.
#[derive(Debug)]
pub struct Session {
    route: String,
    slot: Mutex<TokenSlot>,
}

impl Session {
    pub fn new(route: impl Into<String>, token: Option<String>) -> Self {
        Self {
            route: route.into(),
            slot: Mutex::new(TokenSlot {
                token: token.filter(|token| !token.is_empty()),
                ..TokenSlot::default()
            }),
        }
    }

    pub fn from_jar(route: impl Into<String>, jar: &CookieJar) -> Self {
        let token = jar.get(TOKEN_COOKIE).map(|cookie| cookie.value().to_string());
        Self::new(route, token)
    }

    pub fn route(&self) -> &str {
        &self.route
    }

    pub fn on_login_route(&self) -> bool {
        self.route.starts_with(LOGIN_ROUTE)
    }

    pub fn token(&self) -> Option<String> {
        self.with_slot(|slot| slot.token.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.with_slot(|slot| slot.token.is_some())
    }

    pub fn store(&self, token: String) {
        self.with_slot(|slot| {
            slot.token = Some(token);
            slot.changed = true;
            slot.expired = false;
        });
    }

    /// Drops the token. Returns whether one was held.
    pub fn clear(&self) -> bool {
        self.with_slot(|slot| {
            let held = slot.token.take().is_some();
            slot.changed |= held;
            held
        })
    }

    /// Marks the session expired after a 401 and drops the token. Returns
    /// true only the first time, so one request that sees several 401s
    /// evicts and reports once.
    pub fn expire(&self) -> bool {
        self.with_slot(|slot| {
            if slot.expired {
                return false;
            }
            slot.expired = true;
            slot.changed |= slot.token.take().is_some();
            true
        })
    }

    pub fn is_expired(&self) -> bool {
        self.with_slot(|slot| slot.expired)
    }

    /// Whether the view layer has to send the user to the login page.
    pub fn needs_login_redirect(&self) -> bool {
        self.is_expired() && !self.on_login_route()
    }

    /// Writes token changes made during the request back to the cookie jar.
    pub fn persist(&self, jar: CookieJar, secure: bool) -> CookieJar {
        let (changed, token) = self.with_slot(|slot| (slot.changed, slot.token.clone()));
        if !changed {
            return jar;
        }
        match token {
            Some(token) => jar.add(token_cookie(token, secure)),
            None => jar.remove(Cookie::build(TOKEN_COOKIE).path("/")),
        }
    }

    fn with_slot<T>(&self, f: impl FnOnce(&mut TokenSlot) -> T) -> T {
        let mut slot = match self.slot.lock() {
            Ok(slot) => slot,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut slot)
    }
}

/// Session cookie: no expiry, so it lasts as long as the browser session.
fn token_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}
