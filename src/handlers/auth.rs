use super::respond;
use crate::errors::ApiError;
use crate::services::auth;
use crate::session::Session;
use crate::state::AppState;
use crate::ui::auth::{RegisterView, render_change_password, render_login, render_register};
use crate::validation::{
    CHANGE_PASSWORD_FIELDS, ChangePasswordForm, LOGIN_FIELDS, LoginForm, REGISTER_FIELDS,
    RegisterForm, check,
};
use axum::{
    Form,
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use tracing::{info, warn};

#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    #[serde(default)]
    pub registered: Option<String>,
}

pub async fn login_page(Query(query): Query<LoginQuery>) -> Html<String> {
    let notice = query
        .registered
        .is_some()
        .then_some("Account created. You can sign in now.");
    Html(render_login("", None, notice))
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> (CookieJar, Response) {
    let session = Session::from_jar("/login", &jar);

    if let Err(message) = check(&form, &LOGIN_FIELDS) {
        let page = Html(render_login(&form.email, Some(&message), None));
        return respond(&state, jar, &session, page);
    }

    match auth::login(&state.api, &session, form.email.trim(), &form.password).await {
        Ok(_) => respond(&state, jar, &session, Redirect::to("/dashboard")),
        Err(err) => {
            warn!(email = %form.email, status = ?err.status(), error = %err, "login failed");
            let message = match err {
                ApiError::Unauthorized => "Invalid email or password".to_string(),
                other => other.user_message("Login failed"),
            };
            let page = Html(render_login(&form.email, Some(&message), None));
            respond(&state, jar, &session, page)
        }
    }
}

pub async fn register_page() -> Html<String> {
    Html(render_register(&RegisterView::default()))
}

pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<RegisterForm>,
) -> (CookieJar, Response) {
    let session = Session::from_jar("/register", &jar);
    let failed = |message: &str| {
        Html(render_register(&RegisterView {
            first_name: &form.first_name,
            last_name: &form.last_name,
            email: &form.email,
            error: Some(message),
        }))
    };

    if let Err(message) = check(&form, &REGISTER_FIELDS) {
        let page = failed(&message);
        return respond(&state, jar, &session, page);
    }

    let result = auth::register(
        &state.api,
        &session,
        form.first_name.trim(),
        form.last_name.trim(),
        form.email.trim(),
        &form.password,
    )
    .await;

    match result {
        Ok(_) => respond(&state, jar, &session, Redirect::to("/login?registered=1")),
        Err(err) => {
            warn!(email = %form.email, error = %err, "registration failed");
            let page = failed(&err.user_message("Registration failed"));
            respond(&state, jar, &session, page)
        }
    }
}

pub async fn change_password_page() -> Html<String> {
    Html(render_change_password("", None, None))
}

pub async fn change_password(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<ChangePasswordForm>,
) -> (CookieJar, Response) {
    let session = Session::from_jar("/change-password", &jar);

    if let Err(message) = check(&form, &CHANGE_PASSWORD_FIELDS) {
        let page = Html(render_change_password(&form.email, Some(&message), None));
        return respond(&state, jar, &session, page);
    }

    match auth::change_password(&state.api, &session, form.email.trim(), &form.new_password).await {
        Ok(message) => {
            let message = message
                .unwrap_or_else(|| "Password has been changed. You can now sign in.".to_string());
            let page = Html(render_change_password(&form.email, None, Some(&message)));
            respond(&state, jar, &session, page)
        }
        Err(err) => {
            warn!(email = %form.email, error = %err, "password change failed");
            let message = err.user_message("Password change failed");
            let page = Html(render_change_password(&form.email, Some(&message), None));
            respond(&state, jar, &session, page)
        }
    }
}

pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let session = Session::from_jar("/logout", &jar);
    auth::logout(&state.api, &session).await;
    info!("signed out");
    let jar = session.persist(jar, state.config.secure_cookies);
    (jar, Redirect::to("/login"))
}
