use super::{escape, fill, page, status};

pub fn render_login(email: &str, error: Option<&str>, notice: Option<&str>) -> String {
    let body = fill(
        LOGIN_HTML,
        &[
            ("EMAIL", escape(email).as_str()),
            ("ERROR", status(error, "error").as_str()),
            ("NOTICE", status(notice, "ok").as_str()),
        ],
    );
    page("Sign in", None, &body)
}

#[derive(Debug, Default)]
pub struct RegisterView<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub error: Option<&'a str>,
}

pub fn render_register(view: &RegisterView<'_>) -> String {
    let body = fill(
        REGISTER_HTML,
        &[
            ("FIRST_NAME", escape(view.first_name).as_str()),
            ("LAST_NAME", escape(view.last_name).as_str()),
            ("EMAIL", escape(view.email).as_str()),
            ("ERROR", status(view.error, "error").as_str()),
        ],
    );
    page("Create account", None, &body)
}

/// `success` switches the page to its confirmation state, which sends the
/// user on to the login page after a short pause.
pub fn render_change_password(email: &str, error: Option<&str>, success: Option<&str>) -> String {
    let refresh = if success.is_some() {
        r#"<meta http-equiv="refresh" content="2;url=/login" />"#
    } else {
        ""
    };
    let body = fill(
        CHANGE_PASSWORD_HTML,
        &[
            ("REFRESH", refresh),
            ("EMAIL", escape(email).as_str()),
            ("ERROR", status(error, "error").as_str()),
            ("SUCCESS", status(success, "ok").as_str()),
        ],
    );
    page("Reset your password", None, &body)
}

const LOGIN_HTML: &str = r#"<section class="card narrow">
      <h1>Welcome back</h1>
      <p class="subtitle">Sign in to keep tracking your mood</p>
      {{NOTICE}}
      <form method="post" action="/login" class="card" style="border:none;padding:0">
        <div>
          <label for="email">Email</label>
          <input id="email" name="email" type="email" value="{{EMAIL}}" autocomplete="email" required />
        </div>
        <div>
          <label for="password">Password</label>
          <input id="password" name="password" type="password" autocomplete="current-password" required />
        </div>
        {{ERROR}}
        <button type="submit">Sign in</button>
      </form>
      <p class="links">No account yet? <a href="/register">Sign up</a> · <a href="/change-password">Forgot password?</a></p>
    </section>"#;

const REGISTER_HTML: &str = r#"<section class="card narrow">
      <h1>Create account</h1>
      <p class="subtitle">Join and start tracking your mood</p>
      <form method="post" action="/register" class="card" style="border:none;padding:0">
        <div class="row">
          <div>
            <label for="first_name">First name</label>
            <input id="first_name" name="first_name" value="{{FIRST_NAME}}" autocomplete="given-name" minlength="2" required />
          </div>
          <div>
            <label for="last_name">Last name</label>
            <input id="last_name" name="last_name" value="{{LAST_NAME}}" autocomplete="family-name" minlength="2" required />
          </div>
        </div>
        <div>
          <label for="email">Email</label>
          <input id="email" name="email" type="email" value="{{EMAIL}}" autocomplete="email" maxlength="60" required />
        </div>
        <div>
          <label for="password">Password</label>
          <input id="password" name="password" type="password" autocomplete="new-password" minlength="8" required />
          <div class="counter">At least 8 characters.</div>
        </div>
        {{ERROR}}
        <button type="submit">Sign up</button>
      </form>
      <p class="links">Have an account? <a href="/login">Sign in</a></p>
    </section>"#;

const CHANGE_PASSWORD_HTML: &str = r#"{{REFRESH}}
    <section class="card narrow">
      <h1>Reset your password</h1>
      <p class="subtitle">Enter your email and a new password to continue.</p>
      <form method="post" action="/change-password" class="card" style="border:none;padding:0">
        <div>
          <label for="email">Email</label>
          <input id="email" name="email" type="email" value="{{EMAIL}}" autocomplete="email" required />
        </div>
        <div>
          <label for="new_password">New password</label>
          <input id="new_password" name="new_password" type="password" autocomplete="new-password" minlength="8" maxlength="30" required />
          <div class="counter">8–30 characters.</div>
        </div>
        {{ERROR}}
        {{SUCCESS}}
        <button type="submit">Update password</button>
      </form>
      <p class="links">Remembered it? <a href="/login">Sign in</a></p>
    </section>"#;
