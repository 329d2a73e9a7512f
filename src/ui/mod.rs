//! HTML rendering. Pages are plain templates with `{{KEY}}` slots filled in
//! a single pass, so inserted text is never scanned for further slots.

pub mod auth;
pub mod dashboard;
pub mod stats;

/// Replaces every `{{KEY}}` in `template` with its value from `values`.
/// Unknown keys are left as they are.
pub fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let key = &after[..end];
        match values.iter().find(|(name, _)| *name == key) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after[end + 2..];
    }

    out.push_str(rest);
    out
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// A status line; empty when there is nothing to say.
pub fn status(message: Option<&str>, kind: &str) -> String {
    match message {
        Some(message) => format!(
            r#"<div class="status" data-type="{kind}" role="status">{}</div>"#,
            escape(message)
        ),
        None => String::new(),
    }
}

/// Wraps `body` in the page shell. `active` is the route of the current
/// page; signed-out pages pass `None` and get no navigation.
pub fn page(title: &str, active: Option<&str>, body: &str) -> String {
    let nav = match active {
        Some(active) => fill(
            NAV_HTML,
            &[
                ("DASHBOARD_CLASS", nav_class(active, "/dashboard")),
                ("STATISTICS_CLASS", nav_class(active, "/statistics")),
            ],
        ),
        None => String::new(),
    };
    fill(
        LAYOUT_HTML,
        &[
            ("TITLE", escape(title).as_str()),
            ("NAV", nav.as_str()),
            ("BODY", body),
        ],
    )
}

fn nav_class(active: &str, route: &str) -> &'static str {
    if active == route { "nav-link active" } else { "nav-link" }
}

const NAV_HTML: &str = r#"<header class="topbar">
      <a class="brand" href="/dashboard"><span class="leaf">🌿</span> MoodTracker</a>
      <nav>
        <a class="{{DASHBOARD_CLASS}}" href="/dashboard">Dashboard</a>
        <a class="{{STATISTICS_CLASS}}" href="/statistics">Statistics</a>
        <form method="post" action="/logout">
          <button class="link-button" type="submit">Log Out</button>
        </form>
      </nav>
    </header>"#;

const LAYOUT_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{TITLE}} · MoodTracker</title>
  <style>
    :root {
      --bg: #faf7f2;
      --card: #ffffff;
      --soft: #f4efe8;
      --line: #eee7dc;
      --ink: #1e293b;
      --muted: #64748b;
      --accent: #059669;
      --accent-dark: #047857;
      --danger: #dc2626;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Inter", "Segoe UI", "Trebuchet MS", sans-serif;
      display: flex;
      flex-direction: column;
    }

    .topbar {
      display: flex;
      align-items: center;
      justify-content: space-between;
      gap: 16px;
      padding: 14px 24px;
      border-bottom: 1px solid var(--line);
    }

    .topbar nav {
      display: flex;
      align-items: center;
      gap: 6px;
    }

    .brand {
      font-weight: 600;
      font-size: 1.2rem;
      color: var(--accent-dark);
      text-decoration: none;
    }

    .nav-link,
    .link-button {
      padding: 8px 12px;
      border-radius: 10px;
      font-size: 0.9rem;
      color: #334155;
      text-decoration: none;
      background: none;
      border: none;
      cursor: pointer;
    }

    .nav-link.active {
      color: var(--accent-dark);
      font-weight: 600;
      background: #ecfdf5;
    }

    main {
      flex: 1;
      width: min(1000px, 100%);
      margin: 0 auto;
      padding: 32px 18px 48px;
      display: grid;
      gap: 24px;
    }

    h1 {
      margin: 0;
      font-size: clamp(1.6rem, 3vw, 2.2rem);
      font-weight: 600;
      text-align: center;
    }

    .subtitle {
      margin: 8px 0 0;
      color: var(--muted);
      text-align: center;
    }

    .grid {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(300px, 1fr));
      gap: 24px;
      align-items: start;
    }

    .card {
      background: var(--card);
      border: 1px solid var(--line);
      border-radius: 16px;
      padding: 20px;
      display: grid;
      gap: 14px;
    }

    .card.soft {
      background: var(--soft);
    }

    .narrow {
      width: min(440px, 100%);
      margin: 0 auto;
    }

    label {
      display: block;
      font-size: 0.85rem;
      color: #334155;
      margin-bottom: 4px;
    }

    input,
    select,
    textarea {
      width: 100%;
      border: 1px solid #e5daca;
      border-radius: 10px;
      padding: 10px;
      font: inherit;
      background: white;
    }

    textarea {
      min-height: 110px;
      resize: vertical;
    }

    .row {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(140px, 1fr));
      gap: 12px;
      align-items: end;
    }

    button,
    .button {
      appearance: none;
      border: none;
      border-radius: 10px;
      padding: 12px 18px;
      font: inherit;
      font-weight: 600;
      cursor: pointer;
      background: var(--accent);
      color: white;
      text-decoration: none;
      text-align: center;
    }

    button.secondary,
    .button.secondary {
      background: white;
      color: #334155;
      border: 1px solid #e5daca;
    }

    .mood {
      background: #f8f5ef;
      border: 1px solid var(--line);
      border-radius: 14px;
      padding: 14px;
      display: grid;
      gap: 8px;
    }

    .mood-head {
      display: flex;
      align-items: center;
      justify-content: space-between;
      gap: 12px;
    }

    .mood-icon {
      font-size: 1.6rem;
    }

    .mood-date {
      font-size: 0.8rem;
      color: var(--muted);
    }

    .mood-actions {
      display: flex;
      gap: 8px;
      align-items: center;
    }

    .mood-actions a,
    .mood-actions button {
      background: none;
      border: none;
      padding: 4px;
      color: var(--muted);
      font-size: 1rem;
    }

    .counter {
      font-size: 0.7rem;
      color: var(--muted);
      text-align: right;
    }

    .status {
      font-size: 0.9rem;
    }

    .status[data-type="error"] {
      color: var(--danger);
    }

    .status[data-type="ok"] {
      color: var(--accent-dark);
    }

    .empty {
      color: var(--muted);
    }

    .plan-day ul {
      margin: 0;
      padding-left: 18px;
      display: grid;
      gap: 4px;
    }

    .plan-day .reflection {
      font-style: italic;
    }

    .center {
      text-align: center;
    }

    .links {
      font-size: 0.9rem;
      color: var(--muted);
      text-align: center;
    }

    .links a {
      color: var(--accent-dark);
    }

    @media (max-width: 600px) {
      .topbar {
        flex-direction: column;
      }
      button {
        width: 100%;
      }
    }
  </style>
</head>
<body>
  {{NAV}}
  <main>
    {{BODY}}
  </main>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_is_single_pass() {
        let out = fill("<p>{{A}}|{{B}}</p>", &[("A", "{{B}}"), ("B", "two")]);
        assert_eq!(out, "<p>{{B}}|two</p>");
    }

    #[test]
    fn fill_leaves_unknown_and_unclosed_slots() {
        assert_eq!(fill("{{X}} and {{A}}", &[("A", "a")]), "{{X}} and a");
        assert_eq!(fill("tail {{open", &[]), "tail {{open");
    }

    #[test]
    fn escape_covers_markup() {
        assert_eq!(
            escape(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn navigation_only_when_signed_in() {
        assert!(!page("Sign in", None, "x").contains("Log Out"));
        let html = page("Dashboard", Some("/dashboard"), "x");
        assert!(html.contains("Log Out"));
        assert!(html.contains(r#"class="nav-link active" href="/dashboard""#));
    }
}
