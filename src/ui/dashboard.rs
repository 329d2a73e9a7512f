use super::{escape, fill, page, status};
use crate::models::{MAX_SCORE, MIN_SCORE, MoodEntry, SortOrder, mood_icon, mood_label};

/// Values of the create form, or of the inline edit form.
#[derive(Debug, Clone)]
pub struct MoodFormView {
    pub date: String,
    pub score: u8,
    pub note: String,
    pub error: Option<String>,
    pub ok: Option<String>,
}

impl MoodFormView {
    pub fn blank(date: &str) -> Self {
        Self {
            date: date.to_string(),
            score: MAX_SCORE,
            note: String::new(),
            error: None,
            ok: None,
        }
    }

    pub fn from_entry(entry: &MoodEntry) -> Self {
        Self {
            date: entry.date.clone(),
            score: entry.score,
            note: entry.note.clone().unwrap_or_default(),
            error: None,
            ok: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DashboardView {
    pub from: String,
    pub to: String,
    pub sort: SortOrder,
    pub moods: Vec<MoodEntry>,
    pub list_error: Option<String>,
    pub create: MoodFormView,
    /// Entry being edited in place, with its form values.
    pub editing: Option<(i64, MoodFormView)>,
}

impl DashboardView {
    /// Query string that reproduces the current filter.
    pub fn filter_query(&self) -> String {
        format!("from={}&to={}&sort={}", self.from, self.to, self.sort.as_str())
    }
}

pub fn render_dashboard(view: &DashboardView) -> String {
    let query = view.filter_query();
    let pick = view.create.score;

    let body = fill(
        DASHBOARD_HTML,
        &[
            ("QUERY", escape(&query).as_str()),
            ("PICK_ICON", mood_icon(pick)),
            ("PICK_LABEL", mood_label(pick)),
            ("DATE", escape(&view.create.date).as_str()),
            ("SCORE_OPTIONS", score_options(view.create.score).as_str()),
            ("NOTE", escape(&view.create.note).as_str()),
            ("NOTE_COUNT", view.create.note.chars().count().to_string().as_str()),
            ("FORM_ERROR", status(view.create.error.as_deref(), "error").as_str()),
            ("FORM_OK", status(view.create.ok.as_deref(), "ok").as_str()),
            ("FROM", escape(&view.from).as_str()),
            ("TO", escape(&view.to).as_str()),
            ("SORT_OPTIONS", sort_options(view.sort).as_str()),
            ("LIST_ERROR", status(view.list_error.as_deref(), "error").as_str()),
            ("MOODS", render_moods(view, &query).as_str()),
        ],
    );
    page("Dashboard", Some("/dashboard"), &body)
}

fn render_moods(view: &DashboardView, query: &str) -> String {
    if view.moods.is_empty() {
        return r#"<div class="empty">No moods in this range.</div>"#.to_string();
    }

    view.moods
        .iter()
        .map(|mood| match &view.editing {
            Some((id, form)) if *id == mood.id => render_edit(mood.id, form, query),
            _ => render_card(mood, query),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_card(mood: &MoodEntry, query: &str) -> String {
    let note = match &mood.note {
        Some(note) if !note.is_empty() => format!(r#"<div class="mood-note">{}</div>"#, escape(note)),
        _ => String::new(),
    };
    fill(
        CARD_HTML,
        &[
            ("ID", mood.id.to_string().as_str()),
            ("ICON", mood_icon(mood.score)),
            ("LABEL", mood_label(mood.score)),
            ("DATE", escape(&mood.date).as_str()),
            ("QUERY", escape(query).as_str()),
            ("NOTE", note.as_str()),
        ],
    )
}

fn render_edit(id: i64, form: &MoodFormView, query: &str) -> String {
    fill(
        EDIT_HTML,
        &[
            ("ID", id.to_string().as_str()),
            ("QUERY", escape(query).as_str()),
            ("DATE", escape(&form.date).as_str()),
            ("SCORE_OPTIONS", score_options(form.score).as_str()),
            ("NOTE", escape(&form.note).as_str()),
            ("ERROR", status(form.error.as_deref(), "error").as_str()),
        ],
    )
}

fn score_options(selected: u8) -> String {
    (MIN_SCORE..=MAX_SCORE)
        .rev()
        .map(|score| {
            format!(
                r#"<option value="{score}"{}>{} {}</option>"#,
                if score == selected { " selected" } else { "" },
                mood_label(score),
                mood_icon(score)
            )
        })
        .collect::<Vec<_>>()
        .join("")
}

fn sort_options(sort: SortOrder) -> String {
    [(SortOrder::Desc, "Newest first"), (SortOrder::Asc, "Oldest first")]
        .iter()
        .map(|(order, label)| {
            format!(
                r#"<option value="{}"{}>{label}</option>"#,
                order.as_str(),
                if *order == sort { " selected" } else { "" }
            )
        })
        .collect::<Vec<_>>()
        .join("")
}

const DASHBOARD_HTML: &str = r#"<section>
      <h1>How are you feeling today?</h1>
      <p class="subtitle">Track your emotional journey with mindful awareness and gentle reflection</p>
    </section>

    <section class="grid">
      <div class="card soft">
        <h2>Record Your Daily Mood</h2>
        <div><span class="mood-icon">{{PICK_ICON}}</span> {{PICK_LABEL}}</div>
        <form method="post" action="/dashboard/moods?{{QUERY}}" class="card" style="border:none;padding:0;background:none">
          <div class="row">
            <div>
              <label for="date">Date</label>
              <input id="date" name="date" type="date" value="{{DATE}}" required />
            </div>
            <div>
              <label for="score">Current Mood</label>
              <select id="score" name="score">{{SCORE_OPTIONS}}</select>
            </div>
          </div>
          <div>
            <label for="note">Notes (Optional)</label>
            <textarea id="note" name="note" maxlength="500" placeholder="What's on your mind? How did this mood come about?">{{NOTE}}</textarea>
            <div class="counter">{{NOTE_COUNT}}/500</div>
          </div>
          {{FORM_ERROR}}
          {{FORM_OK}}
          <button type="submit">Save Mood Entry</button>
        </form>
      </div>

      <div class="card">
        <form method="get" action="/dashboard" class="row">
          <div>
            <label for="from">From</label>
            <input id="from" name="from" type="date" value="{{FROM}}" />
          </div>
          <div>
            <label for="to">To</label>
            <input id="to" name="to" type="date" value="{{TO}}" />
          </div>
          <div>
            <label for="sort">Sort By</label>
            <select id="sort" name="sort">{{SORT_OPTIONS}}</select>
          </div>
          <button type="submit">Apply</button>
        </form>
        {{LIST_ERROR}}
        <div class="moods">
          {{MOODS}}
        </div>
      </div>
    </section>"#;

const CARD_HTML: &str = r#"<article class="mood" id="mood-{{ID}}">
            <div class="mood-head">
              <div>
                <span class="mood-icon">{{ICON}}</span>
                <strong>{{LABEL}}</strong>
                <div class="mood-date">{{DATE}}</div>
              </div>
              <div class="mood-actions">
                <a title="Edit" href="/dashboard?{{QUERY}}&amp;edit={{ID}}#mood-{{ID}}">✏️</a>
                <form method="post" action="/dashboard/moods/{{ID}}/delete?{{QUERY}}" onsubmit="return confirm('Delete this mood?')">
                  <button title="Delete" type="submit">🗑️</button>
                </form>
              </div>
            </div>
            {{NOTE}}
          </article>"#;

const EDIT_HTML: &str = r#"<article class="mood" id="mood-{{ID}}">
            <form method="post" action="/dashboard/moods/{{ID}}/update?{{QUERY}}" class="card" style="border:none;padding:0;background:none">
              <div class="row">
                <div>
                  <label for="edit-date">Date</label>
                  <input id="edit-date" name="date" type="date" value="{{DATE}}" required />
                </div>
                <div>
                  <label for="edit-score">Mood</label>
                  <select id="edit-score" name="score">{{SCORE_OPTIONS}}</select>
                </div>
              </div>
              <div>
                <label for="edit-note">Note</label>
                <textarea id="edit-note" name="note" maxlength="500">{{NOTE}}</textarea>
              </div>
              {{ERROR}}
              <div class="row">
                <button type="submit">Save changes</button>
                <a class="button secondary" href="/dashboard?{{QUERY}}#mood-{{ID}}">Cancel</a>
              </div>
            </form>
          </article>"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn view(moods: Vec<MoodEntry>) -> DashboardView {
        DashboardView {
            from: "2026-01-01".into(),
            to: "2026-01-31".into(),
            sort: SortOrder::Desc,
            moods,
            list_error: None,
            create: MoodFormView::blank("2026-01-31"),
            editing: None,
        }
    }

    fn entry(id: i64, note: Option<&str>) -> MoodEntry {
        MoodEntry {
            id,
            date: "2026-01-10".into(),
            score: 2,
            note: note.map(str::to_string),
        }
    }

    #[test]
    fn empty_range_message() {
        let html = render_dashboard(&view(Vec::new()));
        assert!(html.contains("No moods in this range."));
    }

    #[test]
    fn cards_escape_notes_and_keep_filter() {
        let html = render_dashboard(&view(vec![entry(4, Some("<script>x</script>"))]));
        assert!(html.contains("&lt;script&gt;x&lt;/script&gt;"));
        assert!(!html.contains("<script>x</script>"));
        assert!(html.contains("/dashboard/moods/4/delete?from=2026-01-01&amp;to=2026-01-31&amp;sort=desc"));
        assert!(html.contains("Bad"));
    }

    #[test]
    fn editing_entry_renders_inline_form() {
        let mut dashboard = view(vec![entry(4, Some("tired")), entry(5, None)]);
        dashboard.editing = Some((4, MoodFormView::from_entry(&dashboard.moods[0])));
        let html = render_dashboard(&dashboard);
        assert!(html.contains("/dashboard/moods/4/update?"));
        assert!(!html.contains("/dashboard/moods/5/update?"));
        assert!(html.contains("/dashboard/moods/5/delete?"));
        assert!(html.contains(r#"<option value="2" selected>"#));
    }

    #[test]
    fn score_options_run_from_happy_down() {
        let options = score_options(3);
        assert!(options.starts_with(r#"<option value="5">Happy"#));
        assert!(options.contains(r#"<option value="3" selected>Neutral"#));
    }
}
