use super::respond;
use crate::models::{MoodEntry, MoodUpdate, NewMood, SortOrder};
use crate::services::moods;
use crate::session::Session;
use crate::state::AppState;
use crate::ui::dashboard::{DashboardView, MoodFormView, render_dashboard};
use crate::validation::{MOOD_FIELDS, MoodForm, check};
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{Html, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use tracing::{info, warn};

const ROUTE: &str = "/dashboard";

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub sort: Option<SortOrder>,
    pub edit: Option<i64>,
}

/// The range and order being looked at. Dates that do not parse fall back to
/// today.
#[derive(Debug, Clone)]
struct Filter {
    from: String,
    to: String,
    sort: SortOrder,
}

impl Filter {
    fn from_query(query: &DashboardQuery, today: NaiveDate) -> Self {
        let date = |value: &Option<String>| {
            value
                .as_deref()
                .and_then(|value| NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok())
                .unwrap_or(today)
                .format("%Y-%m-%d")
                .to_string()
        };
        Self {
            from: date(&query.from),
            to: date(&query.to),
            sort: query.sort.unwrap_or_default(),
        }
    }

    fn location(&self) -> String {
        format!(
            "{ROUTE}?from={}&to={}&sort={}",
            self.from,
            self.to,
            self.sort.as_str()
        )
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Loads the filtered range and builds the page around it. Every render is a
/// full reload from the API, unless the session expired earlier in the
/// request and the page is about to become a login redirect.
async fn load_view(
    state: &AppState,
    session: &Session,
    filter: &Filter,
    create: MoodFormView,
) -> DashboardView {
    let (moods, list_error) = if session.is_expired() {
        (Vec::new(), None)
    } else {
        match moods::get_moods_range(&state.api, session, &filter.from, &filter.to).await {
            Ok(moods) => (sort_moods(moods, filter.sort), None),
            Err(err) => {
                warn!(error = %err, "failed to load moods");
                (Vec::new(), Some(err.user_message("Failed to load moods")))
            }
        }
    };

    DashboardView {
        from: filter.from.clone(),
        to: filter.to.clone(),
        sort: filter.sort,
        moods,
        list_error,
        create,
        editing: None,
    }
}

/// Orders by date; the API does not sort. Entries with the same date keep
/// their relative order.
fn sort_moods(mut moods: Vec<MoodEntry>, sort: SortOrder) -> Vec<MoodEntry> {
    match sort {
        SortOrder::Asc => moods.sort_by(|a, b| a.date.cmp(&b.date)),
        SortOrder::Desc => moods.sort_by(|a, b| b.date.cmp(&a.date)),
    }
    moods
}

pub async fn dashboard(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<DashboardQuery>,
) -> (CookieJar, Response) {
    let session = Session::from_jar(ROUTE, &jar);
    let filter = Filter::from_query(&query, today());
    let create = MoodFormView::blank(&today().format("%Y-%m-%d").to_string());

    let mut view = load_view(&state, &session, &filter, create).await;
    if let Some(id) = query.edit {
        view.editing = view
            .moods
            .iter()
            .find(|mood| mood.id == id)
            .map(|mood| (id, MoodFormView::from_entry(mood)));
    }

    let page = Html(render_dashboard(&view));
    respond(&state, jar, &session, page)
}

pub async fn create(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<DashboardQuery>,
    Form(form): Form<MoodForm>,
) -> (CookieJar, Response) {
    let session = Session::from_jar(ROUTE, &jar);
    let filter = Filter::from_query(&query, today());
    let mut entered = MoodFormView {
        date: form.date.clone(),
        score: form.score,
        note: form.note.clone(),
        error: None,
        ok: None,
    };

    // Invalid input never reaches the API.
    if let Err(message) = check(&form, &MOOD_FIELDS) {
        info!(%message, "mood form rejected");
        entered.error = Some(message);
        let view = load_view(&state, &session, &filter, entered).await;
        return respond(&state, jar, &session, Html(render_dashboard(&view)));
    }

    let mood = NewMood {
        date: form.date.trim().to_string(),
        mood_score: form.score,
        note: form.note(),
    };

    let create = match moods::create_mood(&state.api, &session, &mood).await {
        Ok(_) => {
            let mut blank = MoodFormView::blank(&mood.date);
            blank.ok = Some("Saved!".to_string());
            blank
        }
        Err(err) => {
            warn!(error = %err, "failed to save mood");
            entered.error = Some(err.user_message("Failed to save"));
            entered
        }
    };

    let view = load_view(&state, &session, &filter, create).await;
    respond(&state, jar, &session, Html(render_dashboard(&view)))
}

pub async fn update(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<i64>,
    Query(query): Query<DashboardQuery>,
    Form(form): Form<MoodForm>,
) -> (CookieJar, Response) {
    let session = Session::from_jar(ROUTE, &jar);
    let filter = Filter::from_query(&query, today());

    let error = match check(&form, &MOOD_FIELDS) {
        Err(message) => message,
        Ok(()) => {
            let update = MoodUpdate {
                date: form.date.trim().to_string(),
                mood_score: Some(form.score),
                note: Some(form.note.trim().to_string()),
            };
            let addressing = state.config.update_addressing;
            match moods::update_mood(&state.api, &session, addressing, id, &update).await {
                Ok(_) => return respond(&state, jar, &session, Redirect::to(&filter.location())),
                Err(err) => {
                    warn!(id, error = %err, "failed to update mood");
                    err.user_message("Failed to update")
                }
            }
        }
    };

    let create = MoodFormView::blank(&today().format("%Y-%m-%d").to_string());
    let mut view = load_view(&state, &session, &filter, create).await;
    view.editing = Some((
        id,
        MoodFormView {
            date: form.date,
            score: form.score,
            note: form.note,
            error: Some(error),
            ok: None,
        },
    ));
    respond(&state, jar, &session, Html(render_dashboard(&view)))
}

pub async fn delete(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<i64>,
    Query(query): Query<DashboardQuery>,
) -> (CookieJar, Response) {
    let session = Session::from_jar(ROUTE, &jar);
    let filter = Filter::from_query(&query, today());

    match moods::delete_mood(&state.api, &session, id).await {
        Ok(()) => respond(&state, jar, &session, Redirect::to(&filter.location())),
        Err(err) => {
            warn!(id, error = %err, "failed to delete mood");
            let create = MoodFormView::blank(&today().format("%Y-%m-%d").to_string());
            let mut view = load_view(&state, &session, &filter, create).await;
            view.list_error = Some(err.user_message("Failed to delete"));
            respond(&state, jar, &session, Html(render_dashboard(&view)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ApiClient;
    use crate::config::Config;
    use crate::session::SessionEvents;
    use std::time::Duration;

    fn entry(id: i64, date: &str) -> MoodEntry {
        MoodEntry {
            id,
            date: date.into(),
            score: 3,
            note: None,
        }
    }

    #[test]
    fn filter_falls_back_to_today() {
        let today = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let query = DashboardQuery {
            from: Some("2026-01-01".into()),
            to: Some("not a date".into()),
            ..DashboardQuery::default()
        };
        let filter = Filter::from_query(&query, today);
        assert_eq!(filter.from, "2026-01-01");
        assert_eq!(filter.to, "2026-01-05");
        assert_eq!(filter.sort, SortOrder::Desc);
        assert_eq!(
            filter.location(),
            "/dashboard?from=2026-01-01&to=2026-01-05&sort=desc"
        );
    }

    #[test]
    fn sorting_by_date() {
        let moods = vec![entry(1, "2026-01-02"), entry(2, "2026-01-03"), entry(3, "2026-01-01")];
        let ids = |moods: Vec<MoodEntry>| moods.iter().map(|m| m.id).collect::<Vec<_>>();
        assert_eq!(ids(sort_moods(moods.clone(), SortOrder::Desc)), vec![2, 1, 3]);
        assert_eq!(ids(sort_moods(moods, SortOrder::Asc)), vec![3, 1, 2]);
    }

    #[tokio::test]
    async fn expired_session_skips_range_reload() {
        // Nothing listens on port 9; any request would surface as a list error.
        let api = ApiClient::new("http://127.0.0.1:9", Duration::from_secs(1), SessionEvents::new())
            .unwrap();
        let state = AppState::new(Config::default(), api);
        let session = Session::new(ROUTE, Some("stale".into()));
        session.expire();
        let filter = Filter::from_query(&DashboardQuery::default(), today());

        let view = load_view(&state, &session, &filter, MoodFormView::blank("2026-01-01")).await;

        assert!(view.moods.is_empty());
        assert_eq!(view.list_error, None);
        assert!(session.needs_login_redirect());
    }
}
