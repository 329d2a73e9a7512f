use super::respond;
use crate::errors::AppError;
use crate::models::AnalysisResult;
use crate::plan::parse_plan;
use crate::services::ai;
use crate::session::Session;
use crate::state::AppState;
use crate::ui::stats::{StatsView, render_stats};
use axum::{
    Form,
    extract::State,
    http::header,
    response::{Html, IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use tracing::warn;

const ROUTE: &str = "/statistics";

pub async fn stats_page() -> Html<String> {
    Html(render_stats(&StatsView::default()))
}

pub async fn analyze(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Response) {
    let session = Session::from_jar(ROUTE, &jar);

    let view = match ai::analyze(&state.api, &session).await {
        Ok(analysis) => StatsView {
            analysis: Some(analysis),
            ..StatsView::default()
        },
        Err(err) => {
            warn!(error = %err, "analysis failed");
            StatsView {
                error: Some(err.user_message("Analyze failed")),
                ..StatsView::default()
            }
        }
    };

    respond(&state, jar, &session, Html(render_stats(&view)))
}

#[derive(Debug, Default, Deserialize)]
pub struct PlanForm {
    /// The analysis on display when the plan was requested, as JSON.
    #[serde(default)]
    pub analysis: String,
}

pub async fn plan(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<PlanForm>,
) -> (CookieJar, Response) {
    let session = Session::from_jar(ROUTE, &jar);
    let analysis = serde_json::from_str::<AnalysisResult>(&form.analysis).ok();

    let view = match ai::create_plan(&state.api, &session).await {
        Ok(plan) => StatsView {
            analysis,
            plan: Some(parse_plan(&plan.response)),
            error: None,
        },
        Err(err) => {
            warn!(error = %err, "plan generation failed");
            StatsView {
                analysis,
                plan: None,
                error: Some(err.user_message("Plan generation failed")),
            }
        }
    };

    respond(&state, jar, &session, Html(render_stats(&view)))
}

#[derive(Debug, Default, Deserialize)]
pub struct DownloadForm {
    #[serde(default)]
    pub plan: String,
}

/// Sends the rendered plan back as a text file.
pub async fn download(Form(form): Form<DownloadForm>) -> Result<impl IntoResponse, AppError> {
    if form.plan.trim().is_empty() {
        return Err(AppError::bad_request("There is no plan to download"));
    }
    // Browsers submit textarea content with CRLF line breaks.
    let text = form.plan.replace("\r\n", "\n");
    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"mood-plan.txt\"",
            ),
        ],
        text,
    ))
}
