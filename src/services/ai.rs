use crate::client::ApiClient;
use crate::errors::ApiError;
use crate::models::{AnalysisResult, PlanResponse};
use crate::session::Session;
use reqwest::Method;
use tracing::info;

// The AI endpoints live outside the /api prefix.

pub async fn analyze(api: &ApiClient, session: &Session) -> Result<AnalysisResult, ApiError> {
    let request = api.request(Method::POST, "/ai/analyze");
    let result: AnalysisResult = api.send_json(session, request).await?;
    info!(
        average = ?result.average,
        suggestions = result.suggestions.len(),
        "analysis received"
    );
    Ok(result)
}

pub async fn create_plan(api: &ApiClient, session: &Session) -> Result<PlanResponse, ApiError> {
    let request = api.request(Method::POST, "/ai/plan");
    let plan: PlanResponse = api.send_json(session, request).await?;
    info!(chars = plan.response.len(), "plan received");
    Ok(plan)
}
