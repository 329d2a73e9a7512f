use serde::{Deserialize, Serialize};

pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 5;
pub const DEFAULT_SCORE: u8 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodEntry {
    pub id: i64,
    pub date: String,
    pub score: u8,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest<'a> {
    pub email: &'a str,
    pub new_password: &'a str,
}

/// Body of `POST /api/moods/create`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMood {
    pub date: String,
    pub mood_score: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Replacement values for an existing entry. `None` fields are left out of
/// the request body so the backend keeps its current value.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodUpdate {
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood_score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default)]
    pub average: Option<f64>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

impl AnalysisResult {
    pub fn has_results(&self) -> bool {
        self.average.is_some() || !self.summary.is_empty() || !self.suggestions.is_empty()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlanResponse {
    #[serde(default)]
    pub response: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanDay {
    pub day: u32,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

pub fn mood_icon(score: u8) -> &'static str {
    match score {
        1 => "😞",
        2 => "🙁",
        4 => "🙂",
        5 => "😊",
        _ => "😐",
    }
}

pub fn mood_label(score: u8) -> &'static str {
    match score {
        1 => "Very bad",
        2 => "Bad",
        4 => "Good",
        5 => "Happy",
        _ => "Neutral",
    }
}
