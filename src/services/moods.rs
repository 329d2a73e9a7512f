use crate::client::ApiClient;
use crate::config::UpdateAddressing;
use crate::errors::ApiError;
use crate::models::{MoodEntry, MoodUpdate, NewMood};
use crate::normalize::{normalize_list, normalize_mood};
use crate::session::Session;
use reqwest::Method;
use serde_json::Value;
use tracing::info;

/// Entries dated `start..=end`, in the order the API returned them.
pub async fn get_moods_range(
    api: &ApiClient,
    session: &Session,
    start: &str,
    end: &str,
) -> Result<Vec<MoodEntry>, ApiError> {
    let request = api
        .request(Method::GET, "/api/moods/range")
        .query(&[("start", start), ("end", end)]);
    let body: Value = api.send_json(session, request).await?;
    let moods = normalize_list(&body);
    info!(start, end, count = moods.len(), "loaded moods");
    Ok(moods)
}

/// `None` means the API acknowledged without echoing the record (an empty or
/// plain-text body); reload the range to see it.
pub async fn create_mood(
    api: &ApiClient,
    session: &Session,
    mood: &NewMood,
) -> Result<Option<MoodEntry>, ApiError> {
    let request = api.request(Method::POST, "/api/moods/create").json(mood);
    let created = api.send_optional_json(session, request).await?;
    info!(date = %mood.date, score = mood.mood_score, "created mood");
    Ok(created.as_ref().and_then(echoed_record))
}

/// Updates entry `id`. `addressing` picks the endpoint shape the deployed
/// backend understands; the result is the same either way.
pub async fn update_mood(
    api: &ApiClient,
    session: &Session,
    addressing: UpdateAddressing,
    id: i64,
    update: &MoodUpdate,
) -> Result<Option<MoodEntry>, ApiError> {
    let request = match addressing {
        UpdateAddressing::PerRecord => api
            .request(Method::PUT, &format!("/api/moods/update/{id}"))
            .json(update),
        UpdateAddressing::Collection => {
            let mut body = serde_json::to_value(update)?;
            if let Value::Object(map) = &mut body {
                map.insert("id".into(), Value::from(id));
            }
            api.request(Method::PUT, "/api/moods/update").json(&body)
        }
    };
    let updated = api.send_optional_json(session, request).await?;
    info!(id, date = %update.date, "updated mood");
    Ok(updated.as_ref().and_then(echoed_record))
}

fn echoed_record(body: &Value) -> Option<MoodEntry> {
    body.is_object().then(|| normalize_mood(body))
}

pub async fn delete_mood(api: &ApiClient, session: &Session, id: i64) -> Result<(), ApiError> {
    let request = api
        .request(Method::DELETE, "/api/moods/delete")
        .query(&[("id", id)]);
    api.send(session, request).await?;
    info!(id, "deleted mood");
    Ok(())
}
