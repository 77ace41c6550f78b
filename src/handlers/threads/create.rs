use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, State},
    Extension, Json,
};
use serde_json::{json, Value};

use crate::auth::AuthUser;
use crate::error::{ApiError, Result};
use crate::AppState;

/// POST /api/threads - create a thread from `{title, topic_description}`.
///
/// Titles are unique. The insert resolves collisions at the database level
/// (`ON CONFLICT DO NOTHING`), so two concurrent submissions of the same
/// title cannot both create a row; the loser receives the existing thread's
/// id row instead of a fresh id.
pub async fn create_thread(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    body: String,
) -> Result<Json<Value>> {
    tracing::info!("Creating new thread for user \"{}\"", user.0);

    let log_suffix = format!(" from user \"{}\": {body}", user.0);
    let (title, topic_description) = parse_thread_body(&body, &log_suffix)?;

    tracing::info!(
        "Creating thread \"{title}\" for \"{}\" with description \"{topic_description}\"",
        user.0
    );

    let mut tx = state.pool.begin().await?;

    let inserted: Option<(i64,)> = sqlx::query_as(
        "INSERT INTO threads (title, topic_description, author) \
         VALUES ($1, $2, $3) \
         ON CONFLICT (title) DO NOTHING \
         RETURNING id",
    )
    .bind(&title)
    .bind(&topic_description)
    .bind(&user.0)
    .fetch_optional(&mut *tx)
    .await?;

    let Some((thread_id,)) = inserted else {
        let existing: (i64,) = sqlx::query_as("SELECT id FROM threads WHERE title = $1")
            .bind(&title)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;

        tracing::warn!(
            "Thread titled \"{title}\" already exists (id {}), not creating a duplicate",
            existing.0
        );
        // Clients get the raw id row here, not a plain id (documented quirk).
        return Ok(Json(json!([existing.0])));
    };

    sqlx::query("UPDATE threads SET source_ip = $1 WHERE id = $2")
        .bind(addr.ip().to_string())
        .bind(thread_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::debug!("Generated response data for thread creation: {thread_id}");
    Ok(Json(json!(thread_id)))
}

/// Validates the request body in the documented order: JSON object, required
/// keys present, values are strings, strings non-empty.
fn parse_thread_body(body: &str, log_suffix: &str) -> Result<(String, String)> {
    let data: Value = match serde_json::from_str(body) {
        Ok(data) => data,
        Err(_) => {
            tracing::warn!("Could not parse request data as JSON{log_suffix}");
            return Err(ApiError::bad_request("Invalid format of request body"));
        }
    };

    let Some(map) = data.as_object() else {
        tracing::warn!("Could not parse request data as dictionary{log_suffix}");
        return Err(ApiError::bad_request("Invalid format of request body"));
    };

    let title = required_string(map, "title", log_suffix)?;
    let topic_description = required_string(map, "topic_description", log_suffix)?;
    Ok((title.to_string(), topic_description.to_string()))
}

fn required_string<'a>(
    map: &'a serde_json::Map<String, Value>,
    key: &str,
    log_suffix: &str,
) -> Result<&'a str> {
    let Some(value) = map.get(key) else {
        tracing::warn!("Could not find key \"{key}\" in request data{log_suffix}");
        return Err(ApiError::bad_request("Missing key in request body"));
    };

    let Some(text) = value.as_str() else {
        tracing::warn!("Key \"{key}\" in request data must be a string{log_suffix}");
        return Err(ApiError::bad_request("Invalid key type in request body"));
    };

    if text.is_empty() {
        tracing::warn!("Key \"{key}\" is an empty string in request data{log_suffix}");
        return Err(ApiError::bad_request("Invalid value for key in request body"));
    }

    Ok(text)
}
