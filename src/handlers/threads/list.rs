use axum::{extract::State, Extension, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use super::render_timestamp;
use crate::auth::AuthUser;
use crate::error::Result;
use crate::AppState;

#[derive(Debug, FromRow)]
struct ThreadRow {
    id: i64,
    title: String,
    author: String,
    creation_timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ThreadSummary {
    id: i64,
    title: String,
    author: String,
    updated: String,
}

/// GET /api/threads - every thread, most recently created first.
pub async fn list_threads(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<ThreadSummary>>> {
    tracing::info!("Fetching list of threads for user \"{}\"", user.0);

    let threads: Vec<ThreadRow> = sqlx::query_as(
        "SELECT id, title, author, creation_timestamp \
         FROM threads \
         ORDER BY creation_timestamp DESC",
    )
    .fetch_all(&state.pool)
    .await?;

    let response: Vec<ThreadSummary> = threads
        .into_iter()
        .map(|thread| ThreadSummary {
            id: thread.id,
            title: thread.title,
            author: thread.author,
            updated: render_timestamp(&thread.creation_timestamp),
        })
        .collect();

    tracing::debug!("Generated response data for thread listing: {response:?}");
    Ok(Json(response))
}
