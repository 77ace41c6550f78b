use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use super::render_timestamp;
use crate::auth::AuthUser;
use crate::error::{ApiError, Result};
use crate::AppState;

#[derive(Debug, FromRow)]
struct ThreadRow {
    title: String,
    topic_description: String,
    author: String,
    creation_timestamp: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct ResponseRow {
    comment: String,
    author: String,
    response_timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ThreadContent {
    title: String,
    topic_description: String,
    created: String,
    author: String,
    responses: Vec<ThreadResponse>,
}

#[derive(Debug, Serialize)]
struct ThreadResponse {
    comment: String,
    author: String,
    responded: String,
}

/// GET /api/threads/:thread_id - thread content plus its responses, oldest
/// response first. An unknown id is a server error, not a 404; clients rely
/// on that contract (a documented quirk, see DESIGN.md).
pub async fn get_thread(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(thread_id): Path<i64>,
) -> Result<Json<ThreadContent>> {
    tracing::info!(
        "Fetching content of thread ID {thread_id} for user \"{}\"",
        user.0
    );

    let mut tx = state.pool.begin().await?;

    let thread: Option<ThreadRow> = sqlx::query_as(
        "SELECT title, topic_description, author, creation_timestamp \
         FROM threads WHERE id = $1",
    )
    .bind(thread_id)
    .fetch_optional(&mut *tx)
    .await?;

    let thread = thread.ok_or_else(|| {
        ApiError::internal(format!(
            "Failed to fetch thread content for user \"{}\": no thread with ID {thread_id}",
            user.0
        ))
    })?;

    let responses: Vec<ResponseRow> = sqlx::query_as(
        "SELECT comment, author, response_timestamp \
         FROM thread_responses \
         WHERE thread_id = $1 \
         ORDER BY response_timestamp ASC",
    )
    .bind(thread_id)
    .fetch_all(&mut *tx)
    .await?;

    tx.commit().await?;

    let response = ThreadContent {
        title: thread.title,
        topic_description: thread.topic_description,
        created: render_timestamp(&thread.creation_timestamp),
        author: thread.author,
        responses: responses
            .into_iter()
            .map(|row| ThreadResponse {
                comment: row.comment,
                author: row.author,
                responded: render_timestamp(&row.response_timestamp),
            })
            .collect(),
    };

    tracing::debug!("Generated response data for thread content: {response:?}");
    Ok(Json(response))
}
