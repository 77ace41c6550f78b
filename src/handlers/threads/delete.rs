use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde_json::{json, Value};

use crate::auth::AuthUser;
use crate::error::{ApiError, Result};
use crate::AppState;

/// DELETE /api/threads/:thread_id - remove a thread and all of its responses
/// in one transaction. Only the thread's author may delete it; anyone else
/// gets a 200 carrying the author's username, which is what clients match
/// on (a documented quirk, see DESIGN.md). An unknown id is a server error,
/// not a 404, same contract as get_thread.
pub async fn delete_thread(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(thread_id): Path<i64>,
) -> Result<Json<Value>> {
    tracing::info!("Deleting thread ID {thread_id} for user \"{}\"", user.0);

    let mut tx = state.pool.begin().await?;

    let row: Option<(String,)> = sqlx::query_as("SELECT author FROM threads WHERE id = $1")
        .bind(thread_id)
        .fetch_optional(&mut *tx)
        .await?;

    let (thread_author,) = row.ok_or_else(|| {
        ApiError::internal(format!(
            "Failed to delete thread ID {thread_id} for user \"{}\": no such thread",
            user.0
        ))
    })?;

    if thread_author != user.0 {
        tracing::warn!(
            "User \"{}\" may not delete thread ID {thread_id} owned by \"{thread_author}\"",
            user.0
        );
        return Ok(Json(json!(thread_author)));
    }

    sqlx::query("DELETE FROM thread_responses WHERE thread_id = $1")
        .bind(thread_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM threads WHERE id = $1")
        .bind(thread_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(Json(json!("OK")))
}
