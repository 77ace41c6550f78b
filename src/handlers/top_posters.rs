use axum::{extract::State, Extension, Json};

use crate::auth::AuthUser;
use crate::error::Result;
use crate::AppState;

/// GET /api/top_posters - up to three usernames ranked by combined count of
/// authored threads and responses, most active first. Tie order is whatever
/// the database picks.
pub async fn list_top_posters(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<String>>> {
    tracing::info!("Fetching top posters for user \"{}\"", user.0);

    let top_posters: Vec<String> = sqlx::query_scalar(
        "SELECT author \
         FROM ( \
             SELECT author FROM threads \
             UNION ALL \
             SELECT author FROM thread_responses \
         ) AS combined_activities \
         GROUP BY author \
         ORDER BY COUNT(*) DESC \
         LIMIT 3",
    )
    .fetch_all(&state.pool)
    .await?;

    tracing::debug!("Generated response data for top forum posters: {top_posters:?}");
    Ok(Json(top_posters))
}
