use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Path, State},
    Extension, Json,
};
use serde_json::{json, Value};

use crate::auth::AuthUser;
use crate::error::{ApiError, Result};
use crate::AppState;

/// PUT /api/threads/:thread_id - post a response. The body is a bare JSON
/// string holding the comment. The thread id is not checked here; the
/// schema's foreign key rejects responses to non-existent threads.
pub async fn answer_thread(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Path(thread_id): Path<i64>,
    body: String,
) -> Result<Json<Value>> {
    tracing::info!(
        "Responding to thread ID {thread_id} for user \"{}\"",
        user.0
    );

    let log_suffix = format!(" from user \"{}\": {body}", user.0);
    let comment = parse_comment_body(&body, &log_suffix)?;

    tracing::info!(
        "Responding to thread ID {thread_id} for \"{}\" with comment \"{comment}\"",
        user.0
    );

    sqlx::query(
        "INSERT INTO thread_responses (thread_id, comment, author, source_ip) \
         VALUES ($1, $2, $3, $4)",
    )
    .bind(thread_id)
    .bind(&comment)
    .bind(&user.0)
    .bind(addr.ip().to_string())
    .execute(&state.pool)
    .await?;

    Ok(Json(json!("OK")))
}

/// The body must parse as a non-empty JSON string.
fn parse_comment_body(body: &str, log_suffix: &str) -> Result<String> {
    let data: Value = match serde_json::from_str(body) {
        Ok(data) => data,
        Err(_) => {
            tracing::warn!("Could not parse request data as JSON{log_suffix}");
            return Err(ApiError::bad_request("Invalid format of request body"));
        }
    };

    let Some(comment) = data.as_str() else {
        tracing::warn!("Could not parse request data as a string{log_suffix}");
        return Err(ApiError::bad_request("Invalid format of request body"));
    };

    if comment.is_empty() {
        tracing::warn!("Request body contains an empty string{log_suffix}");
        return Err(ApiError::bad_request("Invalid value for request body"));
    }

    Ok(comment.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(body: &str) -> String {
        match parse_comment_body(body, "") {
            Err(ApiError::BadRequest(message)) => message,
            other => panic!("expected BadRequest, got {other:?}"),
        }
    }

    #[test]
    fn accepts_json_string() {
        assert_eq!(parse_comment_body(r#""Agreed!""#, "").unwrap(), "Agreed!");
    }

    #[test]
    fn rejects_unparsable_body() {
        assert_eq!(message("not json"), "Invalid format of request body");
    }

    #[test]
    fn rejects_non_string_json() {
        assert_eq!(message("42"), "Invalid format of request body");
        assert_eq!(message(r#"{"comment": "hi"}"#), "Invalid format of request body");
    }

    #[test]
    fn rejects_empty_string() {
        assert_eq!(message(r#""""#), "Invalid value for request body");
    }
}
