use axum::{extract::Path, response::Html, Extension};

use crate::auth::AuthUser;

const THREAD_LIST_PAGE: &str = include_str!("../../static/thread_list.html");
const THREAD_PAGE: &str = include_str!("../../static/thread.html");

/// GET / - the thread list page.
pub async fn thread_list_page(Extension(user): Extension<AuthUser>) -> Html<&'static str> {
    tracing::info!("Returning thread list HTML page for user \"{}\"", user.0);
    Html(THREAD_LIST_PAGE)
}

/// GET /thread/:thread_id - the thread page. The id only appears in the log
/// line; the page itself reads it from the URL and calls the JSON API.
pub async fn thread_page(
    Path(thread_id): Path<i64>,
    Extension(user): Extension<AuthUser>,
) -> Html<&'static str> {
    tracing::info!(
        "Returning thread HTML page for user \"{}\" ({thread_id})",
        user.0
    );
    Html(THREAD_PAGE)
}
