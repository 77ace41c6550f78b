mod answer;
mod create;
mod delete;
mod list;
mod show;

pub use answer::answer_thread;
pub use create::create_thread;
pub use delete::delete_thread;
pub use list::list_threads;
pub use show::get_thread;

use chrono::{DateTime, Utc};

/// Timestamps cross the wire as strings, in the shape the database's own
/// text rendering uses (offset included).
pub(crate) fn render_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S%:z").to_string()
}
