/// GET/HEAD /is_the_server_up_and_running - unauthenticated liveness probe.
/// No database access: this answers whether the web application is serving,
/// nothing more.
pub async fn health_status() -> &'static str {
    "Yes, the web application does indeed seem to be up and running!"
}
