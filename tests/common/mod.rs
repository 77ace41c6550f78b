use std::collections::BTreeMap;
use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use serde::Deserialize;

static SERVER: OnceLock<TestServer> = OnceLock::new();

/// The slice of the server configuration the tests care about.
#[derive(Deserialize)]
struct TestConfig {
    app_users: BTreeMap<String, String>,
}

pub struct TestServer {
    pub base_url: String,
    /// Username/password pairs from the config file, in stable order.
    pub users: Vec<(String, String)>,
    #[allow(dead_code)]
    child: Child,
}

impl TestServer {
    fn spawn(config_path: &str) -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let raw = std::fs::read_to_string(config_path)
            .with_context(|| format!("failed to read test config {config_path}"))?;
        let config: TestConfig =
            serde_yaml::from_str(&raw).context("failed to parse test config")?;
        let users: Vec<(String, String)> = config.app_users.into_iter().collect();

        let mut cmd = Command::new(env!("CARGO_BIN_EXE_forum-api-rust"));
        cmd.arg("--config")
            .arg(config_path)
            .env("FORUM_API_PORT", port.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self {
            base_url,
            users,
            child,
        })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/is_the_server_up_and_running", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status().is_success() {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!(
            "server did not become ready on {} within {:?}",
            self.base_url,
            timeout
        )
    }
}

/// Spawns the server once per test binary, against the configuration named
/// by FORUM_TEST_CONFIG. Returns None (skip) when the variable is unset,
/// since these tests need a reachable PostgreSQL.
pub async fn ensure_server() -> Result<Option<&'static TestServer>> {
    let Ok(config_path) = std::env::var("FORUM_TEST_CONFIG") else {
        eprintln!("FORUM_TEST_CONFIG not set; skipping test that needs a live PostgreSQL");
        return Ok(None);
    };

    let server = SERVER
        .get_or_init(|| TestServer::spawn(&config_path).expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(Some(server))
}

/// A title that is unique across test runs, so reruns against a persistent
/// database never collide with the unique-title constraint.
#[allow(dead_code)]
pub fn unique_title(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos();
    format!("{prefix} {nanos}")
}
