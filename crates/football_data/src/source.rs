use anyhow::{Context, Result};
use async_trait::async_trait;
use football_types::Dataset;
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};

pub const USER_AGENT: &str = "matchday/0.1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Anything that can hand over a whole dataset in one retrieval.
#[async_trait]
pub trait DataSource: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch(&self) -> Result<Dataset>;
}

pub fn build_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// Non-success response from a source. Kept as a typed error so the status
/// code survives into the event log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpStatus {
    pub code: u16,
    pub url:  String,
}

impl fmt::Display for HttpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {} from {}", self.code, self.url)
    }
}

impl std::error::Error for HttpStatus {}

/// First `max` chars of a response body, for log lines.
pub(crate) fn preview(body: &str, max: usize) -> String {
    body.chars().take(max).collect()
}

/// One JSON document at a fixed URL, shaped
/// `{ leagues, teams, players, matches }` or wrapped under `data`.
pub struct RemoteSource {
    client:  reqwest::Client,
    url:     String,
    api_key: Option<(String, String)>,
}

impl RemoteSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client:  build_client(timeout),
            url:     url.into(),
            api_key: None,
        }
    }

    /// Send a static key with every request, e.g. `("X-Auth-Token", key)`.
    pub fn with_api_key(mut self, header: impl Into<String>, key: impl Into<String>) -> Self {
        self.api_key = Some((header.into(), key.into()));
        self
    }
}

#[async_trait]
impl DataSource for RemoteSource {
    fn name(&self) -> &str {
        "remote"
    }

    async fn fetch(&self) -> Result<Dataset> {
        let mut req = self.client.get(&self.url).header("Accept", "application/json");
        if let Some((header, key)) = &self.api_key {
            req = req.header(header.as_str(), key.as_str());
        }

        let resp = req
            .send()
            .await
            .with_context(|| format!("GET {} failed", self.url))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!("Remote source HTTP {status}: {}", preview(&body, 100));
            return Err(HttpStatus { code: status.as_u16(), url: self.url.clone() }.into());
        }

        let raw = resp.text().await.context("reading remote body failed")?;
        let dataset = Dataset::from_json_str(&raw).context("remote body is not a dataset")?;
        debug!(
            leagues = dataset.leagues.len(),
            teams = dataset.teams.len(),
            players = dataset.players.len(),
            matches = dataset.matches.len(),
            "Remote dataset fetched"
        );
        Ok(dataset)
    }
}
