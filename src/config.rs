use anyhow::{bail, Context, Result};
use favorites_store::{FavoritesStore, SqliteStore};
use football_data::{
    FallbackPolicy, FootballData, FootballDataSource, RemoteSource, StaticSource, DEFAULT_BASE_URL,
    DEFAULT_TIMEOUT_SECS, SUPPORTED_LEAGUES,
};
use logger::EventLogger;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Which live source feeds the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Provider {
    /// A single JSON document at `MATCHDAY_API_URL`.
    #[default]
    Document,
    /// football-data.org standings.
    FootballData,
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "document" | "json" => Ok(Provider::Document),
            "football-data" | "football-data.org" => Ok(Provider::FootballData),
            other => Err(format!("unknown provider: {other}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub provider:       Provider,
    pub api_url:        Option<String>,
    pub api_key:        Option<String>,
    pub api_key_header: String,
    pub timeout:        Duration,
    pub fallback:       FallbackPolicy,
    pub leagues:        Vec<String>,
    pub favorites_db:   PathBuf,
    pub log_dir:        PathBuf,
}

impl AppConfig {
    /// Read `MATCHDAY_*` variables. Call `dotenv().ok()` first to pick up `.env`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // blank counts as unset
        let var = |key: &str| get(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let provider = match var("MATCHDAY_PROVIDER") {
            Some(v) => Provider::from_str(&v)
                .map_err(anyhow::Error::msg)
                .context("MATCHDAY_PROVIDER")?,
            None => Provider::default(),
        };
        let fallback = match var("MATCHDAY_FALLBACK") {
            Some(v) => FallbackPolicy::from_str(&v)
                .map_err(anyhow::Error::msg)
                .context("MATCHDAY_FALLBACK")?,
            None => FallbackPolicy::default(),
        };
        let timeout_secs = var("MATCHDAY_TIMEOUT_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|s| *s > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        let leagues = var("MATCHDAY_LEAGUES")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect::<Vec<_>>()
            })
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| SUPPORTED_LEAGUES.iter().map(|s| s.to_string()).collect());

        Ok(Self {
            provider,
            api_url:        var("MATCHDAY_API_URL"),
            api_key:        var("MATCHDAY_API_KEY"),
            api_key_header: var("MATCHDAY_API_KEY_HEADER").unwrap_or_else(|| "X-Auth-Token".to_string()),
            timeout:        Duration::from_secs(timeout_secs),
            fallback,
            leagues,
            favorites_db:   var("MATCHDAY_FAVORITES_DB").unwrap_or_else(|| "data/favorites.db".to_string()).into(),
            log_dir:        var("MATCHDAY_LOG_DIR").unwrap_or_else(|| "logs".to_string()).into(),
        })
    }

    pub fn event_logger(&self) -> EventLogger {
        EventLogger::new(&self.log_dir)
    }

    /// Resolver for the configured provider. A document provider without a
    /// URL runs offline on the embedded data.
    pub fn build_data(&self) -> Result<FootballData> {
        let fallback = StaticSource::embedded()?;
        let data = match self.provider {
            Provider::Document => match &self.api_url {
                Some(url) => {
                    info!("Data source: document at {url}");
                    let mut remote = RemoteSource::new(url.clone(), self.timeout);
                    if let Some(key) = &self.api_key {
                        remote = remote.with_api_key(self.api_key_header.clone(), key.clone());
                    }
                    FootballData::new(Box::new(remote), fallback, self.fallback)
                }
                None => {
                    info!("Data source: none configured, using embedded data");
                    FootballData::offline(fallback, self.fallback)
                }
            },
            Provider::FootballData => {
                let Some(key) = &self.api_key else {
                    bail!("MATCHDAY_API_KEY is required for the football-data provider");
                };
                let base = self.api_url.clone().unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
                info!("Data source: football-data.org at {base} ({} leagues)", self.leagues.len());
                let remote = FootballDataSource::new(key.clone(), self.timeout)
                    .with_base_url(base)
                    .with_leagues(self.leagues.clone());
                FootballData::new(Box::new(remote), fallback, self.fallback)
            }
        };
        Ok(data.with_event_log(self.event_logger()))
    }

    pub fn open_favorites(&self) -> Result<FavoritesStore> {
        let kv = SqliteStore::open(&self.favorites_db)
            .with_context(|| format!("open favorites db at {}", self.favorites_db.display()))?;
        Ok(FavoritesStore::new(Arc::new(kv)).with_event_log(self.event_logger()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let cfg = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.provider, Provider::Document);
        assert_eq!(cfg.fallback, FallbackPolicy::StaticData);
        assert_eq!(cfg.timeout, Duration::from_secs(10));
        assert_eq!(cfg.api_key_header, "X-Auth-Token");
        assert_eq!(cfg.leagues.len(), 5);
        assert_eq!(cfg.favorites_db, PathBuf::from("data/favorites.db"));
        assert_eq!(cfg.log_dir, PathBuf::from("logs"));
        assert!(cfg.api_url.is_none());
    }

    #[test]
    fn reads_overrides() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("MATCHDAY_PROVIDER", "football-data"),
            ("MATCHDAY_API_KEY", "abc"),
            ("MATCHDAY_TIMEOUT_SECS", "3"),
            ("MATCHDAY_FALLBACK", "empty"),
            ("MATCHDAY_LEAGUES", "la-liga, serie-a,,"),
        ]))
        .unwrap();
        assert_eq!(cfg.provider, Provider::FootballData);
        assert_eq!(cfg.api_key.as_deref(), Some("abc"));
        assert_eq!(cfg.timeout, Duration::from_secs(3));
        assert_eq!(cfg.fallback, FallbackPolicy::Empty);
        assert_eq!(cfg.leagues, vec!["la-liga", "serie-a"]);
    }

    #[test]
    fn bad_numbers_fall_back_to_defaults() {
        let cfg = AppConfig::from_lookup(lookup(&[("MATCHDAY_TIMEOUT_SECS", "soon")])).unwrap();
        assert_eq!(cfg.timeout, Duration::from_secs(10));
        let cfg = AppConfig::from_lookup(lookup(&[("MATCHDAY_TIMEOUT_SECS", "0")])).unwrap();
        assert_eq!(cfg.timeout, Duration::from_secs(10));
    }

    #[test]
    fn unknown_names_are_errors() {
        let err = AppConfig::from_lookup(lookup(&[("MATCHDAY_PROVIDER", "scraper")])).unwrap_err();
        assert!(format!("{err:#}").contains("MATCHDAY_PROVIDER"));
        assert!(AppConfig::from_lookup(lookup(&[("MATCHDAY_FALLBACK", "cached")])).is_err());
    }

    #[test]
    fn football_data_needs_a_key() {
        let cfg = AppConfig::from_lookup(lookup(&[("MATCHDAY_PROVIDER", "football-data")])).unwrap();
        assert!(cfg.build_data().is_err());
    }

    #[tokio::test]
    async fn offline_document_provider_serves_embedded_data() {
        let dir = tempfile::tempdir().unwrap();
        let log_dir = dir.path().join("logs");
        let cfg = AppConfig::from_lookup(lookup(&[("MATCHDAY_LOG_DIR", log_dir.to_str().unwrap())])).unwrap();

        let data = cfg.build_data().unwrap();
        assert_eq!(data.source_name(), "none");
        assert_eq!(data.get_leagues().await.len(), 5);
    }

    #[test]
    fn favorites_persist_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("nested").join("favorites.db");
        let log_dir = dir.path().join("logs");
        let cfg = AppConfig::from_lookup(lookup(&[
            ("MATCHDAY_FAVORITES_DB", db.to_str().unwrap()),
            ("MATCHDAY_LOG_DIR", log_dir.to_str().unwrap()),
        ]))
        .unwrap();

        let store = cfg.open_favorites().unwrap();
        let team = football_types::Team::new("inter", "FC Internazionale Milano", "serie-a");
        assert!(store.add_favorite_team((&team).into()).unwrap());
        drop(store);

        let reopened = cfg.open_favorites().unwrap();
        assert!(reopened.is_favorite_team("inter"));
    }
}
