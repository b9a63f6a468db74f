/// matchday — Logger
/// JSONL event stream: data source status, fallbacks, favorites changes

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct EventLogger {
    log_dir: PathBuf,
}

impl EventLogger {
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        let dir = log_dir.into();
        fs::create_dir_all(&dir).ok();
        Self { log_dir: dir }
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// Path of today's file, `<log_dir>/<YYYY-MM-DD>.jsonl`.
    pub fn current_path(&self) -> PathBuf {
        let date = Utc::now().format("%Y-%m-%d").to_string();
        self.log_dir.join(format!("{date}.jsonl"))
    }

    pub fn log<T: Serialize>(&self, event: &T) -> Result<()> {
        let path  = self.current_path();
        let line  = serde_json::to_string(event).context("event serialize failed")?;
        let mut f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("open {}", path.display()))?;
        writeln!(f, "{line}")?;
        Ok(())
    }

    /// Same as `log`, but a failed write only warns. Event logging never
    /// takes down the caller.
    pub fn log_or_warn<T: Serialize>(&self, event: &T) {
        if let Err(e) = self.log(event) {
            tracing::warn!("Event log write failed: {e:#}");
        }
    }
}

pub fn now_iso() -> String {
    Utc::now().to_rfc3339()
}

// ── Event types ──────────────────────────────────────────────────────────────

#[derive(Serialize, Debug, Clone)]
pub struct SourceStatusEvent {
    pub ts:          String,
    pub event:       &'static str,   // "SOURCE_STATUS"
    pub source:      String,         // "remote" | "football-data" | "static"
    pub scope:       String,         // getter name, e.g. "teams_by_league:la-liga"
    pub ok:          bool,
    pub status_code: Option<u16>,
    pub message:     String,
    pub items:       usize,
}

#[derive(Serialize, Debug, Clone)]
pub struct FallbackUsedEvent {
    pub ts:     String,
    pub event:  &'static str,   // "FALLBACK_USED"
    pub scope:  String,
    pub policy: String,         // "static" | "empty"
    pub reason: String,
    pub items:  usize,
}

#[derive(Serialize, Debug, Clone)]
pub struct FavoritesChangedEvent {
    pub ts:     String,
    pub event:  &'static str,   // "FAVORITES_CHANGED"
    pub key:    String,         // "favoriteTeams" | "favoritePlayers"
    pub action: String,         // "add" | "remove"
    pub id:     String,
    pub count:  usize,          // list length after the change
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_one_line_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let logger = EventLogger::new(dir.path().join("logs"));

        for id in ["arsenal", "chelsea"] {
            logger
                .log(&FavoritesChangedEvent {
                    ts:     now_iso(),
                    event:  "FAVORITES_CHANGED",
                    key:    "favoriteTeams".to_string(),
                    action: "add".to_string(),
                    id:     id.to_string(),
                    count:  1,
                })
                .unwrap();
        }

        let raw = fs::read_to_string(logger.current_path()).unwrap();
        let lines: Vec<_> = raw.lines().collect();
        assert_eq!(lines.len(), 2);

        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["event"], "FAVORITES_CHANGED");
        assert_eq!(second["id"], "chelsea");
    }

    #[test]
    fn creates_missing_log_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let logger = EventLogger::new(&nested);
        assert!(nested.is_dir());
        assert_eq!(logger.log_dir(), nested.as_path());
    }
}
