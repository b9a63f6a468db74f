use football_types::{Dataset, League, Match, Player, Team};
use logger::{now_iso, EventLogger, FallbackUsedEvent, SourceStatusEvent};
use search_filter::SearchResults;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, warn};

use crate::fallback::StaticSource;
use crate::source::{DataSource, HttpStatus};

/// What a getter hands back when the live source fails or has nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackPolicy {
    /// The embedded sample dataset, filtered like live data.
    #[default]
    StaticData,
    /// Nothing. The caller renders a "no data" state.
    Empty,
}

impl FallbackPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            FallbackPolicy::StaticData => "static",
            FallbackPolicy::Empty => "empty",
        }
    }
}

impl fmt::Display for FallbackPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FallbackPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "static" | "static-data" => Ok(FallbackPolicy::StaticData),
            "empty" | "none" => Ok(FallbackPolicy::Empty),
            other => Err(format!("unknown fallback policy: {other}")),
        }
    }
}

// ── Collection pickers ───────────────────────────────────────────────────────

fn leagues_of(ds: &Dataset) -> &[League] {
    &ds.leagues
}

fn teams_of(ds: &Dataset) -> &[Team] {
    &ds.teams
}

fn players_of(ds: &Dataset) -> &[Player] {
    &ds.players
}

fn matches_of(ds: &Dataset) -> &[Match] {
    &ds.matches
}

/// Remote first, embedded data (or nothing) second. Every getter does exactly
/// one retrieval and never returns an error.
pub struct FootballData {
    remote:   Option<Box<dyn DataSource>>,
    fallback: StaticSource,
    policy:   FallbackPolicy,
    events:   Option<EventLogger>,
}

impl FootballData {
    pub fn new(
        remote: Box<dyn DataSource>,
        fallback: StaticSource,
        policy: FallbackPolicy,
    ) -> Self {
        Self {
            remote: Some(remote),
            fallback,
            policy,
            events: None,
        }
    }

    /// No live source; every getter goes straight to the fallback.
    pub fn offline(fallback: StaticSource, policy: FallbackPolicy) -> Self {
        Self {
            remote: None,
            fallback,
            policy,
            events: None,
        }
    }

    pub fn with_event_log(mut self, events: EventLogger) -> Self {
        self.events = Some(events);
        self
    }

    pub fn policy(&self) -> FallbackPolicy {
        self.policy
    }

    pub fn source_name(&self) -> &str {
        self.remote.as_ref().map(|r| r.name()).unwrap_or("none")
    }

    // ── Getters ──────────────────────────────────────────────────────────────

    pub async fn get_leagues(&self) -> Vec<League> {
        self.resolve("leagues", leagues_of, |_| true).await
    }

    pub async fn get_all_teams(&self) -> Vec<Team> {
        self.resolve("teams", teams_of, |_| true).await
    }

    pub async fn get_all_players(&self) -> Vec<Player> {
        self.resolve("players", players_of, |_| true).await
    }

    pub async fn get_teams_by_league(&self, league_id: &str) -> Vec<Team> {
        let scope = format!("teams_by_league:{league_id}");
        self.resolve(&scope, teams_of, |t| t.league == league_id).await
    }

    pub async fn get_players_by_team(&self, team_id: &str) -> Vec<Player> {
        let scope = format!("players_by_team:{team_id}");
        self.resolve(&scope, players_of, |p| p.team == team_id).await
    }

    pub async fn get_matches_by_league(&self, league_id: &str) -> Vec<Match> {
        let scope = format!("matches_by_league:{league_id}");
        self.resolve(&scope, matches_of, |m| m.league.as_deref() == Some(league_id)).await
    }

    /// Teams of one league, ranked points → goal difference → goals for → name.
    pub async fn get_league_table(&self, league_id: &str) -> Vec<Team> {
        let teams = self.get_teams_by_league(league_id).await;
        league_table::table_for_league(&teams, league_id)
    }

    /// Every collection from a single retrieval. Each one falls back on its
    /// own, so a live document with only teams still yields sample players.
    pub async fn get_dataset(&self) -> Dataset {
        let remote = self.retrieve("dataset").await;
        Dataset {
            leagues: self.resolve_from(remote.as_ref(), "dataset.leagues", leagues_of, |_| true),
            teams:   self.resolve_from(remote.as_ref(), "dataset.teams", teams_of, |_| true),
            players: self.resolve_from(remote.as_ref(), "dataset.players", players_of, |_| true),
            matches: self.resolve_from(remote.as_ref(), "dataset.matches", matches_of, |_| true),
        }
    }

    /// Teams, players and leagues matching `term`, from one retrieval.
    pub async fn search(&self, term: &str) -> SearchResults {
        if term.is_empty() {
            return SearchResults::default();
        }
        let dataset = self.get_dataset().await;
        search_filter::search_all(&dataset, term)
    }

    // ── Resolution ───────────────────────────────────────────────────────────

    async fn resolve<T, F>(&self, scope: &str, pick: fn(&Dataset) -> &[T], keep: F) -> Vec<T>
    where
        T: Clone,
        F: Fn(&T) -> bool,
    {
        let remote = self.retrieve(scope).await;
        self.resolve_from(remote.as_ref(), scope, pick, keep)
    }

    fn resolve_from<T, F>(
        &self,
        remote: Option<&Dataset>,
        scope: &str,
        pick: fn(&Dataset) -> &[T],
        keep: F,
    ) -> Vec<T>
    where
        T: Clone,
        F: Fn(&T) -> bool,
    {
        let reason = match remote {
            Some(ds) if !pick(ds).is_empty() => {
                return pick(ds).iter().filter(|&r| keep(r)).cloned().collect();
            }
            Some(_) => "remote collection empty",
            None if self.remote.is_some() => "remote retrieval failed",
            None => "no remote source",
        };

        let items: Vec<T> = match self.policy {
            FallbackPolicy::StaticData => {
                pick(self.fallback.dataset()).iter().filter(|&r| keep(r)).cloned().collect()
            }
            FallbackPolicy::Empty => Vec::new(),
        };

        debug!(scope, reason, policy = %self.policy, items = items.len(), "Using fallback");
        self.record(&FallbackUsedEvent {
            ts:     now_iso(),
            event:  "FALLBACK_USED",
            scope:  scope.to_string(),
            policy: self.policy.as_str().to_string(),
            reason: reason.to_string(),
            items:  items.len(),
        });
        items
    }

    /// One attempt at the live source. Failures are logged and absorbed.
    async fn retrieve(&self, scope: &str) -> Option<Dataset> {
        let remote = self.remote.as_ref()?;

        match remote.fetch().await {
            Ok(dataset) => {
                let items = dataset.leagues.len()
                    + dataset.teams.len()
                    + dataset.players.len()
                    + dataset.matches.len();
                info!("{} [{scope}]: {items} records", remote.name());
                self.record(&SourceStatusEvent {
                    ts:          now_iso(),
                    event:       "SOURCE_STATUS",
                    source:      remote.name().to_string(),
                    scope:       scope.to_string(),
                    ok:          true,
                    status_code: None,
                    message:     "ok".to_string(),
                    items,
                });
                Some(dataset)
            }
            Err(e) => {
                warn!("{} [{scope}] failed: {e:#}", remote.name());
                let status_code = e
                    .chain()
                    .find_map(|c| c.downcast_ref::<HttpStatus>())
                    .map(|s| s.code);
                self.record(&SourceStatusEvent {
                    ts:          now_iso(),
                    event:       "SOURCE_STATUS",
                    source:      remote.name().to_string(),
                    scope:       scope.to_string(),
                    ok:          false,
                    status_code,
                    message:     format!("{e:#}"),
                    items:       0,
                });
                None
            }
        }
    }

    fn record<T: serde::Serialize>(&self, event: &T) {
        if let Some(events) = &self.events {
            events.log_or_warn(event);
        }
    }
}
