use anyhow::{Context, Result};
use football_types::{FavoritePlayer, FavoriteTeam};
use logger::{now_iso, EventLogger, FavoritesChangedEvent};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::kv::{KeyValueStore, MemoryStore};
use crate::view::FavoritesView;

pub const FAVORITE_TEAMS_KEY: &str = "favoriteTeams";
pub const FAVORITE_PLAYERS_KEY: &str = "favoritePlayers";
/// Copy of the first entry of `favoriteTeams`.
pub const PRIMARY_TEAM_KEY: &str = "favoriteTeam";

const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// One persisted key changed. `value` is the new raw JSON, `None` when the
/// key was removed.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageChange {
    pub key:   String,
    pub value: Option<String>,
}

trait Identified {
    fn id(&self) -> &str;
}

impl Identified for FavoriteTeam {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for FavoritePlayer {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Handle to the persisted favorites. Clones share the backing store and
/// the change channel, so every clone sees every other clone's writes.
///
/// All mutations are whole-list read-modify-write. Two processes writing
/// the same SQLite file can lose each other's updates; within one process
/// calls are serialized by the caller.
#[derive(Clone)]
pub struct FavoritesStore {
    kv:      Arc<dyn KeyValueStore>,
    changes: broadcast::Sender<StorageChange>,
    events:  Option<EventLogger>,
}

impl FavoritesStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self { kv, changes, events: None }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Also append a `FAVORITES_CHANGED` line per mutation.
    pub fn with_event_log(mut self, logger: EventLogger) -> Self {
        self.events = Some(logger);
        self
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StorageChange> {
        self.changes.subscribe()
    }

    /// A subscribing region with its own snapshot.
    pub fn view(&self) -> FavoritesView {
        FavoritesView::new(self.clone())
    }

    /// Raw value of a key, bypassing decoding.
    pub fn raw(&self, key: &str) -> Result<Option<String>> {
        self.kv.get(key)
    }

    // ── Reads ────────────────────────────────────────────────────────────────

    pub fn load_favorite_teams(&self) -> Vec<FavoriteTeam> {
        self.read_json(FAVORITE_TEAMS_KEY).unwrap_or_default()
    }

    pub fn load_favorite_players(&self) -> Vec<FavoritePlayer> {
        self.read_json(FAVORITE_PLAYERS_KEY).unwrap_or_default()
    }

    pub fn primary_favorite_team(&self) -> Option<FavoriteTeam> {
        self.read_json(PRIMARY_TEAM_KEY)
    }

    pub fn is_favorite_team(&self, team_id: &str) -> bool {
        self.load_favorite_teams().iter().any(|t| t.id == team_id)
    }

    pub fn is_favorite_player(&self, player_id: &str) -> bool {
        self.load_favorite_players().iter().any(|p| p.id == player_id)
    }

    // ── Mutations ────────────────────────────────────────────────────────────

    /// Append a team. Returns `false` without writing when the id is
    /// already a favorite.
    pub fn add_favorite_team(&self, team: FavoriteTeam) -> Result<bool> {
        let mut teams: Vec<FavoriteTeam> = self.load_list(FAVORITE_TEAMS_KEY)?;
        if !push_unique(&mut teams, team) {
            return Ok(false);
        }
        self.write_teams(&teams)?;
        let id = teams.last().map(|t| t.id.as_str()).unwrap_or("");
        self.record(FAVORITE_TEAMS_KEY, "add", id, teams.len());
        Ok(true)
    }

    /// Drop every entry with `team_id`. The list and primary slot are
    /// rewritten even when nothing matched.
    pub fn remove_favorite_team(&self, team_id: &str) -> Result<bool> {
        let mut teams: Vec<FavoriteTeam> = self.load_list(FAVORITE_TEAMS_KEY)?;
        let before = teams.len();
        teams.retain(|t| t.id != team_id);
        let removed = teams.len() != before;

        self.write_teams(&teams)?;
        if removed {
            self.record(FAVORITE_TEAMS_KEY, "remove", team_id, teams.len());
        }
        Ok(removed)
    }

    pub fn add_favorite_player(&self, player: FavoritePlayer) -> Result<bool> {
        let mut players: Vec<FavoritePlayer> = self.load_list(FAVORITE_PLAYERS_KEY)?;
        if !push_unique(&mut players, player) {
            return Ok(false);
        }
        self.write_json(FAVORITE_PLAYERS_KEY, &players)?;
        let id = players.last().map(|p| p.id.as_str()).unwrap_or("");
        self.record(FAVORITE_PLAYERS_KEY, "add", id, players.len());
        Ok(true)
    }

    pub fn remove_favorite_player(&self, player_id: &str) -> Result<bool> {
        let mut players: Vec<FavoritePlayer> = self.load_list(FAVORITE_PLAYERS_KEY)?;
        let before = players.len();
        players.retain(|p| p.id != player_id);
        let removed = players.len() != before;

        self.write_json(FAVORITE_PLAYERS_KEY, &players)?;
        if removed {
            self.record(FAVORITE_PLAYERS_KEY, "remove", player_id, players.len());
        }
        Ok(removed)
    }

    // ── Internals ────────────────────────────────────────────────────────────

    fn write_teams(&self, teams: &[FavoriteTeam]) -> Result<()> {
        self.write_json(FAVORITE_TEAMS_KEY, &teams)?;
        match teams.first() {
            Some(first) => self.write_json(PRIMARY_TEAM_KEY, first),
            None => self.clear(PRIMARY_TEAM_KEY),
        }
    }

    /// Decode a key, logging a failed storage read as absent. Display
    /// reads only; mutations go through `load_list`.
    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.try_read_json(key).unwrap_or_else(|e| {
            warn!(key, "Favorites read failed: {e:#}");
            None
        })
    }

    /// Decode a key. Absent → `None`. A value that does not decode is
    /// discarded and the key cleared so the next read starts clean. A failed
    /// storage read is an error, never "absent".
    fn try_read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.kv.get(key).with_context(|| format!("read {key}"))? else {
            return Ok(None);
        };

        match serde_json::from_str::<T>(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(key, "Discarding malformed favorites value: {e}");
                if let Err(e) = self.kv.remove(key) {
                    warn!(key, "Could not clear malformed value: {e:#}");
                }
                Ok(None)
            }
        }
    }

    /// Base list for a read-modify-write.
    fn load_list<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>> {
        Ok(self.try_read_json(key)?.unwrap_or_default())
    }

    fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value).with_context(|| format!("serialize {key}"))?;
        self.kv.set(key, &raw)?;
        self.notify(key, Some(raw));
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<()> {
        self.kv.remove(key)?;
        self.notify(key, None);
        Ok(())
    }

    fn notify(&self, key: &str, value: Option<String>) {
        // Err only means nobody is subscribed right now.
        let receivers = self
            .changes
            .send(StorageChange { key: key.to_string(), value })
            .unwrap_or(0);
        debug!(key, receivers, "Favorites change broadcast");
    }

    fn record(&self, key: &str, action: &str, id: &str, count: usize) {
        info!(key, id, count, "Favorites {action}");
        if let Some(events) = &self.events {
            events.log_or_warn(&FavoritesChangedEvent {
                ts:     now_iso(),
                event:  "FAVORITES_CHANGED",
                key:    key.to_string(),
                action: action.to_string(),
                id:     id.to_string(),
                count,
            });
        }
    }
}

fn push_unique<T: Identified>(list: &mut Vec<T>, entry: T) -> bool {
    if list.iter().any(|e| e.id() == entry.id()) {
        debug!(id = entry.id(), "Already a favorite, skipping add");
        return false;
    }
    list.push(entry);
    true
}
