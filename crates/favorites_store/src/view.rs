use football_types::{FavoritePlayer, FavoriteTeam};
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tracing::debug;

use crate::store::{FavoritesStore, StorageChange};

/// A region that displays favorites. Keeps its own snapshot and reloads it
/// from the store whenever any handle reports a change.
pub struct FavoritesView {
    store:       FavoritesStore,
    rx:          broadcast::Receiver<StorageChange>,
    teams:       Vec<FavoriteTeam>,
    players:     Vec<FavoritePlayer>,
    primary:     Option<FavoriteTeam>,
    last_change: Option<StorageChange>,
}

impl FavoritesView {
    pub(crate) fn new(store: FavoritesStore) -> Self {
        let rx = store.subscribe();
        let mut view = Self {
            store,
            rx,
            teams:       Vec::new(),
            players:     Vec::new(),
            primary:     None,
            last_change: None,
        };
        view.refresh();
        view
    }

    pub fn teams(&self) -> &[FavoriteTeam] {
        &self.teams
    }

    pub fn players(&self) -> &[FavoritePlayer] {
        &self.players
    }

    pub fn primary_team(&self) -> Option<&FavoriteTeam> {
        self.primary.as_ref()
    }

    /// The change that triggered the latest reload, if it is known.
    pub fn last_change(&self) -> Option<&StorageChange> {
        self.last_change.as_ref()
    }

    /// Re-read everything from the store.
    pub fn refresh(&mut self) {
        self.teams = self.store.load_favorite_teams();
        self.players = self.store.load_favorite_players();
        self.primary = self.store.primary_favorite_team();
    }

    /// Wait for the next change signal, then reload. Returns `false` once
    /// no handle can send anymore.
    pub async fn changed(&mut self) -> bool {
        match self.rx.recv().await {
            Ok(change) => {
                self.last_change = Some(change);
                self.refresh();
                true
            }
            Err(RecvError::Lagged(skipped)) => {
                debug!(skipped, "Favorites view lagged, reloading");
                self.last_change = None;
                self.refresh();
                true
            }
            Err(RecvError::Closed) => false,
        }
    }

    /// Drain pending signals without waiting; reload once if there were any.
    pub fn try_refresh(&mut self) -> bool {
        let mut pending = false;
        loop {
            match self.rx.try_recv() {
                Ok(change) => {
                    self.last_change = Some(change);
                    pending = true;
                }
                Err(TryRecvError::Lagged(_)) => {
                    self.last_change = None;
                    pending = true;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        if pending {
            self.refresh();
        }
        pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::FAVORITE_TEAMS_KEY;
    use std::time::Duration;

    fn team(id: &str) -> FavoriteTeam {
        FavoriteTeam {
            id:     id.to_string(),
            name:   id.to_string(),
            logo:   String::new(),
            league: "la-liga".to_string(),
        }
    }

    #[tokio::test]
    async fn other_region_sees_add_after_signal() {
        let store = FavoritesStore::in_memory();
        let region_a = store.clone();
        let mut region_b = store.view();
        assert!(region_b.teams().is_empty());

        region_a.add_favorite_team(team("real-madrid")).unwrap();

        let signalled = tokio::time::timeout(Duration::from_secs(1), region_b.changed())
            .await
            .unwrap();
        assert!(signalled);
        assert!(region_b.teams().iter().any(|t| t.id == "real-madrid"));
        assert_eq!(region_b.primary_team().map(|t| t.id.as_str()), Some("real-madrid"));
        assert_eq!(region_b.last_change().map(|c| c.key.as_str()), Some(FAVORITE_TEAMS_KEY));
    }

    #[test]
    fn snapshot_is_stale_until_refreshed() {
        let store = FavoritesStore::in_memory();
        let mut view = store.view();

        store.add_favorite_team(team("barcelona")).unwrap();
        assert!(view.teams().is_empty());

        assert!(view.try_refresh());
        assert_eq!(view.teams().len(), 1);

        assert!(!view.try_refresh());
    }

    #[test]
    fn two_views_converge() {
        let store = FavoritesStore::in_memory();
        let mut left = store.view();
        let mut right = store.clone().view();

        store.add_favorite_team(team("atletico")).unwrap();
        store.remove_favorite_team("atletico").unwrap();
        store.add_favorite_team(team("sevilla")).unwrap();

        left.try_refresh();
        right.try_refresh();
        assert_eq!(left.teams(), right.teams());
        assert_eq!(left.teams()[0].id, "sevilla");
    }

    #[test]
    fn lagged_view_still_reloads() {
        let store = FavoritesStore::in_memory();
        let mut view = store.view();

        for i in 0..200 {
            store.add_favorite_team(team(&format!("team-{i}"))).unwrap();
        }

        assert!(view.try_refresh());
        assert_eq!(view.teams().len(), 200);
    }
}
