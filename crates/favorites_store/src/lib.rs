/// matchday — Favorites Store
///
/// User-picked teams and players persisted in a key-value store, with a
/// change channel so independently held handles can refresh their own
/// snapshot after any write.
///
/// Keys:
///   favoriteTeams   → JSON array of FavoriteTeam
///   favoritePlayers → JSON array of FavoritePlayer
///   favoriteTeam    → JSON object, first entry of favoriteTeams

mod kv;
mod store;
mod view;

pub use kv::{KeyValueStore, MemoryStore, SqliteStore};
pub use store::{
    FavoritesStore, StorageChange, FAVORITE_PLAYERS_KEY, FAVORITE_TEAMS_KEY, PRIMARY_TEAM_KEY,
};
pub use view::FavoritesView;
