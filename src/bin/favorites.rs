/// matchday — Favorites
///
/// Manage the locally persisted favorite teams and players.
///
///   favorites list
///   favorites add-team <team-id>
///   favorites remove-team <team-id>
///   favorites add-player <player-id>
///   favorites remove-player <player-id>
///
/// Records are looked up through the configured data source, so an id must
/// exist in the live or embedded dataset to be added.

use anyhow::{bail, Context, Result};
use dotenv::dotenv;
use favorites_store::FavoritesStore;
use football_data::FootballData;
use football_types::{FavoritePlayer, FavoriteTeam};
use matchday::{init_tracing, AppConfig};
use tracing::info;

const USAGE: &str =
    "usage: favorites <list | add-team ID | remove-team ID | add-player ID | remove-player ID>";

fn print_favorites(store: &FavoritesStore) {
    let teams = store.load_favorite_teams();
    let players = store.load_favorite_players();

    println!("Teams ({}):", teams.len());
    for (i, t) in teams.iter().enumerate() {
        let primary = if i == 0 { "  [primary]" } else { "" };
        println!("  {:<16} {:<28} {}{primary}", t.id, t.name, t.league);
    }
    println!("Players ({}):", players.len());
    for p in &players {
        println!("  {:<16} {:<28} {:<4} {:<14} {:.1}", p.id, p.name, p.position, p.team, p.rating);
    }
}

async fn find_team(data: &FootballData, id: &str) -> Result<FavoriteTeam> {
    data.get_all_teams()
        .await
        .iter()
        .find(|t| t.id == id)
        .map(FavoriteTeam::from)
        .with_context(|| format!("no team with id {id}"))
}

async fn find_player(data: &FootballData, id: &str) -> Result<FavoritePlayer> {
    data.get_all_players()
        .await
        .iter()
        .find(|p| p.id == id)
        .map(FavoritePlayer::from)
        .with_context(|| format!("no player with id {id}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = args.first().map(String::as_str).unwrap_or("list");
    let id = args.get(1).map(String::as_str);

    let config = AppConfig::from_env()?;
    let store = config.open_favorites()?;

    match (command, id) {
        ("list", _) => {}
        ("add-team", Some(id)) => {
            let data = config.build_data()?;
            let team = find_team(&data, id).await?;
            let name = team.name.clone();
            if store.add_favorite_team(team)? {
                info!("Added {name} to favorite teams");
            } else {
                info!("{name} is already a favorite");
            }
        }
        ("remove-team", Some(id)) => {
            if !store.remove_favorite_team(id)? {
                info!("{id} was not a favorite team");
            }
        }
        ("add-player", Some(id)) => {
            let data = config.build_data()?;
            let player = find_player(&data, id).await?;
            let name = player.name.clone();
            if store.add_favorite_player(player)? {
                info!("Added {name} to favorite players");
            } else {
                info!("{name} is already a favorite");
            }
        }
        ("remove-player", Some(id)) => {
            if !store.remove_favorite_player(id)? {
                info!("{id} was not a favorite player");
            }
        }
        _ => bail!(USAGE),
    }

    print_favorites(&store);
    Ok(())
}
