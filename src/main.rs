/// matchday — League tables
///
/// Prints the standings of every league (or only the one given as the first
/// argument), favorite teams marked with `*`, then that league's matches.
///
/// Run:
///   cargo run --bin matchday [league-id]

use anyhow::Result;
use dotenv::dotenv;
use football_types::{League, Match, Team};
use matchday::{init_tracing, AppConfig};
use tracing::{info, warn};

fn print_table(league: &League, table: &[Team], is_favorite: impl Fn(&str) -> bool) {
    println!();
    println!("== {} ({}) ==", league.name, league.country);
    if table.is_empty() {
        println!("  no data");
        return;
    }
    println!(
        "  {:>3}  {:<28} {:>3} {:>3} {:>3} {:>3} {:>4} {:>4}  form",
        "#", "team", "P", "W", "D", "L", "GD", "Pts"
    );
    for team in table {
        let mark = if is_favorite(&team.id) { "*" } else { " " };
        println!(
            "  {:>3}{mark} {:<28} {:>3} {:>3} {:>3} {:>3} {:>+4} {:>4}  {}",
            team.position.unwrap_or(0),
            team.name,
            team.played.unwrap_or(0),
            team.won.unwrap_or(0),
            team.drawn.unwrap_or(0),
            team.lost.unwrap_or(0),
            team.goal_difference(),
            team.points.unwrap_or(0),
            team.form_string(),
        );
    }
}

fn print_matches(matches: &[Match]) {
    for m in matches {
        let score = m.scoreline().unwrap_or_else(|| "-:-".to_string());
        let minute = m.minute.map(|min| format!(" {min}'")).unwrap_or_default();
        println!(
            "  {} {}  {} {score} {}  [{}{minute}]",
            m.date, m.time, m.home_team, m.away_team, m.status
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    let data = config.build_data()?;
    let favorites = config.open_favorites()?;

    info!("=== matchday === source={} fallback={}", data.source_name(), data.policy());

    let only = std::env::args().nth(1);
    let leagues: Vec<League> = data
        .get_leagues()
        .await
        .into_iter()
        .filter(|l| only.as_deref().map_or(true, |id| l.id == id))
        .collect();

    if leagues.is_empty() {
        warn!("No leagues to show{}", only.map(|id| format!(" for {id}")).unwrap_or_default());
        return Ok(());
    }

    if let Some(primary) = favorites.primary_favorite_team() {
        println!("Favorite team: {} ({})", primary.name, primary.league);
    }

    for league in &leagues {
        let table = data.get_league_table(&league.id).await;
        print_table(league, &table, |id| favorites.is_favorite_team(id));

        let matches = data.get_matches_by_league(&league.id).await;
        if !matches.is_empty() {
            println!("  -- matches --");
            print_matches(&matches);
        }
    }

    Ok(())
}
