/// matchday — Player search
///
///   player-search [term] [--league <league-id>] [--position <code>]
///
/// Players matching the term (name, team, nationality) and filters, then
/// teams matching the term within the league filter. Favorites are starred.

use anyhow::{bail, Result};
use dotenv::dotenv;
use football_types::Position;
use matchday::{init_tracing, AppConfig};
use search_filter::{filter, CategoryFilter, SHOW_ALL};
use tracing::info;

#[derive(Debug, Default)]
struct Query {
    term:     String,
    league:   Option<String>,
    position: Option<Position>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Query> {
    let mut query = Query::default();
    let mut terms = Vec::new();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--league" => {
                let Some(v) = args.next() else { bail!("--league needs a value") };
                query.league = Some(v);
            }
            "--position" => {
                let Some(v) = args.next() else { bail!("--position needs a value") };
                query.position = Some(v.parse::<Position>().map_err(anyhow::Error::msg)?);
            }
            _ => terms.push(arg),
        }
    }
    query.term = terms.join(" ");
    Ok(query)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    init_tracing();

    let query = parse_args(std::env::args().skip(1))?;
    let config = AppConfig::from_env()?;
    let data = config.build_data()?;
    let favorites = config.open_favorites()?;

    let dataset = data.get_dataset().await;

    let league =
        CategoryFilter::league(query.league.clone().unwrap_or_else(|| SHOW_ALL.to_string()));
    let position = CategoryFilter::position(
        query.position.map(|p| p.code().to_string()).unwrap_or_else(|| SHOW_ALL.to_string()),
    );

    let players = filter(&dataset.players, &query.term, &[league.clone(), position]);
    let teams = filter(&dataset.teams, &query.term, &[league]);
    info!("{} players, {} teams for {query:?}", players.len(), teams.len());

    println!("Players ({}):", players.len());
    for p in &players {
        let mark = if favorites.is_favorite_player(&p.id) { "*" } else { " " };
        println!(
            " {mark} {:<22} {:<4} {:<14} {:<12} {:>3} {:.1}",
            p.name, p.position, p.team, p.nationality, p.overall, p.rating
        );
    }

    if query.position.is_none() {
        println!("Teams ({}):", teams.len());
        for t in &teams {
            let mark = if favorites.is_favorite_team(&t.id) { "*" } else { " " };
            println!(" {mark} {:<28} {:<16} {}", t.name, t.league, t.country);
        }
    }

    if players.is_empty() && teams.is_empty() {
        println!("Nothing found.");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_term_and_filters() {
        let raw = args(&["real", "madrid", "--league", "la-liga", "--position", "gk"]);
        let q = parse_args(raw).unwrap();
        assert_eq!(q.term, "real madrid");
        assert_eq!(q.league.as_deref(), Some("la-liga"));
        assert_eq!(q.position, Some(Position::GK));
    }

    #[test]
    fn empty_args_mean_everything() {
        let q = parse_args(args(&[])).unwrap();
        assert!(q.term.is_empty());
        assert!(q.league.is_none());
        assert!(q.position.is_none());
    }

    #[test]
    fn rejects_missing_or_bad_values() {
        assert!(parse_args(args(&["--league"])).is_err());
        assert!(parse_args(args(&["--position", "sweeper"])).is_err());
    }
}
