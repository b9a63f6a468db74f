//! football-data.org v4 standings, normalized into leagues and teams.
//!
//! One request per competition: `GET {base}/competitions/{code}/standings`
//! with the `X-Auth-Token` header. Only the first standings table (the
//! overall one) is read. Players and matches are not offered by this
//! provider and stay empty.

use anyhow::{Context, Result};
use async_trait::async_trait;
use football_types::{Dataset, FormResult, League, Team};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::source::{build_client, preview, DataSource, HttpStatus};

pub const DEFAULT_BASE_URL: &str = "https://api.football-data.org/v4";
pub const AUTH_HEADER: &str = "X-Auth-Token";

/// League ids this provider knows a competition code for.
pub const SUPPORTED_LEAGUES: [&str; 5] = ["premier-league", "la-liga", "bundesliga", "serie-a", "ligue-1"];

pub fn competition_code(league_id: &str) -> Option<&'static str> {
    match league_id {
        "premier-league" => Some("PL"),
        "la-liga" => Some("PD"),
        "bundesliga" => Some("BL1"),
        "serie-a" => Some("SA"),
        "ligue-1" => Some("FL1"),
        _ => None,
    }
}

/// "Arsenal FC" → "arsenal-fc"
pub fn team_slug(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// "W,D,L" (or "WDL") → [W, D, L]; anything else is skipped.
fn parse_form(raw: Option<&str>) -> Vec<FormResult> {
    raw.unwrap_or_default()
        .chars()
        .filter_map(|c| match c {
            'W' => Some(FormResult::W),
            'D' => Some(FormResult::D),
            'L' => Some(FormResult::L),
            _ => None,
        })
        .collect()
}

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct StandingsResponse {
    competition: Option<ApiCompetition>,
    area:        Option<ApiArea>,
    season:      Option<ApiSeason>,
    #[serde(default)]
    standings:   Vec<ApiStanding>,
}

#[derive(Debug, Deserialize)]
struct ApiCompetition {
    name:   Option<String>,
    emblem: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiArea {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiSeason {
    start_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiStanding {
    #[serde(default)]
    table: Vec<ApiRow>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiRow {
    position:        u32,
    team:            ApiTeam,
    played_games:    u32,
    form:            Option<String>,
    won:             u32,
    draw:            u32,
    lost:            u32,
    points:          u32,
    goals_for:       u32,
    goals_against:   u32,
    goal_difference: i32,
}

#[derive(Debug, Deserialize)]
struct ApiTeam {
    name:  String,
    crest: Option<String>,
}

// ── Source ───────────────────────────────────────────────────────────────────

pub struct FootballDataSource {
    client:   reqwest::Client,
    base_url: String,
    api_key:  String,
    leagues:  Vec<String>,
}

impl FootballDataSource {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client:   build_client(timeout),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key:  api_key.into(),
            leagues:  SUPPORTED_LEAGUES.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_leagues(mut self, leagues: Vec<String>) -> Self {
        self.leagues = leagues;
        self
    }

    async fn fetch_competition(&self, league_id: &str) -> Result<(League, Vec<Team>)> {
        let code = competition_code(league_id)
            .with_context(|| format!("no competition code for league {league_id}"))?;
        let url = format!("{}/competitions/{code}/standings", self.base_url);

        let resp = self
            .client
            .get(&url)
            .header(AUTH_HEADER, &self.api_key)
            .send()
            .await
            .with_context(|| format!("GET {url} failed"))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!("football-data {code} HTTP {status}: {}", preview(&body, 100));
            return Err(HttpStatus { code: status.as_u16(), url }.into());
        }

        let parsed: StandingsResponse = resp
            .json()
            .await
            .with_context(|| format!("standings for {code} did not parse"))?;
        Ok(normalize(league_id, parsed))
    }
}

fn normalize(league_id: &str, resp: StandingsResponse) -> (League, Vec<Team>) {
    let country = resp.area.and_then(|a| a.name).unwrap_or_default();
    let (name, logo) = match resp.competition {
        Some(c) => (c.name.unwrap_or_else(|| league_id.to_string()), c.emblem.unwrap_or_default()),
        None => (league_id.to_string(), String::new()),
    };
    let season = resp
        .season
        .and_then(|s| s.start_date)
        .map(|d| d.chars().take(4).collect::<String>());

    let rows = resp.standings.into_iter().next().map(|s| s.table).unwrap_or_default();
    let teams: Vec<Team> = rows
        .into_iter()
        .map(|row| {
            let mut team = Team::new(team_slug(&row.team.name), row.team.name, league_id);
            team.logo            = row.team.crest.unwrap_or_default();
            team.country         = country.clone();
            team.position        = Some(row.position);
            team.played          = Some(row.played_games);
            team.won             = Some(row.won);
            team.drawn           = Some(row.draw);
            team.lost            = Some(row.lost);
            team.goals_for       = Some(row.goals_for);
            team.goals_against   = Some(row.goals_against);
            team.goal_difference = Some(row.goal_difference);
            team.points          = Some(row.points);
            team.form            = parse_form(row.form.as_deref());
            team
        })
        .collect();

    let league = League {
        id:          league_id.to_string(),
        name,
        country,
        logo,
        founded:     None,
        teams_count: Some(teams.len() as u32),
        description: None,
        season,
    };
    (league, teams)
}

#[async_trait]
impl DataSource for FootballDataSource {
    fn name(&self) -> &str {
        "football-data"
    }

    async fn fetch(&self) -> Result<Dataset> {
        let mut dataset = Dataset::default();
        let mut failed = 0usize;
        let mut last_err = None;

        for league_id in &self.leagues {
            match self.fetch_competition(league_id).await {
                Ok((league, mut teams)) => {
                    debug!(league = %league_id, teams = teams.len(), "Standings loaded");
                    dataset.leagues.push(league);
                    dataset.teams.append(&mut teams);
                }
                Err(e) => {
                    warn!("football-data {league_id} skipped: {e:#}");
                    failed += 1;
                    last_err = Some(e);
                }
            }
        }

        if dataset.leagues.is_empty() {
            if let Some(e) = last_err {
                return Err(e.context(format!("all {failed} competitions failed")));
            }
        }
        info!(
            "football-data: {} leagues, {} teams ({failed} failed)",
            dataset.leagues.len(),
            dataset.teams.len()
        );
        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_server::serve_once;

    const PL_STANDINGS: &str = r#"{
        "area": {"name": "England"},
        "competition": {"name": "Premier League", "code": "PL", "emblem": "https://crests.football-data.org/PL.png"},
        "season": {"startDate": "2024-08-16"},
        "standings": [
            {"type": "TOTAL", "table": [
                {"position": 1, "team": {"name": "Arsenal FC", "shortName": "Arsenal", "crest": "a.png"},
                 "playedGames": 7, "form": "W,W,D,W,W", "won": 5, "draw": 1, "lost": 1,
                 "points": 16, "goalsFor": 14, "goalsAgainst": 3, "goalDifference": 11},
                {"position": 2, "team": {"name": "Manchester  City FC", "shortName": "Man City", "crest": null},
                 "playedGames": 7, "form": null, "won": 4, "draw": 1, "lost": 2,
                 "points": 13, "goalsFor": 15, "goalsAgainst": 6, "goalDifference": 9}
            ]},
            {"type": "HOME", "table": []}
        ]
    }"#;

    #[test]
    fn maps_known_leagues() {
        assert_eq!(competition_code("la-liga"), Some("PD"));
        assert_eq!(competition_code("ligue-1"), Some("FL1"));
        assert_eq!(competition_code("eredivisie"), None);
    }

    #[test]
    fn slug_collapses_whitespace() {
        assert_eq!(team_slug("Manchester  City FC"), "manchester-city-fc");
        assert_eq!(team_slug(" Real Madrid CF "), "real-madrid-cf");
    }

    #[tokio::test]
    async fn normalizes_first_table() {
        let (url, req) = serve_once("200 OK", PL_STANDINGS).await;
        let source = FootballDataSource::new("key-123", Duration::from_secs(2))
            .with_base_url(url)
            .with_leagues(vec!["premier-league".to_string()]);

        let ds = source.fetch().await.unwrap();
        let raw = req.await.unwrap();
        assert!(raw.starts_with("GET /competitions/PL/standings"));
        assert!(raw.to_lowercase().contains("x-auth-token: key-123"));

        assert_eq!(ds.leagues.len(), 1);
        let league = &ds.leagues[0];
        assert_eq!(league.id, "premier-league");
        assert_eq!(league.country, "England");
        assert_eq!(league.season.as_deref(), Some("2024"));
        assert_eq!(league.teams_count, Some(2));

        assert_eq!(ds.teams.len(), 2);
        let arsenal = &ds.teams[0];
        assert_eq!(arsenal.id, "arsenal-fc");
        assert_eq!(arsenal.league, "premier-league");
        assert_eq!(arsenal.points, Some(16));
        assert_eq!(arsenal.drawn, Some(1));
        assert_eq!(arsenal.form_string(), "WWDWW");
        assert_eq!(ds.teams[1].id, "manchester-city-fc");
        assert!(ds.teams[1].form.is_empty());
    }

    #[tokio::test]
    async fn unknown_league_only_is_error() {
        let source = FootballDataSource::new("k", Duration::from_secs(1))
            .with_base_url("http://127.0.0.1:9")
            .with_leagues(vec!["eredivisie".to_string()]);
        assert!(source.fetch().await.is_err());
    }

    #[tokio::test]
    async fn bad_status_fails_the_competition() {
        let (url, _req) = serve_once("403 Forbidden", r#"{"message":"restricted"}"#).await;
        let source = FootballDataSource::new("k", Duration::from_secs(2))
            .with_base_url(url)
            .with_leagues(vec!["serie-a".to_string()]);
        let err = source.fetch().await.unwrap_err();
        assert!(err.to_string().contains("failed"));
        let status = err.chain().find_map(|c| c.downcast_ref::<HttpStatus>());
        assert_eq!(status.map(|s| s.code), Some(403));
    }
}
