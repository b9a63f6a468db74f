/// matchday — Football types
/// Leagues, teams, players, matches and their favorites projections.
///
/// Wire shape is camelCase JSON, the same shape the remote document,
/// the embedded fallback dataset and the persisted favorites use.
/// Only `id` and `name` are required; every other field defaults so a
/// partially populated record still loads.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── Enums ────────────────────────────────────────────────────────────────────

/// Playing position code as shown on player cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Position {
    GK,
    CB,
    LB,
    RB,
    LWB,
    RWB,
    CDM,
    CM,
    CAM,
    LM,
    RM,
    LW,
    RW,
    CF,
    ST,
    /// Anything the feed sends that we don't know about.
    #[default]
    #[serde(other)]
    Other,
}

impl Position {
    pub const ALL: [Position; 15] = [
        Position::GK,
        Position::CB,
        Position::LB,
        Position::RB,
        Position::LWB,
        Position::RWB,
        Position::CDM,
        Position::CM,
        Position::CAM,
        Position::LM,
        Position::RM,
        Position::LW,
        Position::RW,
        Position::CF,
        Position::ST,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Position::GK => "GK",
            Position::CB => "CB",
            Position::LB => "LB",
            Position::RB => "RB",
            Position::LWB => "LWB",
            Position::RWB => "RWB",
            Position::CDM => "CDM",
            Position::CM => "CM",
            Position::CAM => "CAM",
            Position::LM => "LM",
            Position::RM => "RM",
            Position::LW => "LW",
            Position::RW => "RW",
            Position::CF => "CF",
            Position::ST => "ST",
            Position::Other => "OTHER",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.code())
    }
}

impl FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Position::ALL
            .iter()
            .copied()
            .find(|p| p.code() == upper)
            .ok_or_else(|| format!("unknown position code: {s}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    #[default]
    Upcoming,
    Live,
    Finished,
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchStatus::Upcoming => f.write_str("upcoming"),
            MatchStatus::Live => f.write_str("LIVE"),
            MatchStatus::Finished => f.write_str("FT"),
        }
    }
}

/// One entry of a team's recent-form sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormResult {
    W,
    D,
    L,
}

impl fmt::Display for FormResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormResult::W => f.write_str("W"),
            FormResult::D => f.write_str("D"),
            FormResult::L => f.write_str("L"),
        }
    }
}

// ── Records ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct League {
    pub id:          String,
    pub name:        String,
    #[serde(default)]
    pub country:     String,
    #[serde(default)]
    pub logo:        String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub founded:     Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teams_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season:      Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id:            String,
    pub name:          String,
    #[serde(default)]
    pub logo:          String,
    /// Denormalized league identifier, matched by exact string equality.
    #[serde(default)]
    pub league:        String,
    #[serde(default)]
    pub country:       String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city:          Option<String>,
    #[serde(default)]
    pub stadium:       String,
    #[serde(default)]
    pub coach:         String,
    #[serde(default)]
    pub players_count: u32,
    #[serde(default)]
    pub titles:        u32,
    #[serde(default)]
    pub description:   String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub founded:       Option<u16>,

    // season record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position:        Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub played:          Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub won:             Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drawn:           Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lost:            Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goals_for:       Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goals_against:   Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_difference: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points:          Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub form:            Vec<FormResult>,
}

impl Team {
    /// Bare team with only identity fields set.
    pub fn new(id: impl Into<String>, name: impl Into<String>, league: impl Into<String>) -> Self {
        Self {
            id:              id.into(),
            name:            name.into(),
            logo:            String::new(),
            league:          league.into(),
            country:         String::new(),
            city:            None,
            stadium:         String::new(),
            coach:           String::new(),
            players_count:   0,
            titles:          0,
            description:     String::new(),
            founded:         None,
            position:        None,
            played:          None,
            won:             None,
            drawn:           None,
            lost:            None,
            goals_for:       None,
            goals_against:   None,
            goal_difference: None,
            points:          None,
            form:            Vec::new(),
        }
    }

    /// Stored goal difference, or goals for minus goals against.
    pub fn goal_difference(&self) -> i32 {
        self.goal_difference.unwrap_or_else(|| {
            self.goals_for.unwrap_or(0) as i32 - self.goals_against.unwrap_or(0) as i32
        })
    }

    pub fn form_string(&self) -> String {
        self.form.iter().map(|r| r.to_string()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id:               String,
    pub name:             String,
    #[serde(default)]
    pub photo:            String,
    /// Denormalized owning team identifier.
    #[serde(default)]
    pub team:             String,
    #[serde(default)]
    pub team_logo:        String,
    #[serde(default)]
    pub league:           String,
    #[serde(default)]
    pub nationality:      String,
    #[serde(default)]
    pub nationality_flag: String,
    #[serde(default)]
    pub position:         Position,
    /// Overall card rating, 0–99.
    #[serde(default)]
    pub overall:          u8,
    /// Narrative rating, e.g. 8.7.
    #[serde(default)]
    pub rating:           f32,
    #[serde(default)]
    pub goals:            u32,
    #[serde(default)]
    pub assists:          u32,
    #[serde(default)]
    pub matches:          u32,
    #[serde(default)]
    pub description:      String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age:              Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height:           Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight:           Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id:         String,
    pub home_team:  String,
    pub away_team:  String,
    #[serde(default)]
    pub home_logo:  String,
    #[serde(default)]
    pub away_logo:  String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub league:     Option<String>,
    #[serde(default)]
    pub date:       String,
    #[serde(default)]
    pub time:       String,
    #[serde(default)]
    pub venue:      String,
    #[serde(default)]
    pub status:     MatchStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_score: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub away_score: Option<u32>,
    /// Live minute counter, only while `status == Live`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minute:     Option<u32>,
}

impl Match {
    pub fn scoreline(&self) -> Option<String> {
        match (self.home_score, self.away_score) {
            (Some(h), Some(a)) => Some(format!("{h}:{a}")),
            _ => None,
        }
    }
}

// ── Favorites projections ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteTeam {
    pub id:     String,
    pub name:   String,
    #[serde(default)]
    pub logo:   String,
    #[serde(default)]
    pub league: String,
}

impl From<&Team> for FavoriteTeam {
    fn from(team: &Team) -> Self {
        Self {
            id:     team.id.clone(),
            name:   team.name.clone(),
            logo:   team.logo.clone(),
            league: team.league.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoritePlayer {
    pub id:        String,
    pub name:      String,
    #[serde(default)]
    pub photo:     String,
    #[serde(default)]
    pub team:      String,
    #[serde(default)]
    pub team_logo: String,
    #[serde(default)]
    pub position:  Position,
    #[serde(default)]
    pub rating:    f32,
}

impl From<&Player> for FavoritePlayer {
    fn from(player: &Player) -> Self {
        Self {
            id:        player.id.clone(),
            name:      player.name.clone(),
            photo:     player.photo.clone(),
            team:      player.team.clone(),
            team_logo: player.team_logo.clone(),
            position:  player.position,
            rating:    player.rating,
        }
    }
}

// ── Dataset ──────────────────────────────────────────────────────────────────

/// One loaded document: `{ leagues, teams, players, matches }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub leagues: Vec<League>,
    #[serde(default)]
    pub teams:   Vec<Team>,
    #[serde(default)]
    pub players: Vec<Player>,
    #[serde(default)]
    pub matches: Vec<Match>,
}

impl Dataset {
    /// Decode a document that is either the dataset itself or the dataset
    /// wrapped one level under `data`.
    pub fn from_value(value: serde_json::Value) -> serde_json::Result<Self> {
        let inner = match value {
            serde_json::Value::Object(mut map) if map.get("data").is_some_and(|d| d.is_object()) => {
                map.remove("data").unwrap_or_default()
            }
            other => other,
        };
        serde_json::from_value(inner)
    }

    pub fn from_json_str(raw: &str) -> serde_json::Result<Self> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        Self::from_value(value)
    }

    pub fn is_empty(&self) -> bool {
        self.leagues.is_empty() && self.teams.is_empty() && self.players.is_empty() && self.matches.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn team_decodes_with_only_identity_fields() {
        let team: Team = serde_json::from_str(r#"{"id":"arsenal","name":"Arsenal"}"#).unwrap();
        assert_eq!(team.id, "arsenal");
        assert_eq!(team.points, None);
        assert!(team.form.is_empty());
    }

    #[test]
    fn team_without_id_is_rejected() {
        assert!(serde_json::from_str::<Team>(r#"{"name":"Arsenal"}"#).is_err());
    }

    #[test]
    fn camel_case_season_fields() {
        let raw = r#"{"id":"a","name":"A","goalsFor":14,"goalsAgainst":3,"points":16,"form":["W","D","L"]}"#;
        let team: Team = serde_json::from_str(raw).unwrap();
        assert_eq!(team.goals_for, Some(14));
        assert_eq!(team.goal_difference(), 11);
        assert_eq!(team.form_string(), "WDL");
    }

    #[test]
    fn stored_goal_difference_wins_over_derived() {
        let mut team = Team::new("a", "A", "pl");
        team.goals_for = Some(10);
        team.goals_against = Some(2);
        team.goal_difference = Some(5);
        assert_eq!(team.goal_difference(), 5);
    }

    #[test]
    fn unknown_position_code_decodes_as_other() {
        let player: Player =
            serde_json::from_str(r#"{"id":"p","name":"P","position":"SW"}"#).unwrap();
        assert_eq!(player.position, Position::Other);

        let player: Player =
            serde_json::from_str(r#"{"id":"p","name":"P","position":"CAM"}"#).unwrap();
        assert_eq!(player.position, Position::CAM);
    }

    #[test]
    fn position_parses_case_insensitively() {
        assert_eq!("st".parse::<Position>(), Ok(Position::ST));
        assert!("XX".parse::<Position>().is_err());
    }

    #[test]
    fn dataset_accepts_data_wrapper() {
        let wrapped = r#"{"data":{"teams":[{"id":"a","name":"A"}]}}"#;
        let plain = r#"{"teams":[{"id":"a","name":"A"}]}"#;
        let a = Dataset::from_json_str(wrapped).unwrap();
        let b = Dataset::from_json_str(plain).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.teams.len(), 1);
        assert!(a.players.is_empty());
    }

    #[test]
    fn favorite_projections_keep_identity() {
        let team = Team::new("real-madrid", "Real Madrid", "la-liga");
        let fav = FavoriteTeam::from(&team);
        assert_eq!(fav.id, "real-madrid");
        assert_eq!(fav.league, "la-liga");
    }

    #[test]
    fn match_status_wire_names() {
        let m: Match = serde_json::from_str(
            r#"{"id":"1","homeTeam":"A","awayTeam":"B","status":"live","homeScore":1,"awayScore":0,"minute":63}"#,
        )
        .unwrap();
        assert_eq!(m.status, MatchStatus::Live);
        assert_eq!(m.scoreline().as_deref(), Some("1:0"));
    }
}
