//! League table ranking.
//!
//! Teams are ordered by a list of criteria, each one only breaking ties
//! left by the previous ones. The default list ends on the team name so
//! two teams never compare equal unless they are the same team.

use football_types::Team;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RankCriteria {
    Points,
    GoalDifference,
    GoalsFor,
    /// Fewer conceded ranks higher.
    GoalsAgainst,
    Wins,
    /// Alphabetical, last resort.
    Name,
}

pub const DEFAULT_CRITERIA: [RankCriteria; 4] = [
    RankCriteria::Points,
    RankCriteria::GoalDifference,
    RankCriteria::GoalsFor,
    RankCriteria::Name,
];

type CmpFunc = fn(&Team, &Team) -> Ordering;

fn compare_points(a: &Team, b: &Team) -> Ordering {
    b.points.unwrap_or(0).cmp(&a.points.unwrap_or(0))
}

fn compare_goal_difference(a: &Team, b: &Team) -> Ordering {
    b.goal_difference().cmp(&a.goal_difference())
}

fn compare_goals_for(a: &Team, b: &Team) -> Ordering {
    b.goals_for.unwrap_or(0).cmp(&a.goals_for.unwrap_or(0))
}

fn compare_goals_against(a: &Team, b: &Team) -> Ordering {
    a.goals_against.unwrap_or(0).cmp(&b.goals_against.unwrap_or(0))
}

fn compare_wins(a: &Team, b: &Team) -> Ordering {
    b.won.unwrap_or(0).cmp(&a.won.unwrap_or(0))
}

fn compare_name(a: &Team, b: &Team) -> Ordering {
    a.name.to_lowercase().cmp(&b.name.to_lowercase()).then_with(|| a.id.cmp(&b.id))
}

impl RankCriteria {
    fn compare_fn(self) -> CmpFunc {
        match self {
            RankCriteria::Points => compare_points,
            RankCriteria::GoalDifference => compare_goal_difference,
            RankCriteria::GoalsFor => compare_goals_for,
            RankCriteria::GoalsAgainst => compare_goals_against,
            RankCriteria::Wins => compare_wins,
            RankCriteria::Name => compare_name,
        }
    }
}

pub fn compare(a: &Team, b: &Team, criteria: &[RankCriteria]) -> Ordering {
    criteria
        .iter()
        .map(|c| (c.compare_fn())(a, b))
        .find(|o| o.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Sort in place and rewrite `position` as 1..=n.
pub fn rank(teams: &mut [Team], criteria: &[RankCriteria]) {
    teams.sort_by(|a, b| compare(a, b, criteria));
    for (i, team) in teams.iter_mut().enumerate() {
        team.position = Some(i as u32 + 1);
    }
}

/// Teams whose league field equals `league_id`, ranked with the default criteria.
pub fn table_for_league(teams: &[Team], league_id: &str) -> Vec<Team> {
    let mut table: Vec<Team> = teams.iter().filter(|t| t.league == league_id).cloned().collect();
    rank(&mut table, &DEFAULT_CRITERIA);
    table
}

/// True when every positioned team sits at or below every team with more
/// points. Teams without a position are ignored.
pub fn positions_consistent(teams: &[Team]) -> bool {
    let mut placed: Vec<&Team> = teams.iter().filter(|t| t.position.is_some()).collect();
    placed.sort_by_key(|t| t.position);
    placed
        .windows(2)
        .all(|w| w[0].points.unwrap_or(0) >= w[1].points.unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(id: &str, points: u32, gf: u32, ga: u32) -> Team {
        let mut t = Team::new(id, id.to_uppercase(), "pl");
        t.points = Some(points);
        t.goals_for = Some(gf);
        t.goals_against = Some(ga);
        t
    }

    fn ids(teams: &[Team]) -> Vec<&str> {
        teams.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn ranks_by_points_first() {
        let mut teams = vec![team("chelsea", 11, 13, 9), team("arsenal", 16, 14, 3), team("spurs", 14, 13, 5)];
        rank(&mut teams, &DEFAULT_CRITERIA);
        assert_eq!(ids(&teams), vec!["arsenal", "spurs", "chelsea"]);
        assert_eq!(teams[0].position, Some(1));
        assert_eq!(teams[2].position, Some(3));
    }

    #[test]
    fn equal_points_fall_back_to_goal_difference_then_goals_for() {
        let mut teams = vec![
            team("a", 15, 10, 8), // +2
            team("b", 15, 12, 6), // +6
            team("c", 15, 14, 8), // +6, more scored
        ];
        rank(&mut teams, &DEFAULT_CRITERIA);
        assert_eq!(ids(&teams), vec!["c", "b", "a"]);
    }

    #[test]
    fn full_tie_is_broken_by_name() {
        let mut teams = vec![team("milan", 14, 12, 8), team("juventus", 14, 12, 8)];
        rank(&mut teams, &DEFAULT_CRITERIA);
        assert_eq!(ids(&teams), vec!["juventus", "milan"]);

        // same result from the other input order
        let mut teams = vec![team("juventus", 14, 12, 8), team("milan", 14, 12, 8)];
        rank(&mut teams, &DEFAULT_CRITERIA);
        assert_eq!(ids(&teams), vec!["juventus", "milan"]);
    }

    #[test]
    fn custom_criteria_order() {
        let mut teams = vec![team("a", 10, 5, 1), team("b", 10, 5, 4)];
        rank(&mut teams, &[RankCriteria::GoalsAgainst]);
        assert_eq!(ids(&teams), vec!["a", "b"]);
    }

    #[test]
    fn table_for_league_filters_exactly() {
        let mut other = team("psg", 30, 20, 2);
        other.league = "ligue-1".to_string();
        let teams = vec![team("arsenal", 16, 14, 3), other, team("chelsea", 11, 13, 9)];

        let table = table_for_league(&teams, "pl");
        assert_eq!(ids(&table), vec!["arsenal", "chelsea"]);
        assert!(positions_consistent(&table));
        assert!(table_for_league(&teams, "PL").is_empty());
    }

    #[test]
    fn detects_inconsistent_positions() {
        let mut a = team("a", 10, 0, 0);
        a.position = Some(1);
        let mut b = team("b", 12, 0, 0);
        b.position = Some(2);
        assert!(!positions_consistent(&[a, b]));
    }
}
