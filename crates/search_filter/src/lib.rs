/// matchday — Search filter
/// Pure predicates over in-memory collections: text search + categorical
/// filters (league, position). No I/O, no state, input order preserved.

use football_types::{Dataset, League, Match, Player, Team};

/// Filter value meaning "don't filter on this category".
pub const SHOW_ALL: &str = "all";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    League,
    Position,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryFilter {
    pub category: Category,
    pub value:    String,
}

impl CategoryFilter {
    pub fn league(value: impl Into<String>) -> Self {
        Self { category: Category::League, value: value.into() }
    }

    pub fn position(value: impl Into<String>) -> Self {
        Self { category: Category::Position, value: value.into() }
    }

    pub fn is_show_all(&self) -> bool {
        self.value == SHOW_ALL
    }
}

/// A record the evaluator can search and categorize.
pub trait Searchable {
    fn id(&self) -> &str;

    /// Text fields the search term is matched against.
    fn search_fields(&self) -> Vec<&str>;

    /// Value of a categorical field, `None` if the record has no such field.
    fn category(&self, category: Category) -> Option<&str>;

    /// Fields an "add to favorites" picker matches against.
    fn picker_fields(&self) -> Vec<&str> {
        self.search_fields()
    }
}

impl Searchable for Team {
    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.league.as_str(), self.country.as_str()]
    }

    fn category(&self, category: Category) -> Option<&str> {
        match category {
            Category::League => Some(self.league.as_str()),
            Category::Position => None,
        }
    }
}

impl Searchable for Player {
    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.team.as_str(), self.nationality.as_str()]
    }

    fn category(&self, category: Category) -> Option<&str> {
        match category {
            Category::League => Some(self.league.as_str()),
            Category::Position => Some(self.position.code()),
        }
    }

    fn picker_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.team.as_str(), self.position.code()]
    }
}

impl Searchable for League {
    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.country.as_str()]
    }

    fn category(&self, category: Category) -> Option<&str> {
        match category {
            Category::League => Some(self.id.as_str()),
            Category::Position => None,
        }
    }
}

impl Searchable for Match {
    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.home_team.as_str(), self.away_team.as_str(), self.venue.as_str()]
    }

    fn category(&self, category: Category) -> Option<&str> {
        match category {
            Category::League => self.league.as_deref(),
            Category::Position => None,
        }
    }
}

fn any_field_contains(fields: &[&str], term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    fields.iter().any(|field| field.to_lowercase().contains(&needle))
}

/// Case-insensitive substring test; an empty term matches. Whitespace in the
/// term is part of the needle.
pub fn matches_term<T: Searchable>(record: &T, term: &str) -> bool {
    any_field_contains(&record.search_fields(), term)
}

pub fn matches_picker_term<T: Searchable>(record: &T, term: &str) -> bool {
    any_field_contains(&record.picker_fields(), term)
}

pub fn matches_filters<T: Searchable>(record: &T, filters: &[CategoryFilter]) -> bool {
    filters.iter().all(|f| {
        f.is_show_all() || record.category(f.category).is_some_and(|v| v == f.value)
    })
}

/// Records passing every category filter and the search term, in input order.
pub fn filter<T>(records: &[T], term: &str, filters: &[CategoryFilter]) -> Vec<T>
where
    T: Searchable + Clone,
{
    records
        .iter()
        .filter(|r| matches_filters(*r, filters) && matches_term(*r, term))
        .cloned()
        .collect()
}

/// Candidates for an "add to favorites" picker: records matching the term
/// whose id is not already a favorite.
pub fn available_to_add<T, S>(records: &[T], favorite_ids: &[S], term: &str) -> Vec<T>
where
    T: Searchable + Clone,
    S: AsRef<str>,
{
    records
        .iter()
        .filter(|r| !favorite_ids.iter().any(|id| id.as_ref() == r.id()))
        .filter(|r| matches_picker_term(*r, term))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResults {
    pub teams:   Vec<Team>,
    pub players: Vec<Player>,
    pub leagues: Vec<League>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.teams.is_empty() && self.players.is_empty() && self.leagues.is_empty()
    }

    pub fn total(&self) -> usize {
        self.teams.len() + self.players.len() + self.leagues.len()
    }
}

/// Global search over one dataset. An empty term finds nothing.
pub fn search_all(dataset: &Dataset, term: &str) -> SearchResults {
    if term.is_empty() {
        return SearchResults::default();
    }
    SearchResults {
        teams:   filter(&dataset.teams, term, &[]),
        players: filter(&dataset.players, term, &[]),
        leagues: filter(&dataset.leagues, term, &[]),
    }
}
