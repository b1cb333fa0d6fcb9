use std::collections::BTreeSet;

use crate::row::Row;

pub const SEASON_KEYS: [&str; 2] = ["season", "Season"];
pub const ALL_SEASONS: &str = "all";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SeasonSelection {
    /// Nothing chosen yet; resolved once the season list is known.
    #[default]
    Unset,
    All,
    Season(String),
}

impl SeasonSelection {
    pub fn as_param(&self) -> Option<&str> {
        match self {
            SeasonSelection::Unset => None,
            SeasonSelection::All => Some(ALL_SEASONS),
            SeasonSelection::Season(season) => Some(season.as_str()),
        }
    }

    /// The season being filtered on, if any.
    pub fn specific(&self) -> Option<&str> {
        match self {
            SeasonSelection::Season(season) => Some(season.as_str()),
            _ => None,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            SeasonSelection::Unset => "Select Season",
            SeasonSelection::All => "All Seasons",
            SeasonSelection::Season(season) => season.as_str(),
        }
    }
}

/// Season label of a row: `season`, falling back to `Season`. Empty values
/// count as missing.
pub fn season_of(row: &Row) -> Option<String> {
    SEASON_KEYS.iter().find_map(|key| {
        row.get(key)
            .and_then(|cell| cell.as_text())
            .filter(|text| !text.is_empty())
    })
}

/// Distinct seasons, descending by plain string comparison.
pub fn extract_seasons(rows: &[Row]) -> Vec<String> {
    let distinct: BTreeSet<String> = rows.iter().filter_map(season_of).collect();
    distinct.into_iter().rev().collect()
}

/// Selector options in display order: all seasons first, then each season.
pub fn season_options(seasons: &[String]) -> Vec<SeasonSelection> {
    std::iter::once(SeasonSelection::All)
        .chain(seasons.iter().cloned().map(SeasonSelection::Season))
        .collect()
}
