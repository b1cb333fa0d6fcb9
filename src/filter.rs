use crate::row::Row;
use crate::season::{SeasonSelection, season_of};

/// Season filter, then search filter. Output keeps input order.
pub fn filter_rows<'a, I>(rows: I, season: &SeasonSelection, search: &str) -> Vec<&'a Row>
where
    I: IntoIterator<Item = &'a Row>,
{
    let needle = search.trim().to_lowercase();
    rows.into_iter()
        .filter(|row| matches_season(row, season))
        .filter(|row| needle.is_empty() || matches_search(row, &needle))
        .collect()
}

pub fn matches_season(row: &Row, season: &SeasonSelection) -> bool {
    match season.specific() {
        Some(wanted) => season_of(row).as_deref() == Some(wanted),
        None => true,
    }
}

/// `needle` must already be trimmed and lowercased. Null fields never match.
pub fn matches_search(row: &Row, needle: &str) -> bool {
    row.values().any(|cell| {
        cell.as_text()
            .is_some_and(|text| text.to_lowercase().contains(needle))
    })
}
