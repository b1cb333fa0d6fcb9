use crate::season::{SEASON_KEYS, SeasonSelection};
use crate::sort::RANK_COLUMN;

/// Data columns pinned next to `rank`.
pub const FROZEN_DATA_COLUMNS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnPartition {
    pub frozen: Vec<String>,
    pub scrollable: Vec<String>,
}

impl ColumnPartition {
    pub fn all(&self) -> impl Iterator<Item = &str> {
        self.frozen
            .iter()
            .chain(self.scrollable.iter())
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.frozen.len() + self.scrollable.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn column_at(&self, idx: usize) -> Option<&str> {
        self.all().nth(idx)
    }
}

/// Season columns are redundant while a single season is shown. A data
/// column named like the synthetic rank is shadowed by it.
pub fn visible_columns(columns: &[String], season: &SeasonSelection) -> Vec<String> {
    let hide_seasons = season.specific().is_some();
    columns
        .iter()
        .filter(|col| col.as_str() != RANK_COLUMN)
        .filter(|col| !(hide_seasons && SEASON_KEYS.contains(&col.as_str())))
        .cloned()
        .collect()
}

pub fn partition_columns(columns: &[String], season: &SeasonSelection) -> ColumnPartition {
    let visible = visible_columns(columns, season);
    let split = visible.len().min(FROZEN_DATA_COLUMNS);
    let mut frozen = Vec::with_capacity(split + 1);
    frozen.push(RANK_COLUMN.to_string());
    frozen.extend_from_slice(&visible[..split]);
    ColumnPartition {
        frozen,
        scrollable: visible[split..].to_vec(),
    }
}
