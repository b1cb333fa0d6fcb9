use std::cmp::Ordering;

use crate::row::{Cell, Row};

/// Synthetic position column. Shown first, never sortable.
pub const RANK_COLUMN: &str = "rank";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Ascending,
    Descending,
    #[default]
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SortState {
    pub key: Option<String>,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortIndicator {
    Unsorted,
    Ascending,
    Descending,
}

impl SortState {
    /// Header activation. Same key cycles ascending → descending → none,
    /// a new key starts ascending. Returns false when the request is ignored.
    pub fn request(&mut self, column: &str) -> bool {
        if column == RANK_COLUMN {
            return false;
        }
        let same_key = self.key.as_deref() == Some(column);
        self.direction = match (same_key, self.direction) {
            (true, SortDirection::Ascending) => SortDirection::Descending,
            (true, SortDirection::Descending) => SortDirection::None,
            _ => SortDirection::Ascending,
        };
        self.key = Some(column.to_string());
        true
    }

    /// Key and direction when the state actually reorders rows.
    pub fn active(&self) -> Option<(&str, SortDirection)> {
        match (self.key.as_deref(), self.direction) {
            (Some(key), SortDirection::Ascending | SortDirection::Descending) => {
                Some((key, self.direction))
            }
            _ => None,
        }
    }

    pub fn indicator(&self, column: &str) -> SortIndicator {
        if self.key.as_deref() != Some(column) {
            return SortIndicator::Unsorted;
        }
        match self.direction {
            SortDirection::Ascending => SortIndicator::Ascending,
            SortDirection::Descending => SortIndicator::Descending,
            SortDirection::None => SortIndicator::Unsorted,
        }
    }
}

pub fn direction_label(direction: SortDirection) -> &'static str {
    match direction {
        SortDirection::Ascending => "ascending",
        SortDirection::Descending => "descending",
        SortDirection::None => "unsorted",
    }
}

/// Reordered copy of `rows`. Equal keys keep their input order.
pub fn sort_rows<'a>(rows: &[&'a Row], key: Option<&str>, direction: SortDirection) -> Vec<&'a Row> {
    let mut out = rows.to_vec();
    let Some(key) = key else {
        return out;
    };
    match direction {
        SortDirection::None => {}
        SortDirection::Ascending => {
            merge_sort_by(&mut out, &|a: &&Row, b: &&Row| compare_cells(a.get(key), b.get(key)))
        }
        SortDirection::Descending => {
            merge_sort_by(&mut out, &|a: &&Row, b: &&Row| compare_cells(b.get(key), a.get(key)))
        }
    }
    out
}

/// Numbers compare numerically; every other pairing compares lowercased text.
pub fn compare_cells(a: Option<&Cell>, b: Option<&Cell>) -> Ordering {
    if let (Some(x), Some(y)) = (a.and_then(Cell::as_number), b.and_then(Cell::as_number)) {
        return x.partial_cmp(&y).unwrap_or(Ordering::Equal);
    }
    sort_text(a).cmp(&sort_text(b))
}

fn sort_text(cell: Option<&Cell>) -> String {
    match cell {
        None => "undefined".to_string(),
        Some(Cell::Null) => "null".to_string(),
        Some(cell) => cell.as_text().unwrap_or_default().to_lowercase(),
    }
}

// Mixed-type columns make the comparator intransitive; std's sort may panic
// on that, this one only produces some order.
fn merge_sort_by<T: Copy>(items: &mut [T], cmp: &dyn Fn(&T, &T) -> Ordering) {
    let len = items.len();
    if len < 2 {
        return;
    }
    let mid = len / 2;
    merge_sort_by(&mut items[..mid], cmp);
    merge_sort_by(&mut items[mid..], cmp);

    let mut merged = Vec::with_capacity(len);
    let (mut i, mut j) = (0, mid);
    while i < mid && j < len {
        if cmp(&items[j], &items[i]) == Ordering::Less {
            merged.push(items[j]);
            j += 1;
        } else {
            merged.push(items[i]);
            i += 1;
        }
    }
    merged.extend_from_slice(&items[i..mid]);
    merged.extend_from_slice(&items[j..len]);
    items.copy_from_slice(&merged);
}
