use std::collections::VecDeque;
use std::sync::mpsc::Receiver;
use std::time::Instant;

use chrono::Local;

use crate::columns::{ColumnPartition, partition_columns};
use crate::filter::filter_rows;
use crate::row::{Row, column_names, display_cell};
use crate::row_source::SourceError;
use crate::season::{SeasonSelection, extract_seasons, season_options};
use crate::sort::{RANK_COLUMN, SortState, direction_label, sort_rows};
use crate::url_sync::UrlSync;

const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Table,
    Search,
}

/// What the render surface can ask of the table.
#[derive(Debug, Clone, PartialEq)]
pub enum UserEvent {
    SelectSeason(SeasonSelection),
    Search(String),
    ClearSearch,
    RequestSort(String),
}

#[derive(Debug)]
pub enum Delta {
    RowsLoaded { rows: Vec<Row>, elapsed_ms: u64 },
    RowsFailed(SourceError),
    Log(String),
}

#[derive(Debug, Clone)]
pub enum ProviderCommand {
    FetchRows,
}

/// Everything the render surface needs for one frame.
#[derive(Debug)]
pub struct TableView<'a> {
    pub frozen_columns: Vec<String>,
    pub scrollable_columns: Vec<String>,
    pub rows: Vec<&'a Row>,
    pub sort: &'a SortState,
    pub seasons: &'a [String],
    pub selected_season: &'a SeasonSelection,
    pub search_term: &'a str,
    pub loading: bool,
    pub error: Option<&'a str>,
}

pub struct AppState {
    pub rows: Vec<Row>,
    pub columns: Vec<String>,
    pub seasons: Vec<String>,
    pub selected_season: SeasonSelection,
    pub search_term: String,
    pub sort: SortState,
    pub loading: bool,
    pub error: Option<String>,
    pub focus: Focus,
    pub selected: usize,
    /// Index into the combined frozen + scrollable column list.
    pub column_cursor: usize,
    /// First scrollable column on screen.
    pub scroll_offset: usize,
    pub help_overlay: bool,
    pub logs: VecDeque<String>,
    pub decimal_columns: Vec<String>,
    url: UrlSync,
    url_changes: Receiver<String>,
}

impl AppState {
    /// The search term comes from the location right away; the season has
    /// to wait for the rows.
    pub fn new(mut url: UrlSync, decimal_columns: Vec<String>) -> Self {
        let url_changes = url.subscribe();
        let search_term = url.read_search();
        Self {
            rows: Vec::new(),
            columns: Vec::new(),
            seasons: Vec::new(),
            selected_season: SeasonSelection::Unset,
            search_term,
            sort: SortState::default(),
            loading: false,
            error: None,
            focus: Focus::Table,
            selected: 0,
            column_cursor: 0,
            scroll_offset: 0,
            help_overlay: false,
            logs: VecDeque::with_capacity(MAX_LOGS),
            decimal_columns,
            url,
            url_changes,
        }
    }

    /// Marks a fetch as in flight. False when one already is.
    pub fn begin_fetch(&mut self) -> bool {
        if self.loading {
            return false;
        }
        self.loading = true;
        self.error = None;
        true
    }

    pub fn handle_event(&mut self, now: Instant, event: UserEvent) {
        match event {
            UserEvent::SelectSeason(selection) => self.select_season(selection),
            UserEvent::Search(term) => self.set_search(now, term),
            UserEvent::ClearSearch => self.clear_search(),
            UserEvent::RequestSort(column) => {
                self.request_sort(&column);
            }
        }
    }

    pub fn select_season(&mut self, selection: SeasonSelection) {
        let changed = selection != self.selected_season;
        self.selected_season = selection;
        self.url.write_season(&self.selected_season);
        if changed {
            self.selected = 0;
            self.clamp_columns();
            self.push_log(format!(
                "[INFO] Season: {}",
                self.selected_season.label()
            ));
        }
    }

    pub fn cycle_season(&mut self, forward: bool) {
        let options = season_options(&self.seasons);
        let next = match options.iter().position(|opt| *opt == self.selected_season) {
            Some(idx) if forward => (idx + 1) % options.len(),
            Some(idx) => (idx + options.len() - 1) % options.len(),
            None => 0,
        };
        self.select_season(options[next].clone());
    }

    pub fn set_search(&mut self, now: Instant, term: String) {
        if term == self.search_term {
            return;
        }
        self.search_term = term;
        self.url.search_changed(now, &self.search_term);
        self.selected = 0;
    }

    pub fn push_search_char(&mut self, now: Instant, c: char) {
        let mut term = self.search_term.clone();
        term.push(c);
        self.set_search(now, term);
    }

    pub fn pop_search_char(&mut self, now: Instant) {
        let mut term = self.search_term.clone();
        if term.pop().is_some() {
            self.set_search(now, term);
        }
    }

    pub fn clear_search(&mut self) {
        self.search_term.clear();
        self.url.clear_search();
        self.selected = 0;
    }

    /// Returns false for ignored requests (`rank`).
    pub fn request_sort(&mut self, column: &str) -> bool {
        if !self.sort.request(column) {
            return false;
        }
        self.push_log(format!(
            "[INFO] Sort: {column} {}",
            direction_label(self.sort.direction)
        ));
        true
    }

    pub fn sort_cursor_column(&mut self) -> bool {
        let Some(column) = self.partition().column_at(self.column_cursor).map(str::to_string)
        else {
            return false;
        };
        self.request_sort(&column)
    }

    /// Runs due timers and records location changes.
    pub fn tick(&mut self, now: Instant) {
        self.url.poll(now);
        while let Ok(location) = self.url_changes.try_recv() {
            self.push_log(format!("[INFO] URL: {location}"));
        }
    }

    /// Writes any pending location change immediately.
    pub fn flush_location(&mut self) {
        self.url.flush();
        while let Ok(location) = self.url_changes.try_recv() {
            self.push_log(format!("[INFO] URL: {location}"));
        }
    }

    pub fn search_pending(&self) -> bool {
        self.url.search_pending()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.url.next_deadline()
    }

    pub fn location(&self) -> String {
        self.url.location()
    }

    pub fn displayed_rows(&self) -> Vec<&Row> {
        let filtered = filter_rows(&self.rows, &self.selected_season, &self.search_term);
        match self.sort.active() {
            Some((key, direction)) => sort_rows(&filtered, Some(key), direction),
            None => filtered,
        }
    }

    pub fn partition(&self) -> ColumnPartition {
        partition_columns(&self.columns, &self.selected_season)
    }

    pub fn view(&self) -> TableView<'_> {
        let ColumnPartition { frozen, scrollable } = self.partition();
        TableView {
            frozen_columns: frozen,
            scrollable_columns: scrollable,
            rows: self.displayed_rows(),
            sort: &self.sort,
            seasons: &self.seasons,
            selected_season: &self.selected_season,
            search_term: &self.search_term,
            loading: self.loading,
            error: self.error.as_deref(),
        }
    }

    /// `position` is the row's 0-based place in the displayed set.
    pub fn cell_text(&self, column: &str, row: &Row, position: usize) -> String {
        if column == RANK_COLUMN {
            return (position + 1).to_string();
        }
        display_cell(row.get(column), self.is_decimal_column(column))
    }

    pub fn is_decimal_column(&self, column: &str) -> bool {
        self.decimal_columns.iter().any(|c| c == column)
    }

    pub fn summary(&self, shown: usize) -> String {
        let mut out = format!(
            "Showing {shown} {}",
            if shown == 1 { "record" } else { "records" }
        );
        if shown != self.rows.len() {
            out.push_str(&format!(" (filtered from {} total)", self.rows.len()));
        }
        if let Some(season) = self.selected_season.specific() {
            out.push_str(&format!(" for season: {season}"));
        }
        out
    }

    pub fn select_next(&mut self) {
        let total = self.displayed_rows().len();
        if total == 0 {
            self.selected = 0;
            return;
        }
        self.selected = (self.selected + 1) % total;
    }

    pub fn select_prev(&mut self) {
        let total = self.displayed_rows().len();
        if total == 0 {
            self.selected = 0;
            return;
        }
        if self.selected == 0 {
            self.selected = total - 1;
        } else {
            self.selected -= 1;
        }
    }

    pub fn page_down(&mut self, page: usize) {
        let total = self.displayed_rows().len();
        self.selected = (self.selected + page.max(1)).min(total.saturating_sub(1));
    }

    pub fn page_up(&mut self, page: usize) {
        self.selected = self.selected.saturating_sub(page.max(1));
    }

    pub fn clamp_selection(&mut self) {
        let total = self.displayed_rows().len();
        if total == 0 {
            self.selected = 0;
        } else if self.selected >= total {
            self.selected = total - 1;
        }
    }

    pub fn move_column_cursor(&mut self, forward: bool) {
        let total = self.partition().len();
        if total == 0 {
            self.column_cursor = 0;
            return;
        }
        self.column_cursor = if forward {
            (self.column_cursor + 1).min(total - 1)
        } else {
            self.column_cursor.saturating_sub(1)
        };
        self.clamp_columns();
    }

    /// Keeps the cursor on an existing column and pulls the scroll window
    /// back when the cursor moves left of it.
    pub fn clamp_columns(&mut self) {
        let partition = self.partition();
        let total = partition.len();
        self.column_cursor = self.column_cursor.min(total.saturating_sub(1));
        let max_offset = partition.scrollable.len().saturating_sub(1);
        self.scroll_offset = self.scroll_offset.min(max_offset);
        if let Some(idx) = self.column_cursor.checked_sub(partition.frozen.len()) {
            self.scroll_offset = self.scroll_offset.min(idx);
        }
    }

    /// First scrollable column to draw when `capacity` of them fit.
    pub fn scroll_start(&self, capacity: usize) -> usize {
        let frozen = self.partition().frozen.len();
        let start = self.scroll_offset;
        match self.column_cursor.checked_sub(frozen) {
            Some(idx) if capacity > 0 && idx >= start + capacity => idx + 1 - capacity,
            _ => start,
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        let line = format!("{} {}", Local::now().format("%H:%M:%S"), msg.into());
        self.logs.push_back(line);
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::RowsLoaded { rows, elapsed_ms } => {
            state.loading = false;
            state.error = None;
            state.columns = column_names(&rows);
            state.seasons = extract_seasons(&rows);
            state.rows = rows;

            // A selection that still exists survives a reload.
            let still_valid = match &state.selected_season {
                SeasonSelection::All => true,
                SeasonSelection::Season(season) => state.seasons.contains(season),
                SeasonSelection::Unset => false,
            };
            if !still_valid {
                state.selected_season = state.url.resolve(&state.seasons);
            }
            state.clamp_selection();
            state.clamp_columns();
            state.push_log(format!(
                "[INFO] Loaded {} rows, {} seasons in {elapsed_ms} ms",
                state.rows.len(),
                state.seasons.len()
            ));
        }
        Delta::RowsFailed(err) => {
            state.loading = false;
            state.rows.clear();
            state.columns.clear();
            state.seasons.clear();
            state.selected = 0;
            state.column_cursor = 0;
            state.scroll_offset = 0;
            let message = err.user_message();
            state.push_log(format!("[ERROR] {message}"));
            state.error = Some(message);
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}
