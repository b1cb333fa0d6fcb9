use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use crate::params::ParamStore;
use crate::scheduler::Debouncer;
use crate::season::{ALL_SEASONS, SeasonSelection};

pub const SEASON_PARAM: &str = "season";
pub const SEARCH_PARAM: &str = "search";
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonResolution {
    pub selection: SeasonSelection,
    /// The selection was defaulted and must be written back to the URL.
    pub write_back: bool,
}

/// `season` parameter against the known seasons: `all` wins, then a known
/// season, then the most recent one.
pub fn resolve_season(from_url: Option<&str>, seasons: &[String]) -> SeasonResolution {
    match from_url {
        Some(ALL_SEASONS) => SeasonResolution {
            selection: SeasonSelection::All,
            write_back: false,
        },
        Some(season) if seasons.iter().any(|s| s == season) => SeasonResolution {
            selection: SeasonSelection::Season(season.to_string()),
            write_back: false,
        },
        _ => match seasons.first() {
            Some(latest) => SeasonResolution {
                selection: SeasonSelection::Season(latest.clone()),
                write_back: true,
            },
            None => SeasonResolution {
                selection: SeasonSelection::Unset,
                write_back: false,
            },
        },
    }
}

/// Keeps `season`/`search` in the location in step with table state. The
/// location is read when the table loads; after that it only mirrors state.
pub struct UrlSync {
    store: Box<dyn ParamStore>,
    search: Debouncer<String>,
}

impl UrlSync {
    pub fn new(store: Box<dyn ParamStore>, search_delay: Duration) -> Self {
        Self {
            store,
            search: Debouncer::new(search_delay),
        }
    }

    pub fn read_season(&self) -> Option<String> {
        self.store.get(SEASON_PARAM)
    }

    pub fn read_search(&self) -> String {
        self.store.get(SEARCH_PARAM).unwrap_or_default()
    }

    pub fn resolve(&mut self, seasons: &[String]) -> SeasonSelection {
        let from_url = self.read_season();
        let resolution = resolve_season(from_url.as_deref(), seasons);
        if resolution.write_back {
            self.write_season(&resolution.selection);
        }
        resolution.selection
    }

    pub fn write_season(&mut self, selection: &SeasonSelection) {
        match selection.as_param() {
            Some(value) => self.store.set(SEASON_PARAM, value),
            None => self.store.remove(SEASON_PARAM),
        }
    }

    /// Schedules the `search` write; a newer term replaces a pending one.
    pub fn search_changed(&mut self, now: Instant, term: &str) {
        self.search.call(now, term.to_string());
    }

    /// Drops any pending search write and removes the parameter now.
    pub fn clear_search(&mut self) {
        self.search.cancel();
        self.store.remove(SEARCH_PARAM);
    }

    /// Flushes a due search write. Returns the term that was written.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        let term = self.search.poll(now)?;
        self.write_search(&term);
        Some(term)
    }

    /// Writes a pending search term now. Used before the location is saved.
    pub fn flush(&mut self) -> Option<String> {
        let term = self.search.flush()?;
        self.write_search(&term);
        Some(term)
    }

    fn write_search(&mut self, term: &str) {
        if term.is_empty() {
            self.store.remove(SEARCH_PARAM);
        } else {
            self.store.set(SEARCH_PARAM, term);
        }
    }

    pub fn search_pending(&self) -> bool {
        self.search.is_pending()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.search.deadline()
    }

    pub fn location(&self) -> String {
        self.store.location()
    }

    pub fn subscribe(&mut self) -> Receiver<String> {
        self.store.subscribe()
    }
}
