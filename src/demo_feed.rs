use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::row::{Cell, Row};
use crate::row_source::{RowSource, SourceError};

const DEMO_SEASONS: &[&str] = &["2021", "2022", "2023", "2024"];
const DEMO_TEAMS: &[&str] = &[
    "Harbor City", "North Vale", "Eastwick", "Stonebridge", "Riverside", "Kingsport",
    "Westmoor", "Ashford", "Millbrook", "Oakham", "Fairhaven", "Redcliff",
];
const GAMES_PER_SEASON: i64 = 22;

/// Offline source: a synthetic league table, one row per team and season.
pub struct DemoRowSource {
    rng: StdRng,
}

impl DemoRowSource {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn team_row(&mut self, season: &str, team: &str) -> Row {
        let won: i64 = self.rng.gen_range(2..=16);
        let drawn: i64 = self.rng.gen_range(0..=(GAMES_PER_SEASON - won).min(8));
        let lost = GAMES_PER_SEASON - won - drawn;
        let pts = won * 3 + drawn;
        let home_games = GAMES_PER_SEASON / 2;
        let home_pts: i64 = self.rng.gen_range((pts / 3)..=(pts * 2 / 3).max(pts / 3));
        let away_pts = pts - home_pts;

        Row::from_pairs([
            ("season", Cell::from(season)),
            ("team", Cell::from(team)),
            ("played", Cell::from(GAMES_PER_SEASON)),
            ("won", Cell::from(won)),
            ("drawn", Cell::from(drawn)),
            ("lost", Cell::from(lost)),
            ("pts", Cell::from(pts)),
            ("Average", Cell::from(pts as f64 / GAMES_PER_SEASON as f64)),
            ("Home Avg.", Cell::from(home_pts as f64 / home_games as f64)),
            ("Away Avg.", Cell::from(away_pts as f64 / home_games as f64)),
            (
                "coach",
                if self.rng.gen_bool(0.1) {
                    Cell::Null
                } else {
                    Cell::from(format!("Coach {}", &team[..1]))
                },
            ),
        ])
    }
}

impl Default for DemoRowSource {
    fn default() -> Self {
        Self::new()
    }
}

impl RowSource for DemoRowSource {
    fn fetch_rows(&mut self) -> Result<Vec<Row>, SourceError> {
        let mut rows = Vec::with_capacity(DEMO_SEASONS.len() * DEMO_TEAMS.len());
        for season in DEMO_SEASONS {
            for team in DEMO_TEAMS {
                rows.push(self.team_row(season, team));
            }
        }
        Ok(rows)
    }

    fn describe(&self) -> String {
        "demo league".to_string()
    }
}
