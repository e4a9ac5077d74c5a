use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::player::PlayerRecord;

/// Everything scraped from a single match page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub url: String,
    pub match_id: Option<u32>,
    pub team_1: Option<String>,
    pub team_2: Option<String>,
    pub event: Option<String>,
    pub event_series: Option<String>,
    /// Left and right series score. Both are empty when the score is hidden
    /// behind a spoiler.
    pub score: (String, String),
    pub stage: Option<String>,
    pub match_format: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub starts_at: Option<NaiveDateTime>,
    pub maps: Vec<MapRecord>,
}

/// A single map (game) that has a populated stats header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapRecord {
    pub game_id: Option<String>,
    pub map: MapInfo,
    pub team_left: TeamInMap,
    pub team_right: TeamInMap,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapInfo {
    pub name: Option<String>,
    pub duration: Option<String>,
}

/// One side of a map: the header overview plus the stats table rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamInMap {
    pub overview: TeamOverview,
    /// `None` when the map block does not carry both stats tables.
    pub players: Option<Vec<PlayerRecord>>,
}

/// Per-team score line from the map header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamOverview {
    pub name: Option<String>,
    pub score: Option<String>,
    pub t_side_score: Option<String>,
    pub ct_side_score: Option<String>,
    pub is_winner: bool,
}
