//! Already-parsed input documents.
//!
//! The fetch layer decodes the two raw feeds straight into these structs
//! and hands them to `reconcile_game`; the engine itself performs no I/O.
//! Fields the engine requires are still `Option` where the feed has been
//! observed to omit them — validation happens in the extractor so a
//! malformed event aborts the game with a descriptive error instead of a
//! decode failure far from context.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::situation::VenuePair;

/// One entry of the game-wide player registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryPlayer {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
}

/// A dressed player on one venue's roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterEntry {
    pub player_id: i64,
    /// Position code from the feed; "g" routes the player to the goalie
    /// occupancy lists.
    pub position: String,
    pub jersey: u8,
}

/// A single raw play-by-play record, straight from the feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEvent {
    /// Feed event index; unique and ascending within the game.
    pub event_idx: u32,
    pub type_id: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub penalty_severity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub penalty_minutes: Option<u8>,
    pub period: Option<u8>,
    /// Clock as "mm:ss" counting up from the period start.
    pub period_time: Option<String>,
    /// Running goal totals as of this record (goals include themselves).
    pub goals: VenuePair<u16>,
    /// Rink coordinates, centre ice origin. Absent on some records.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<(f32, f32)>,
    /// Tricode of the team the feed credits with the event.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    /// Ordered (player, role) pairs as the feed lists them.
    #[serde(default)]
    pub players: Vec<RawEventPlayer>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEventPlayer {
    pub player_id: i64,
    pub role: String,
}

/// The parsed play-by-play document for one finished game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayByPlayDocument {
    pub game_id: u64,
    /// Year the season started in (2016 for the 2016-17 season).
    pub season: u16,
    pub start_time: DateTime<Utc>,
    pub tricodes: VenuePair<String>,
    pub players: Vec<RegistryPlayer>,
    pub rosters: VenuePair<Vec<RosterEntry>>,
    pub events: Vec<RawEvent>,
}

/// One raw shift row from the shift-chart document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawShift {
    pub player_id: i64,
    pub period: u8,
    /// "mm:ss" from the period start.
    pub start_time: String,
    pub end_time: String,
}

/// The parsed shift-chart document for one finished game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftDocument {
    pub shifts: Vec<RawShift>,
}
