use thiserror::Error;

/// Failures that abort a single game's reconciliation. A partial,
/// silently-incomplete aggregation is worse than no aggregation, so no
/// rows are ever emitted once any of these occur.
#[derive(Error, Debug)]
pub enum GameError {
    #[error("event {event_idx}: missing required field `{field}`")]
    MissingField { event_idx: u32, field: &'static str },

    #[error("invalid period clock {clock:?}: expected mm:ss")]
    InvalidClock { clock: String },

    #[error("event {event_idx}: acting team {tricode:?} is neither roster tricode")]
    UnknownTeam { event_idx: u32, tricode: String },

    #[error("{context}: player {player_id} is not on either roster")]
    UnknownPlayer { context: &'static str, player_id: i64 },

    #[error(
        "shift for player {player_id} in period {period} is malformed: \
         [{start_sec}, {end_sec}) does not fit the {duration}s period"
    )]
    InvalidShift { player_id: i64, period: u8, start_sec: u32, end_sec: u32, duration: u32 },

    #[error("event {event_idx}: goal carries more than two assists")]
    UnexpectedAssist { event_idx: u32 },

    #[error("event {event_idx}: period {period} has no occupancy table")]
    UnknownPeriod { event_idx: u32, period: u8 },
}

pub type Result<T> = std::result::Result<T, GameError>;
