pub mod document;
pub mod event;
pub mod output;
pub mod situation;
pub mod stats;

pub use document::{
    PlayByPlayDocument, RawEvent, RawEventPlayer, RawShift, RegistryPlayer, RosterEntry,
    ShiftDocument,
};
pub use event::{Event, EventPlayer, EventType, OnIce, OnIceSide, Role, Zone};
pub use output::{GameAggregation, StatRow, TEAM_ROW_PLAYER_ID};
pub use situation::{StrengthSit, Venue, VenuePair, SCORE_SIT_CLAMP};
pub use stats::{PlayerRecord, ShiftInterval, SitKey, SituationStats, Stat, StatLine, TeamRecord};
