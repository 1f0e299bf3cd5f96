use serde::{Deserialize, Serialize};

use super::situation::{Venue, VenuePair};

/// The six event types the engine records. Everything else in the feed
/// (stoppages, hits, giveaways, period markers, ...) is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Goal,
    Shot,
    MissedShot,
    BlockedShot,
    Faceoff,
    Penalty,
}

impl EventType {
    /// Map a feed event-type id onto a recorded type. `None` means the
    /// event is simply not recorded, not that the feed is malformed.
    pub fn from_feed_id(id: &str) -> Option<EventType> {
        match id {
            "GOAL" => Some(EventType::Goal),
            "SHOT" => Some(EventType::Shot),
            "MISSED_SHOT" => Some(EventType::MissedShot),
            "BLOCKED_SHOT" => Some(EventType::BlockedShot),
            "FACEOFF" => Some(EventType::Faceoff),
            "PENALTY" => Some(EventType::Penalty),
            _ => None,
        }
    }

    /// Goal, shot, missed shot and blocked shot. A penalty-shot award is
    /// resolved by the nearest subsequent event of this class.
    pub fn is_shot_class(self) -> bool {
        matches!(
            self,
            EventType::Goal | EventType::Shot | EventType::MissedShot | EventType::BlockedShot
        )
    }
}

/// Rink zone in the home team's frame: `Defensive` is the home defensive
/// zone regardless of period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Zone {
    #[serde(rename = "d")]
    Defensive,
    #[serde(rename = "o")]
    Offensive,
    #[serde(rename = "n")]
    Neutral,
}

impl Zone {
    /// The same spot seen from the away team's frame.
    pub fn mirror(self) -> Zone {
        match self {
            Zone::Defensive => Zone::Offensive,
            Zone::Offensive => Zone::Defensive,
            Zone::Neutral => Zone::Neutral,
        }
    }
}

/// What a player did in an event. Goal assists are disambiguated
/// positionally by the extractor; every other role maps straight off the
/// feed string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Scorer,
    Assist1,
    Assist2,
    Shooter,
    Blocker,
    Winner,
    Loser,
    PenaltyOn,
    DrewBy,
    Goalie,
    /// Roles the stat tables do not credit (e.g. "ServedBy" on bench
    /// penalties). Carried through untouched.
    Other,
}

impl Role {
    pub fn from_feed(role: &str) -> Role {
        match role {
            "Scorer" => Role::Scorer,
            "Shooter" => Role::Shooter,
            "Blocker" => Role::Blocker,
            "Winner" => Role::Winner,
            "Loser" => Role::Loser,
            "PenaltyOn" => Role::PenaltyOn,
            "DrewBy" => Role::DrewBy,
            "Goalie" => Role::Goalie,
            _ => Role::Other,
        }
    }
}

/// A player's part in an event, in feed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPlayer {
    pub player_id: i64,
    pub role: Role,
}

/// Skaters and goalies on the ice for one venue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnIceSide {
    pub goalies: Vec<i64>,
    pub skaters: Vec<i64>,
}

/// Full two-venue occupancy snapshot for one second of play.
pub type OnIce = VenuePair<OnIceSide>;

/// A normalized play-by-play event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Feed event index; unique within the game.
    pub id: u32,
    pub period: u8,
    /// Seconds elapsed in the period.
    pub time_sec: u32,
    pub event_type: EventType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_type: Option<String>,
    pub description: String,
    /// Home-frame zone, when the feed carried coordinates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone: Option<Zone>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub penalty_severity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub penalty_minutes: Option<u8>,
    pub players: Vec<EventPlayer>,
    /// Tricode of the team credited with the event. For blocked shots
    /// this is the shooting team, after the extractor's correction.
    pub team: String,
    pub venue: Venue,
    /// Running score before this event happened (goals excluded from
    /// their own score).
    pub score_at_event: VenuePair<u16>,
    /// Set when this event resolves a penalty-shot award.
    pub penalty_shot: bool,
    /// Occupancy at the attributed second; filled by the aggregator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_ice: Option<OnIce>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_ids_cover_exactly_the_recorded_types() {
        assert_eq!(EventType::from_feed_id("GOAL"), Some(EventType::Goal));
        assert_eq!(EventType::from_feed_id("BLOCKED_SHOT"), Some(EventType::BlockedShot));
        assert_eq!(EventType::from_feed_id("HIT"), None);
        assert_eq!(EventType::from_feed_id("STOP"), None);
    }

    #[test]
    fn shot_class_excludes_faceoffs_and_penalties() {
        assert!(EventType::Goal.is_shot_class());
        assert!(EventType::MissedShot.is_shot_class());
        assert!(!EventType::Faceoff.is_shot_class());
        assert!(!EventType::Penalty.is_shot_class());
    }

    #[test]
    fn zone_mirror_swaps_ends_only() {
        assert_eq!(Zone::Defensive.mirror(), Zone::Offensive);
        assert_eq!(Zone::Neutral.mirror(), Zone::Neutral);
    }

    #[test]
    fn unknown_feed_roles_fall_back_to_other() {
        assert_eq!(Role::from_feed("Winner"), Role::Winner);
        assert_eq!(Role::from_feed("ServedBy"), Role::Other);
    }
}
