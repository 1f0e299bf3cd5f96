//! Shift reconciliation: turns the raw shift-chart rows into per-player
//! intervals and a per-period, per-second occupancy table.

use fxhash::FxHashMap;
use tracing::debug;

use crate::error::{GameError, Result};
use crate::models::{
    OnIce, PlayByPlayDocument, PlayerRecord, ShiftDocument, ShiftInterval, StrengthSit, Venue,
    VenuePair,
};

/// Regulation and playoff-overtime periods are 20 minutes.
pub const REGULATION_PERIOD_SEC: u32 = 1200;
/// Regular-season overtime (period 4) is 5 minutes of 3-on-3.
pub const REGULAR_SEASON_OT_SEC: u32 = 300;
/// Last period a regular-season game can reach before the shootout.
pub const LAST_REGULAR_SEASON_PERIOD: u8 = 4;

/// Length of a period in seconds. Every playoff period, including
/// sudden-death overtimes beyond the fourth, runs the full twenty
/// minutes; only regular-season overtime is short.
pub fn period_duration(period: u8, is_playoffs: bool) -> u32 {
    if !is_playoffs && period == LAST_REGULAR_SEASON_PERIOD {
        REGULAR_SEASON_OT_SEC
    } else {
        REGULATION_PERIOD_SEC
    }
}

/// Parse a "mm:ss" period clock into elapsed seconds.
pub fn parse_clock(clock: &str) -> Result<u32> {
    let invalid = || GameError::InvalidClock { clock: clock.to_string() };
    let (minutes, seconds) = clock.split_once(':').ok_or_else(invalid)?;
    let minutes: u32 = minutes.parse().map_err(|_| invalid())?;
    let seconds: u32 = seconds.parse().map_err(|_| invalid())?;
    if seconds >= 60 {
        return Err(invalid());
    }
    Ok(minutes * 60 + seconds)
}

/// One second of game time with both venues' occupancy and, once the
/// aggregator has run its passes, the score and situation for that
/// second.
#[derive(Debug, Clone, Default)]
pub struct Second {
    pub on_ice: OnIce,
    pub score: VenuePair<u16>,
    pub strength: VenuePair<StrengthSit>,
    pub score_sit: VenuePair<i8>,
}

/// All seconds of one period, index t covering `[0, duration)`.
#[derive(Debug, Clone)]
pub struct PeriodSeconds {
    pub period: u8,
    pub seconds: Vec<Second>,
}

/// The full occupancy table for a game, periods in ascending order.
#[derive(Debug, Clone, Default)]
pub struct OccupancyTable {
    pub periods: Vec<PeriodSeconds>,
}

impl OccupancyTable {
    pub fn period(&self, period: u8) -> Option<&PeriodSeconds> {
        self.periods.iter().find(|p| p.period == period)
    }

    pub fn period_mut(&mut self, period: u8) -> Option<&mut PeriodSeconds> {
        self.periods.iter_mut().find(|p| p.period == period)
    }
}

/// Join the registry and the per-venue rosters into the per-game player
/// map. Registry entries that never dressed are dropped; a roster entry
/// missing from the registry aborts the game.
pub fn build_roster(doc: &PlayByPlayDocument) -> Result<FxHashMap<i64, PlayerRecord>> {
    let mut names = FxHashMap::default();
    for player in &doc.players {
        names.insert(player.id, format!("{} {}", player.first_name, player.last_name));
    }

    let mut roster = FxHashMap::default();
    for venue in Venue::BOTH {
        let tricode = doc.tricodes.get(venue);
        for entry in doc.rosters.get(venue) {
            let name = names.get(&entry.player_id).ok_or(GameError::UnknownPlayer {
                context: "roster entry",
                player_id: entry.player_id,
            })?;
            roster.insert(
                entry.player_id,
                PlayerRecord {
                    id: entry.player_id,
                    name: name.clone(),
                    position: entry.position.clone(),
                    jersey: entry.jersey,
                    venue,
                    tricode: tricode.clone(),
                    shifts: Vec::new(),
                    stats: Default::default(),
                },
            );
        }
    }
    debug!(players = roster.len(), "roster built");
    Ok(roster)
}

/// Parse every shift row, attach the intervals to their players, and
/// report the highest period any kept shift reaches. A shift for a
/// player on neither roster aborts the game; regular-season shifts past
/// period 4 belong to the shootout and are dropped.
pub fn attach_shifts(
    doc: &ShiftDocument,
    roster: &mut FxHashMap<i64, PlayerRecord>,
    is_playoffs: bool,
) -> Result<u8> {
    let mut last_period = 0u8;
    let mut dropped = 0usize;
    for shift in &doc.shifts {
        if !is_playoffs && shift.period > LAST_REGULAR_SEASON_PERIOD {
            dropped += 1;
            continue;
        }
        let interval = ShiftInterval {
            player_id: shift.player_id,
            period: shift.period,
            start_sec: parse_clock(&shift.start_time)?,
            end_sec: parse_clock(&shift.end_time)?,
        };
        // A reversed interval or a start past the period end is feed
        // corruption, not a shift; abort rather than aggregate around it.
        let duration = period_duration(shift.period, is_playoffs);
        if interval.start_sec > interval.end_sec || interval.start_sec > duration {
            return Err(GameError::InvalidShift {
                player_id: shift.player_id,
                period: shift.period,
                start_sec: interval.start_sec,
                end_sec: interval.end_sec,
                duration,
            });
        }
        let player = roster.get_mut(&shift.player_id).ok_or(GameError::UnknownPlayer {
            context: "shift",
            player_id: shift.player_id,
        })?;
        last_period = last_period.max(shift.period);
        player.shifts.push(interval);
    }
    if dropped > 0 {
        debug!(dropped, "shootout shifts excluded");
    }
    Ok(last_period)
}

/// Build the per-second occupancy table for periods `1..=last_period`.
/// A player occupies every second fully contained in a shift's
/// half-open `[start, end)`; position code "g" routes to the goalie
/// lists. Occupancy lists never hold a player id twice in one second.
pub fn build_occupancy(
    roster: &FxHashMap<i64, PlayerRecord>,
    last_period: u8,
    is_playoffs: bool,
) -> OccupancyTable {
    let mut table = OccupancyTable::default();
    for period in 1..=last_period {
        let duration = period_duration(period, is_playoffs) as usize;
        table.periods.push(PeriodSeconds {
            period,
            seconds: vec![Second::default(); duration],
        });
    }

    for player in roster.values() {
        let goalie = player.is_goalie();
        for shift in &player.shifts {
            let Some(period) = table.period_mut(shift.period) else {
                continue;
            };
            // Both bounds clamp into the period; attach_shifts has
            // already rejected intervals that start past the end.
            let end = (shift.end_sec as usize).min(period.seconds.len());
            let start = (shift.start_sec as usize).min(end);
            for second in &mut period.seconds[start..end] {
                let side = second.on_ice.get_mut(player.venue);
                let list = if goalie { &mut side.goalies } else { &mut side.skaters };
                if !list.contains(&player.id) {
                    list.push(player.id);
                }
            }
        }
    }

    // Occupancy list order must not depend on roster map iteration order.
    for period in &mut table.periods {
        for second in &mut period.seconds {
            for venue in Venue::BOTH {
                let side = second.on_ice.get_mut(venue);
                side.goalies.sort_unstable();
                side.skaters.sort_unstable();
            }
        }
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RawShift, RegistryPlayer, RosterEntry};

    fn doc_with_players(entries: &[(i64, &str, Venue)]) -> PlayByPlayDocument {
        let mut doc = PlayByPlayDocument {
            game_id: 2016020001,
            season: 2016,
            start_time: "2016-10-12T23:00:00Z".parse().unwrap(),
            tricodes: VenuePair::new("TOR".into(), "OTT".into()),
            players: Vec::new(),
            rosters: VenuePair::new(Vec::new(), Vec::new()),
            events: Vec::new(),
        };
        for &(id, position, venue) in entries {
            doc.players.push(RegistryPlayer {
                id,
                first_name: "Player".into(),
                last_name: format!("{id}"),
            });
            doc.rosters.get_mut(venue).push(RosterEntry {
                player_id: id,
                position: position.into(),
                jersey: (id % 98) as u8 + 1,
            });
        }
        doc
    }

    fn shift(player_id: i64, period: u8, start: &str, end: &str) -> RawShift {
        RawShift {
            player_id,
            period,
            start_time: start.into(),
            end_time: end.into(),
        }
    }

    #[test]
    fn clock_parses_and_rejects() {
        assert_eq!(parse_clock("0:00").unwrap(), 0);
        assert_eq!(parse_clock("05:30").unwrap(), 330);
        assert_eq!(parse_clock("20:00").unwrap(), 1200);
        assert!(parse_clock("5:61").is_err());
        assert!(parse_clock("530").is_err());
        assert!(parse_clock("a:10").is_err());
    }

    #[test]
    fn period_durations_follow_era_rules() {
        assert_eq!(period_duration(1, false), 1200);
        assert_eq!(period_duration(3, true), 1200);
        // Regular-season 3-on-3 overtime is five minutes.
        assert_eq!(period_duration(4, false), 300);
        // Playoff overtimes are full periods, however deep.
        assert_eq!(period_duration(4, true), 1200);
        assert_eq!(period_duration(7, true), 1200);
    }

    #[test]
    fn shifts_are_half_open_intervals() {
        let doc = doc_with_players(&[(10, "c", Venue::Away)]);
        let mut roster = build_roster(&doc).unwrap();
        let shifts = ShiftDocument { shifts: vec![shift(10, 1, "0:10", "0:45")] };
        let last = attach_shifts(&shifts, &mut roster, false).unwrap();
        let table = build_occupancy(&roster, last, false);
        let seconds = &table.period(1).unwrap().seconds;
        assert!(seconds[9].on_ice.away.skaters.is_empty());
        assert_eq!(seconds[10].on_ice.away.skaters, vec![10]);
        assert_eq!(seconds[44].on_ice.away.skaters, vec![10]);
        // end second is exclusive
        assert!(seconds[45].on_ice.away.skaters.is_empty());
    }

    #[test]
    fn goalies_route_to_goalie_lists() {
        let doc = doc_with_players(&[(30, "G", Venue::Home), (11, "d", Venue::Home)]);
        let mut roster = build_roster(&doc).unwrap();
        let shifts = ShiftDocument {
            shifts: vec![shift(30, 1, "0:00", "20:00"), shift(11, 1, "0:00", "1:00")],
        };
        let last = attach_shifts(&shifts, &mut roster, false).unwrap();
        let table = build_occupancy(&roster, last, false);
        let second = &table.period(1).unwrap().seconds[30];
        assert_eq!(second.on_ice.home.goalies, vec![30]);
        assert_eq!(second.on_ice.home.skaters, vec![11]);
    }

    #[test]
    fn overlapping_shifts_never_duplicate_a_player() {
        let doc = doc_with_players(&[(10, "c", Venue::Away)]);
        let mut roster = build_roster(&doc).unwrap();
        let shifts = ShiftDocument {
            shifts: vec![shift(10, 1, "0:00", "0:30"), shift(10, 1, "0:20", "0:50")],
        };
        let last = attach_shifts(&shifts, &mut roster, false).unwrap();
        let table = build_occupancy(&roster, last, false);
        assert_eq!(table.period(1).unwrap().seconds[25].on_ice.away.skaters, vec![10]);
    }

    #[test]
    fn malformed_shift_intervals_abort_the_game() {
        // A reversed interval ("5:00"-"4:00") is corruption, not a shift.
        let doc = doc_with_players(&[(10, "c", Venue::Away)]);
        let mut roster = build_roster(&doc).unwrap();
        let shifts = ShiftDocument { shifts: vec![shift(10, 1, "5:00", "4:00")] };
        let err = attach_shifts(&shifts, &mut roster, false).unwrap_err();
        assert!(matches!(
            err,
            GameError::InvalidShift { player_id: 10, period: 1, start_sec: 300, end_sec: 240, .. }
        ));

        // So is a start past the end of the short regular-season OT.
        let mut roster = build_roster(&doc).unwrap();
        let shifts = ShiftDocument { shifts: vec![shift(10, 4, "6:00", "7:00")] };
        let err = attach_shifts(&shifts, &mut roster, false).unwrap_err();
        assert!(matches!(
            err,
            GameError::InvalidShift { period: 4, start_sec: 360, duration: 300, .. }
        ));

        // The same clocks are a legal shift in a full playoff period.
        let mut roster = build_roster(&doc).unwrap();
        let last = attach_shifts(&shifts, &mut roster, true).unwrap();
        let table = build_occupancy(&roster, last, true);
        assert_eq!(table.period(4).unwrap().seconds[400].on_ice.away.skaters, vec![10]);
    }

    #[test]
    fn unknown_shift_player_aborts_the_game() {
        let doc = doc_with_players(&[(10, "c", Venue::Away)]);
        let mut roster = build_roster(&doc).unwrap();
        let shifts = ShiftDocument { shifts: vec![shift(99, 1, "0:00", "0:30")] };
        let err = attach_shifts(&shifts, &mut roster, false).unwrap_err();
        assert!(matches!(err, GameError::UnknownPlayer { player_id: 99, .. }));
    }

    #[test]
    fn regular_season_shootout_shifts_are_dropped() {
        let doc = doc_with_players(&[(10, "c", Venue::Away)]);
        let mut roster = build_roster(&doc).unwrap();
        let shifts = ShiftDocument {
            shifts: vec![shift(10, 1, "0:00", "1:00"), shift(10, 5, "0:00", "0:10")],
        };
        let last = attach_shifts(&shifts, &mut roster, false).unwrap();
        assert_eq!(last, 1);
        assert_eq!(roster[&10].shifts.len(), 1);
        // The same rows survive in a playoff game.
        let mut roster = build_roster(&doc).unwrap();
        let last = attach_shifts(&shifts, &mut roster, true).unwrap();
        assert_eq!(last, 5);
    }
}
