//! Stat aggregation: replays the score over the second table, classifies
//! every second, accrues time on ice, then attributes each discrete
//! event to one second's occupancy snapshot and credits personnel.

use fxhash::FxHashMap;
use tracing::debug;

use crate::engine::shifts::{OccupancyTable, Second};
use crate::engine::situation::{classify_score, classify_strength};
use crate::error::{GameError, Result};
use crate::models::{
    Event, EventType, PlayerRecord, Role, SitKey, Stat, StrengthSit, TeamRecord, Venue, VenuePair,
    Zone,
};

/// Run every aggregation pass over one game's state, in order. Events
/// must arrive in feed order (non-decreasing (period, time)); nothing
/// here sorts them.
pub fn aggregate(
    events: &mut [Event],
    table: &mut OccupancyTable,
    roster: &mut FxHashMap<i64, PlayerRecord>,
    teams: &mut VenuePair<TeamRecord>,
) -> Result<()> {
    replay_score(table, events);
    classify_seconds(table);
    accrue_toi(table, roster, teams);
    attribute_events(events, table, roster, teams)?;
    debug!(events = events.len(), "aggregation complete");
    Ok(())
}

/// Replay goals over the second table, in feed (period, time) order. A
/// goal raises its side's score for every second of every later period,
/// and for seconds `[t, periodEnd)` of its own period — the second the
/// goal occurs in still carries the pre-goal score via the event's own
/// `score_at_event`.
fn replay_score(table: &mut OccupancyTable, events: &[Event]) {
    for goal in events.iter().filter(|e| e.event_type == EventType::Goal) {
        for period in &mut table.periods {
            if period.period < goal.period {
                continue;
            }
            let from = if period.period == goal.period {
                (goal.time_sec as usize).min(period.seconds.len())
            } else {
                0
            };
            for second in &mut period.seconds[from..] {
                *second.score.get_mut(goal.venue) += 1;
            }
        }
    }
}

/// Fill every second's strength and score situation from its occupancy
/// and replayed score.
fn classify_seconds(table: &mut OccupancyTable) {
    for period in &mut table.periods {
        for second in &mut period.seconds {
            let goalies = VenuePair::from_fn(|v| second.on_ice.get(v).goalies.len());
            let skaters = VenuePair::from_fn(|v| second.on_ice.get(v).skaters.len());
            second.strength = classify_strength(goalies, skaters);
            second.score_sit = classify_score(second.score);
        }
    }
}

/// One second of toi per occupied second, to each occupant and their
/// team, under that second's situation for their venue.
fn accrue_toi(
    table: &OccupancyTable,
    roster: &mut FxHashMap<i64, PlayerRecord>,
    teams: &mut VenuePair<TeamRecord>,
) {
    for period in &table.periods {
        for second in &period.seconds {
            for venue in Venue::BOTH {
                let key = situation_key(second, venue);
                let side = second.on_ice.get(venue);
                if side.goalies.is_empty() && side.skaters.is_empty() {
                    continue;
                }
                teams.get_mut(venue).stats.bump(key, Stat::Toi);
                for id in side.goalies.iter().chain(&side.skaters) {
                    if let Some(player) = roster.get_mut(id) {
                        player.stats.bump(key, Stat::Toi);
                    }
                }
            }
        }
    }
}

fn situation_key(second: &Second, venue: Venue) -> SitKey {
    (*second.strength.get(venue), *second.score_sit.get(venue))
}

/// Which second an event belongs to. Faceoffs start play, so they attach
/// to the second beginning at their timestamp; every clock-down type is
/// credited to the play that led to it, the second ending at the
/// timestamp. Both ends of the period clamp into the table.
fn attributed_second_index(event_type: EventType, time_sec: u32, period_len: usize) -> usize {
    let t = time_sec as usize;
    let idx = if event_type == EventType::Faceoff { t } else { t.saturating_sub(1) };
    idx.min(period_len.saturating_sub(1))
}

/// Static (role, event type) → player stat mapping.
fn role_stats(role: Role, event_type: EventType) -> &'static [Stat] {
    use EventType::*;
    use Role::*;
    match (role, event_type) {
        (Winner, Faceoff) => &[Stat::FoWon],
        (Loser, Faceoff) => &[Stat::FoLost],
        (Blocker, BlockedShot) => &[Stat::Blocked],
        (Scorer, Goal) => &[Stat::Ig, Stat::Is],
        (Assist1, Goal) => &[Stat::Ia1],
        (Assist2, Goal) => &[Stat::Ia2],
        (PenaltyOn, Penalty) => &[Stat::PenTaken],
        (DrewBy, Penalty) => &[Stat::PenDrawn],
        (Shooter, Shot) => &[Stat::Is],
        (Shooter, BlockedShot) => &[Stat::Ibs],
        (Shooter, MissedShot) => &[Stat::Ims],
        _ => &[],
    }
}

/// Team-side stats for one venue's view of an event: suffix f when the
/// acting team is that venue, a otherwise. Faceoff zone counts are
/// relative to each team's own frame, so the home-frame zone is mirrored
/// for the away team. Penalties return team-only credits.
fn team_stats(
    event_type: EventType,
    acting: bool,
    zone: Option<Zone>,
    venue: Venue,
) -> Vec<Stat> {
    match event_type {
        EventType::Goal => {
            if acting {
                vec![Stat::Gf, Stat::Sf]
            } else {
                vec![Stat::Ga, Stat::Sa]
            }
        }
        EventType::Shot => vec![if acting { Stat::Sf } else { Stat::Sa }],
        EventType::BlockedShot => vec![if acting { Stat::Bsf } else { Stat::Bsa }],
        EventType::MissedShot => vec![if acting { Stat::Msf } else { Stat::Msa }],
        EventType::Faceoff => {
            let mut stats = vec![if acting { Stat::FoWon } else { Stat::FoLost }];
            if let Some(zone) = zone {
                let frame_zone = if venue == Venue::Home { zone } else { zone.mirror() };
                stats.push(match frame_zone {
                    Zone::Offensive => Stat::Ofo,
                    Zone::Defensive => Stat::Dfo,
                    Zone::Neutral => Stat::Nfo,
                });
            }
            stats
        }
        EventType::Penalty => vec![if acting { Stat::PenTaken } else { Stat::PenDrawn }],
    }
}

/// Walk the events, snapshotting each one's attributed second and
/// crediting players, teams, and everyone on the ice.
fn attribute_events(
    events: &mut [Event],
    table: &OccupancyTable,
    roster: &mut FxHashMap<i64, PlayerRecord>,
    teams: &mut VenuePair<TeamRecord>,
) -> Result<()> {
    for event in events.iter_mut() {
        let period = table.period(event.period).ok_or(GameError::UnknownPeriod {
            event_idx: event.id,
            period: event.period,
        })?;
        let idx = attributed_second_index(event.event_type, event.time_sec, period.seconds.len());
        let second = &period.seconds[idx];
        event.on_ice = Some(second.on_ice.clone());

        // A resolved penalty shot overrides whatever the occupancy says.
        let strength = if event.penalty_shot {
            VenuePair::new(StrengthSit::PenShot, StrengthSit::PenShot)
        } else {
            second.strength
        };
        // Events are keyed by the score the play started under, which
        // for goals is the pre-goal score.
        let score_sit = classify_score(event.score_at_event);

        for ep in &event.players {
            let stats = role_stats(ep.role, event.event_type);
            if stats.is_empty() {
                continue;
            }
            let player = roster.get_mut(&ep.player_id).ok_or(GameError::UnknownPlayer {
                context: "event role",
                player_id: ep.player_id,
            })?;
            let key = (*strength.get(player.venue), *score_sit.get(player.venue));
            player.stats.bump_each(key, stats);
        }

        for venue in Venue::BOTH {
            let acting = venue == event.venue;
            let stats = team_stats(event.event_type, acting, event.zone, venue);
            let key = (*strength.get(venue), *score_sit.get(venue));
            teams.get_mut(venue).stats.bump_each(key, &stats);
            // Penalties credit teams only; everything else credits the
            // skaters and goalies on that venue's ice as well. Faceoff
            // win/loss is the winner's and loser's alone — the on-ice
            // share is the zone count.
            if event.event_type == EventType::Penalty {
                continue;
            }
            let shared: Vec<Stat> = if event.event_type == EventType::Faceoff {
                stats
                    .iter()
                    .copied()
                    .filter(|s| matches!(s, Stat::Ofo | Stat::Dfo | Stat::Nfo))
                    .collect()
            } else {
                stats
            };
            let side = second.on_ice.get(venue);
            for id in side.goalies.iter().chain(&side.skaters) {
                if let Some(player) = roster.get_mut(id) {
                    player.stats.bump_each(key, &shared);
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn faceoffs_attach_to_the_starting_second() {
        assert_eq!(attributed_second_index(EventType::Faceoff, 0, 1200), 0);
        assert_eq!(attributed_second_index(EventType::Faceoff, 600, 1200), 600);
        // A faceoff stamped at the period end clamps into the table.
        assert_eq!(attributed_second_index(EventType::Faceoff, 1200, 1200), 1199);
    }

    #[test]
    fn clock_down_events_attach_to_the_preceding_second() {
        assert_eq!(attributed_second_index(EventType::Goal, 300, 1200), 299);
        assert_eq!(attributed_second_index(EventType::Shot, 1200, 1200), 1199);
        // No preceding second exists at t = 0.
        assert_eq!(attributed_second_index(EventType::Goal, 0, 1200), 0);
    }

    #[test]
    fn role_table_covers_every_credited_pairing() {
        assert_eq!(role_stats(Role::Winner, EventType::Faceoff), &[Stat::FoWon]);
        assert_eq!(role_stats(Role::Scorer, EventType::Goal), &[Stat::Ig, Stat::Is]);
        assert_eq!(role_stats(Role::Shooter, EventType::BlockedShot), &[Stat::Ibs]);
        assert_eq!(role_stats(Role::Shooter, EventType::MissedShot), &[Stat::Ims]);
        assert_eq!(role_stats(Role::DrewBy, EventType::Penalty), &[Stat::PenDrawn]);
        // Roles outside the table credit nothing.
        assert!(role_stats(Role::Goalie, EventType::Shot).is_empty());
        assert!(role_stats(Role::Scorer, EventType::Shot).is_empty());
    }

    #[test]
    fn faceoff_zone_counts_are_frame_relative() {
        // Home-frame defensive zone: dfo for home, ofo for away.
        let home = team_stats(EventType::Faceoff, false, Some(Zone::Defensive), Venue::Home);
        assert_eq!(home, vec![Stat::FoLost, Stat::Dfo]);
        let away = team_stats(EventType::Faceoff, true, Some(Zone::Defensive), Venue::Away);
        assert_eq!(away, vec![Stat::FoWon, Stat::Ofo]);
        // Neutral ice is neutral for both.
        let n = team_stats(EventType::Faceoff, true, Some(Zone::Neutral), Venue::Away);
        assert_eq!(n, vec![Stat::FoWon, Stat::Nfo]);
    }

    #[test]
    fn goals_count_as_shots_for_and_against() {
        assert_eq!(team_stats(EventType::Goal, true, None, Venue::Away), vec![Stat::Gf, Stat::Sf]);
        assert_eq!(team_stats(EventType::Goal, false, None, Venue::Home), vec![Stat::Ga, Stat::Sa]);
    }
}
