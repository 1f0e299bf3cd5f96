//! Event extraction: normalizes raw play-by-play records into typed
//! `Event`s — type filtering, role disambiguation, zone derivation, the
//! pre-goal score convention, the blocked-shot team correction, and the
//! penalty-shot forward scan.

use tracing::debug;

use crate::engine::shifts::{parse_clock, LAST_REGULAR_SEASON_PERIOD};
use crate::error::{GameError, Result};
use crate::models::{
    Event, EventPlayer, EventType, PlayByPlayDocument, RawEvent, Role, Venue, Zone,
};

/// Feed penalty severity that awards a penalty shot.
const PENALTY_SHOT_SEVERITY: &str = "penalty shot";

/// x coordinates beyond the blue lines, from centre ice.
const BLUE_LINE_X: f32 = 25.0;

/// Derive the home-frame zone from an x coordinate. The home defensive
/// end alternates each period; in odd periods it is the negative-x side.
pub fn derive_zone(x: f32, period: u8) -> Zone {
    let home_frame_x = if period % 2 == 1 { x } else { -x };
    if home_frame_x < -BLUE_LINE_X {
        Zone::Defensive
    } else if home_frame_x > BLUE_LINE_X {
        Zone::Offensive
    } else {
        Zone::Neutral
    }
}

/// Normalize the raw event list. Keeps only the six recorded types, in
/// feed order; regular-season events past period 4 belong to the
/// shootout and are dropped.
pub fn extract_events(doc: &PlayByPlayDocument, is_playoffs: bool) -> Result<Vec<Event>> {
    let mut events = Vec::new();
    for raw in &doc.events {
        let Some(event_type) = raw.type_id.as_deref().and_then(EventType::from_feed_id) else {
            // Unrecorded feed types pass through silently; a recorded-
            // looking record with no type id at all cannot be classified.
            if raw.type_id.is_none() {
                return Err(GameError::MissingField { event_idx: raw.event_idx, field: "type_id" });
            }
            continue;
        };
        let period = raw
            .period
            .ok_or(GameError::MissingField { event_idx: raw.event_idx, field: "period" })?;
        if !is_playoffs && period > LAST_REGULAR_SEASON_PERIOD {
            continue;
        }
        events.push(normalize(doc, raw, event_type, period)?);
    }
    annotate_penalty_shots(&mut events);
    debug!(recorded = events.len(), total = doc.events.len(), "events extracted");
    Ok(events)
}

fn normalize(
    doc: &PlayByPlayDocument,
    raw: &RawEvent,
    event_type: EventType,
    period: u8,
) -> Result<Event> {
    let clock = raw
        .period_time
        .as_deref()
        .ok_or(GameError::MissingField { event_idx: raw.event_idx, field: "period_time" })?;
    let time_sec = parse_clock(clock)?;

    let tricode = raw
        .team
        .as_deref()
        .ok_or(GameError::MissingField { event_idx: raw.event_idx, field: "team" })?;
    let mut venue = venue_of(doc, raw.event_idx, tricode)?;
    // The feed credits a blocked shot to the blocking team; the engine
    // credits the shooting team.
    if event_type == EventType::BlockedShot {
        venue = venue.opposite();
    }
    let team = doc.tricodes.get(venue).clone();

    // Running totals include a goal in its own score; back it out so
    // every event carries the score the play started under.
    let mut score_at_event = raw.goals;
    if event_type == EventType::Goal {
        let side = score_at_event.get_mut(venue);
        *side = side.saturating_sub(1);
    }

    Ok(Event {
        id: raw.event_idx,
        period,
        time_sec,
        event_type,
        secondary_type: raw.secondary_type.clone(),
        description: raw.description.clone(),
        zone: raw.coordinates.map(|(x, _)| derive_zone(x, period)),
        penalty_severity: raw.penalty_severity.clone(),
        penalty_minutes: raw.penalty_minutes,
        players: extract_roles(raw, event_type)?,
        team,
        venue,
        score_at_event,
        penalty_shot: false,
        on_ice: None,
    })
}

fn venue_of(doc: &PlayByPlayDocument, event_idx: u32, tricode: &str) -> Result<Venue> {
    for venue in Venue::BOTH {
        if doc.tricodes.get(venue) == tricode {
            return Ok(venue);
        }
    }
    Err(GameError::UnknownTeam { event_idx, tricode: tricode.to_string() })
}

/// Map the feed's (player, role) list onto typed roles. Goals are
/// positional: the first entry is the scorer and feed "Assist" entries
/// become assist1/assist2 in order; a third assist has no defined
/// meaning and rejects the game.
fn extract_roles(raw: &RawEvent, event_type: EventType) -> Result<Vec<EventPlayer>> {
    if event_type != EventType::Goal {
        return Ok(raw
            .players
            .iter()
            .map(|p| EventPlayer { player_id: p.player_id, role: Role::from_feed(&p.role) })
            .collect());
    }

    let mut players = Vec::with_capacity(raw.players.len());
    let mut assists = 0u8;
    for (position, p) in raw.players.iter().enumerate() {
        let role = if position == 0 {
            Role::Scorer
        } else if p.role == "Assist" {
            assists += 1;
            match assists {
                1 => Role::Assist1,
                2 => Role::Assist2,
                _ => return Err(GameError::UnexpectedAssist { event_idx: raw.event_idx }),
            }
        } else {
            Role::from_feed(&p.role)
        };
        players.push(EventPlayer { player_id: p.player_id, role });
    }
    Ok(players)
}

/// For each penalty awarding a penalty shot, scan forward to the nearest
/// subsequent shot-class event and mark it as the shot attempt. The
/// discovered event is annotated, whatever its offset; an award with no
/// following shot-class event is left unresolved.
fn annotate_penalty_shots(events: &mut [Event]) {
    let awards: Vec<usize> = events
        .iter()
        .enumerate()
        .filter(|(_, e)| {
            e.event_type == EventType::Penalty
                && e.penalty_severity
                    .as_deref()
                    .is_some_and(|s| s.eq_ignore_ascii_case(PENALTY_SHOT_SEVERITY))
        })
        .map(|(i, _)| i)
        .collect();

    for award in awards {
        if let Some(attempt) =
            events[award + 1..].iter_mut().find(|e| e.event_type.is_shot_class())
        {
            attempt.penalty_shot = true;
        }
    }
}
