//! The reconciliation engine: extraction, shift reconciliation,
//! situation classification, and stat aggregation over one game.

pub mod aggregator;
pub mod extractor;
pub mod shifts;
pub mod situation;

use tracing::debug;

use crate::error::Result;
use crate::models::{GameAggregation, PlayByPlayDocument, ShiftDocument, TeamRecord, VenuePair};

/// Periods every finished game has, shootout and overtime aside.
const REGULATION_PERIODS: u8 = 3;

/// Fuse one game's play-by-play and shift documents into its situational
/// stat aggregation.
///
/// Single-threaded and deterministic: identical documents always yield
/// identical rows. All state is owned by this call and returned in the
/// aggregation; failures abort the whole game with no partial output.
pub fn reconcile_game(
    pbp: &PlayByPlayDocument,
    shift_doc: &ShiftDocument,
    is_playoffs: bool,
) -> Result<GameAggregation> {
    debug!(game_id = pbp.game_id, is_playoffs, "reconciling game");

    let mut events = extractor::extract_events(pbp, is_playoffs)?;
    let mut roster = shifts::build_roster(pbp)?;
    let shift_last = shifts::attach_shifts(shift_doc, &mut roster, is_playoffs)?;

    let event_last = events.iter().map(|e| e.period).max().unwrap_or(0);
    let last_period = shift_last.max(event_last).max(REGULATION_PERIODS);
    let mut table = shifts::build_occupancy(&roster, last_period, is_playoffs);

    let mut teams = VenuePair::from_fn(|venue| TeamRecord {
        tricode: pbp.tricodes.get(venue).clone(),
        venue,
        stats: Default::default(),
    });

    aggregator::aggregate(&mut events, &mut table, &mut roster, &mut teams)?;

    Ok(GameAggregation {
        season: pbp.season,
        game_id: pbp.game_id,
        date: pbp.start_time.date_naive(),
        teams,
        players: roster,
    })
}
