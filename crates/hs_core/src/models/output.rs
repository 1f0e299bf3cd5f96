use chrono::NaiveDate;
use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::situation::{StrengthSit, Venue, VenuePair};
use super::stats::{PlayerRecord, Stat, StatLine, TeamRecord};

/// Player id used on team rows.
pub const TEAM_ROW_PLAYER_ID: i64 = 0;

/// One emitted row: an entity (team or player) under one situational
/// bucket, with the fixed stat columns. This is the stable contract the
/// external writer/persistence layer consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatRow {
    pub season: u16,
    pub date: NaiveDate,
    pub game_id: u64,
    pub tricode: String,
    /// 0 for team rows.
    pub player_id: i64,
    pub strength_sit: StrengthSit,
    pub score_sit: i8,
    pub stats: StatLine,
}

impl StatRow {
    /// Stat column headers in the same order as `StatLine::values`.
    pub fn stat_columns() -> [&'static str; Stat::COUNT] {
        let mut names = [""; Stat::COUNT];
        for (slot, stat) in names.iter_mut().zip(Stat::ALL) {
            *slot = stat.as_str();
        }
        names
    }
}

/// Everything one game's reconciliation produced. Built fresh per game
/// and discarded once rows are emitted; nothing here outlives the game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameAggregation {
    pub season: u16,
    pub game_id: u64,
    pub date: NaiveDate,
    pub teams: VenuePair<TeamRecord>,
    pub players: FxHashMap<i64, PlayerRecord>,
}

impl GameAggregation {
    /// Emit the sparse rows: one per nonzero (entity, strength, score)
    /// bucket, sorted by (tricode, player id, strength, score) so
    /// identical inputs always produce byte-identical output.
    pub fn rows(&self) -> Vec<StatRow> {
        let mut rows = Vec::new();
        for venue in Venue::BOTH {
            let team = self.teams.get(venue);
            for ((strength, score), line) in team.stats.sorted() {
                rows.push(self.row(&team.tricode, TEAM_ROW_PLAYER_ID, strength, score, line));
            }
        }
        for player in self.players.values() {
            for ((strength, score), line) in player.stats.sorted() {
                rows.push(self.row(&player.tricode, player.id, strength, score, line));
            }
        }
        rows.sort_by(|a, b| {
            (&a.tricode, a.player_id, a.strength_sit, a.score_sit)
                .cmp(&(&b.tricode, b.player_id, b.strength_sit, b.score_sit))
        });
        rows
    }

    fn row(
        &self,
        tricode: &str,
        player_id: i64,
        strength_sit: StrengthSit,
        score_sit: i8,
        stats: &StatLine,
    ) -> StatRow {
        StatRow {
            season: self.season,
            date: self.date,
            game_id: self.game_id,
            tricode: tricode.to_string(),
            player_id,
            strength_sit,
            score_sit,
            stats: *stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stat_columns_match_the_contract() {
        let cols = StatRow::stat_columns();
        assert_eq!(cols[0], "toi");
        assert_eq!(cols[7], "blocked");
        assert_eq!(cols[Stat::COUNT - 1], "penDrawn");
    }
}
