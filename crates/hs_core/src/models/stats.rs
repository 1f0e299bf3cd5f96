use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::situation::{StrengthSit, Venue};

/// The fixed stat columns of the output contract, in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Stat {
    Toi,
    Ig,
    Is,
    Ibs,
    Ims,
    Ia1,
    Ia2,
    Blocked,
    Gf,
    Ga,
    Sf,
    Sa,
    Bsf,
    Bsa,
    Msf,
    Msa,
    FoWon,
    FoLost,
    Ofo,
    Dfo,
    Nfo,
    PenTaken,
    PenDrawn,
}

impl Stat {
    pub const COUNT: usize = 23;

    /// Column order of the tabular output boundary. Never reorder.
    pub const ALL: [Stat; Stat::COUNT] = [
        Stat::Toi,
        Stat::Ig,
        Stat::Is,
        Stat::Ibs,
        Stat::Ims,
        Stat::Ia1,
        Stat::Ia2,
        Stat::Blocked,
        Stat::Gf,
        Stat::Ga,
        Stat::Sf,
        Stat::Sa,
        Stat::Bsf,
        Stat::Bsa,
        Stat::Msf,
        Stat::Msa,
        Stat::FoWon,
        Stat::FoLost,
        Stat::Ofo,
        Stat::Dfo,
        Stat::Nfo,
        Stat::PenTaken,
        Stat::PenDrawn,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Stat::Toi => "toi",
            Stat::Ig => "ig",
            Stat::Is => "is",
            Stat::Ibs => "ibs",
            Stat::Ims => "ims",
            Stat::Ia1 => "ia1",
            Stat::Ia2 => "ia2",
            Stat::Blocked => "blocked",
            Stat::Gf => "gf",
            Stat::Ga => "ga",
            Stat::Sf => "sf",
            Stat::Sa => "sa",
            Stat::Bsf => "bsf",
            Stat::Bsa => "bsa",
            Stat::Msf => "msf",
            Stat::Msa => "msa",
            Stat::FoWon => "foWon",
            Stat::FoLost => "foLost",
            Stat::Ofo => "ofo",
            Stat::Dfo => "dfo",
            Stat::Nfo => "nfo",
            Stat::PenTaken => "penTaken",
            Stat::PenDrawn => "penDrawn",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// One bucket's worth of counts, dense over the fixed columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatLine([u32; Stat::COUNT]);

impl StatLine {
    pub fn get(&self, stat: Stat) -> u32 {
        self.0[stat.index()]
    }

    pub fn add(&mut self, stat: Stat, amount: u32) {
        self.0[stat.index()] += amount;
    }

    pub fn bump(&mut self, stat: Stat) {
        self.add(stat, 1);
    }

    /// True when every column is zero; such buckets are suppressed at
    /// emission.
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&v| v == 0)
    }

    /// Values in column order.
    pub fn values(&self) -> &[u32; Stat::COUNT] {
        &self.0
    }
}

/// Key of one situational bucket: strength situation plus clamped goal
/// differential, both from the owning entity's perspective.
pub type SitKey = (StrengthSit, i8);

/// Sparse per-situation stat table. Buckets materialize on first
/// increment; `sorted` drops any all-zero bucket so suppressed
/// situations never reach the output boundary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SituationStats {
    buckets: FxHashMap<SitKey, StatLine>,
}

impl SituationStats {
    pub fn add(&mut self, key: SitKey, stat: Stat, amount: u32) {
        self.buckets.entry(key).or_default().add(stat, amount);
    }

    pub fn bump(&mut self, key: SitKey, stat: Stat) {
        self.add(key, stat, 1);
    }

    pub fn bump_each(&mut self, key: SitKey, stats: &[Stat]) {
        for &stat in stats {
            self.bump(key, stat);
        }
    }

    pub fn get(&self, key: SitKey) -> Option<&StatLine> {
        self.buckets.get(&key)
    }

    /// Sum of one column over every bucket.
    pub fn total(&self, stat: Stat) -> u64 {
        self.buckets.values().map(|line| u64::from(line.get(stat))).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Nonzero buckets in (strength, score) key order, for deterministic
    /// emission.
    pub fn sorted(&self) -> Vec<(SitKey, &StatLine)> {
        let mut rows: Vec<_> = self
            .buckets
            .iter()
            .filter(|(_, line)| !line.is_empty())
            .map(|(&key, line)| (key, line))
            .collect();
        rows.sort_by_key(|&(key, _)| key);
        rows
    }
}

/// A shift as a half-open interval of period seconds: the player is on
/// the ice for every second `t` with `start_sec <= t < end_sec`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftInterval {
    pub player_id: i64,
    pub period: u8,
    pub start_sec: u32,
    pub end_sec: u32,
}

/// One dressed player with everything the aggregation accrues for them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: i64,
    pub name: String,
    pub position: String,
    pub jersey: u8,
    pub venue: Venue,
    pub tricode: String,
    pub shifts: Vec<ShiftInterval>,
    pub stats: SituationStats,
}

impl PlayerRecord {
    pub fn is_goalie(&self) -> bool {
        self.position.eq_ignore_ascii_case("g")
    }
}

/// Per-team aggregation; same table shape as players.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamRecord {
    pub tricode: String,
    pub venue: Venue,
    pub stats: SituationStats,
}
