use serde::{Deserialize, Serialize};

/// Which bench a team occupies for the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Venue {
    Away,
    Home,
}

impl Venue {
    /// Both venues in away-then-home order, the order every paired
    /// structure in the feed uses.
    pub const BOTH: [Venue; 2] = [Venue::Away, Venue::Home];

    pub fn opposite(self) -> Venue {
        match self {
            Venue::Away => Venue::Home,
            Venue::Home => Venue::Away,
        }
    }
}

/// One value per venue with named accessors.
///
/// Replaces `[away, home]` index math everywhere a quantity exists for
/// both teams; transposing the two sides is the classic bug in this
/// domain, so nothing in the crate indexes sides by integer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenuePair<T> {
    pub away: T,
    pub home: T,
}

impl<T> VenuePair<T> {
    pub fn new(away: T, home: T) -> Self {
        Self { away, home }
    }

    pub fn get(&self, venue: Venue) -> &T {
        match venue {
            Venue::Away => &self.away,
            Venue::Home => &self.home,
        }
    }

    pub fn get_mut(&mut self, venue: Venue) -> &mut T {
        match venue {
            Venue::Away => &mut self.away,
            Venue::Home => &mut self.home,
        }
    }

    /// Build a pair by evaluating `f` once per venue.
    pub fn from_fn(mut f: impl FnMut(Venue) -> T) -> Self {
        Self { away: f(Venue::Away), home: f(Venue::Home) }
    }
}

impl<T: Copy> VenuePair<T> {
    /// Both values paired with their venue, away first.
    pub fn iter(&self) -> impl Iterator<Item = (Venue, T)> + '_ {
        Venue::BOTH.into_iter().map(move |v| (v, *self.get(v)))
    }
}

/// Team strength situation for one venue.
///
/// A pair of these is always either equal (ev5/ev5, other/other,
/// penShot/penShot) or opposite (pp/sh, sh/pp) — see
/// `engine::situation::classify_strength`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum StrengthSit {
    Ev5,
    Pp,
    Sh,
    PenShot,
    /// Everything the classifier cannot name: empty nets, data glitches,
    /// 3-on-3 overtime. Also the state of a second before classification.
    #[default]
    Other,
}

impl StrengthSit {
    /// Stable string form used by the tabular output boundary.
    pub fn as_str(self) -> &'static str {
        match self {
            StrengthSit::Ev5 => "ev5",
            StrengthSit::Pp => "pp",
            StrengthSit::Sh => "sh",
            StrengthSit::PenShot => "penShot",
            StrengthSit::Other => "other",
        }
    }
}

/// Score situations are goal differentials clamped to this magnitude.
pub const SCORE_SIT_CLAMP: i8 = 3;
