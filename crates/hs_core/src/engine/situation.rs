//! Situation classification: pure mappings from occupancy counts and
//! scores onto the situational keys every stat is bucketed under.

use crate::models::{StrengthSit, VenuePair, SCORE_SIT_CLAMP};

/// Classify the strength situation from occupancy counts, first match
/// wins:
///
/// 1. either net empty → (other, other)
/// 2. five on five → (ev5, ev5)
/// 3. away up, away ≤ 6, home ≥ 3 → (pp, sh)
/// 4. home up, home ≤ 6, away ≥ 3 → (sh, pp)
/// 5. anything else → (other, other)
///
/// The result is always equal or opposite across venues; (pp, pp) and
/// (sh, sh) cannot occur.
pub fn classify_strength(
    goalies: VenuePair<usize>,
    skaters: VenuePair<usize>,
) -> VenuePair<StrengthSit> {
    if goalies.away < 1 || goalies.home < 1 {
        return VenuePair::new(StrengthSit::Other, StrengthSit::Other);
    }
    if skaters.away == 5 && skaters.home == 5 {
        return VenuePair::new(StrengthSit::Ev5, StrengthSit::Ev5);
    }
    if skaters.away > skaters.home && skaters.away <= 6 && skaters.home >= 3 {
        return VenuePair::new(StrengthSit::Pp, StrengthSit::Sh);
    }
    if skaters.home > skaters.away && skaters.home <= 6 && skaters.away >= 3 {
        return VenuePair::new(StrengthSit::Sh, StrengthSit::Pp);
    }
    VenuePair::new(StrengthSit::Other, StrengthSit::Other)
}

/// Goal differential from each venue's perspective, clamped to
/// ±`SCORE_SIT_CLAMP`. Antisymmetric by construction: `home == -away`.
pub fn classify_score(score: VenuePair<u16>) -> VenuePair<i8> {
    let diff = i32::from(score.away) - i32::from(score.home);
    let clamp = i32::from(SCORE_SIT_CLAMP);
    let away = diff.clamp(-clamp, clamp) as i8;
    VenuePair::new(away, -away)
}
