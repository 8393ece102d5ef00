//! Score rounding and letter-grade cutoffs.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::GradeCutoffs;
use crate::models::Grade;

/// Decimal places kept on every reported score.
pub const SCORE_DECIMAL_PLACES: u32 = 2;

/// Rounds a score to [`SCORE_DECIMAL_PLACES`], half away from zero.
///
/// ```
/// use points_engine::scoring::round_score;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_score(Decimal::from_str("77.775").unwrap()), Decimal::from_str("77.78").unwrap());
/// ```
pub fn round_score(score: Decimal) -> Decimal {
    score.round_dp_with_strategy(SCORE_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Maps a score to its letter grade.
///
/// Cutoffs are inclusive lower bounds: a score exactly on the A cutoff is
/// an A, anything below the D cutoff is an E.
///
/// ```
/// use points_engine::config::GradeCutoffs;
/// use points_engine::models::Grade;
/// use points_engine::scoring::grade_for_score;
/// use rust_decimal::Decimal;
///
/// let cutoffs = GradeCutoffs {
///     a: Decimal::from(90),
///     b: Decimal::from(80),
///     c: Decimal::from(70),
///     d: Decimal::from(60),
/// };
/// assert_eq!(grade_for_score(Decimal::from(90), &cutoffs), Grade::A);
/// assert_eq!(grade_for_score(Decimal::from(59), &cutoffs), Grade::E);
/// ```
pub fn grade_for_score(score: Decimal, cutoffs: &GradeCutoffs) -> Grade {
    if score >= cutoffs.a {
        Grade::A
    } else if score >= cutoffs.b {
        Grade::B
    } else if score >= cutoffs.c {
        Grade::C
    } else if score >= cutoffs.d {
        Grade::D
    } else {
        Grade::E
    }
}
