//! Letter grades and per-grade tallies.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A letter grade, from A (best) to E (worst).
///
/// Grades order from best to worst, so `Grade::A < Grade::E`.
///
/// # Example
///
/// ```
/// use points_engine::models::Grade;
///
/// assert!(Grade::A < Grade::B);
/// assert_eq!(Grade::C.to_string(), "C");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    /// Top grade.
    A,
    /// Above expectations.
    B,
    /// Meets expectations.
    C,
    /// Below expectations.
    D,
    /// Well below expectations.
    E,
}

impl Grade {
    /// All grades, best first.
    pub const ALL: [Grade; 5] = [Grade::A, Grade::B, Grade::C, Grade::D, Grade::E];

    /// Returns the grade letter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::E => "E",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How many metrics landed on each grade.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeCounts {
    /// Metrics graded A.
    #[serde(rename = "A")]
    pub a: u32,
    /// Metrics graded B.
    #[serde(rename = "B")]
    pub b: u32,
    /// Metrics graded C.
    #[serde(rename = "C")]
    pub c: u32,
    /// Metrics graded D.
    #[serde(rename = "D")]
    pub d: u32,
    /// Metrics graded E.
    #[serde(rename = "E")]
    pub e: u32,
}

impl GradeCounts {
    /// Counts one more metric at `grade`.
    pub fn record(&mut self, grade: Grade) {
        match grade {
            Grade::A => self.a += 1,
            Grade::B => self.b += 1,
            Grade::C => self.c += 1,
            Grade::D => self.d += 1,
            Grade::E => self.e += 1,
        }
    }

    /// Returns the count for `grade`.
    pub fn get(&self, grade: Grade) -> u32 {
        match grade {
            Grade::A => self.a,
            Grade::B => self.b,
            Grade::C => self.c,
            Grade::D => self.d,
            Grade::E => self.e,
        }
    }

    /// Total number of graded metrics.
    pub fn total(&self) -> u32 {
        self.a + self.b + self.c + self.d + self.e
    }
}

impl FromIterator<Grade> for GradeCounts {
    fn from_iter<I: IntoIterator<Item = Grade>>(iter: I) -> Self {
        let mut counts = GradeCounts::default();
        for grade in iter {
            counts.record(grade);
        }
        counts
    }
}
