//! Grade buckets, raw counts, and percentage-rate conversion.
//!
//! Swedish exam grading: U (fail), 3, 4, 5. Derived series iterate the
//! buckets through [`Grade::ALL`] so the bucket order is fixed in one place.

use serde::{Deserialize, Serialize};

/// One grade bucket of an exam result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Grade {
    Fail,
    Three,
    Four,
    Five,
}

impl Grade {
    /// Fixed bucket order used by every derived series.
    pub const ALL: [Grade; 4] = [Grade::Fail, Grade::Three, Grade::Four, Grade::Five];

    /// Display label as shown on chart axes and tables.
    pub fn label(self) -> &'static str {
        match self {
            Grade::Fail => "U",
            Grade::Three => "3",
            Grade::Four => "4",
            Grade::Five => "5",
        }
    }

    /// Chart color assigned to this bucket.
    pub fn color(self) -> &'static str {
        match self {
            Grade::Fail => "#e05c4f",
            Grade::Three => "#edbf47",
            Grade::Four => "#9ac178",
            Grade::Five => "#4f9a64",
        }
    }
}

/// Raw result counts for one exam sitting, or for several sittings summed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeCounts {
    pub failures: u32,
    pub threes: u32,
    pub fours: u32,
    pub fives: u32,
}

impl GradeCounts {
    pub fn new(failures: u32, threes: u32, fours: u32, fives: u32) -> Self {
        Self {
            failures,
            threes,
            fours,
            fives,
        }
    }

    pub fn get(self, grade: Grade) -> u32 {
        match grade {
            Grade::Fail => self.failures,
            Grade::Three => self.threes,
            Grade::Four => self.fours,
            Grade::Five => self.fives,
        }
    }

    /// Total attendance of the sitting.
    pub fn total(self) -> u32 {
        self.failures + self.threes + self.fours + self.fives
    }

    /// Adds another set of counts bucket by bucket.
    pub fn accumulate(&mut self, other: GradeCounts) {
        self.failures += other.failures;
        self.threes += other.threes;
        self.fours += other.fours;
        self.fives += other.fives;
    }

    /// Converts the counts into rounded integer percentages.
    ///
    /// Callers must guard against `total() == 0`; a zero total yields all-zero
    /// rates instead of dividing. Rounding is per bucket, so the rates may sum
    /// to slightly more or less than 100.
    pub fn rates(self) -> GradeRates {
        GradeRates {
            failures: pct(self.failures, self.total()),
            threes: pct(self.threes, self.total()),
            fours: pct(self.fours, self.total()),
            fives: pct(self.fives, self.total()),
        }
    }

    /// Rounded percentage of failures, the estimator's per-sitting input.
    pub fn fail_rate(self) -> u32 {
        pct(self.failures, self.total())
    }
}

/// Rounded percentage share of `part` in `total`. Zero total yields 0.
pub fn pct(part: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    (100.0 * part as f64 / total as f64).round() as u32
}

/// Percentage per grade bucket, each in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GradeRates {
    pub failures: u32,
    pub threes: u32,
    pub fours: u32,
    pub fives: u32,
}

impl GradeRates {
    pub fn get(self, grade: Grade) -> u32 {
        match grade {
            Grade::Fail => self.failures,
            Grade::Three => self.threes,
            Grade::Four => self.fours,
            Grade::Five => self.fives,
        }
    }
}
