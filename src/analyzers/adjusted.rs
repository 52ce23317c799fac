//! Adjusted fail-rate estimation.
//!
//! A course's raw fail-rate average is skewed by re-exams: supplementary
//! sittings with low attendance and unusual outcomes. The adjusted rate
//! corrects for this by anchoring at the most heavily attended sitting of the
//! trailing year (a proxy for the main exam) and averaging the fail rates of
//! up to three sittings found in one-month windows around that anchor's date,
//! one window per year going backward.

use chrono::Months;

use crate::services::course_api::CourseHistory;

/// Number of yearly sittings averaged into the adjusted rate. A hard cap,
/// not a minimum: shorter histories use whatever the windows yield.
const MAX_SAMPLES: usize = 3;

/// Computes the adjusted fail-rate percentage for a course.
///
/// The history's ascending date order is relied on for both backward scans.
pub fn adjusted_fail_rate(history: &CourseHistory) -> u32 {
    let sittings = history.sittings();
    let last = &sittings[sittings.len() - 1];

    // One year back, then one month forward: exam dates drift across years,
    // so a sitting slightly more than a year old still counts as recent.
    let lower_bound = last.taken - Months::new(12) + Months::new(1);

    // Anchor search: the largest attendance at or after the lower bound,
    // scanning backward from the most recent sitting. The comparison is
    // strictly greater, so an exact tie keeps the more recent sitting.
    let mut major_index = sittings.len() - 1;
    let mut largest_total = last.counts.total();
    for (i, sitting) in sittings.iter().enumerate().rev() {
        if sitting.taken < lower_bound {
            break;
        }
        let total = sitting.counts.total();
        if total > largest_total {
            major_index = i;
            largest_total = total;
        }
    }

    let anchor = sittings[major_index].taken;
    let mut upper = anchor + Months::new(1);
    let mut lower = anchor - Months::new(1);

    // Collect one fail rate per year: a sitting inside the current window
    // takes a slot and shifts the window back a year; sittings outside the
    // window are skipped without consuming a slot.
    let mut rates = Vec::with_capacity(MAX_SAMPLES);
    for sitting in sittings[..=major_index].iter().rev() {
        if rates.len() >= MAX_SAMPLES {
            break;
        }
        if sitting.taken < upper && sitting.taken >= lower {
            rates.push(sitting.counts.fail_rate() as f64);
            upper = upper - Months::new(12);
            lower = lower - Months::new(12);
        }
    }

    // The anchor itself always falls inside the initial window, so at least
    // one rate was collected.
    (rates.iter().sum::<f64>() / rates.len() as f64).round() as u32
}
