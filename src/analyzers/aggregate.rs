//! Reshaping fetched histories into renderable view state.

use std::collections::BTreeMap;

use crate::analyzers::adjusted::adjusted_fail_rate;
use crate::analyzers::types::{
    BarSeries, ComparisonRow, CourseOverview, DocumentLinks, LineSeries, QueryData,
    SittingBreakdown,
};
use crate::services::course_api::CourseHistory;
use crate::stats::GradeCounts;

/// Sums the grade counts of every sitting in the history.
pub fn aggregate_counts(history: &CourseHistory) -> GradeCounts {
    let mut totals = GradeCounts::default();
    for sitting in history.sittings() {
        totals.accumulate(sitting.counts);
    }
    totals
}

/// Builds the full single-course view: count and rate series, document
/// back-references, aggregate and average breakdowns, adjusted fail-rate.
pub fn course_overview(history: &CourseHistory) -> CourseOverview {
    let documents: BTreeMap<_, _> = history
        .sittings()
        .iter()
        .map(|sitting| {
            (
                sitting.taken,
                DocumentLinks {
                    exam: sitting.exam.clone(),
                    solution: sitting.solution.clone(),
                },
            )
        })
        .collect();

    CourseOverview {
        code: history.code().to_string(),
        name: history.name().to_string(),
        counts: BarSeries::from_history(history),
        rates: LineSeries::from_history(history),
        documents,
        aggregate_rates: aggregate_counts(history).rates(),
        average: SittingBreakdown::average(history),
        adjusted_fail_rate: adjusted_fail_rate(history),
    }
}

/// Builds one comparison-table row per course.
pub fn comparison_rows(histories: &[CourseHistory]) -> Vec<ComparisonRow> {
    histories
        .iter()
        .map(|history| ComparisonRow {
            code: history.code().to_string(),
            name: history.name().to_string(),
            rates: aggregate_counts(history).rates(),
            adjusted_fail_rate: adjusted_fail_rate(history),
        })
        .collect()
}

/// Turns an ordered batch of histories into the query's view state. A single
/// course gets the detailed overview; several get the comparison table.
pub fn build_view(histories: &[CourseHistory]) -> QueryData {
    if histories.len() == 1 {
        QueryData::Single(course_overview(&histories[0]))
    } else {
        QueryData::Comparison(comparison_rows(histories))
    }
}
