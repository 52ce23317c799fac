//! Derived view types produced from course histories.
//!
//! Each chart or panel shape is its own tagged type with an explicit
//! conversion from [`CourseHistory`], so bar data, rate data, and the
//! single-sitting breakdown cannot be confused even though they all carry
//! date labels and per-bucket series.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::services::course_api::{CourseHistory, ExamSitting};
use crate::stats::{Grade, GradeCounts, GradeRates};

/// One grade bucket's values across all sittings of a series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesDataset {
    pub grade: Grade,
    pub label: &'static str,
    pub color: &'static str,
    pub data: Vec<u32>,
}

fn datasets_for<F>(history: &CourseHistory, value: F) -> Vec<SeriesDataset>
where
    F: Fn(&ExamSitting, Grade) -> u32,
{
    Grade::ALL
        .iter()
        .map(|&grade| SeriesDataset {
            grade,
            label: grade.label(),
            color: grade.color(),
            data: history
                .sittings()
                .iter()
                .map(|sitting| value(sitting, grade))
                .collect(),
        })
        .collect()
}

fn labels_for(history: &CourseHistory) -> Vec<NaiveDate> {
    history.sittings().iter().map(|s| s.taken).collect()
}

/// Stacked raw-count series: one column per sitting, buckets in fixed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BarSeries {
    pub labels: Vec<NaiveDate>,
    pub datasets: Vec<SeriesDataset>,
}

impl BarSeries {
    pub fn from_history(history: &CourseHistory) -> Self {
        Self {
            labels: labels_for(history),
            datasets: datasets_for(history, |sitting, grade| sitting.counts.get(grade)),
        }
    }
}

/// Percentage-rate series: one point per sitting, buckets in fixed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineSeries {
    pub labels: Vec<NaiveDate>,
    pub datasets: Vec<SeriesDataset>,
}

impl LineSeries {
    pub fn from_history(history: &CourseHistory) -> Self {
        Self {
            labels: labels_for(history),
            datasets: datasets_for(history, |sitting, grade| sitting.counts.rates().get(grade)),
        }
    }
}

/// Exam and solution document links for one sitting date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentLinks {
    pub exam: Option<String>,
    pub solution: Option<String>,
}

/// Detail-panel breakdown of one sitting, or of a synthetic average sitting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SittingBreakdown {
    /// `None` for the average-over-history breakdown.
    pub taken: Option<NaiveDate>,
    pub counts: GradeCounts,
    pub rates: GradeRates,
    pub links: DocumentLinks,
}

impl SittingBreakdown {
    pub fn from_sitting(sitting: &ExamSitting) -> Self {
        Self {
            taken: Some(sitting.taken),
            counts: sitting.counts,
            rates: sitting.counts.rates(),
            links: DocumentLinks {
                exam: sitting.exam.clone(),
                solution: sitting.solution.clone(),
            },
        }
    }

    /// Rounded per-bucket average over the whole history.
    pub fn average(history: &CourseHistory) -> Self {
        let n = history.sittings().len() as f64;
        let avg = |grade: Grade| {
            let sum: u32 = history.sittings().iter().map(|s| s.counts.get(grade)).sum();
            (sum as f64 / n).round() as u32
        };
        let counts = GradeCounts::new(
            avg(Grade::Fail),
            avg(Grade::Three),
            avg(Grade::Four),
            avg(Grade::Five),
        );
        Self {
            taken: None,
            counts,
            rates: counts.rates(),
            links: DocumentLinks::default(),
        }
    }
}

/// Full derived state for a single-course query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseOverview {
    pub code: String,
    pub name: String,
    pub counts: BarSeries,
    pub rates: LineSeries,
    /// Back-references from each data point to its source documents.
    pub documents: BTreeMap<NaiveDate, DocumentLinks>,
    /// Rates over all sittings summed.
    pub aggregate_rates: GradeRates,
    pub average: SittingBreakdown,
    pub adjusted_fail_rate: u32,
}

/// One row of the multi-course comparison table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonRow {
    pub code: String,
    /// Most recently seen name of the course.
    pub name: String,
    pub rates: GradeRates,
    pub adjusted_fail_rate: u32,
}

/// Derived state of one aggregate query: detailed charts for a single
/// course, a comparison table when several were requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum QueryData {
    Single(CourseOverview),
    Comparison(Vec<ComparisonRow>),
}
