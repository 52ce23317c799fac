//! Trait and types for the course statistics backend.
//!
//! The backend owns all exam result data; this module defines the records it
//! serves and the seam the rest of the crate talks through, so tests can swap
//! in an in-process implementation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::stats::GradeCounts;

/// One entry of the course catalog served by `GET /courses`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub code: String,
    pub name: String,
}

/// One exam administration as served by `GET /courses/{code}`.
///
/// `name` may differ between sittings of the same course; codes are renamed
/// over time. `exam` and `solution` are opaque document links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamSitting {
    pub taken: NaiveDate,
    #[serde(flatten)]
    pub counts: GradeCounts,
    pub code: String,
    pub name: String,
    pub exam: Option<String>,
    pub solution: Option<String>,
}

/// The full exam history of one course code, ordered ascending by date.
///
/// Always non-empty; the backend answers `NotFound` instead of serving an
/// empty history. The course name is read from the most recent sitting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseHistory {
    sittings: Vec<ExamSitting>,
}

impl CourseHistory {
    /// Builds a history from fetched sittings, restoring date order in case
    /// the transport reordered them. Returns `None` for an empty list.
    pub fn from_sittings(mut sittings: Vec<ExamSitting>) -> Option<Self> {
        if sittings.is_empty() {
            return None;
        }
        sittings.sort_by_key(|s| s.taken);
        Some(Self { sittings })
    }

    pub fn code(&self) -> &str {
        &self.sittings[0].code
    }

    /// Latest known name of the course.
    pub fn name(&self) -> &str {
        &self.sittings[self.sittings.len() - 1].name
    }

    pub fn sittings(&self) -> &[ExamSitting] {
        &self.sittings
    }
}

/// Which document a suggestion upload carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Exam,
    Solution,
}

impl DocumentKind {
    /// Path segment and JSON body field used by the upload endpoint.
    pub fn field(self) -> &'static str {
        match self {
            DocumentKind::Exam => "exam",
            DocumentKind::Solution => "solution",
        }
    }
}

/// Errors surfaced by a [`CourseApi`] implementation.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend has no history for the requested code.
    #[error("course {0} not found")]
    NotFound(String),
    #[error("backend request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed backend response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid backend url: {0}")]
    BadUrl(String),
}

/// Abstraction over the course statistics backend.
#[async_trait::async_trait]
pub trait CourseApi: Send + Sync {
    /// Returns the full list of known course codes and names.
    async fn catalog(&self) -> Result<Vec<CatalogEntry>, ApiError>;

    /// Returns all exam sittings for one course code.
    async fn history(&self, code: &str) -> Result<CourseHistory, ApiError>;

    /// Submits an exam or solution document suggestion for one sitting.
    async fn suggest_document(
        &self,
        code: &str,
        taken: NaiveDate,
        kind: DocumentKind,
        content: &[u8],
    ) -> Result<(), ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sitting(taken: &str, name: &str) -> ExamSitting {
        ExamSitting {
            taken: taken.parse().unwrap(),
            counts: GradeCounts::new(5, 5, 5, 5),
            code: "EDA322".to_string(),
            name: name.to_string(),
            exam: None,
            solution: None,
        }
    }

    #[test]
    fn test_history_rejects_empty() {
        assert!(CourseHistory::from_sittings(vec![]).is_none());
    }

    #[test]
    fn test_history_sorts_and_names_from_last() {
        let history = CourseHistory::from_sittings(vec![
            sitting("2019-03-08", "Digital Design"),
            sitting("2017-03-01", "Digital Konstruktion"),
        ])
        .unwrap();

        assert_eq!(history.sittings()[0].taken.to_string(), "2017-03-01");
        assert_eq!(history.code(), "EDA322");
        // renamed course keeps the most recent name
        assert_eq!(history.name(), "Digital Design");
    }

    #[test]
    fn test_sitting_deserializes_backend_record() {
        let json = r#"{
            "taken": "2019-03-08",
            "failures": 25,
            "threes": 5,
            "fours": 5,
            "fives": 5,
            "code": "EDA322",
            "name": "Digital Konstruktion",
            "exam": "http://localhost:5000/courses/EDA322/2019-03-08/exam",
            "solution": null
        }"#;

        let sitting: ExamSitting = serde_json::from_str(json).unwrap();
        assert_eq!(sitting.counts.total(), 40);
        assert_eq!(sitting.taken.to_string(), "2019-03-08");
        assert!(sitting.exam.is_some());
        assert!(sitting.solution.is_none());
    }
}
