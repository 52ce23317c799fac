//! Output formatting and persistence for computed course statistics.
//!
//! Human-readable summaries go to the log (stderr); machine output is JSON
//! on stdout or CSV appended to a file.

use anyhow::Result;
use serde::Serialize;
use tracing::info;

use crate::analyzers::types::{ComparisonRow, CourseOverview};
use crate::services::course_api::CourseHistory;
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// Prints a derived view as pretty JSON on stdout.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Logs the single-course overview.
pub fn log_overview(overview: &CourseOverview) {
    info!(
        code = %overview.code,
        name = %overview.name,
        sittings = overview.counts.labels.len(),
        "Course overview"
    );
    info!(
        failures = overview.aggregate_rates.failures,
        threes = overview.aggregate_rates.threes,
        fours = overview.aggregate_rates.fours,
        fives = overview.aggregate_rates.fives,
        adjusted_fail_rate = overview.adjusted_fail_rate,
        "Grade rates (percent, all sittings)"
    );
}

/// Logs one comparison-table row per course.
pub fn log_comparison(rows: &[ComparisonRow]) {
    for row in rows {
        info!(
            code = %row.code,
            name = %row.name,
            failures = row.rates.failures,
            threes = row.rates.threes,
            fours = row.rates.fours,
            fives = row.rates.fives,
            adjusted_fail_rate = row.adjusted_fail_rate,
            "Course"
        );
    }
    info!(courses = rows.len(), "Comparison complete");
}

/// One exported CSV row: a sitting with its derived rates.
#[derive(Debug, Serialize)]
struct SittingRow<'a> {
    taken: chrono::NaiveDate,
    code: &'a str,
    name: &'a str,
    failures: u32,
    threes: u32,
    fours: u32,
    fives: u32,
    total: u32,
    fail_rate: u32,
}

/// Appends every sitting of a history as CSV rows.
///
/// Creates the file with headers if it does not already exist.
pub fn append_history(path: &str, history: &CourseHistory) -> Result<()> {
    let file_exists = Path::new(path).exists();

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    for sitting in history.sittings() {
        writer.serialize(SittingRow {
            taken: sitting.taken,
            code: &sitting.code,
            name: &sitting.name,
            failures: sitting.counts.failures,
            threes: sitting.counts.threes,
            fours: sitting.counts.fours,
            fives: sitting.counts.fives,
            total: sitting.counts.total(),
            fail_rate: sitting.counts.fail_rate(),
        })?;
    }
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::course_api::ExamSitting;
    use crate::stats::GradeCounts;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    fn history() -> CourseHistory {
        CourseHistory::from_sittings(vec![
            ExamSitting {
                taken: "2018-03-14".parse().unwrap(),
                counts: GradeCounts::new(5, 5, 5, 5),
                code: "EDA322".to_string(),
                name: "Digital Konstruktion".to_string(),
                exam: None,
                solution: None,
            },
            ExamSitting {
                taken: "2019-03-08".parse().unwrap(),
                counts: GradeCounts::new(25, 5, 5, 5),
                code: "EDA322".to_string(),
                name: "Digital Konstruktion".to_string(),
                exam: None,
                solution: None,
            },
        ])
        .unwrap()
    }

    #[test]
    fn test_append_history_creates_file() {
        let path = temp_path("tentahjalpen_test_create.csv");
        let _ = fs::remove_file(&path); // clean up any prior run

        append_history(&path, &history()).unwrap();

        assert!(Path::new(&path).exists());
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("EDA322"));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_append_history_writes_header_once() {
        let path = temp_path("tentahjalpen_test_header.csv");
        let _ = fs::remove_file(&path);

        append_history(&path, &history()).unwrap();
        append_history(&path, &history()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        // Header line should appear exactly once
        let header_count = content.lines().filter(|l| l.contains("taken")).count();
        assert_eq!(header_count, 1);

        // 1 header + 2 rows per append
        assert_eq!(content.lines().count(), 5);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_rows_carry_derived_rates() {
        let path = temp_path("tentahjalpen_test_rates.csv");
        let _ = fs::remove_file(&path);

        append_history(&path, &history()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let last = content.lines().last().unwrap();
        assert!(last.contains("2019-03-08"));
        assert!(last.ends_with(",40,63"));

        fs::remove_file(&path).unwrap();
    }
}
