//! CLI entry point for the Tentahjälpen exam statistics tool.
//!
//! Provides subcommands for listing the course catalog, searching course
//! codes, computing grade statistics and comparisons, and submitting exam
//! document suggestions.

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::Path;
use tentahjalpen::analyzers::aggregate::build_view;
use tentahjalpen::analyzers::query::{QueryState, ViewState, fetch_histories};
use tentahjalpen::analyzers::types::QueryData;
use tentahjalpen::infra::backend::BackendClient;
use tentahjalpen::output;
use tentahjalpen::search;
use tentahjalpen::services::course_api::{CourseApi, DocumentKind};
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "tentahjalpen")]
#[command(about = "Course exam grade statistics from the Tentahjälpen backend", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all courses known to the backend
    Courses,
    /// Print autocomplete suggestions for a search buffer
    Search {
        /// Raw search buffer; matching runs against its last word
        #[arg(value_name = "QUERY")]
        query: String,
    },
    /// Compute grade statistics for one or more courses
    Stats {
        /// Course codes, as typed in the search field
        #[arg(value_name = "CODE", required = true)]
        codes: Vec<String>,

        /// Print the derived view as JSON on stdout
        #[arg(long, default_value_t = false)]
        json: bool,

        /// CSV file to append per-sitting rows to
        #[arg(short, long)]
        csv: Option<String>,
    },
    /// Submit an exam or solution document suggestion for one sitting
    Upload {
        /// Course code of the sitting
        code: String,

        /// Date the exam was taken (YYYY-MM-DD)
        taken: NaiveDate,

        /// PDF file to submit
        file: String,

        /// Submit as a solution instead of an exam
        #[arg(long, default_value_t = false)]
        solution: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/tentahjalpen.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("tentahjalpen.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let api = BackendClient::new(server_url());

    match cli.command {
        Commands::Courses => list_courses(&api).await?,
        Commands::Search { query } => search_courses(&api, &query).await?,
        Commands::Stats { codes, json, csv } => {
            course_stats(&api, &codes, json, csv.as_deref()).await?
        }
        Commands::Upload {
            code,
            taken,
            file,
            solution,
        } => upload_document(&api, &code, taken, &file, solution).await?,
    }

    Ok(())
}

/// Backend base URL, overridable via the environment.
fn server_url() -> String {
    std::env::var("TENTAHJALPEN_SERVER_URL")
        .unwrap_or_else(|_| "http://localhost:5000".to_string())
}

#[tracing::instrument(skip(api))]
async fn list_courses<A: CourseApi>(api: &A) -> Result<()> {
    let catalog = api.catalog().await?;

    for entry in &catalog {
        info!(code = %entry.code, name = %entry.name, "Course");
    }
    info!(total = catalog.len(), "Course catalog fetched");
    Ok(())
}

#[tracing::instrument(skip(api))]
async fn search_courses<A: CourseApi>(api: &A, query: &str) -> Result<()> {
    let catalog = api.catalog().await?;
    let suggestions = search::suggest(&catalog, query);

    for entry in &suggestions {
        info!(code = %entry.code, name = %entry.name, "Suggestion");
    }
    info!(
        count = suggestions.len(),
        cap = search::SUGGESTION_CAP,
        "Suggestions ready"
    );
    Ok(())
}

/// Resolves the typed codes against the catalog, fetches every history
/// concurrently, and renders the single-course overview or the multi-course
/// comparison.
#[tracing::instrument(skip(api))]
async fn course_stats<A: CourseApi>(
    api: &A,
    codes: &[String],
    json: bool,
    csv: Option<&str>,
) -> Result<()> {
    let catalog = api.catalog().await?;
    let resolved = search::resolve_codes(&catalog, &codes.join(" "));

    if resolved.is_empty() {
        anyhow::bail!("none of the requested codes are in the course catalog");
    }

    info!(codes = ?resolved, "Fetching course histories");

    let mut state = QueryState::new();
    let ticket = state.begin();

    match fetch_histories(api, &resolved).await {
        Ok(histories) => {
            if let Some(path) = csv {
                for history in &histories {
                    output::append_history(path, history)?;
                }
                info!(path, "Sitting rows exported");
            }
            state.apply(ticket, Ok(build_view(&histories)));
        }
        Err(err) => {
            error!(error = %err, "Course fetch failed");
            state.apply(ticket, Err(err));
        }
    }

    match state.view() {
        ViewState::Loaded(QueryData::Single(overview)) => {
            if json {
                output::print_json(overview)?;
            } else {
                output::log_overview(overview);
            }
        }
        ViewState::Loaded(QueryData::Comparison(rows)) => {
            if json {
                output::print_json(rows)?;
            } else {
                output::log_comparison(rows);
            }
        }
        ViewState::Failed => anyhow::bail!("failed loading course"),
        ViewState::Idle => {}
    }

    Ok(())
}

#[tracing::instrument(skip(api))]
async fn upload_document<A: CourseApi>(
    api: &A,
    code: &str,
    taken: NaiveDate,
    file: &str,
    solution: bool,
) -> Result<()> {
    let kind = if solution {
        DocumentKind::Solution
    } else {
        DocumentKind::Exam
    };
    let content = std::fs::read(file)?;

    match api.suggest_document(code, taken, kind, &content).await {
        Ok(()) => info!(kind = kind.field(), "Thank you for your contribution"),
        Err(err) => {
            // upload problems never affect other state; surface a generic notice
            error!(error = %err, "Something went wrong, the document was not submitted");
        }
    }
    Ok(())
}
