//! REST client for the course statistics backend.

use async_trait::async_trait;
use base64::Engine;
use chrono::NaiveDate;
use reqwest::{StatusCode, Url};
use serde_json::json;
use tracing::debug;

use crate::fetch::{self, BasicClient, HttpClient};
use crate::services::course_api::{
    ApiError, CatalogEntry, CourseApi, CourseHistory, DocumentKind, ExamSitting,
};

/// [`CourseApi`] implementation speaking the backend's REST conventions:
/// `GET {base}/courses`, `GET {base}/courses/{code}`, and
/// `PUT {base}/courses/{code}/{taken}/{exam|solution}` with a base64 body.
pub struct BackendClient<C = BasicClient> {
    base_url: String,
    client: C,
}

impl BackendClient<BasicClient> {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, BasicClient::new())
    }
}

impl<C: HttpClient> BackendClient<C> {
    /// Wraps an arbitrary transport, e.g. an instrumented or fake client.
    pub fn with_client(base_url: impl Into<String>, client: C) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url, client }
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        let raw = format!("{}/{}", self.base_url, path);
        raw.parse().map_err(|_| ApiError::BadUrl(raw))
    }
}

#[async_trait]
impl<C: HttpClient> CourseApi for BackendClient<C> {
    async fn catalog(&self) -> Result<Vec<CatalogEntry>, ApiError> {
        let url = self.endpoint("courses")?;
        let resp = fetch::get(&self.client, url).await?.error_for_status()?;
        let entries: Vec<CatalogEntry> = resp.json().await?;

        debug!(count = entries.len(), "Catalog fetched");
        Ok(entries)
    }

    async fn history(&self, code: &str) -> Result<CourseHistory, ApiError> {
        let url = self.endpoint(&format!("courses/{code}"))?;
        let resp = fetch::get(&self.client, url).await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(code.to_string()));
        }
        let resp = resp.error_for_status()?;

        // the backend reports an unknown code as {"error": ...} as well
        let body: serde_json::Value = resp.json().await?;
        if body.get("error").is_some() {
            return Err(ApiError::NotFound(code.to_string()));
        }

        let sittings: Vec<ExamSitting> = serde_json::from_value(body)?;
        debug!(code, count = sittings.len(), "History fetched");
        CourseHistory::from_sittings(sittings).ok_or_else(|| ApiError::NotFound(code.to_string()))
    }

    async fn suggest_document(
        &self,
        code: &str,
        taken: NaiveDate,
        kind: DocumentKind,
        content: &[u8],
    ) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("courses/{code}/{taken}/{}", kind.field()))?;

        let encoded = base64::engine::general_purpose::STANDARD.encode(content);
        let body = serde_json::to_vec(&json!({ (kind.field()): encoded }))?;

        fetch::put_json(&self.client, url, body).await?;
        debug!(code, %taken, kind = kind.field(), "Document suggestion submitted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = BackendClient::new("http://localhost:5000/");
        let url = client.endpoint("courses").unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/courses");
    }

    #[test]
    fn test_history_endpoint_path() {
        let client = BackendClient::new("http://localhost:5000");
        let url = client.endpoint("courses/EDA322").unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/courses/EDA322");
    }

    #[test]
    fn test_upload_endpoint_includes_date_and_kind() {
        let client = BackendClient::new("http://localhost:5000");
        let taken: NaiveDate = "2019-03-08".parse().unwrap();
        let url = client
            .endpoint(&format!("courses/EDA322/{taken}/{}", DocumentKind::Solution.field()))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:5000/courses/EDA322/2019-03-08/solution"
        );
    }
}
