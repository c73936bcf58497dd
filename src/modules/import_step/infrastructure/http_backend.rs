//! HTTP client for the import service
//!
//! Maps transport errors and error statuses onto [`BackendFailure`] the way a
//! browser reports them: no response at all means status 0 / "Unknown Error".

use crate::modules::import_step::application::ports::ImportBackend;
use crate::modules::import_step::domain::{
    AddedColumns, BackendFailure, CsvExport, ErrorPayload, ImportDataResponse, ImportId,
    Operation, SelectedColumns, ValidDataResponse,
};
use crate::shared::config::ImportApiConfig;
use crate::shared::errors::AppResult;
use crate::shared::utils::LogContext;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::{Client, Method, Response};
use serde_json::{json, Value};
use std::time::Instant;
use tracing::{debug, warn};

/// Status text used when a 2xx body cannot be decoded
pub const INVALID_RESPONSE_STATUS_TEXT: &str = "Invalid Response";

pub struct HttpImportBackend {
    client: Client,
    base_url: String,
}

impl HttpImportBackend {
    pub fn new(config: &ImportApiConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    fn endpoint(&self, route: &str, import_id: &ImportId) -> String {
        format!(
            "{}/{}/{}",
            self.base_url,
            route,
            urlencoding::encode(import_id.as_str())
        )
    }

    /// Send a request and turn anything but a 2xx answer into a failure
    async fn send(
        &self,
        operation: Operation,
        method: Method,
        url: &str,
        import_id: &ImportId,
        body: Option<Value>,
    ) -> Result<Response, BackendFailure> {
        LogContext::api_call(operation.name(), import_id.as_str(), "", None);
        let started = Instant::now();

        let mut request = self
            .client
            .request(method.clone(), url)
            .header("Accept", "application/json");
        if let Some(json_body) = body {
            request = request.json(&json_body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("{} {} failed before any response: {}", method, url, e);
                return Err(BackendFailure::connectivity());
            }
        };

        let status = response.status();
        LogContext::api_call(
            operation.name(),
            import_id.as_str(),
            status.as_str(),
            Some(started.elapsed().as_millis() as u64),
        );

        if status.is_success() {
            return Ok(response);
        }

        let status_text = status.canonical_reason().unwrap_or("HTTP Error");
        let payload = match response.text().await {
            Ok(text) => parse_error_payload(&text),
            Err(e) => {
                debug!("Could not read error body from {}: {}", url, e);
                None
            }
        };

        Err(BackendFailure::server(status.as_u16(), status_text, payload))
    }

    async fn parse_json<T>(response: Response, operation: Operation) -> Result<T, BackendFailure>
    where
        T: serde::de::DeserializeOwned,
    {
        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| {
            warn!("{} response body could not be read: {}", operation, e);
            BackendFailure::connectivity()
        })?;

        serde_json::from_str::<T>(&text).map_err(|e| {
            warn!("{} returned an unexpected body: {}", operation, e);
            BackendFailure::server(
                status,
                INVALID_RESPONSE_STATUS_TEXT,
                Some(ErrorPayload::new(format!(
                    "Unexpected response from the import service ({})",
                    e
                ))),
            )
        })
    }
}

#[async_trait]
impl ImportBackend for HttpImportBackend {
    async fn import_data(
        &self,
        import_id: &ImportId,
        total_columns: usize,
    ) -> Result<ImportDataResponse, BackendFailure> {
        let url = self.endpoint("importData", import_id);
        let body = json!({ "total_columns": total_columns });
        let response = self
            .send(Operation::Import, Method::POST, &url, import_id, Some(body))
            .await?;

        Self::parse_json(response, Operation::Import).await
    }

    async fn get_valid_data(
        &self,
        import_id: &ImportId,
        selected_columns: &SelectedColumns,
        added_columns: &AddedColumns,
    ) -> Result<ValidDataResponse, BackendFailure> {
        let url = self.endpoint("getValidData", import_id);
        let body = json!({
            "selected_columns": selected_columns,
            "added_columns": added_columns,
        });
        let response = self
            .send(Operation::ValidData, Method::POST, &url, import_id, Some(body))
            .await?;

        Self::parse_json(response, Operation::ValidData).await
    }

    async fn get_csv(&self, import_id: &ImportId) -> Result<CsvExport, BackendFailure> {
        let url = self.endpoint("getCSV", import_id);
        let response = self
            .send(Operation::Csv, Method::GET, &url, import_id, None)
            .await?;

        let content_type = header_text(response.headers(), CONTENT_TYPE.as_str());
        let filename = header_text(response.headers(), CONTENT_DISPOSITION.as_str())
            .as_deref()
            .and_then(filename_from_disposition);

        let content = response.text().await.map_err(|e| {
            warn!("CSV body could not be read: {}", e);
            BackendFailure::connectivity()
        })?;

        debug!("Received CSV export of {} bytes", content.len());
        Ok(CsvExport {
            content,
            content_type,
            filename,
        })
    }
}

fn header_text(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

/// Error bodies are JSON when the service produced them, anything else is ignored
fn parse_error_payload(text: &str) -> Option<ErrorPayload> {
    if text.trim().is_empty() {
        return None;
    }
    serde_json::from_str::<ErrorPayload>(text).ok()
}

/// Extract `filename` from a `Content-Disposition` header value
fn filename_from_disposition(disposition: &str) -> Option<String> {
    disposition
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))
        .map(|name| name.trim_matches('"').to_string())
        .filter(|name| !name.is_empty())
}
