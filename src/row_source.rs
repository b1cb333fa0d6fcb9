use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

use crate::http_client::http_client;
use crate::row::Row;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("Failed to fetch data: {0}")]
    Fetch(String),
    #[error("Invalid data format received")]
    Format,
}

impl SourceError {
    pub fn user_message(&self) -> String {
        format!("Error loading data: {self}")
    }
}

/// Produces the full row set in one attempt.
pub trait RowSource: Send {
    fn fetch_rows(&mut self) -> Result<Vec<Row>, SourceError>;
    fn describe(&self) -> String;
}

pub struct HttpRowSource {
    url: String,
    timeout: Duration,
}

impl HttpRowSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            timeout,
        }
    }
}

impl RowSource for HttpRowSource {
    fn fetch_rows(&mut self) -> Result<Vec<Row>, SourceError> {
        let client =
            http_client(self.timeout).map_err(|err| SourceError::Fetch(format!("{err:#}")))?;
        let resp = client
            .get(&self.url)
            .send()
            .map_err(|err| SourceError::Fetch(err.to_string()))?;
        let status = resp.status();
        let body = resp
            .text()
            .map_err(|err| SourceError::Fetch(format!("failed reading body: {err}")))?;
        if !status.is_success() {
            return Err(SourceError::Fetch(format!("{} {}", status.as_u16(), body.trim())));
        }
        parse_rows_json(&body)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// The body must be a JSON array. Elements that are not objects become
/// empty rows.
pub fn parse_rows_json(raw: &str) -> Result<Vec<Row>, SourceError> {
    let root: Value = serde_json::from_str(raw.trim()).map_err(|_| SourceError::Format)?;
    let Value::Array(items) = root else {
        return Err(SourceError::Format);
    };
    Ok(items
        .iter()
        .map(|item| item.as_object().map(Row::from_json_object).unwrap_or_default())
        .collect())
}
