use crate::config::ClientConfig;
use crate::error::ServiceError;
use crate::session::{ResultTable, Row};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

/// Raw `/nl2sql` response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    pub sql: String,
    pub rows: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryAnswer {
    pub sql: String,
    pub table: ResultTable,
}

impl TryFrom<QueryResponse> for QueryAnswer {
    type Error = ServiceError;

    fn try_from(response: QueryResponse) -> Result<Self, Self::Error> {
        let mut rows: Vec<Row> = Vec::with_capacity(response.rows.len());
        for (index, row) in response.rows.into_iter().enumerate() {
            let Value::Object(row) = row else {
                return Err(ServiceError::MalformedResponse(format!(
                    "row {index} is not an object"
                )));
            };
            if let Some((column, _)) = row
                .iter()
                .find(|(_, cell)| matches!(cell, Value::Array(_) | Value::Object(_)))
            {
                return Err(ServiceError::MalformedResponse(format!(
                    "row {index} column {column} is not a scalar"
                )));
            }
            rows.push(row);
        }

        Ok(Self {
            sql: response.sql,
            table: ResultTable::from_rows(rows),
        })
    }
}

/// Maps a natural-language question to a query and its result table.
pub trait QueryService {
    fn answer(&self, question: &str) -> Result<QueryAnswer, ServiceError>;
}

/// Blocking client for the `/nl2sql` endpoint. Must not be used from inside a tokio runtime.
pub struct HttpQueryService {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl HttpQueryService {
    pub fn new(config: &ClientConfig) -> Result<Self, ServiceError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/nl2sql", config.api_url.trim_end_matches('/')),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl QueryService for HttpQueryService {
    fn answer(&self, question: &str) -> Result<QueryAnswer, ServiceError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&QueryRequest {
                query: question.to_string(),
            })
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::Status(status.as_u16()));
        }

        let body = response.bytes()?;
        let parsed: QueryResponse = serde_json::from_slice(&body)
            .map_err(|err| ServiceError::MalformedResponse(err.to_string()))?;
        parsed.try_into()
    }
}
