use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

pub mod store;
pub mod suggestions;

pub const SCHEMA_VERSION: u32 = 1;
pub const DEFAULT_SCHEMA_TEXT: &str = "No schema uploaded yet.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(u64);

impl SessionId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[cfg(test)]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(alias = "time")]
    pub timestamp: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self::stamped(Role::User, content.into())
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::stamped(Role::Assistant, content.into())
    }

    fn stamped(role: Role, content: String) -> Self {
        Self {
            role,
            content,
            timestamp: Local::now().format("%H:%M").to_string(),
        }
    }
}

/// One result row: column name to scalar cell.
pub type Row = Map<String, Value>;

/// Tabular query output. Columns follow the order keys first appear across rows.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Row>", into = "Vec<Row>")]
pub struct ResultTable {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl ResultTable {
    pub fn from_rows(rows: Vec<Row>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for row in &rows {
            for key in row.keys() {
                if !columns.iter().any(|column| column == key) {
                    columns.push(key.clone());
                }
            }
        }
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|column| column == name)
    }

    #[cfg(test)]
    pub fn cell(&self, row: usize, column: &str) -> Option<&Value> {
        self.rows.get(row).and_then(|row| row.get(column))
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl From<Vec<Row>> for ResultTable {
    fn from(rows: Vec<Row>) -> Self {
        Self::from_rows(rows)
    }
}

impl From<ResultTable> for Vec<Row> {
    fn from(table: ResultTable) -> Self {
        table.rows
    }
}

/// A single chat thread. The transcript is append-only and the suggestions are
/// only ever replaced as a whole, so both sit behind accessors.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatSession {
    pub id: SessionId,
    pub name: String,
    messages: Vec<Message>,
    suggestions: Vec<String>,
    pub schema_text: String,
    last_query: Option<String>,
    last_result: Option<ResultTable>,
    pub show_chart: bool,
}

impl ChatSession {
    pub fn new(id: SessionId) -> Self {
        Self::from_record(id, SessionRecord::default())
    }

    pub fn default_name(id: SessionId) -> String {
        format!("Chat {id}")
    }

    /// Builds a session from any record shape, backfilling missing fields first.
    pub fn from_record(id: SessionId, record: SessionRecord) -> Self {
        let record = record.normalized(id);
        Self {
            id,
            name: record.name.unwrap_or_else(|| Self::default_name(id)),
            messages: record.messages.unwrap_or_default(),
            suggestions: record.suggestions.unwrap_or_default(),
            schema_text: record
                .schema_text
                .unwrap_or_else(|| DEFAULT_SCHEMA_TEXT.to_string()),
            last_query: record.last_query,
            last_result: record.last_result,
            show_chart: record.show_chart.unwrap_or(true),
        }
    }

    pub fn to_record(&self) -> SessionRecord {
        SessionRecord {
            schema_version: SCHEMA_VERSION,
            session_id: Some(self.id.to_string()),
            name: Some(self.name.clone()),
            messages: Some(self.messages.clone()),
            suggestions: Some(self.suggestions.clone()),
            schema_text: Some(self.schema_text.clone()),
            last_query: self.last_query.clone(),
            last_result: self.last_result.clone(),
            show_chart: Some(self.show_chart),
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn push_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn replace_suggestions(&mut self, suggestions: Vec<String>) {
        self.suggestions = suggestions;
    }

    pub fn last_query(&self) -> Option<&str> {
        self.last_query.as_deref()
    }

    pub fn last_result(&self) -> Option<&ResultTable> {
        self.last_result.as_ref()
    }

    /// Overwrites the previous turn's output; query and table always move together.
    pub fn record_answer(&mut self, query: String, result: ResultTable) {
        self.last_query = Some(query);
        self.last_result = Some(result);
    }
}

/// Serialized shape of a session. Older exports may omit any field, and version 0
/// records predate `schema_version` entirely.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionRecord {
    #[serde(default)]
    pub schema_version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<Message>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
    #[serde(default, alias = "schema", skip_serializing_if = "Option::is_none")]
    pub schema_text: Option<String>,
    #[serde(default, alias = "last_sql", skip_serializing_if = "Option::is_none")]
    pub last_query: Option<String>,
    #[serde(default, alias = "last_rows", skip_serializing_if = "Option::is_none")]
    pub last_result: Option<ResultTable>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_chart: Option<bool>,
}

impl SessionRecord {
    pub fn is_supported_version(&self) -> bool {
        self.schema_version <= SCHEMA_VERSION
    }

    /// Fills every missing field with its default and never touches present ones.
    /// `last_query` and `last_result` default to unset, so they are left alone.
    pub fn normalized(mut self, id: SessionId) -> Self {
        self.schema_version = SCHEMA_VERSION;
        self.name
            .get_or_insert_with(|| ChatSession::default_name(id));
        self.messages.get_or_insert_with(Vec::new);
        self.suggestions.get_or_insert_with(Vec::new);
        self.schema_text
            .get_or_insert_with(|| DEFAULT_SCHEMA_TEXT.to_string());
        self.show_chart.get_or_insert(true);
        self
    }
}
