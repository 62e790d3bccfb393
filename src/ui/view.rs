use crate::session::{ChatSession, ResultTable, Role};
use serde_json::Value;

pub const NO_QUERY: &str = "No SQL yet. Ask a question to see the SQL here.";
pub const NO_RESULTS: &str = "No results yet. Ask a question to see a results table here.";
pub const CHART_HIDDEN: &str = "Chart is hidden (toggle above) or no data yet.";
pub const NO_NUMERIC_COLUMNS: &str = "No numeric columns to chart.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputView {
    #[default]
    Query,
    Results,
    Chart,
    Schema,
}

impl OutputView {
    pub const ALL: [OutputView; 4] = [Self::Query, Self::Results, Self::Chart, Self::Schema];

    pub fn label(self) -> &'static str {
        match self {
            Self::Query => "SQL",
            Self::Results => "Results",
            Self::Chart => "Chart",
            Self::Schema => "Schema",
        }
    }

    pub fn caption(self) -> &'static str {
        match self {
            Self::Query => "SQL used in the last response:",
            Self::Results => "Results preview (mock).",
            Self::Chart => "Simple bar chart (mock).",
            Self::Schema => "Uploaded schema (JSON / SQL / TXT shown as-is):",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub value_column: String,
    pub bars: Vec<Bar>,
}

impl ChartSeries {
    pub fn max_value(&self) -> f64 {
        self.bars.iter().map(|bar| bar.value).fold(0.0, f64::max)
    }
}

/// What the selected output view shows for a session.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewContent<'a> {
    Query(&'a str),
    Table(&'a ResultTable),
    Chart(ChartSeries),
    Schema(&'a str),
    Placeholder(&'static str),
}

pub fn project(session: &ChatSession, view: OutputView) -> ViewContent<'_> {
    match view {
        OutputView::Query => match session.last_query() {
            Some(query) if !query.trim().is_empty() => ViewContent::Query(query),
            _ => ViewContent::Placeholder(NO_QUERY),
        },
        OutputView::Results => match session.last_result() {
            Some(table) => ViewContent::Table(table),
            None => ViewContent::Placeholder(NO_RESULTS),
        },
        OutputView::Chart => match session.last_result() {
            Some(table) if session.show_chart => match chart_series(table) {
                Some(series) => ViewContent::Chart(series),
                None => ViewContent::Placeholder(NO_NUMERIC_COLUMNS),
            },
            _ => ViewContent::Placeholder(CHART_HIDDEN),
        },
        OutputView::Schema => ViewContent::Schema(&session.schema_text),
    }
}

/// Bars of `value` by `category` when both exist, else the first all-numeric
/// column by row index.
pub fn chart_series(table: &ResultTable) -> Option<ChartSeries> {
    if table.has_column("category") && table.has_column("value") {
        let bars = table
            .rows()
            .iter()
            .map(|row| Bar {
                label: row.get("category").map(cell_text).unwrap_or_default(),
                value: row.get("value").and_then(Value::as_f64).unwrap_or(0.0),
            })
            .collect();
        return Some(ChartSeries {
            value_column: "value".to_string(),
            bars,
        });
    }

    let column = table
        .columns()
        .iter()
        .find(|column| is_numeric_column(table, column))?;
    let bars = table
        .rows()
        .iter()
        .enumerate()
        .map(|(index, row)| Bar {
            label: index.to_string(),
            value: row.get(column.as_str()).and_then(Value::as_f64).unwrap_or(0.0),
        })
        .collect();
    Some(ChartSeries {
        value_column: column.clone(),
        bars,
    })
}

fn is_numeric_column(table: &ResultTable, column: &str) -> bool {
    let mut seen = false;
    for row in table.rows() {
        match row.get(column) {
            Some(Value::Number(_)) => seen = true,
            None | Some(Value::Null) => {}
            Some(_) => return false,
        }
    }
    seen
}

pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

pub fn speaker_label(role: Role) -> &'static str {
    match role {
        Role::User => "You",
        Role::Assistant => "AI",
    }
}
