//! Placeholder natural-language-to-SQL backend.
//!
//! Picks a table from keywords in the question and fabricates a small result set.
//! Output is deterministic for a given SQL string so repeated questions chart the same.

use axum::response::{IntoResponse, Json};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde_json::{json, Value};
use std::hash::{DefaultHasher, Hash, Hasher};

use crate::query::{QueryRequest, QueryResponse};

const CATEGORIES: [&str; 5] = ["Alpha", "Beta", "Gamma", "Delta", "Epsilon"];
const ROW_COUNT: usize = 5;

pub fn generate_sql(question: &str) -> String {
    let table = if question.to_lowercase().contains("order") {
        "orders"
    } else {
        "customers"
    };
    format!("SELECT * FROM {table} LIMIT {ROW_COUNT};")
}

pub fn synthetic_rows(sql: &str) -> Vec<Value> {
    let mut hasher = DefaultHasher::new();
    sql.hash(&mut hasher);
    let mut rng = StdRng::seed_from_u64(hasher.finish());

    let mut categories = CATEGORIES;
    categories.shuffle(&mut rng);

    categories
        .iter()
        .take(ROW_COUNT)
        .enumerate()
        .map(|(index, category)| {
            json!({
                "id": index + 1,
                "category": category,
                "value": rng.random_range(10..=100),
            })
        })
        .collect()
}

/// POST /nl2sql
pub(super) async fn handle_nl2sql(Json(request): Json<QueryRequest>) -> impl IntoResponse {
    let sql = generate_sql(&request.query);
    tracing::debug!(question = %request.query, %sql, "generated mock sql");
    let rows = synthetic_rows(&sql);
    Json(QueryResponse { sql, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn order_questions_target_the_orders_table() {
        assert_eq!(
            generate_sql("How many ORDERS were placed last week?"),
            "SELECT * FROM orders LIMIT 5;"
        );
        assert_eq!(
            generate_sql("Show me total sales by month."),
            "SELECT * FROM customers LIMIT 5;"
        );
    }

    #[test]
    fn synthetic_rows_are_deterministic_per_sql() {
        let sql = "SELECT * FROM customers LIMIT 5;";
        assert_eq!(synthetic_rows(sql), synthetic_rows(sql));
    }

    #[test]
    fn synthetic_rows_use_each_category_once() {
        let rows = synthetic_rows("SELECT * FROM orders LIMIT 5;");
        assert_eq!(rows.len(), ROW_COUNT);

        let categories: BTreeSet<&str> = rows
            .iter()
            .filter_map(|row| row.get("category").and_then(Value::as_str))
            .collect();
        assert_eq!(categories, CATEGORIES.into_iter().collect());

        for (index, row) in rows.iter().enumerate() {
            assert_eq!(row.get("id").and_then(Value::as_u64), Some(index as u64 + 1));
            let value = row.get("value").and_then(Value::as_i64).unwrap_or_default();
            assert!((10..=100).contains(&value));
        }
    }
}
