use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::AppState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Request body for `POST /api/items`.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemCreate {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

struct ItemTable {
    items: BTreeMap<u64, Item>,
    next_id: u64,
}

impl Default for ItemTable {
    fn default() -> Self {
        Self {
            items: BTreeMap::new(),
            next_id: 1,
        }
    }
}

/// Shared in-memory item table. Ids start at 1 and are never reused.
#[derive(Clone, Default)]
pub struct ItemStore {
    inner: Arc<RwLock<ItemTable>>,
}

impl ItemStore {
    pub async fn list(&self) -> Vec<Item> {
        self.inner.read().await.items.values().cloned().collect()
    }

    pub async fn create(&self, payload: ItemCreate) -> Item {
        let mut table = self.inner.write().await;
        let item = Item {
            id: table.next_id,
            name: payload.name,
            description: payload.description,
        };
        table.items.insert(item.id, item.clone());
        table.next_id += 1;
        item
    }

    pub async fn get(&self, id: u64) -> Option<Item> {
        self.inner.read().await.items.get(&id).cloned()
    }
}

/// GET /api/items
pub(super) async fn handle_list_items(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.items.list().await)
}

/// POST /api/items
pub(super) async fn handle_create_item(
    State(state): State<AppState>,
    Json(payload): Json<ItemCreate>,
) -> impl IntoResponse {
    let item = state.items.create(payload).await;
    tracing::info!(item_id = item.id, "created item");
    (StatusCode::CREATED, Json(item))
}

/// GET /api/items/{id}
pub(super) async fn handle_get_item(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> impl IntoResponse {
    match state.items.get(id).await {
        Some(item) => (StatusCode::OK, Json(serde_json::json!(item))),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"detail": "Item not found"})),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ids_are_sequential_from_one() {
        let store = ItemStore::default();
        let first = store
            .create(ItemCreate {
                name: "first".to_string(),
                description: None,
            })
            .await;
        let second = store
            .create(ItemCreate {
                name: "second".to_string(),
                description: Some("desc".to_string()),
            })
            .await;

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(store.list().await, vec![first, second.clone()]);
        assert_eq!(store.get(2).await, Some(second));
        assert!(store.get(3).await.is_none());
    }

    #[test]
    fn create_body_requires_name() {
        assert!(serde_json::from_str::<ItemCreate>(r#"{"description": "x"}"#).is_err());
        let parsed: ItemCreate =
            serde_json::from_str(r#"{"name": "only name"}"#).expect("name alone should parse");
        assert!(parsed.description.is_none());
    }
}
