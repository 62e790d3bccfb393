use crate::error::StoreError;
use crate::session::suggestions::{SuggestionPool, SUGGESTION_COUNT};
use crate::session::{ChatSession, SessionId, SessionRecord, SCHEMA_VERSION};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// In-memory session registry. Ids come from a counter that only moves forward,
/// so a deleted session's id is never handed out again.
pub struct SessionStore {
    sessions: BTreeMap<SessionId, ChatSession>,
    next_id: u64,
    pool: SuggestionPool,
    rng: StdRng,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            sessions: BTreeMap::new(),
            next_id: 1,
            pool: SuggestionPool::default(),
            rng,
        }
    }

    #[cfg(test)]
    pub fn pool(&self) -> &SuggestionPool {
        &self.pool
    }

    fn allocate_id(&mut self) -> SessionId {
        let id = SessionId::new(self.next_id);
        self.next_id += 1;
        id
    }

    fn insert_seeded(&mut self, mut session: ChatSession) -> SessionId {
        if !self.pool.is_display_set(session.suggestions()) {
            session.replace_suggestions(self.pool.sample(&mut self.rng, SUGGESTION_COUNT));
        }
        let id = session.id;
        self.sessions.insert(id, session);
        id
    }

    pub fn create(&mut self) -> SessionId {
        let id = self.allocate_id();
        let id = self.insert_seeded(ChatSession::new(id));
        tracing::debug!(session = %id, "created chat session");
        id
    }

    pub fn get(&self, id: SessionId) -> Result<&ChatSession, StoreError> {
        self.sessions.get(&id).ok_or(StoreError::NotFound(id))
    }

    pub fn get_mut(&mut self, id: SessionId) -> Result<&mut ChatSession, StoreError> {
        self.sessions.get_mut(&id).ok_or(StoreError::NotFound(id))
    }

    pub fn contains(&self, id: SessionId) -> bool {
        self.sessions.contains_key(&id)
    }

    pub fn delete(&mut self, id: SessionId) -> Result<ChatSession, StoreError> {
        let removed = self.sessions.remove(&id).ok_or(StoreError::NotFound(id))?;
        tracing::debug!(session = %id, "deleted chat session");
        Ok(removed)
    }

    /// Sessions in id order.
    pub fn list(&self) -> impl Iterator<Item = &ChatSession> {
        self.sessions.values()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn rename(&mut self, id: SessionId, name: &str) -> Result<(), StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::InvalidName);
        }
        self.get_mut(id)?.name = name.to_string();
        Ok(())
    }

    /// Replaces all suggestions of a session with a fresh sample.
    pub fn refresh_suggestions(&mut self, id: SessionId) -> Result<(), StoreError> {
        let session = self.sessions.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        session.replace_suggestions(self.pool.sample(&mut self.rng, SUGGESTION_COUNT));
        Ok(())
    }

    /// Resamples a session whose suggestions are not a valid display set.
    pub fn ensure_suggestions(&mut self, id: SessionId) -> Result<&[String], StoreError> {
        let broken = !self.pool.is_display_set(self.get(id)?.suggestions());
        if broken {
            self.refresh_suggestions(id)?;
        }
        Ok(self.get(id)?.suggestions())
    }

    /// Adds a record from an older or foreign shape under a fresh id.
    pub fn import(&mut self, record: SessionRecord) -> Result<SessionId, StoreError> {
        if !record.is_supported_version() {
            return Err(StoreError::UnknownSchemaVersion {
                source_name: record
                    .session_id
                    .clone()
                    .unwrap_or_else(|| "record".to_string()),
                version: record.schema_version,
            });
        }
        let id = self.allocate_id();
        let id = self.insert_seeded(ChatSession::from_record(id, record));
        tracing::debug!(session = %id, "imported chat session");
        Ok(id)
    }

    pub fn export(&self, id: SessionId) -> Result<SessionRecord, StoreError> {
        Ok(self.get(id)?.to_record())
    }
}

pub fn read_record_file(path: &Path) -> Result<SessionRecord, StoreError> {
    let data = fs::read(path)?;
    let record: SessionRecord = serde_json::from_slice(&data)?;
    if record.schema_version > SCHEMA_VERSION {
        return Err(StoreError::UnknownSchemaVersion {
            source_name: path.display().to_string(),
            version: record.schema_version,
        });
    }
    Ok(record)
}

pub fn write_record_file(path: &Path, record: &SessionRecord) -> Result<(), StoreError> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "session.json".to_string());
    let tmp_path = path.with_file_name(format!("{file_name}.tmp"));
    let bytes = serde_json::to_vec_pretty(record)?;

    fs::write(&tmp_path, bytes)?;
    match fs::rename(&tmp_path, path) {
        Ok(()) => Ok(()),
        Err(rename_err) => {
            if path.exists() {
                fs::remove_file(path)?;
                fs::rename(&tmp_path, path)?;
                Ok(())
            } else {
                Err(rename_err.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{Message, DEFAULT_SCHEMA_TEXT};
    use std::collections::BTreeSet;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file(prefix: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time should be monotonic")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "sqlchat_session_store_{prefix}_{}_{}.json",
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn created_session_reads_back_with_defaults() {
        let mut store = SessionStore::with_seed(7);
        let id = store.create();
        let session = store.get(id).expect("created session should exist");

        assert_eq!(id, SessionId::new(1));
        assert_eq!(session.name, "Chat 1");
        assert!(session.messages().is_empty());
        assert_eq!(session.schema_text, DEFAULT_SCHEMA_TEXT);
        assert!(session.show_chart);
        assert_eq!(session.suggestions().len(), SUGGESTION_COUNT);
        let unique: BTreeSet<_> = session.suggestions().iter().collect();
        assert_eq!(unique.len(), SUGGESTION_COUNT);
    }

    #[test]
    fn ids_are_never_reused_after_delete() {
        let mut store = SessionStore::with_seed(7);
        let first = store.create();
        let second = store.create();
        store.delete(second).expect("delete should succeed");
        store.delete(first).expect("delete should succeed");

        let third = store.create();
        assert_eq!(third, SessionId::new(3));
        assert!(matches!(store.get(first), Err(StoreError::NotFound(id)) if id == first));
    }

    #[test]
    fn delete_of_missing_session_reports_not_found() {
        let mut store = SessionStore::with_seed(7);
        let error = store
            .delete(SessionId::new(42))
            .expect_err("missing session should fail");
        assert!(matches!(error, StoreError::NotFound(_)));
    }

    #[test]
    fn list_is_ordered_by_id() {
        let mut store = SessionStore::with_seed(7);
        for _ in 0..4 {
            store.create();
        }
        store
            .delete(SessionId::new(2))
            .expect("delete should succeed");
        let ids: Vec<u64> = store.list().map(|session| session.id.get()).collect();
        assert_eq!(ids, [1, 3, 4]);
    }

    #[test]
    fn rename_rejects_blank_names() {
        let mut store = SessionStore::with_seed(7);
        let id = store.create();
        assert!(matches!(store.rename(id, "   "), Err(StoreError::InvalidName)));
        store.rename(id, "  Revenue  ").expect("rename should succeed");
        assert_eq!(store.get(id).map(|s| s.name.as_str()).ok(), Some("Revenue"));
    }

    #[test]
    fn ensure_suggestions_keeps_valid_sets_and_repairs_short_ones() {
        let mut store = SessionStore::with_seed(11);
        let id = store.create();
        let original = store.get(id).map(|s| s.suggestions().to_vec()).ok();
        let unchanged = store.ensure_suggestions(id).map(|s| s.to_vec()).ok();
        assert_eq!(original, unchanged);

        store
            .get_mut(id)
            .expect("session should exist")
            .replace_suggestions(vec!["only one".to_string()]);
        let repaired = store.ensure_suggestions(id).expect("repair should succeed");
        assert_eq!(repaired.len(), SUGGESTION_COUNT);
    }

    #[test]
    fn ensure_suggestions_repairs_long_and_duplicate_lists() {
        let mut store = SessionStore::with_seed(13);
        let id = store.create();
        let catalog = store.pool().catalog();

        let five: Vec<String> = catalog[..5].iter().map(|q| q.to_string()).collect();
        store
            .get_mut(id)
            .expect("session should exist")
            .replace_suggestions(five);
        let repaired = store.ensure_suggestions(id).expect("repair should succeed");
        assert_eq!(repaired.len(), SUGGESTION_COUNT);

        store
            .get_mut(id)
            .expect("session should exist")
            .replace_suggestions(vec![catalog[0].to_string(); 3]);
        let repaired = store.ensure_suggestions(id).expect("repair should succeed");
        let unique: BTreeSet<_> = repaired.iter().collect();
        assert_eq!(unique.len(), SUGGESTION_COUNT);
    }

    #[test]
    fn import_reseeds_invalid_suggestion_lists() {
        let mut store = SessionStore::with_seed(17);
        let catalog: Vec<String> = store.pool().catalog().iter().map(|q| q.to_string()).collect();

        let many = SessionRecord {
            suggestions: Some(catalog[..5].to_vec()),
            ..SessionRecord::default()
        };
        let duplicated = SessionRecord {
            suggestions: Some(vec!["x".to_string(); 3]),
            ..SessionRecord::default()
        };

        for record in [many, duplicated] {
            let id = store.import(record).expect("import should succeed");
            let session = store.get(id).expect("imported session should exist");
            assert!(store.pool().is_display_set(session.suggestions()));
        }
    }

    #[test]
    fn import_keeps_a_valid_suggestion_set() {
        let mut store = SessionStore::with_seed(19);
        let kept: Vec<String> = store.pool().catalog()[2..5]
            .iter()
            .map(|q| q.to_string())
            .collect();
        let record = SessionRecord {
            suggestions: Some(kept.clone()),
            ..SessionRecord::default()
        };
        let id = store.import(record).expect("import should succeed");
        assert_eq!(store.get(id).map(|s| s.suggestions().to_vec()).ok(), Some(kept));
    }

    #[test]
    fn import_normalizes_legacy_records_under_a_fresh_id() {
        let mut store = SessionStore::with_seed(3);
        store.create();
        let legacy = SessionRecord {
            session_id: Some("1".to_string()),
            messages: Some(vec![Message::user("Show failed transactions.")]),
            ..SessionRecord::default()
        };
        let id = store.import(legacy).expect("legacy import should succeed");
        let session = store.get(id).expect("imported session should exist");

        assert_eq!(id, SessionId::new(2));
        assert_eq!(session.name, "Chat 2");
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.schema_text, DEFAULT_SCHEMA_TEXT);
        assert_eq!(session.suggestions().len(), SUGGESTION_COUNT);
    }

    #[test]
    fn import_rejects_future_schema_versions() {
        let mut store = SessionStore::with_seed(3);
        let record = SessionRecord {
            schema_version: 99,
            ..SessionRecord::default()
        };
        let error = store.import(record).expect_err("unknown version should fail");
        assert!(error.to_string().contains("unknown schema_version"));
        assert!(store.is_empty());
    }

    #[test]
    fn exported_file_reads_back() {
        let path = temp_file("roundtrip");
        let mut store = SessionStore::with_seed(5);
        let id = store.create();
        store
            .get_mut(id)
            .expect("session should exist")
            .push_message(Message::user("Show me sales by region."));

        let record = store.export(id).expect("export should succeed");
        write_record_file(&path, &record).expect("record should write");
        let loaded = read_record_file(&path).expect("record should read");
        assert_eq!(loaded, record);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn read_record_file_supports_legacy_shape() {
        let path = temp_file("legacy");
        let data = r#"{
  "name": "Chat 1",
  "messages": [],
  "schema": "No schema uploaded yet.",
  "last_sql": ""
}"#;
        fs::write(&path, data).expect("legacy fixture should write");

        let record = read_record_file(&path).expect("legacy record should load");
        assert_eq!(record.schema_version, 0);
        assert_eq!(record.last_query.as_deref(), Some(""));
        assert!(record.show_chart.is_none());

        let _ = fs::remove_file(path);
    }

    #[test]
    fn read_record_file_rejects_unknown_schema() {
        let path = temp_file("unknown");
        fs::write(&path, r#"{"schema_version": 99, "name": "Unknown"}"#)
            .expect("unknown schema fixture should write");

        let error = read_record_file(&path).expect_err("unknown schema should fail");
        assert!(error.to_string().contains("unknown schema_version"));

        let _ = fs::remove_file(path);
    }
}
