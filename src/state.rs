use crate::conversation::{ConversationController, TurnOutcome};
use crate::error::{ChatError, StoreError};
use crate::event::AppEvent;
use crate::query::QueryService;
use crate::session::store::{self, SessionStore};
use crate::session::{ChatSession, SessionId};
use crate::ui::view::OutputView;
use crate::upload;
use chrono::Local;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

/// The last user-visible message. Replaced by the next event that produces one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

/// Front-end state: the session store plus everything the presentation layer
/// needs that is not part of a session.
pub struct ChatState<S> {
    store: SessionStore,
    controller: ConversationController<S>,
    active: Option<SessionId>,
    view: OutputView,
    dark_mode: bool,
    notice: Option<Notice>,
    diagnostics_log: Vec<String>,
}

impl<S: QueryService> ChatState<S> {
    pub fn new(store: SessionStore, service: S) -> Self {
        Self {
            store,
            controller: ConversationController::new(service),
            active: None,
            view: OutputView::default(),
            dark_mode: false,
            notice: None,
            diagnostics_log: Vec::new(),
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn active_id(&self) -> Option<SessionId> {
        self.active
    }

    pub fn active(&self) -> Option<&ChatSession> {
        self.active.and_then(|id| self.store.get(id).ok())
    }

    pub fn view(&self) -> OutputView {
        self.view
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics_log
    }

    pub fn service(&self) -> &S {
        self.controller.service()
    }

    /// Returns the active session id, creating a session when nothing is active.
    /// Also repairs the active session's suggestions for display.
    pub fn ensure_active(&mut self) -> SessionId {
        let id = match self.active.filter(|id| self.store.contains(*id)) {
            Some(id) => id,
            None => self.new_chat(),
        };
        if let Err(err) = self.store.ensure_suggestions(id) {
            self.log_diagnostic(format!("failed to repair suggestions: {err}"));
        }
        id
    }

    fn new_chat(&mut self) -> SessionId {
        let id = self.store.create();
        self.active = Some(id);
        tracing::info!(session = %id, "new chat");
        id
    }

    fn log_diagnostic(&mut self, message: impl Into<String>) {
        self.diagnostics_log
            .push(format!("[{}] {}", Local::now().format("%H:%M:%S"), message.into()));
    }

    fn set_notice(&mut self, level: NoticeLevel, text: impl Into<String>) {
        self.notice = Some(Notice {
            level,
            text: text.into(),
        });
    }

    fn report_store_error(&mut self, context: &str, err: StoreError) {
        tracing::warn!(error = %err, "{context}");
        self.log_diagnostic(format!("{context}: {err}"));
        self.set_notice(NoticeLevel::Error, format!("{context}: {err}"));
    }

    fn store_schema(&mut self, text: String) {
        let id = self.ensure_active();
        match self.store.get_mut(id) {
            Ok(session) => {
                session.schema_text = text;
                tracing::info!(session = %id, "schema uploaded");
                self.set_notice(NoticeLevel::Success, "Schema uploaded!");
            }
            Err(err) => self.report_store_error("schema upload failed", err),
        }
    }

    pub fn apply(&mut self, event: AppEvent) {
        match event {
            AppEvent::NewChat => {
                self.new_chat();
                self.notice = None;
            }
            AppEvent::SelectChat(id) => {
                if self.store.contains(id) {
                    self.active = Some(id);
                    self.notice = None;
                } else {
                    self.report_store_error("cannot open chat", StoreError::NotFound(id));
                }
            }
            AppEvent::DeleteChat(id) => match self.store.delete(id) {
                Ok(_) => {
                    if self.active == Some(id) {
                        self.active = None;
                    }
                    tracing::info!(session = %id, "deleted chat");
                    if self.store.is_empty() {
                        tracing::debug!("no chats left");
                    }
                }
                Err(err) => self.report_store_error("cannot delete chat", err),
            },
            AppEvent::RenameChat(id, name) => {
                if let Err(err) = self.store.rename(id, &name) {
                    self.report_store_error("cannot rename chat", err);
                }
            }
            AppEvent::Submit(input) => {
                let id = self.ensure_active();
                match self.controller.submit(&mut self.store, id, &input) {
                    Ok(TurnOutcome::Answered) => self.notice = None,
                    Ok(TurnOutcome::Failed(cause)) => {
                        self.log_diagnostic(format!("query service error: {cause}"));
                    }
                    Err(ChatError::EmptyInput) => {
                        self.set_notice(NoticeLevel::Warning, ChatError::EmptyInput.to_string());
                    }
                    Err(ChatError::Store(err)) => self.report_store_error("turn failed", err),
                }
            }
            AppEvent::UploadSchema { file_name, bytes } => {
                match upload::decode_schema(&file_name, &bytes) {
                    Ok(text) => self.store_schema(text),
                    Err(err) => {
                        tracing::warn!(error = %err, "schema upload rejected");
                        self.set_notice(NoticeLevel::Warning, err.to_string());
                    }
                }
            }
            AppEvent::UploadSchemaPath(path) => match upload::read_schema_file(&path) {
                Ok(text) => self.store_schema(text),
                Err(err) => {
                    tracing::warn!(error = %err, "schema upload rejected");
                    self.set_notice(NoticeLevel::Warning, err.to_string());
                }
            },
            AppEvent::SetShowChart(show) => {
                let id = self.ensure_active();
                if let Ok(session) = self.store.get_mut(id) {
                    session.show_chart = show;
                }
            }
            AppEvent::SetDarkMode(dark) => self.dark_mode = dark,
            AppEvent::SelectView(view) => self.view = view,
            AppEvent::ImportChat(path) => {
                let imported =
                    store::read_record_file(&path).and_then(|record| self.store.import(record));
                match imported {
                    Ok(id) => {
                        self.active = Some(id);
                        self.set_notice(NoticeLevel::Success, format!("Imported chat {id}"));
                    }
                    Err(err) => self.report_store_error("import failed", err),
                }
            }
            AppEvent::ExportChat(path) => {
                let id = self.ensure_active();
                let exported = self
                    .store
                    .export(id)
                    .and_then(|record| store::write_record_file(&path, &record));
                match exported {
                    Ok(()) => self.set_notice(
                        NoticeLevel::Success,
                        format!("Exported to {}", path.display()),
                    ),
                    Err(err) => self.report_store_error("export failed", err),
                }
            }
        }
    }
}
