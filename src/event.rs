use crate::session::SessionId;
use crate::ui::view::OutputView;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    NewChat,
    SelectChat(SessionId),
    DeleteChat(SessionId),
    RenameChat(SessionId, String),
    Submit(String),
    UploadSchema { file_name: String, bytes: Vec<u8> },
    UploadSchemaPath(PathBuf),
    SetShowChart(bool),
    SetDarkMode(bool),
    SelectView(OutputView),
    ImportChat(PathBuf),
    ExportChat(PathBuf),
}
