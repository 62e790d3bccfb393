use crate::event::AppEvent;
use crate::query::HttpQueryService;
use crate::session::{ChatSession, Role, SessionId};
use crate::state::{ChatState, NoticeLevel};
use crate::theme::Theme;
use crate::ui::chart;
use crate::ui::view::{self, OutputView, ViewContent};
use eframe::egui::{self, CornerRadius, RichText, ScrollArea, Stroke};
use std::path::PathBuf;

pub struct ChatApp {
    state: ChatState<HttpQueryService>,
    theme: Theme,
    applied_dark: Option<bool>,
    pending: Vec<AppEvent>,
    input_draft: String,
    schema_path_draft: String,
    transfer_path_draft: String,
    rename_draft: String,
    rename_target: Option<SessionId>,
}

impl ChatApp {
    pub fn new(state: ChatState<HttpQueryService>) -> Self {
        Self {
            state,
            theme: Theme::default(),
            applied_dark: None,
            pending: Vec::new(),
            input_draft: String::new(),
            schema_path_draft: String::new(),
            transfer_path_draft: String::new(),
            rename_draft: String::new(),
            rename_target: None,
        }
    }

    fn collect_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        for file in dropped {
            if let Some(bytes) = file.bytes {
                self.pending.push(AppEvent::UploadSchema {
                    file_name: file.name,
                    bytes: bytes.to_vec(),
                });
            } else if let Some(path) = file.path {
                self.pending.push(AppEvent::UploadSchemaPath(path));
            }
        }
    }

    fn drain_events(&mut self, ctx: &egui::Context) {
        if self.pending.is_empty() {
            return;
        }
        for event in std::mem::take(&mut self.pending) {
            tracing::debug!(?event, "applying event");
            self.state.apply(event);
        }
        ctx.request_repaint();
    }

    fn sync_theme(&mut self, ctx: &egui::Context) {
        let dark = self.state.dark_mode();
        if self.applied_dark != Some(dark) {
            self.theme = Theme::for_mode(dark);
            self.theme.apply_visuals(ctx);
            self.applied_dark = Some(dark);
        }
    }

    fn sync_rename_draft(&mut self) {
        let active = self.state.active();
        let active_id = active.map(|session| session.id);
        if self.rename_target != active_id {
            self.rename_draft = active.map(|session| session.name.clone()).unwrap_or_default();
            self.rename_target = active_id;
        }
    }

    fn render_top_bar(&mut self, ctx: &egui::Context) {
        let theme = &self.theme;
        let endpoint = self.state.service().endpoint();
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.strong("sqlchat");
                ui.separator();
                ui.label(RichText::new(endpoint).color(theme.text_muted).monospace());
            });
        });
    }

    fn render_left_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("sidebar")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| {
                ScrollArea::vertical().id_salt("sidebar_scroll").show(ui, |ui| {
                    let mut dark = self.state.dark_mode();
                    if ui.checkbox(&mut dark, "Dark mode").changed() {
                        self.pending.push(AppEvent::SetDarkMode(dark));
                    }

                    ui.separator();
                    self.render_chat_list(ui);

                    ui.separator();
                    self.render_schema_upload(ui);

                    ui.separator();
                    self.render_outputs(ui);

                    ui.separator();
                    self.render_transfer(ui);

                    ui.separator();
                    egui::CollapsingHeader::new("Diagnostics")
                        .default_open(false)
                        .show(ui, |ui| {
                            ScrollArea::vertical()
                                .id_salt("diagnostics_log")
                                .max_height(90.0)
                                .stick_to_bottom(true)
                                .show(ui, |ui| {
                                    for entry in self.state.diagnostics() {
                                        ui.label(RichText::new(entry).small());
                                    }
                                });
                        });
                });
            });
    }

    fn render_chat_list(&mut self, ui: &mut egui::Ui) {
        ui.heading(format!("Chats ({})", self.state.store().len()));
        if ui.button("+ New Chat").clicked() {
            self.pending.push(AppEvent::NewChat);
        }

        let active_id = self.state.active_id();
        for session in self.state.store().list() {
            ui.horizontal(|ui| {
                let selected = active_id == Some(session.id);
                if ui.selectable_label(selected, &session.name).clicked() && !selected {
                    self.pending.push(AppEvent::SelectChat(session.id));
                }
                if ui.small_button("Delete").clicked() {
                    self.pending.push(AppEvent::DeleteChat(session.id));
                }
            });
        }

        if let Some(id) = active_id {
            ui.horizontal(|ui| {
                ui.add(egui::TextEdit::singleline(&mut self.rename_draft).desired_width(160.0));
                if ui.button("Rename").clicked() {
                    self.pending
                        .push(AppEvent::RenameChat(id, self.rename_draft.clone()));
                }
            });
        }
    }

    fn render_schema_upload(&mut self, ui: &mut egui::Ui) {
        ui.strong("Upload schema");
        ui.label(
            RichText::new("Drop a .sql, .json or .txt file on the window, or enter a path.")
                .color(self.theme.text_muted)
                .small(),
        );
        ui.horizontal(|ui| {
            ui.add(
                egui::TextEdit::singleline(&mut self.schema_path_draft)
                    .desired_width(180.0)
                    .hint_text("schema.sql"),
            );
            let ready = !self.schema_path_draft.trim().is_empty();
            if ui.add_enabled(ready, egui::Button::new("Upload")).clicked() {
                self.pending.push(AppEvent::UploadSchemaPath(PathBuf::from(
                    self.schema_path_draft.trim(),
                )));
            }
        });
    }

    fn render_outputs(&mut self, ui: &mut egui::Ui) {
        ui.strong("Outputs");
        let Some(session) = self.state.active() else {
            return;
        };

        let mut show_chart = session.show_chart;
        if ui.checkbox(&mut show_chart, "Show chart").changed() {
            self.pending.push(AppEvent::SetShowChart(show_chart));
        }

        let mut selected = self.state.view();
        ui.horizontal(|ui| {
            for view in OutputView::ALL {
                ui.selectable_value(&mut selected, view, view.label());
            }
        });
        if selected != self.state.view() {
            self.pending.push(AppEvent::SelectView(selected));
        }

        ui.label(RichText::new(selected.caption()).color(self.theme.text_muted));
        render_view_content(ui, &self.theme, view::project(session, selected));
    }

    fn render_transfer(&mut self, ui: &mut egui::Ui) {
        ui.strong("Import / export");
        ui.add(
            egui::TextEdit::singleline(&mut self.transfer_path_draft)
                .desired_width(f32::INFINITY)
                .hint_text("chat.json"),
        );
        let ready = !self.transfer_path_draft.trim().is_empty();
        ui.horizontal(|ui| {
            let path = PathBuf::from(self.transfer_path_draft.trim());
            if ui.add_enabled(ready, egui::Button::new("Export")).clicked() {
                self.pending.push(AppEvent::ExportChat(path.clone()));
            }
            if ui.add_enabled(ready, egui::Button::new("Import")).clicked() {
                self.pending.push(AppEvent::ImportChat(path));
            }
        });
    }

    fn render_center_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(session) = self.state.active() else {
                return;
            };
            let theme = &self.theme;

            ui.heading(&session.name);
            ui.separator();

            let transcript_height = (ui.available_height() - 170.0).max(120.0);
            ScrollArea::vertical()
                .id_salt("chat_transcript")
                .max_height(transcript_height)
                .stick_to_bottom(true)
                .show(ui, |ui| {
                    if session.messages().is_empty() {
                        ui.label(
                            RichText::new("Ask a question about your data to get started.")
                                .color(theme.text_muted),
                        );
                    }
                    render_transcript(ui, theme, session);
                });

            ui.separator();
            render_suggestions(ui, theme, session, &mut self.pending);

            if let Some(notice) = self.state.notice() {
                let color = match notice.level {
                    NoticeLevel::Success => theme.success,
                    NoticeLevel::Warning => theme.warning,
                    NoticeLevel::Error => theme.danger,
                };
                ui.label(RichText::new(&notice.text).color(color));
            }

            let mut send_now = false;
            ui.horizontal(|ui| {
                let response = ui.add(
                    egui::TextEdit::singleline(&mut self.input_draft)
                        .desired_width(ui.available_width() - 80.0)
                        .hint_text("Ask about your data..."),
                );
                if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    send_now = true;
                }
                send_now |= ui.button("Send").clicked();
            });

            if send_now {
                self.pending
                    .push(AppEvent::Submit(std::mem::take(&mut self.input_draft)));
            }
        });
    }
}

fn render_transcript(ui: &mut egui::Ui, theme: &Theme, session: &ChatSession) {
    for message in session.messages() {
        let from_user = message.role == Role::User;
        let layout = if from_user {
            egui::Layout::right_to_left(egui::Align::TOP)
        } else {
            egui::Layout::left_to_right(egui::Align::TOP)
        };
        ui.with_layout(layout, |ui| {
            let avatar = if from_user {
                theme.avatar_user
            } else {
                theme.avatar_bot
            };
            ui.label(
                RichText::new(view::speaker_label(message.role))
                    .color(avatar)
                    .strong(),
            );
            theme.bubble_frame(from_user).show(ui, |ui| {
                ui.set_max_width(420.0);
                ui.vertical(|ui| {
                    ui.label(RichText::new(&message.content).color(theme.bubble_text(from_user)));
                    ui.label(
                        RichText::new(&message.timestamp)
                            .color(theme.text_muted)
                            .small(),
                    );
                });
            });
        });
        ui.add_space(Theme::P4);
    }
}

fn render_suggestions(
    ui: &mut egui::Ui,
    theme: &Theme,
    session: &ChatSession,
    pending: &mut Vec<AppEvent>,
) {
    if session.suggestions().is_empty() {
        return;
    }
    ui.label(RichText::new("Try asking").color(theme.text_muted).small());
    ui.horizontal_wrapped(|ui| {
        for suggestion in session.suggestions() {
            let chip = egui::Button::new(RichText::new(suggestion).color(theme.text_primary).size(13.0))
                .fill(theme.chip_fill)
                .stroke(Stroke::new(1.0, theme.border_subtle))
                .corner_radius(CornerRadius::same(Theme::R18));
            if ui.add(chip).clicked() {
                pending.push(AppEvent::Submit(suggestion.clone()));
            }
        }
    });
}

fn render_view_content(ui: &mut egui::Ui, theme: &Theme, content: ViewContent<'_>) {
    match content {
        ViewContent::Query(text) | ViewContent::Schema(text) => {
            theme.panel_frame().show(ui, |ui| {
                ScrollArea::vertical()
                    .id_salt("code_view")
                    .max_height(240.0)
                    .show(ui, |ui| {
                        ui.label(RichText::new(text).monospace());
                    });
            });
        }
        ViewContent::Table(table) if table.is_empty() => {
            ui.label(
                RichText::new("The query returned no rows.")
                    .color(theme.text_muted)
                    .italics(),
            );
        }
        ViewContent::Table(table) => {
            ScrollArea::both()
                .id_salt("results_table")
                .max_height(260.0)
                .show(ui, |ui| {
                    egui::Grid::new("results_grid")
                        .striped(true)
                        .show(ui, |ui| {
                            for column in table.columns() {
                                ui.strong(column);
                            }
                            ui.end_row();
                            for row in table.rows() {
                                for column in table.columns() {
                                    let text = row.get(column).map(view::cell_text).unwrap_or_default();
                                    ui.label(text);
                                }
                                ui.end_row();
                            }
                        });
                });
        }
        ViewContent::Chart(series) => {
            ui.label(
                RichText::new(&series.value_column)
                    .color(theme.text_muted)
                    .small(),
            );
            chart::bar_chart(ui, &series, theme);
        }
        ViewContent::Placeholder(text) => {
            ui.label(RichText::new(text).color(theme.text_muted).italics());
        }
    }
}

impl eframe::App for ChatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.collect_dropped_files(ctx);
        self.drain_events(ctx);
        self.state.ensure_active();
        self.sync_theme(ctx);
        self.sync_rename_draft();
        self.render_top_bar(ctx);
        self.render_left_panel(ctx);
        self.render_center_panel(ctx);
        if !self.pending.is_empty() {
            ctx.request_repaint();
        }
    }
}
