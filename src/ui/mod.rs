// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Top-level egui application shell for the sign-up form.
//! Handles layout, form controls, and wiring to the upload worker.

pub mod components;

use std::sync::Arc;

use eframe::egui;

use crate::logic::storage::AvatarStorage;
use crate::models::validation::FieldKey;
use crate::mvu::{self, AppModel, Command, Msg, SubmitPhase};
use crate::ui::components::avatar::AvatarMsg;
use crate::ui::components::{avatar, field_error, password_field, techs};

/// Stateful egui application for filling in and submitting the form.
pub struct AdvancedFormApp {
    model: AppModel,
    inbox: Vec<Msg>,
    cmd_tx: crossbeam_channel::Sender<Command>,
    msg_rx: crossbeam_channel::Receiver<Msg>,
    /// Pure view state: whether the password is shown in clear text.
    password_revealed: bool,
}

impl AdvancedFormApp {
    /// Create the app and start the worker threads that run commands.
    ///
    /// `storage` is shared by every worker; it is the only handle to the
    /// upload service in the process.
    pub fn new(storage: Arc<dyn AvatarStorage>) -> Self {
        let (cmd_tx, cmd_rx) = crossbeam_channel::unbounded::<Command>();
        let (msg_tx, msg_rx) = crossbeam_channel::unbounded::<Msg>();

        let threads = std::thread::available_parallelism()
            .map(|n| n.get().clamp(2, 4))
            .unwrap_or(2);
        for _ in 0..threads {
            let cmd_rx = cmd_rx.clone();
            let msg_tx = msg_tx.clone();
            let storage = Arc::clone(&storage);
            std::thread::spawn(move || {
                for cmd in cmd_rx.iter() {
                    let msg = mvu::run_command(cmd, storage.as_ref());
                    let _ = msg_tx.send(msg);
                }
            });
        }

        Self {
            model: AppModel::default(),
            inbox: Vec::new(),
            cmd_tx,
            msg_rx,
            password_revealed: false,
        }
    }
}

impl eframe::App for AdvancedFormApp {
    /// Required by eframe 0.34; all rendering happens in [`Self::update`],
    /// which eframe still calls every frame before this method.
    fn ui(&mut self, _ui: &mut egui::Ui, _frame: &mut eframe::Frame) {}

    /// Drives a single UI frame.
    ///
    /// Drains worker results into the inbox, turns decoded thumbnails into
    /// textures, applies every other message to the MVU model and forwards the
    /// resulting commands to the workers. Then renders the top bar, the error
    /// modal, the status line and the scrollable form with its output panel.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.style_mut(|style| {
            style.spacing.item_spacing = egui::vec2(6.0, 6.0);
        });

        // Pull messages produced by the command workers.
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.model.pending_commands = self.model.pending_commands.saturating_sub(1);
            self.inbox.push(msg);
        }

        let mut msgs = std::mem::take(&mut self.inbox);
        // Keep arrival order so edits apply before a submit queued in the same frame.
        msgs.reverse();
        while let Some(msg) = msgs.pop() {
            match msg {
                Msg::ThumbnailDecoded { path, image } => {
                    let texture = ctx.load_texture(
                        format!("avatar-{}", path.display()),
                        image,
                        egui::TextureOptions::default(),
                    );
                    msgs.push(Msg::Avatar(AvatarMsg::ThumbnailReady { path, texture }));
                }
                other => {
                    let mut commands = Vec::new();
                    mvu::update(&mut self.model, other, &mut commands);
                    for cmd in commands {
                        if self.cmd_tx.send(cmd).is_ok() {
                            self.model.pending_commands += 1;
                        }
                    }
                }
            }
        }

        // Keep repainting while workers are busy so their results show up promptly.
        if self.model.pending_commands > 0 {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.heading("Cadastro");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    egui::widgets::global_theme_preference_switch(ui);
                    ui.separator();
                    self.render_submit_button(ui);
                });
            });
            ui.add_space(4.0);
        });

        self.render_error_modal(ctx);

        egui::TopBottomPanel::bottom("status_panel")
            .resizable(false)
            .show(ctx, |ui| {
                self.render_status(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(8.0);
            egui::ScrollArea::vertical().show(ui, |ui| {
                self.render_avatar_section(ui);
                ui.add_space(12.0);

                self.render_identity_group(ui);
                ui.add_space(12.0);

                self.render_techs_section(ui);
                ui.add_space(12.0);

                self.render_output(ui);
                ui.add_space(8.0);
            });
        });
    }
}

impl AdvancedFormApp {
    fn editable(&self) -> bool {
        !self.model.is_submitting()
    }

    /// Submit button; disabled while an upload is in flight.
    fn render_submit_button(&mut self, ui: &mut egui::Ui) {
        let label = if self.model.is_submitting() {
            format!("{} Enviando…", egui_phosphor::regular::HOURGLASS)
        } else {
            format!("{} Salvar", egui_phosphor::regular::UPLOAD_SIMPLE)
        };
        if ui
            .add_enabled(self.editable(), egui::Button::new(label))
            .on_disabled_hover_text("Aguarde o envio terminar")
            .clicked()
        {
            self.inbox.push(Msg::SubmitRequested);
        }
    }

    fn render_avatar_section(&mut self, ui: &mut egui::Ui) {
        ui.label("Avatar");
        ui.add_space(4.0);
        let msgs = avatar::view(ui, &self.model.avatar, self.editable());
        self.inbox.extend(msgs.into_iter().map(Msg::Avatar));
        field_error(ui, self.model.errors.get(FieldKey::Avatar));
    }

    /// Name, email and password in a grouped grid.
    fn render_identity_group(&mut self, ui: &mut egui::Ui) {
        let enabled = self.editable();
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_width(ui.available_width());
            egui::Grid::new("identity_grid")
                .num_columns(2)
                .spacing(egui::vec2(8.0, 10.0))
                .min_col_width(100.0)
                .show(ui, |ui| {
                    ui.label("Nome");
                    ui.vertical(|ui| {
                        let mut name = self.model.name.clone();
                        let resp = ui.add_enabled(
                            enabled,
                            egui::TextEdit::singleline(&mut name).hint_text("Seu nome completo"),
                        );
                        if resp.changed() {
                            self.inbox.push(Msg::NameChanged(name));
                        }
                        field_error(ui, self.model.errors.get(FieldKey::Name));
                    });
                    ui.end_row();

                    ui.label("E-mail");
                    ui.vertical(|ui| {
                        let mut email = self.model.email.clone();
                        let resp = ui.add_enabled(
                            enabled,
                            egui::TextEdit::singleline(&mut email).hint_text("voce@gmail.com"),
                        );
                        if resp.changed() {
                            self.inbox.push(Msg::EmailChanged(email));
                        }
                        field_error(ui, self.model.errors.get(FieldKey::Email));
                    });
                    ui.end_row();

                    ui.label("Senha");
                    ui.vertical(|ui| {
                        if let Some(password) = password_field(
                            ui,
                            &self.model.password,
                            &mut self.password_revealed,
                            enabled,
                        ) {
                            self.inbox.push(Msg::PasswordChanged(password));
                        }
                        field_error(ui, self.model.errors.get(FieldKey::Password));
                    });
                    ui.end_row();
                });
        });
    }

    fn render_techs_section(&mut self, ui: &mut egui::Ui) {
        let msgs = techs::view(ui, &self.model.techs, &self.model.errors, self.editable());
        self.inbox.extend(msgs.into_iter().map(Msg::Techs));
    }

    /// Rendered record of the last successful submission.
    fn render_output(&self, ui: &mut egui::Ui) {
        if self.model.phase != SubmitPhase::Submitted {
            return;
        }
        let Some(output) = &self.model.output else {
            return;
        };
        egui::CollapsingHeader::new("Dados enviados")
            .default_open(true)
            .show(ui, |ui| {
                let mut text = output.rendered.as_str();
                ui.add(
                    egui::TextEdit::multiline(&mut text)
                        .code_editor()
                        .desired_width(f32::INFINITY),
                );
            });
    }

    /// Render a simple modal window for error messages.
    fn render_error_modal(&mut self, ctx: &egui::Context) {
        if let Some(message) = self.model.error.clone() {
            egui::Window::new("Erro")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
                .show(ctx, |ui| {
                    ui.label(message);
                    ui.add_space(8.0);
                    if ui.button("OK").clicked() {
                        self.inbox.push(Msg::DismissError);
                    }
                });
        }
    }

    /// Render latest status message when present.
    fn render_status(&self, ui: &mut egui::Ui) {
        if let Some(text) = &self.model.status {
            let display = if self.model.pending_commands > 0 {
                format!("{}  ({} em andamento…)", text, self.model.pending_commands)
            } else {
                text.to_string()
            };
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(display).color(egui::Color32::from_gray(68)));
                if self.model.pending_commands > 0 {
                    ui.add(egui::Spinner::new().size(14.0)).on_hover_text(format!(
                        "{} tarefa(s) em segundo plano",
                        self.model.pending_commands
                    ));
                }
            });
        }
    }
}
