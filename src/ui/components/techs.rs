// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Dynamic list of technology rows (title + knowledge score).

use eframe::egui;

use crate::models::submission::TechInput;
use crate::models::validation::{FieldKey, ValidationErrors};
use crate::ui::components::field_error;

/// Knowledge value a freshly added row starts with.
const NEW_ROW_KNOWLEDGE: &str = "0";

/// UI model for the techs list.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct TechsModel {
    rows: Vec<TechInput>,
}

/// Messages emitted by the techs view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TechsMsg {
    Add,
    Remove(usize),
    TitleChanged { index: usize, value: String },
    KnowledgeChanged { index: usize, value: String },
}

impl TechsModel {
    pub fn rows(&self) -> &[TechInput] {
        &self.rows
    }
}

/// Apply a message to the list.
pub fn update(model: &mut TechsModel, msg: TechsMsg) {
    match msg {
        TechsMsg::Add => model
            .rows
            .push(TechInput::new(String::new(), NEW_ROW_KNOWLEDGE)),
        TechsMsg::Remove(index) => {
            if index < model.rows.len() {
                model.rows.remove(index);
            }
        }
        TechsMsg::TitleChanged { index, value } => {
            if let Some(row) = model.rows.get_mut(index) {
                row.title = value;
            }
        }
        TechsMsg::KnowledgeChanged { index, value } => {
            if let Some(row) = model.rows.get_mut(index) {
                row.knowledge = value;
            }
        }
    }
}

/// Render the list with per-row errors and return triggered messages.
pub fn view(
    ui: &mut egui::Ui,
    model: &TechsModel,
    errors: &ValidationErrors,
    enabled: bool,
) -> Vec<TechsMsg> {
    let mut msgs = Vec::new();

    ui.horizontal(|ui| {
        ui.label("Tecnologias");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let add = egui::Button::new(format!("{} Adicionar", egui_phosphor::regular::PLUS));
            if ui.add_enabled(enabled, add).clicked() {
                msgs.push(TechsMsg::Add);
            }
        });
    });
    ui.add_space(4.0);

    if model.rows.is_empty() {
        ui.label(
            egui::RichText::new("Nenhuma tecnologia adicionada.")
                .italics()
                .color(egui::Color32::from_gray(110)),
        );
    }

    for (index, row) in model.rows.iter().enumerate() {
        render_row(ui, index, row, errors, enabled, &mut msgs);
        ui.add_space(4.0);
    }

    field_error(ui, errors.get(FieldKey::Techs));
    msgs
}

fn render_row(
    ui: &mut egui::Ui,
    index: usize,
    row: &TechInput,
    errors: &ValidationErrors,
    enabled: bool,
    msgs: &mut Vec<TechsMsg>,
) {
    ui.horizontal(|ui| {
        ui.vertical(|ui| {
            let mut title = row.title.clone();
            let resp = ui.add_enabled(
                enabled,
                egui::TextEdit::singleline(&mut title)
                    .hint_text("Título")
                    .desired_width(220.0),
            );
            if resp.changed() {
                msgs.push(TechsMsg::TitleChanged {
                    index,
                    value: title,
                });
            }
            field_error(ui, errors.get(FieldKey::TechTitle(index)));
        });

        ui.vertical(|ui| {
            let mut knowledge = row.knowledge.clone();
            let resp = ui.add_enabled(
                enabled,
                egui::TextEdit::singleline(&mut knowledge)
                    .hint_text("1-100")
                    .desired_width(70.0),
            );
            if resp.changed() {
                msgs.push(TechsMsg::KnowledgeChanged {
                    index,
                    value: knowledge,
                });
            }
            field_error(ui, errors.get(FieldKey::TechKnowledge(index)));
        });

        if ui
            .add_enabled(
                enabled,
                egui::Button::new(
                    egui::RichText::new(egui_phosphor::regular::TRASH_SIMPLE)
                        .color(egui::Color32::from_gray(140)),
                ),
            )
            .on_hover_text("Remover tecnologia")
            .clicked()
        {
            msgs.push(TechsMsg::Remove(index));
        }
    });
}
