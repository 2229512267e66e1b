// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Reusable egui components structured for MVU-style updates.

pub mod avatar;
pub mod password;
pub mod techs;

use eframe::egui;

pub use password::password_field;

/// Error text shown under a field.
const ERROR_COLOR: egui::Color32 = egui::Color32::from_rgb(220, 53, 69);

/// Show a field's validation message, if it has one.
pub fn field_error(ui: &mut egui::Ui, message: Option<&str>) {
    if let Some(message) = message {
        ui.label(egui::RichText::new(message).small().color(ERROR_COLOR));
    }
}
