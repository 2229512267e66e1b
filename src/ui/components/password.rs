// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Password input with a show/hide toggle.

use eframe::egui;

/// Draw the password field. Returns the new text when it changed.
///
/// `revealed` is plain UI state owned by the caller and flipped in place.
pub fn password_field(
    ui: &mut egui::Ui,
    value: &str,
    revealed: &mut bool,
    enabled: bool,
) -> Option<String> {
    let mut text = value.to_string();
    let mut changed = None;

    ui.horizontal(|ui| {
        let resp = ui.add_enabled(
            enabled,
            egui::TextEdit::singleline(&mut text)
                .password(!*revealed)
                .hint_text("Mínimo de 6 caracteres"),
        );
        if resp.changed() {
            changed = Some(text.clone());
        }

        let (icon, hint) = if *revealed {
            (egui_phosphor::regular::EYE_SLASH, "Ocultar senha")
        } else {
            (egui_phosphor::regular::EYE, "Mostrar senha")
        };
        if ui.button(icon).on_hover_text(hint).clicked() {
            *revealed = !*revealed;
        }
    });

    changed
}
