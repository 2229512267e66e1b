// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Avatar picker with inspection and thumbnail preview, MVU-style.

use std::path::{Path, PathBuf};

use eframe::egui;

use crate::models::submission::AvatarFile;

/// Extensions offered in the file dialog and decoded for previews.
pub const IMAGE_EXTENSIONS: [&str; 8] = ["png", "jpg", "jpeg", "bmp", "tiff", "tif", "gif", "webp"];

/// MVU state for the avatar picker.
#[derive(Default)]
pub struct AvatarModel {
    selected: Option<AvatarFile>,
    /// Path currently being inspected on a worker.
    inspecting: Option<PathBuf>,
    thumbnail: Option<egui::TextureHandle>,
    thumbnail_failed: bool,
}

/// Messages emitted by the avatar view or returned by workers.
// Debug omitted because TextureHandle is not Debug.
pub enum AvatarMsg {
    RequestPick,
    Picked(Option<PathBuf>),
    Inspected {
        path: PathBuf,
        size: u64,
        mime: String,
    },
    InspectFailed {
        path: PathBuf,
        message: String,
    },
    ThumbnailReady {
        path: PathBuf,
        texture: egui::TextureHandle,
    },
    ThumbnailFailed {
        path: PathBuf,
    },
    Clear,
}

/// Side effects requested by the picker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AvatarCommand {
    PickFile,
    Inspect { path: PathBuf },
    LoadThumbnail { path: PathBuf },
}

/// Feedback for the status bar or error modal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AvatarEvent {
    pub message: String,
    pub is_error: bool,
}

impl AvatarModel {
    /// Currently selected avatar, if any.
    pub fn selected(&self) -> Option<&AvatarFile> {
        self.selected.as_ref()
    }

    pub fn is_inspecting(&self) -> bool {
        self.inspecting.is_some()
    }

    #[cfg(test)]
    pub fn select(&mut self, avatar: AvatarFile) {
        self.selected = Some(avatar);
    }
}

/// Apply a message to the avatar model. Returns a user-facing event when relevant.
pub fn update(
    model: &mut AvatarModel,
    msg: AvatarMsg,
    cmds: &mut Vec<AvatarCommand>,
) -> Option<AvatarEvent> {
    match msg {
        AvatarMsg::RequestPick => {
            cmds.push(AvatarCommand::PickFile);
            None
        }
        AvatarMsg::Picked(None) => Some(AvatarEvent {
            message: "Nenhum arquivo selecionado.".into(),
            is_error: false,
        }),
        AvatarMsg::Picked(Some(path)) => {
            model.inspecting = Some(path.clone());
            cmds.push(AvatarCommand::Inspect { path });
            None
        }
        AvatarMsg::Inspected { path, size, mime } => {
            // A newer pick supersedes this result.
            if model.inspecting.as_ref() != Some(&path) {
                return None;
            }
            model.inspecting = None;
            model.thumbnail = None;
            model.thumbnail_failed = false;
            if is_image(&path) {
                cmds.push(AvatarCommand::LoadThumbnail { path: path.clone() });
            }
            let avatar = AvatarFile::new(path, size, mime);
            let message = format!("Avatar selecionado: {} ({})", avatar.name, format_bytes(size));
            model.selected = Some(avatar);
            Some(AvatarEvent {
                message,
                is_error: false,
            })
        }
        AvatarMsg::InspectFailed { path, message } => {
            if model.inspecting.as_ref() == Some(&path) {
                model.inspecting = None;
            }
            Some(AvatarEvent {
                message: format!("Não foi possível ler {}: {message}", path.display()),
                is_error: true,
            })
        }
        AvatarMsg::ThumbnailReady { path, texture } => {
            if is_selected(model, &path) {
                model.thumbnail = Some(texture);
            }
            None
        }
        AvatarMsg::ThumbnailFailed { path } => {
            if is_selected(model, &path) {
                model.thumbnail_failed = true;
            }
            None
        }
        AvatarMsg::Clear => {
            *model = AvatarModel::default();
            Some(AvatarEvent {
                message: "Avatar removido.".into(),
                is_error: false,
            })
        }
    }
}

fn is_selected(model: &AvatarModel, path: &Path) -> bool {
    model.selected.as_ref().is_some_and(|a| a.path == path)
}

/// Render the picker and return any messages triggered by user interaction.
pub fn view(ui: &mut egui::Ui, model: &AvatarModel, enabled: bool) -> Vec<AvatarMsg> {
    let mut msgs = Vec::new();

    ui.horizontal(|ui| {
        let pick = egui::Button::new(format!("{} Escolher imagem", egui_phosphor::regular::IMAGE));
        if ui.add_enabled(enabled, pick).clicked() {
            msgs.push(AvatarMsg::RequestPick);
        }
        if model.is_inspecting() {
            ui.add(egui::Spinner::new().size(14.0));
        }
    });

    ui.add_space(6.0);

    let visuals = ui.visuals().clone();
    egui::Frame::new()
        .fill(visuals.panel_fill)
        .stroke(visuals.window_stroke())
        .inner_margin(8.0)
        .show(ui, |ui| match &model.selected {
            None => {
                ui.label(
                    egui::RichText::new("Nenhuma imagem selecionada")
                        .color(egui::Color32::from_gray(150)),
                );
            }
            Some(avatar) => {
                ui.horizontal(|ui| {
                    render_thumbnail(ui, model);
                    ui.vertical(|ui| {
                        ui.label(avatar.name.as_str());
                        ui.label(
                            egui::RichText::new(format!("{} | {}", avatar.mime, format_bytes(avatar.size)))
                                .small()
                                .color(egui::Color32::from_gray(90)),
                        );
                    });
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui
                            .add_enabled(
                                enabled,
                                egui::Button::new(egui_phosphor::regular::TRASH_SIMPLE),
                            )
                            .on_hover_text("Remover avatar")
                            .clicked()
                        {
                            msgs.push(AvatarMsg::Clear);
                        }
                    });
                });
            }
        });

    msgs
}

fn render_thumbnail(ui: &mut egui::Ui, model: &AvatarModel) {
    const MAX: f32 = 72.0;
    match &model.thumbnail {
        Some(texture) => {
            let size = texture.size_vec2();
            let scale = (MAX / size.x).min(MAX / size.y).min(1.0);
            ui.add(egui::Image::new((texture.id(), size * scale)));
        }
        None => {
            let (rect, _) = ui.allocate_exact_size(egui::vec2(MAX, MAX), egui::Sense::hover());
            let icon = if model.thumbnail_failed {
                egui_phosphor::regular::IMAGE_BROKEN
            } else {
                egui_phosphor::regular::USER_CIRCLE
            };
            ui.painter().text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                icon,
                egui::FontId::proportional(40.0),
                egui::Color32::from_gray(140),
            );
        }
    }
}

/// True when the extension is one we can decode for a preview.
pub(crate) fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

pub(crate) fn guess_mime(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

/// Read size and MIME type of a picked file.
pub(crate) fn inspect_file(path: &Path) -> std::io::Result<(u64, String)> {
    let meta = path.metadata()?;
    if !meta.is_file() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "não é um arquivo",
        ));
    }
    Ok((meta.len(), guess_mime(path)))
}

/// Human-readable formatting for byte sizes with binary units.
pub(crate) fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

/// Decode and shrink an image into a preview-sized `ColorImage`.
pub(crate) fn load_image_thumbnail(path: &Path) -> Result<egui::ColorImage, String> {
    const MAX: u32 = 256;

    let dyn_img = image::open(path).map_err(|e| e.to_string())?;
    let resized = dyn_img.thumbnail(MAX, MAX).to_rgba8();
    let size = [resized.width() as usize, resized.height() as usize];
    let pixels = resized.into_raw();
    Ok(egui::ColorImage::from_rgba_unmultiplied(size, &pixels))
}
