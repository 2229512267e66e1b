// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Application entry point wiring configuration and egui/eframe together.

use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use eframe::egui;
use egui_phosphor::Variant;

use crate::config::Config;
use crate::logic::storage::{AvatarStorage, HttpStorage};
use crate::ui::AdvancedFormApp;

/// Build the storage client from `config` and run the main egui event loop.
pub fn run(config: &Config) -> Result<()> {
    let settings = config
        .storage_settings()
        .context("Storage is not configured")?;
    tracing::info!(bucket = %settings.bucket, url = %settings.base_url, "storage configured");
    let storage: Arc<dyn AvatarStorage> =
        Arc::new(HttpStorage::new(settings).context("Failed to build storage client")?);

    // Register Phosphor icon font.
    let mut fonts = egui::FontDefinitions::default();
    egui_phosphor::add_to_fonts(&mut fonts, Variant::Regular);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([720.0, 820.0])
            .with_min_inner_size([520.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Advanced Form",
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_fonts(fonts);
            Ok(Box::new(AdvancedFormApp::new(storage)))
        }),
    )
    .map_err(|err| anyhow!("UI event loop failed: {err}"))
}
