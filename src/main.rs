// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

mod app;
mod config;
mod error;
mod logging;
mod logic;
mod models;
mod mvu;
mod ui;

use anyhow::{Context, Result};

use crate::config::Config;

fn main() -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    logging::init_logging(config.log_level);
    tracing::debug!(?config, "configuration loaded");

    app::run(&config)
}
