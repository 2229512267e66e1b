// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Error types for configuration loading and avatar upload.

use std::path::PathBuf;

use thiserror::Error;

use crate::models::validation::messages;

/// Errors raised outside of form validation.
///
/// Validation problems are not errors in this sense; they travel as
/// [`crate::models::validation::ValidationErrors`].
#[derive(Error, Debug)]
pub enum Error {
    // === Configuration ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration was loaded but is unusable.
    #[error("invalid configuration: {message}")]
    ConfigValidation { message: String },

    /// A required setting, such as the storage access key, is not set.
    #[error("missing required setting `{setting}` (set {env})")]
    MissingSetting {
        setting: &'static str,
        env: &'static str,
    },

    // === Upload ===
    // User-facing: shown in the error modal.
    /// The avatar could not be read from disk.
    #[error("não foi possível ler o avatar {path}: {source}")]
    AvatarRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The avatar on disk outgrew the size limit after it was picked.
    #[error("{} (o arquivo tem {size} bytes)", messages::AVATAR_TOO_LARGE)]
    AvatarTooLarge { size: u64 },

    /// An object with the same key already exists and overwriting is disabled.
    #[error("já existe um arquivo chamado \"{key}\" no armazenamento")]
    ObjectExists { key: String },

    /// The storage service answered with a non-success status.
    #[error("o armazenamento recusou o envio ({status}): {message}")]
    UploadRejected { status: u16, message: String },

    /// Transport-level failure talking to the storage service.
    #[error("falha na comunicação com o armazenamento: {0}")]
    Http(#[from] reqwest::Error),

    /// The rendered record could not be serialized.
    #[error("falha ao gerar o registro: {0}")]
    Render(#[from] serde_json::Error),
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;
