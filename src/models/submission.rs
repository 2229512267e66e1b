// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Submission data types: raw form input and the normalized record it validates into.

use std::path::PathBuf;

use serde::Serialize;

/// Avatar file chosen by the user, inspected but not yet read into memory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AvatarFile {
    /// Location on disk; read again at upload time.
    #[serde(skip)]
    pub path: PathBuf,
    /// Original file name, used verbatim as the storage object key.
    pub name: String,
    /// Size in bytes as reported by the filesystem.
    pub size: u64,
    /// Detected MIME type.
    pub mime: String,
}

impl AvatarFile {
    pub fn new(path: PathBuf, size: u64, mime: String) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "avatar".to_string());
        Self {
            path,
            name,
            size,
            mime,
        }
    }
}

/// One row of the techs list as typed by the user.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TechInput {
    pub title: String,
    /// Knowledge score as text; coerced to a number during validation.
    pub knowledge: String,
}

impl TechInput {
    pub fn new(title: impl Into<String>, knowledge: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            knowledge: knowledge.into(),
        }
    }
}

/// Everything the form holds at submit time, unvalidated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormInput {
    pub avatar: Option<AvatarFile>,
    pub name: String,
    pub email: String,
    pub password: String,
    pub techs: Vec<TechInput>,
}

/// Validated technology entry.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Tech {
    pub title: String,
    pub knowledge: f64,
}

/// Normalized record produced by the validation ruleset.
///
/// Immutable once built; it only lives long enough to be uploaded and rendered.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SubmissionRecord {
    pub avatar: AvatarFile,
    pub name: String,
    pub email: String,
    pub password: String,
    pub techs: Vec<Tech>,
}
