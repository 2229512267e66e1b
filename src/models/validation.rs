// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Validation ruleset turning raw form input into a [`SubmissionRecord`].
//!
//! Each field has its own validator returning either the normalized value or a
//! user-facing message. [`validate_submission`] runs all of them and collects
//! every field error instead of stopping at the first one. Within a single
//! field the first failing rule wins.

use std::collections::BTreeMap;
use std::fmt;

use email_address::EmailAddress;

use crate::models::submission::{AvatarFile, FormInput, SubmissionRecord, Tech, TechInput};

/// Largest accepted avatar, in bytes.
pub const MAX_AVATAR_BYTES: u64 = 5 * 1024 * 1024;
/// Only addresses on this domain are accepted.
pub const REQUIRED_EMAIL_SUFFIX: &str = "@gmail.com";
pub const MIN_PASSWORD_CHARS: usize = 6;
pub const MIN_TECHS: usize = 2;
pub const KNOWLEDGE_MIN: f64 = 1.0;
pub const KNOWLEDGE_MAX: f64 = 100.0;
/// At least one tech must score strictly above this.
pub const EXPERT_THRESHOLD: f64 = 50.0;

/// User-facing validation messages.
pub mod messages {
    pub const AVATAR_REQUIRED: &str = "Selecione uma imagem de avatar";
    pub const AVATAR_TOO_LARGE: &str = "O arquivo só pode ter no máximo 5MB";
    pub const NAME_REQUIRED: &str = "O nome é obrigatório";
    pub const EMAIL_REQUIRED: &str = "O email é obrigatório";
    pub const EMAIL_INVALID: &str = "Formato de e-mail inválido";
    pub const EMAIL_DOMAIN: &str = "Apenas e-mails @gmail.com";
    pub const PASSWORD_TOO_SHORT: &str = "A senha precisa de no mínimo 6 caracteres";
    pub const TECH_TITLE_REQUIRED: &str = "O título é obrigatório";
    pub const KNOWLEDGE_NOT_A_NUMBER: &str = "O conhecimento precisa ser um número";
    pub const KNOWLEDGE_TOO_LOW: &str = "O conhecimento mínimo é 1";
    pub const KNOWLEDGE_TOO_HIGH: &str = "O conhecimento máximo é 100";
    pub const TECHS_TOO_FEW: &str = "Insira pelo menos 2 tecnologias";
    pub const TECHS_NEWBIE: &str = "Vocé ainda é newbie em tech";
}

/// Identifies the form field an error message belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldKey {
    Avatar,
    Name,
    Email,
    Password,
    /// The techs list as a whole (length and expertise rules).
    Techs,
    TechTitle(usize),
    TechKnowledge(usize),
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Avatar => f.write_str("avatar"),
            Self::Name => f.write_str("name"),
            Self::Email => f.write_str("email"),
            Self::Password => f.write_str("password"),
            Self::Techs => f.write_str("techs"),
            Self::TechTitle(i) => write!(f, "techs.{i}.title"),
            Self::TechKnowledge(i) => write!(f, "techs.{i}.knowledge"),
        }
    }
}

/// Field-scoped error messages, ordered by field.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<FieldKey, String>,
}

impl ValidationErrors {
    /// Record a message for `key`. An earlier message for the same key is kept.
    pub fn insert(&mut self, key: FieldKey, message: impl Into<String>) {
        self.fields.entry(key).or_insert_with(|| message.into());
    }

    pub fn get(&self, key: FieldKey) -> Option<&str> {
        self.fields.get(&key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldKey, &str)> {
        self.fields.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Message of the first field in form order, if any.
    pub fn first_message(&self) -> Option<&str> {
        self.fields.values().next().map(String::as_str)
    }

    /// Store the outcome of one field validator, returning the value on success.
    fn collect<T>(&mut self, key: FieldKey, result: Result<T, String>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(message) => {
                self.insert(key, message);
                None
            }
        }
    }
}

/// Require an avatar no larger than [`MAX_AVATAR_BYTES`].
pub fn validate_avatar(avatar: Option<&AvatarFile>) -> Result<AvatarFile, String> {
    let avatar = avatar.ok_or_else(|| messages::AVATAR_REQUIRED.to_string())?;
    if avatar.size > MAX_AVATAR_BYTES {
        return Err(messages::AVATAR_TOO_LARGE.into());
    }
    Ok(avatar.clone())
}

/// Title-case a name: trim, lower-case, then capitalize every space-separated word.
///
/// Runs of spaces inside the name are kept as they are.
pub fn normalize_name(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .split(' ')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn validate_name(raw: &str) -> Result<String, String> {
    if raw.trim().is_empty() {
        return Err(messages::NAME_REQUIRED.into());
    }
    Ok(normalize_name(raw))
}

/// Check syntax, lower-case, then enforce [`REQUIRED_EMAIL_SUFFIX`].
pub fn validate_email(raw: &str) -> Result<String, String> {
    if raw.is_empty() {
        return Err(messages::EMAIL_REQUIRED.into());
    }

    // Display-name forms like `Foo <foo@gmail.com>` parse but are not plain addresses.
    let parsed = raw
        .parse::<EmailAddress>()
        .map_err(|_| messages::EMAIL_INVALID.to_string())?;
    if parsed.email() != raw {
        return Err(messages::EMAIL_INVALID.into());
    }

    let email = raw.to_lowercase();
    if !email.ends_with(REQUIRED_EMAIL_SUFFIX) {
        return Err(messages::EMAIL_DOMAIN.into());
    }
    Ok(email)
}

pub fn validate_password(raw: &str) -> Result<String, String> {
    if raw.chars().count() < MIN_PASSWORD_CHARS {
        return Err(messages::PASSWORD_TOO_SHORT.into());
    }
    Ok(raw.to_string())
}

/// Coerce knowledge text into a score within `[1, 100]`.
///
/// Surrounding whitespace is ignored and blank input counts as `0`, which then
/// fails the lower bound.
pub fn coerce_knowledge(raw: &str) -> Result<f64, String> {
    let trimmed = raw.trim();
    let value = if trimmed.is_empty() {
        0.0
    } else {
        trimmed
            .parse::<f64>()
            .map_err(|_| messages::KNOWLEDGE_NOT_A_NUMBER.to_string())?
    };

    if value.is_nan() {
        return Err(messages::KNOWLEDGE_NOT_A_NUMBER.into());
    }
    if value < KNOWLEDGE_MIN {
        return Err(messages::KNOWLEDGE_TOO_LOW.into());
    }
    if value > KNOWLEDGE_MAX {
        return Err(messages::KNOWLEDGE_TOO_HIGH.into());
    }
    Ok(value)
}

/// Validate every tech row plus the list-level rules.
///
/// Row errors go under [`FieldKey::TechTitle`]/[`FieldKey::TechKnowledge`],
/// list errors under [`FieldKey::Techs`]. Returns the techs only when nothing failed.
pub fn validate_techs(rows: &[TechInput], errors: &mut ValidationErrors) -> Option<Vec<Tech>> {
    let mut techs = Vec::with_capacity(rows.len());
    let mut rows_ok = true;
    let mut has_expert = false;

    for (index, row) in rows.iter().enumerate() {
        let title = if row.title.trim().is_empty() {
            errors.insert(FieldKey::TechTitle(index), messages::TECH_TITLE_REQUIRED);
            None
        } else {
            Some(row.title.clone())
        };
        let knowledge = errors.collect(
            FieldKey::TechKnowledge(index),
            coerce_knowledge(&row.knowledge),
        );

        if let Some(k) = knowledge {
            has_expert |= k > EXPERT_THRESHOLD;
        }

        match (title, knowledge) {
            (Some(title), Some(knowledge)) => techs.push(Tech { title, knowledge }),
            _ => rows_ok = false,
        }
    }

    let list_ok = if rows.len() < MIN_TECHS {
        errors.insert(FieldKey::Techs, messages::TECHS_TOO_FEW);
        false
    } else if !has_expert {
        errors.insert(FieldKey::Techs, messages::TECHS_NEWBIE);
        false
    } else {
        true
    };

    (rows_ok && list_ok).then_some(techs)
}

/// Run the full ruleset over `input`.
///
/// Every field is checked, so the error map describes all problems at once.
pub fn validate_submission(input: &FormInput) -> Result<SubmissionRecord, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let avatar = errors.collect(FieldKey::Avatar, validate_avatar(input.avatar.as_ref()));
    let name = errors.collect(FieldKey::Name, validate_name(&input.name));
    let email = errors.collect(FieldKey::Email, validate_email(&input.email));
    let password = errors.collect(FieldKey::Password, validate_password(&input.password));
    let techs = validate_techs(&input.techs, &mut errors);

    match (avatar, name, email, password, techs) {
        (Some(avatar), Some(name), Some(email), Some(password), Some(techs))
            if errors.is_empty() =>
        {
            Ok(SubmissionRecord {
                avatar,
                name,
                email,
                password,
                techs,
            })
        }
        _ => Err(errors),
    }
}
