// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Root Model-View-Update kernel wiring form state, messages, and commands.

use std::path::PathBuf;

use crate::logic::storage::AvatarStorage;
use crate::logic::submission::{self, Submitted};
use crate::models::submission::{FormInput, SubmissionRecord};
use crate::models::validation::{ValidationErrors, validate_submission};
use crate::ui::components::avatar::{self, AvatarCommand, AvatarModel, AvatarMsg};
use crate::ui::components::techs::{self, TechsModel, TechsMsg};

/// Where the form is in its submit lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SubmitPhase {
    #[default]
    Editing,
    /// Upload in flight; further submits are ignored.
    Submitting,
    Submitted,
}

/// Top-level application state.
#[derive(Default)]
pub struct AppModel {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Avatar picker state.
    pub avatar: AvatarModel,
    /// Techs list state.
    pub techs: TechsModel,
    /// Field errors from the latest validation run.
    pub errors: ValidationErrors,
    /// Set by the first submit; from then on every edit re-validates.
    pub submit_attempted: bool,
    pub phase: SubmitPhase,
    /// Result of the last successful submission.
    pub output: Option<Submitted>,
    /// Latest status message to display.
    pub status: Option<String>,
    /// Latest error message to display in modal.
    pub error: Option<String>,
    /// Count of queued background commands.
    pub pending_commands: usize,
}

impl AppModel {
    /// Snapshot of the form as raw input for the validation ruleset.
    pub fn form_input(&self) -> FormInput {
        FormInput {
            avatar: self.avatar.selected().cloned(),
            name: self.name.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
            techs: self.techs.rows().to_vec(),
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == SubmitPhase::Submitting
    }
}

/// Application messages routed through the update function.
pub enum Msg {
    NameChanged(String),
    EmailChanged(String),
    PasswordChanged(String),
    Avatar(AvatarMsg),
    Techs(TechsMsg),
    ThumbnailDecoded {
        path: PathBuf,
        image: eframe::egui::ColorImage,
    },
    SubmitRequested,
    SubmitCompleted(Result<Submitted, String>),
    DismissError,
}

/// Commands represent side-effects executed between frames.
pub enum Command {
    PickAvatar,
    InspectAvatar { path: PathBuf },
    LoadThumbnail { path: PathBuf },
    Submit(SubmissionRecord),
}

/// Update the application model and enqueue commands.
pub fn update(model: &mut AppModel, msg: Msg, cmds: &mut Vec<Command>) {
    match msg {
        Msg::NameChanged(text) => {
            model.name = text;
            revalidate(model);
        }
        Msg::EmailChanged(text) => {
            model.email = text;
            revalidate(model);
        }
        Msg::PasswordChanged(text) => {
            model.password = text;
            revalidate(model);
        }
        Msg::Techs(m) => {
            techs::update(&mut model.techs, m);
            revalidate(model);
        }
        Msg::Avatar(m) => {
            let mut avatar_cmds = Vec::new();
            if let Some(event) = avatar::update(&mut model.avatar, m, &mut avatar_cmds) {
                surface_event(model, event.message, event.is_error);
            }
            for c in avatar_cmds {
                cmds.push(match c {
                    AvatarCommand::PickFile => Command::PickAvatar,
                    AvatarCommand::Inspect { path } => Command::InspectAvatar { path },
                    AvatarCommand::LoadThumbnail { path } => Command::LoadThumbnail { path },
                });
            }
            revalidate(model);
        }
        Msg::ThumbnailDecoded { path, image } => {
            // Texture upload needs the egui context, so ui/mod.rs turns this into
            // AvatarMsg::ThumbnailReady before it reaches here.
            let _ = (path, image);
        }
        Msg::SubmitRequested => request_submit(model, cmds),
        Msg::SubmitCompleted(result) => match result {
            Ok(submitted) => {
                model.phase = SubmitPhase::Submitted;
                let message = format!("Avatar enviado: {}", submitted.object_key);
                model.output = Some(submitted);
                surface_event(model, message, false);
            }
            Err(err) => {
                model.phase = SubmitPhase::Editing;
                surface_event(model, err, true);
            }
        },
        Msg::DismissError => model.error = None,
    }
}

/// Execute a command and return the resulting message.
///
/// Runs on a worker thread; `storage` is shared by all workers.
pub fn run_command(cmd: Command, storage: &dyn AvatarStorage) -> Msg {
    match cmd {
        Command::PickAvatar => {
            let file = rfd::FileDialog::new()
                .set_title("Escolha seu avatar")
                .add_filter("Imagens", &avatar::IMAGE_EXTENSIONS)
                .pick_file();
            Msg::Avatar(AvatarMsg::Picked(file))
        }
        Command::InspectAvatar { path } => match avatar::inspect_file(&path) {
            Ok((size, mime)) => Msg::Avatar(AvatarMsg::Inspected { path, size, mime }),
            Err(err) => Msg::Avatar(AvatarMsg::InspectFailed {
                path,
                message: err.to_string(),
            }),
        },
        Command::LoadThumbnail { path } => match avatar::load_image_thumbnail(&path) {
            Ok(image) => Msg::ThumbnailDecoded { path, image },
            Err(err) => {
                tracing::debug!(path = %path.display(), %err, "thumbnail decode failed");
                Msg::Avatar(AvatarMsg::ThumbnailFailed { path })
            }
        },
        Command::Submit(record) => {
            Msg::SubmitCompleted(submission::submit_for_display(storage, &record))
        }
    }
}

/// Validate the form and, when it passes, hand the record to the upload worker.
fn request_submit(model: &mut AppModel, cmds: &mut Vec<Command>) {
    if model.is_submitting() {
        tracing::debug!("submit ignored: upload already in flight");
        return;
    }

    model.submit_attempted = true;
    match validate_submission(&model.form_input()) {
        Ok(record) => {
            model.errors = ValidationErrors::default();
            model.phase = SubmitPhase::Submitting;
            model.output = None;
            tracing::info!(avatar = %record.avatar.name, techs = record.techs.len(), "submitting form");
            cmds.push(Command::Submit(record));
            surface_event(model, "Enviando avatar…".to_string(), false);
        }
        Err(errors) => {
            let fields: Vec<String> = errors.iter().map(|(k, _)| k.to_string()).collect();
            tracing::debug!(count = errors.len(), fields = %fields.join(", "), "submit blocked by validation");
            let status = match errors.first_message() {
                Some(first) if errors.len() == 1 => format!("Corrija o campo destacado: {first}"),
                _ => format!("Corrija os {} campos destacados.", errors.len()),
            };
            model.errors = errors;
            surface_event(model, status, false);
        }
    }
}

/// Re-run validation after edits once the user has tried to submit.
fn revalidate(model: &mut AppModel) {
    if !model.submit_attempted {
        return;
    }
    model.errors = match validate_submission(&model.form_input()) {
        Ok(_) => ValidationErrors::default(),
        Err(errors) => errors,
    };
}

/// Update status/error fields consistently for user feedback.
fn surface_event(model: &mut AppModel, message: String, is_error: bool) {
    if is_error {
        model.error = Some(message.clone());
    }
    model.status = Some(message);
}

#[cfg(test)]
mod tests {
    #![allow(clippy::field_reassign_with_default)]

    use std::fs;
    use std::path::Path;

    use tempfile::TempDir;

    use super::*;
    use crate::logic::submission::tests::MemoryStorage;
    use crate::models::submission::AvatarFile;
    use crate::models::validation::{FieldKey, messages};

    fn fill_valid_form(model: &mut AppModel, avatar_path: &Path) {
        let size = fs::metadata(avatar_path).map(|m| m.len()).unwrap_or(0);
        model
            .avatar
            .select(AvatarFile::new(avatar_path.to_path_buf(), size, "image/png".into()));

        let mut cmds = Vec::new();
        update(model, Msg::NameChanged("joão silva".into()), &mut cmds);
        update(model, Msg::EmailChanged("Joao@Gmail.com".into()), &mut cmds);
        update(model, Msg::PasswordChanged("secret1".into()), &mut cmds);
        for (index, (title, knowledge)) in [("Rust", "90"), ("Go", "20")].into_iter().enumerate() {
            update(model, Msg::Techs(TechsMsg::Add), &mut cmds);
            update(
                model,
                Msg::Techs(TechsMsg::TitleChanged {
                    index,
                    value: title.into(),
                }),
                &mut cmds,
            );
            update(
                model,
                Msg::Techs(TechsMsg::KnowledgeChanged {
                    index,
                    value: knowledge.into(),
                }),
                &mut cmds,
            );
        }
        assert!(cmds.is_empty(), "form edits should not enqueue commands");
    }

    fn avatar_file(tmp: &TempDir) -> std::path::PathBuf {
        let path = tmp.path().join("me.png");
        fs::write(&path, b"png-bytes").unwrap();
        path
    }

    #[test]
    fn valid_submit_uploads_and_renders() {
        let tmp = TempDir::new().unwrap();
        let mut model = AppModel::default();
        fill_valid_form(&mut model, &avatar_file(&tmp));
        let storage = MemoryStorage::default();

        let mut cmds = Vec::new();
        update(&mut model, Msg::SubmitRequested, &mut cmds);
        assert_eq!(cmds.len(), 1, "submit should enqueue upload");
        assert_eq!(model.phase, SubmitPhase::Submitting);

        let msg = run_command(cmds.pop().unwrap(), &storage);
        update(&mut model, msg, &mut cmds);

        assert_eq!(model.phase, SubmitPhase::Submitted);
        assert!(model.error.is_none());
        let output = model.output.as_ref().expect("rendered output");
        assert!(output.rendered.contains("\"name\": \"João Silva\""));
        assert!(output.rendered.contains("\"email\": \"joao@gmail.com\""));
        assert_eq!(
            model.status.as_deref(),
            Some("Avatar enviado: advanced-form/me.png")
        );
    }

    #[test]
    fn second_submit_while_uploading_is_ignored() {
        let tmp = TempDir::new().unwrap();
        let mut model = AppModel::default();
        fill_valid_form(&mut model, &avatar_file(&tmp));

        let mut cmds = Vec::new();
        update(&mut model, Msg::SubmitRequested, &mut cmds);
        update(&mut model, Msg::SubmitRequested, &mut cmds);

        assert_eq!(cmds.len(), 1);
    }

    #[test]
    fn invalid_submit_sets_field_errors() {
        let mut model = AppModel::default();
        let mut cmds = Vec::new();

        update(&mut model, Msg::SubmitRequested, &mut cmds);

        assert!(cmds.is_empty());
        assert_eq!(model.phase, SubmitPhase::Editing);
        assert_eq!(model.errors.get(FieldKey::Name), Some(messages::NAME_REQUIRED));
        assert_eq!(model.errors.get(FieldKey::Techs), Some(messages::TECHS_TOO_FEW));
        assert!(model.error.is_none(), "field errors are not modal");
    }

    #[test]
    fn edits_before_first_submit_do_not_validate() {
        let mut model = AppModel::default();
        update(&mut model, Msg::EmailChanged("foo@yahoo.com".into()), &mut Vec::new());

        assert!(model.errors.is_empty());
    }

    #[test]
    fn edits_after_failed_submit_revalidate() {
        let mut model = AppModel::default();
        let mut cmds = Vec::new();
        update(&mut model, Msg::SubmitRequested, &mut cmds);
        assert!(model.errors.get(FieldKey::Email).is_some());

        update(&mut model, Msg::EmailChanged("foo@gmail.com".into()), &mut cmds);
        assert!(model.errors.get(FieldKey::Email).is_none());

        update(&mut model, Msg::EmailChanged("foo@yahoo.com".into()), &mut cmds);
        assert_eq!(model.errors.get(FieldKey::Email), Some(messages::EMAIL_DOMAIN));
    }

    #[test]
    fn duplicate_upload_is_surfaced() {
        let tmp = TempDir::new().unwrap();
        let mut model = AppModel::default();
        fill_valid_form(&mut model, &avatar_file(&tmp));
        let storage = MemoryStorage::default();

        for _ in 0..2 {
            let mut cmds = Vec::new();
            update(&mut model, Msg::SubmitRequested, &mut cmds);
            let msg = run_command(cmds.pop().expect("submit command"), &storage);
            update(&mut model, msg, &mut cmds);
        }

        assert_eq!(model.phase, SubmitPhase::Editing);
        assert!(model.output.is_none());
        let error = model.error.as_deref().expect("error modal");
        assert!(error.contains("já existe um arquivo chamado"));
    }

    #[test]
    fn avatar_pick_request_becomes_command() {
        let mut model = AppModel::default();
        let mut cmds = Vec::new();

        update(&mut model, Msg::Avatar(AvatarMsg::RequestPick), &mut cmds);

        assert!(matches!(cmds.as_slice(), [Command::PickAvatar]));
    }

    #[test]
    fn inspect_command_reports_file_metadata() {
        let tmp = TempDir::new().unwrap();
        let path = avatar_file(&tmp);

        let msg = run_command(
            Command::InspectAvatar { path: path.clone() },
            &MemoryStorage::default(),
        );

        match msg {
            Msg::Avatar(AvatarMsg::Inspected { path: p, size, mime }) => {
                assert_eq!(p, path);
                assert_eq!(size, 9);
                assert_eq!(mime, "image/png");
            }
            _ => panic!("unexpected message"),
        }
    }

    #[test]
    fn dismiss_error_clears_modal() {
        let mut model = AppModel::default();
        model.error = Some("boom".into());

        update(&mut model, Msg::DismissError, &mut Vec::new());

        assert!(model.error.is_none());
    }
}
