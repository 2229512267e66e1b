// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Submission handler: uploads the avatar of a validated record and renders the record.

use std::fs::File;
use std::io::Read;

use anyhow::Context;

use crate::error::{Error, Result};
use crate::logic::storage::{AvatarStorage, UploadRequest};
use crate::models::submission::{AvatarFile, SubmissionRecord};
use crate::models::validation::MAX_AVATAR_BYTES;

/// Outcome of a successful submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Submitted {
    /// Key the storage service stored the avatar under.
    pub object_key: String,
    /// The normalized record as pretty-printed JSON.
    pub rendered: String,
}

/// Render the record for display as indented JSON.
pub fn render_record(record: &SubmissionRecord) -> Result<String> {
    Ok(serde_json::to_string_pretty(record)?)
}

/// Upload the avatar of `record` and render it.
///
/// The object key is the avatar's original file name. Nothing is retried; a
/// name that was already uploaded comes back as [`Error::ObjectExists`].
///
/// The size limit is checked again on the bytes actually read, since the file
/// may have changed since it was picked.
pub fn submit(storage: &dyn AvatarStorage, record: &SubmissionRecord) -> Result<Submitted> {
    let avatar = &record.avatar;
    let bytes = read_avatar(avatar)?;

    let receipt = storage.upload(UploadRequest {
        key: avatar.name.clone(),
        content_type: avatar.mime.clone(),
        bytes,
    })?;
    tracing::info!(key = %receipt.key, "avatar stored");

    Ok(Submitted {
        object_key: receipt.key,
        rendered: render_record(record)?,
    })
}

/// Read at most one byte past the limit so an oversized file is never fully loaded.
fn read_avatar(avatar: &AvatarFile) -> Result<Vec<u8>> {
    let read_err = |source: std::io::Error| Error::AvatarRead {
        path: avatar.path.clone(),
        source,
    };
    let file = File::open(&avatar.path).map_err(read_err)?;
    let mut bytes = Vec::new();
    file.take(MAX_AVATAR_BYTES + 1)
        .read_to_end(&mut bytes)
        .map_err(read_err)?;

    if bytes.len() as u64 > MAX_AVATAR_BYTES {
        let size = std::fs::metadata(&avatar.path)
            .map(|meta| meta.len())
            .unwrap_or(bytes.len() as u64);
        tracing::warn!(path = %avatar.path.display(), size, "avatar grew past the limit");
        return Err(Error::AvatarTooLarge { size });
    }
    Ok(bytes)
}

/// Submit and flatten the error into a user-facing string for the UI.
pub fn submit_for_display(
    storage: &dyn AvatarStorage,
    record: &SubmissionRecord,
) -> std::result::Result<Submitted, String> {
    submit(storage, record)
        .with_context(|| format!("Falha ao enviar o avatar \"{}\"", record.avatar.name))
        .map_err(|err| {
            tracing::error!(error = %format!("{err:#}"), "submission failed");
            format!("{err:#}")
        })
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashSet;
    use std::fs;
    use std::path::Path;
    use std::sync::Mutex;

    use tempfile::TempDir;

    use super::*;
    use crate::logic::storage::UploadReceipt;
    use crate::models::submission::Tech;
    use crate::models::validation::{messages, validate_avatar};

    /// In-memory storage that refuses to overwrite, like the real bucket.
    #[derive(Default)]
    pub(crate) struct MemoryStorage {
        pub(crate) uploads: Mutex<Vec<UploadRequest>>,
        keys: Mutex<HashSet<String>>,
    }

    impl AvatarStorage for MemoryStorage {
        fn upload(&self, request: UploadRequest) -> Result<UploadReceipt> {
            let mut keys = self.keys.lock().unwrap();
            if !keys.insert(request.key.clone()) {
                return Err(Error::ObjectExists { key: request.key });
            }
            let key = format!("advanced-form/{}", request.key);
            self.uploads.lock().unwrap().push(request);
            Ok(UploadReceipt { key })
        }
    }

    pub(crate) fn record_with_avatar(path: &Path) -> SubmissionRecord {
        let size = fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        SubmissionRecord {
            avatar: AvatarFile::new(path.to_path_buf(), size, "image/png".into()),
            name: "João Silva".into(),
            email: "joao@gmail.com".into(),
            password: "secret1".into(),
            techs: vec![
                Tech {
                    title: "Rust".into(),
                    knowledge: 80.0,
                },
                Tech {
                    title: "Go".into(),
                    knowledge: 10.0,
                },
            ],
        }
    }

    #[test]
    fn submit_uploads_under_original_name_and_renders() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("me.png");
        fs::write(&path, b"png-bytes").unwrap();
        let storage = MemoryStorage::default();

        let submitted = submit(&storage, &record_with_avatar(&path)).expect("upload succeeds");

        assert_eq!(submitted.object_key, "advanced-form/me.png");
        let uploads = storage.uploads.lock().unwrap();
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].key, "me.png");
        assert_eq!(uploads[0].content_type, "image/png");
        assert_eq!(uploads[0].bytes, b"png-bytes");
        assert!(submitted.rendered.contains("\"name\": \"João Silva\""));
    }

    #[test]
    fn second_upload_of_same_name_fails() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("me.png");
        fs::write(&path, b"png-bytes").unwrap();
        let storage = MemoryStorage::default();
        let record = record_with_avatar(&path);

        submit(&storage, &record).unwrap();
        let err = submit(&storage, &record).unwrap_err();

        assert!(matches!(err, Error::ObjectExists { .. }));
    }

    #[test]
    fn unreadable_avatar_is_reported() {
        let tmp = TempDir::new().unwrap();
        let record = record_with_avatar(&tmp.path().join("missing.png"));

        let err = submit(&MemoryStorage::default(), &record).unwrap_err();

        assert!(matches!(err, Error::AvatarRead { .. }));
    }

    #[test]
    fn rendered_record_hides_avatar_path() {
        let record = record_with_avatar(Path::new("/somewhere/secret/me.png"));
        let rendered = render_record(&record).unwrap();

        assert!(rendered.contains("\"email\": \"joao@gmail.com\""));
        assert!(rendered.contains("\"knowledge\": 80.0"));
        assert!(!rendered.contains("/somewhere/secret"));
    }

    #[test]
    fn display_error_names_the_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("me.png");
        fs::write(&path, b"x").unwrap();
        let storage = MemoryStorage::default();
        let record = record_with_avatar(&path);
        submit(&storage, &record).unwrap();

        let message = submit_for_display(&storage, &record).unwrap_err();

        assert!(message.contains("me.png"));
        assert!(message.contains("já existe um arquivo chamado"));
    }

    #[test]
    fn avatar_grown_after_validation_is_not_uploaded() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("me.png");
        fs::write(&path, b"small").unwrap();
        let record = record_with_avatar(&path);
        assert!(validate_avatar(Some(&record.avatar)).is_ok());

        fs::write(&path, vec![0u8; (MAX_AVATAR_BYTES + 1) as usize]).unwrap();
        let storage = MemoryStorage::default();
        let err = submit(&storage, &record).unwrap_err();

        assert!(matches!(err, Error::AvatarTooLarge { size } if size == MAX_AVATAR_BYTES + 1));
        assert!(err.to_string().contains(messages::AVATAR_TOO_LARGE));
        assert!(storage.uploads.lock().unwrap().is_empty());
    }

    #[test]
    fn avatar_at_the_limit_is_uploaded() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("me.png");
        fs::write(&path, vec![0u8; MAX_AVATAR_BYTES as usize]).unwrap();
        let storage = MemoryStorage::default();

        submit(&storage, &record_with_avatar(&path)).expect("upload succeeds");

        let uploads = storage.uploads.lock().unwrap();
        assert_eq!(uploads[0].bytes.len() as u64, MAX_AVATAR_BYTES);
    }
}
