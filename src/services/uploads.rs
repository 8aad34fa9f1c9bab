use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use thiserror::Error;
use time::OffsetDateTime;

use crate::core::config::Settings;

#[derive(Debug, Error)]
pub(crate) enum UploadPathError {
    #[error("filename escapes the uploads directory")]
    Traversal,
}

/// Filesystem-backed image store rooted at the configured uploads directory.
/// The directory is created at startup; stored names are collision-free by
/// construction (epoch millis + content hash prefix + sanitized name).
#[derive(Debug, Clone)]
pub(crate) struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    pub(crate) fn from_settings(settings: &Settings) -> Result<Self> {
        let root = PathBuf::from(&settings.storage().uploads_dir);
        std::fs::create_dir_all(&root)
            .with_context(|| format!("Failed to create uploads directory {}", root.display()))?;
        Ok(Self { root })
    }

    pub(crate) fn root(&self) -> &Path {
        &self.root
    }

    /// Builds the on-disk name for an upload.
    pub(crate) fn stored_name(original: &str, bytes: &[u8]) -> String {
        let epoch_ms = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
        let digest = Sha256::digest(bytes);
        let token = &hex::encode(digest)[..8];
        format!("{epoch_ms}_{token}_{}", sanitized_filename(original))
    }

    /// Maps a client-supplied filename to a path inside the store. Anything
    /// that is not a single plain path component is rejected before any
    /// filesystem access happens.
    pub(crate) fn resolve(&self, filename: &str) -> Result<PathBuf, UploadPathError> {
        if filename.is_empty() || filename.contains('\\') {
            return Err(UploadPathError::Traversal);
        }

        let mut components = Path::new(filename).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.root.join(filename)),
            _ => Err(UploadPathError::Traversal),
        }
    }

    pub(crate) async fn save(&self, filename: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
        let path = self.root.join(filename);
        tokio::fs::write(&path, bytes).await?;
        Ok(path)
    }

    pub(crate) async fn read(&self, path: &Path) -> std::io::Result<Vec<u8>> {
        tokio::fs::read(path).await
    }

    /// Removes a stored file; returns whether anything was deleted.
    pub(crate) async fn delete(&self, path: &Path) -> std::io::Result<bool> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err),
        }
    }

    pub(crate) async fn remove_if_exists(&self, path: &Path) {
        if let Err(err) = tokio::fs::remove_file(path).await {
            if err.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(error = %err, path = %path.display(), "Failed to clean up upload");
            }
        }
    }
}

fn sanitized_filename(original: &str) -> String {
    let name = Path::new(original)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("image");

    let cleaned: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect();

    if cleaned.trim_matches('.').is_empty() {
        "image".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> UploadStore {
        UploadStore { root: PathBuf::from("/srv/accinex/uploads") }
    }

    #[test]
    fn resolve_accepts_plain_filenames() {
        let store = store();
        let path = store.resolve("1700000000000_ab12cd34_crash.jpg").expect("plain name");
        assert_eq!(path, PathBuf::from("/srv/accinex/uploads/1700000000000_ab12cd34_crash.jpg"));
    }

    #[test]
    fn resolve_rejects_traversal_attempts() {
        let store = store();
        assert!(store.resolve("../../etc/passwd").is_err());
        assert!(store.resolve("..").is_err());
        assert!(store.resolve("nested/dir.png").is_err());
        assert!(store.resolve("/etc/passwd").is_err());
        assert!(store.resolve("").is_err());
        assert!(store.resolve("..\\secret.png").is_err());
    }

    #[test]
    fn stored_name_is_content_addressed_and_sanitized() {
        let name = UploadStore::stored_name("my crash photo!.jpg", b"bytes");
        let parts: Vec<&str> = name.splitn(3, '_').collect();
        assert_eq!(parts.len(), 3);
        assert!(parts[0].parse::<i128>().is_ok(), "epoch prefix: {name}");
        assert_eq!(parts[1].len(), 8);
        assert_eq!(parts[2], "my_crash_photo_.jpg");
    }

    #[test]
    fn stored_name_strips_any_client_path() {
        let name = UploadStore::stored_name("../../evil.png", b"bytes");
        assert!(name.ends_with("_evil.png"), "{name}");
        assert!(!name.contains('/'));
    }

    #[test]
    fn sanitized_filename_falls_back_for_empty_names() {
        assert_eq!(sanitized_filename(""), "image");
        assert_eq!(sanitized_filename("..."), "image");
    }

    #[tokio::test]
    async fn save_read_delete_roundtrip() {
        let root = std::env::temp_dir().join(format!("accinex-uploads-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&root).expect("create temp dir");
        let store = UploadStore { root: root.clone() };

        let path = store.save("roundtrip.jpg", b"jpeg-bytes").await.expect("save");
        let resolved = store.resolve("roundtrip.jpg").expect("resolve");
        assert_eq!(path, resolved);

        let bytes = store.read(&resolved).await.expect("read");
        assert_eq!(bytes, b"jpeg-bytes");

        assert!(store.delete(&resolved).await.expect("delete"));
        assert!(!store.delete(&resolved).await.expect("second delete"));

        std::fs::remove_dir_all(&root).ok();
    }
}
