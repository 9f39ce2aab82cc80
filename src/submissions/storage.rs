use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::io::AsyncWriteExt;
use tracing::debug;
use uuid::Uuid;

use crate::config::StorageConfig;
use crate::submissions::SubmissionError;
use crate::validation::{is_allowed_proof_type, proof_type_extension, MAX_PROOF_SIZE};

/// Route prefix under which stored proofs are served
pub const UPLOADS_ROUTE: &str = "/uploads";

/// Keys tried before giving up when a user's uploads collide on the same millisecond
const MAX_KEY_ATTEMPTS: i64 = 16;

/// Uploaded payment proof, as read from the form
#[derive(Debug, Clone)]
pub struct ProofUpload {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl ProofUpload {
    /// Enforce size and content-type limits
    pub fn check(&self) -> Result<(), SubmissionError> {
        if self.data.is_empty() {
            return Err(SubmissionError::MissingProof);
        }
        if self.data.len() > MAX_PROOF_SIZE {
            return Err(SubmissionError::FileTooLarge {
                max_mb: MAX_PROOF_SIZE / (1024 * 1024),
            });
        }
        if !is_allowed_proof_type(&self.content_type) {
            return Err(SubmissionError::UnsupportedFileType(self.content_type.clone()));
        }
        Ok(())
    }
}

/// Where a proof ended up
#[derive(Debug, Clone, PartialEq)]
pub struct StoredProof {
    pub key: String,
    pub url: String,
}

/// File extension for a proof, taken from its accepted content type only
pub fn proof_extension(content_type: &str) -> Result<&'static str, SubmissionError> {
    proof_type_extension(content_type)
        .ok_or_else(|| SubmissionError::UnsupportedFileType(content_type.to_string()))
}

/// Storage key `{user_id}/{unix_millis}.{ext}`
pub fn proof_key(user_id: Uuid, unix_millis: i64, extension: &str) -> String {
    format!("{}/{}.{}", user_id, unix_millis, extension)
}

/// Local-disk store for payment proofs
#[derive(Debug, Clone)]
pub struct ProofStorage {
    root: PathBuf,
    public_base_url: String,
}

impl ProofStorage {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(config.upload_dir.clone(), config.public_base_url.clone())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn public_url(&self, key: &str) -> String {
        format!("{}{}/{}", self.public_base_url, UPLOADS_ROUTE, key)
    }

    /// Write a proof to disk and return its key and public URL
    pub async fn store(
        &self,
        user_id: Uuid,
        upload: &ProofUpload,
    ) -> Result<StoredProof, SubmissionError> {
        self.store_at(user_id, upload, Utc::now().timestamp_millis())
            .await
    }

    /// Existing files are never overwritten; a taken key moves on to the next millisecond
    async fn store_at(
        &self,
        user_id: Uuid,
        upload: &ProofUpload,
        unix_millis: i64,
    ) -> Result<StoredProof, SubmissionError> {
        upload.check()?;
        let extension = proof_extension(&upload.content_type)?;

        tokio::fs::create_dir_all(self.root.join(user_id.to_string()))
            .await
            .map_err(|e| SubmissionError::Storage(e.to_string()))?;

        for offset in 0..MAX_KEY_ATTEMPTS {
            let key = proof_key(user_id, unix_millis + offset, extension);
            let path = self.root.join(&key);

            let mut file = match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    debug!(key = %key, "Proof key taken, trying the next one");
                    continue;
                }
                Err(e) => return Err(SubmissionError::Storage(e.to_string())),
            };

            let written = match file.write_all(&upload.data).await {
                Ok(()) => file.flush().await,
                Err(e) => Err(e),
            };
            drop(file);
            if let Err(e) = written {
                self.remove(&key).await;
                return Err(SubmissionError::Storage(e.to_string()));
            }

            debug!(
                key = %key,
                file_name = %upload.file_name,
                bytes = upload.data.len(),
                "Stored payment proof"
            );
            return Ok(StoredProof {
                url: self.public_url(&key),
                key,
            });
        }

        Err(SubmissionError::Storage(format!(
            "no free proof key for user {} after {} attempts",
            user_id, MAX_KEY_ATTEMPTS
        )))
    }

    /// Best-effort removal of a stored proof
    pub async fn remove(&self, key: &str) {
        if let Err(e) = tokio::fs::remove_file(self.root.join(key)).await {
            debug!(key = %key, "Could not remove payment proof: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(name: &str, content_type: &str, size: usize) -> ProofUpload {
        ProofUpload {
            file_name: name.to_string(),
            content_type: content_type.to_string(),
            data: vec![7u8; size],
        }
    }

    #[test]
    fn test_extension_comes_from_content_type() {
        assert_eq!(proof_extension("image/png").unwrap(), "png");
        assert_eq!(proof_extension("image/jpeg").unwrap(), "jpg");
        assert_eq!(proof_extension("application/pdf").unwrap(), "pdf");
        assert!(matches!(
            proof_extension("image/svg+xml"),
            Err(SubmissionError::UnsupportedFileType(_))
        ));
    }

    #[test]
    fn test_key_layout() {
        let user_id = Uuid::nil();
        assert_eq!(
            proof_key(user_id, 1_717_000_000_000, "png"),
            "00000000-0000-0000-0000-000000000000/1717000000000.png"
        );
    }

    #[test]
    fn test_public_url() {
        let storage = ProofStorage::new("/tmp/uploads", "https://portal.example.com/");
        assert_eq!(
            storage.public_url("u/1.png"),
            "https://portal.example.com/uploads/u/1.png"
        );
    }

    #[test]
    fn test_upload_limits() {
        assert!(upload("a.png", "image/png", 10).check().is_ok());
        assert!(matches!(
            upload("a.png", "image/png", 0).check(),
            Err(SubmissionError::MissingProof)
        ));
        assert!(matches!(
            upload("a.png", "image/png", MAX_PROOF_SIZE + 1).check(),
            Err(SubmissionError::FileTooLarge { max_mb: 20 })
        ));
        assert!(matches!(
            upload("a.exe", "application/x-msdownload", 10).check(),
            Err(SubmissionError::UnsupportedFileType(_))
        ));
        assert!(matches!(
            upload("logo.svg", "image/svg+xml", 10).check(),
            Err(SubmissionError::UnsupportedFileType(_))
        ));
    }

    fn temp_storage() -> (PathBuf, ProofStorage) {
        let root = std::env::temp_dir().join(format!("nysc-proofs-{}", Uuid::new_v4()));
        let storage = ProofStorage::new(&root, "http://localhost:8080");
        (root, storage)
    }

    #[tokio::test]
    async fn test_client_file_name_never_sets_extension() {
        let (root, storage) = temp_storage();

        let stored = storage
            .store(Uuid::new_v4(), &upload("receipt.html", "image/png", 16))
            .await
            .unwrap();

        assert!(stored.key.ends_with(".png"), "{}", stored.key);
        assert!(!stored.url.contains(".html"));
        let _ = tokio::fs::remove_dir_all(&root).await;
    }

    #[tokio::test]
    async fn test_svg_upload_is_not_written() {
        let (root, storage) = temp_storage();
        let user_id = Uuid::new_v4();

        let result = storage
            .store(user_id, &upload("receipt.png", "image/svg+xml", 16))
            .await;

        assert!(matches!(result, Err(SubmissionError::UnsupportedFileType(_))));
        assert!(!root.join(user_id.to_string()).exists());
        let _ = tokio::fs::remove_dir_all(&root).await;
    }

    #[tokio::test]
    async fn test_same_millisecond_uploads_get_distinct_keys() {
        let (root, storage) = temp_storage();
        let user_id = Uuid::new_v4();
        let millis = 1_717_000_000_000;

        let first = storage
            .store_at(user_id, &upload("a.png", "image/png", 8), millis)
            .await
            .unwrap();
        let second = storage
            .store_at(user_id, &upload("b.png", "image/png", 12), millis)
            .await
            .unwrap();

        assert_eq!(first.key, proof_key(user_id, millis, "png"));
        assert_eq!(second.key, proof_key(user_id, millis + 1, "png"));
        assert_eq!(tokio::fs::read(root.join(&first.key)).await.unwrap().len(), 8);
        assert_eq!(tokio::fs::read(root.join(&second.key)).await.unwrap().len(), 12);
        let _ = tokio::fs::remove_dir_all(&root).await;
    }

    #[tokio::test]
    async fn test_store_writes_file_under_user_dir() {
        let root = std::env::temp_dir().join(format!("nysc-proofs-{}", Uuid::new_v4()));
        let storage = ProofStorage::new(&root, "http://localhost:8080");
        let user_id = Uuid::new_v4();

        let stored = storage
            .store(user_id, &upload("receipt.pdf", "application/pdf", 32))
            .await
            .unwrap();

        assert!(stored.key.starts_with(&format!("{}/", user_id)));
        assert!(stored.key.ends_with(".pdf"));
        assert!(stored.url.ends_with(&stored.key));
        let written = tokio::fs::read(root.join(&stored.key)).await.unwrap();
        assert_eq!(written.len(), 32);

        storage.remove(&stored.key).await;
        assert!(!root.join(&stored.key).exists());
        let _ = tokio::fs::remove_dir_all(&root).await;
    }
}
