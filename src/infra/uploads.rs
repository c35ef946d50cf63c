//! Filesystem storage for admin uploads (banner art, help screenshots).
//!
//! Files land under `<root>/<yyyy>/<mm>/<dd>/<uuid>-<slug>.<ext>` and are
//! addressed by that relative path afterwards.

use std::error::Error as StdError;
use std::path::{Component, Path, PathBuf};

use bytes::Bytes;
use futures::{Stream, StreamExt, pin_mut, stream};
use sha2::{Digest, Sha256};
use slug::slugify;
use thiserror::Error;
use tokio::{fs, io::AsyncWriteExt};
use tracing::warn;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum UploadStorageError {
    #[error("invalid stored path")]
    InvalidPath,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("uploaded file exceeds the request size limit")]
    PayloadTooLarge {
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
    #[error("reading the uploaded file failed")]
    PayloadStream {
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
    #[error("uploaded file is empty")]
    EmptyPayload,
    #[error("uploaded file is too large to account for")]
    SizeOverflow,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUpload {
    pub stored_path: String,
    pub checksum: String,
    pub size_bytes: i64,
}

#[derive(Debug)]
pub struct UploadStorage {
    root: PathBuf,
    public_prefix: String,
}

impl UploadStorage {
    /// Open storage at `root`, creating the directory when missing.
    pub fn new(root: PathBuf, public_prefix: &str) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            public_prefix: public_prefix.trim_end_matches('/').to_string(),
        })
    }

    pub fn public_prefix(&self) -> &str {
        &self.public_prefix
    }

    /// URL under which a stored file is served, e.g. `/uploads/2025/06/01/…`.
    pub fn public_url(&self, stored_path: &str) -> String {
        format!("{}/{}", self.public_prefix, stored_path)
    }

    /// Write the chunks to disk while hashing them. A failed or empty upload
    /// leaves no file behind.
    pub async fn store_stream<S>(
        &self,
        original_name: &str,
        chunks: S,
    ) -> Result<StoredUpload, UploadStorageError>
    where
        S: Stream<Item = Result<Bytes, UploadStorageError>>,
    {
        let stored_path = stored_path_for(original_name);
        let target = self.resolve(&stored_path)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }

        let file = fs::File::create(&target).await?;
        let written = match write_chunks(file, chunks).await {
            Ok((_, 0)) => Err(UploadStorageError::EmptyPayload),
            Ok((checksum, written)) => i64::try_from(written)
                .map(|size_bytes| (checksum, size_bytes))
                .map_err(|_| UploadStorageError::SizeOverflow),
            Err(err) => Err(err),
        };

        match written {
            Ok((checksum, size_bytes)) => Ok(StoredUpload {
                stored_path,
                checksum,
                size_bytes,
            }),
            Err(err) => {
                discard(&target).await;
                Err(err)
            }
        }
    }

    pub async fn store(
        &self,
        original_name: &str,
        data: Bytes,
    ) -> Result<StoredUpload, UploadStorageError> {
        self.store_stream(original_name, stream::iter([Ok(data)]))
            .await
    }

    pub async fn read(&self, stored_path: &str) -> Result<Bytes, UploadStorageError> {
        let data = fs::read(self.resolve(stored_path)?).await?;
        Ok(Bytes::from(data))
    }

    /// Join a stored path onto the root, refusing anything that could escape it.
    fn resolve(&self, stored_path: &str) -> Result<PathBuf, UploadStorageError> {
        let relative = Path::new(stored_path);
        let escapes = relative.components().any(|component| {
            !matches!(component, Component::Normal(_) | Component::CurDir)
        });
        if stored_path.is_empty() || escapes {
            return Err(UploadStorageError::InvalidPath);
        }
        Ok(self.root.join(relative))
    }
}

/// Copy every chunk into `file`, returning the hex SHA-256 and the byte count.
async fn write_chunks<S>(mut file: fs::File, chunks: S) -> Result<(String, u64), UploadStorageError>
where
    S: Stream<Item = Result<Bytes, UploadStorageError>>,
{
    let mut hasher = Sha256::new();
    let mut written: u64 = 0;

    pin_mut!(chunks);
    while let Some(chunk) = chunks.next().await {
        let chunk = chunk?;
        written = written
            .checked_add(chunk.len() as u64)
            .ok_or(UploadStorageError::SizeOverflow)?;
        hasher.update(&chunk);
        file.write_all(&chunk).await?;
    }
    file.flush().await?;

    Ok((hex::encode(hasher.finalize()), written))
}

async fn discard(path: &Path) {
    if let Err(err) = fs::remove_file(path).await {
        warn!(
            target = "vitrine::uploads",
            path = %path.display(),
            error = %err,
            "failed to remove partial upload"
        );
    }
}

fn stored_path_for(original_name: &str) -> String {
    let (year, month, day) = time::OffsetDateTime::now_utc().to_calendar_date();
    format!(
        "{year}/{:02}/{day:02}/{}-{}",
        month as u8,
        Uuid::new_v4(),
        file_name_for(original_name)
    )
}

/// Slugified stem plus lower-cased extension; `upload` when nothing survives.
fn file_name_for(original: &str) -> String {
    let path = Path::new(original);
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .map(slugify)
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| "upload".to_string());

    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .filter(|ext| !ext.is_empty())
    {
        Some(ext) => format!("{stem}.{ext}"),
        None => stem,
    }
}
