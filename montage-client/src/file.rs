//! Local files to upload

use bytes::Bytes;
use std::path::{Path, PathBuf};
use tokio_util::io::ReaderStream;

use crate::error::{ClientError, Result};

/// Content type used when nothing better is known
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Bytes to be transferred
///
/// Files are streamed from disk when the transfer starts; they are never
/// read into memory as a whole.
#[derive(Debug, Clone)]
pub enum Payload {
    Bytes(Bytes),
    File { path: PathBuf, len: u64 },
}

impl Payload {
    pub fn from_static(bytes: &'static [u8]) -> Self {
        Payload::Bytes(Bytes::from_static(bytes))
    }

    /// Number of bytes that will be sent
    pub fn len(&self) -> u64 {
        match self {
            Payload::Bytes(bytes) => bytes.len() as u64,
            Payload::File { len, .. } => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Turn into a request body and its exact length
    pub(crate) async fn into_body(self) -> Result<(reqwest::Body, u64)> {
        match self {
            Payload::Bytes(bytes) => {
                let len = bytes.len() as u64;
                Ok((reqwest::Body::from(bytes), len))
            }
            Payload::File { path, len } => {
                let file = tokio::fs::File::open(&path).await?;
                Ok((reqwest::Body::wrap_stream(ReaderStream::new(file)), len))
            }
        }
    }
}

/// A named, typed payload ready for [`crate::UploadOrchestrator::upload`]
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: String,
    pub payload: Payload,
}

impl UploadFile {
    /// Describe a file on disk
    ///
    /// The content type is sniffed from the file's leading bytes and falls
    /// back to `application/octet-stream`.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path).await?;
        if !metadata.is_file() {
            return Err(ClientError::InvalidRequest(format!(
                "{} is not a regular file",
                path.display()
            )));
        }

        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                ClientError::InvalidRequest(format!("{} has no usable file name", path.display()))
            })?
            .to_string();

        let content_type = sniff_content_type(path).await?;

        Ok(Self {
            file_name,
            content_type,
            payload: Payload::File {
                path: path.to_path_buf(),
                len: metadata.len(),
            },
        })
    }

    /// Describe an in-memory payload
    pub fn from_bytes(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            payload: Payload::Bytes(bytes.into()),
        }
    }

    /// Replace the detected content type
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    pub fn len(&self) -> u64 {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

async fn sniff_content_type(path: &Path) -> Result<String> {
    use tokio::io::AsyncReadExt;

    // infer needs at most a few hundred bytes for the formats it knows
    let mut head = Vec::with_capacity(8192);
    let file = tokio::fs::File::open(path).await?;
    file.take(8192).read_to_end(&mut head).await?;

    Ok(infer::get(&head)
        .map(|kind| kind.mime_type().to_string())
        .unwrap_or_else(|| FALLBACK_CONTENT_TYPE.to_string()))
}
