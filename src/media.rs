//! Uploaded and generated media files on local disk.
//!
//! Files are stored under generated names only, so a reference handed to
//! the client can always be validated against [`STORED_NAME_REGEX`] before
//! it touches the filesystem.

use lazy_static::lazy_static;
use regex::Regex;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

pub const PUBLIC_PREFIX: &str = "/uploads/images";
pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "mp4", "mov", "avi"];

lazy_static! {
    /// `<32 hex>.<ext>` for uploads, `generated_<8 hex>.png` for AI images
    static ref STORED_NAME_REGEX: Regex =
        Regex::new(r"^(?:[0-9a-f]{32}|generated_[0-9a-f]{8})\.(?:png|jpg|jpeg|gif|mp4|mov|avi)$")
            .unwrap();
}

/// Reference returned to the client for a stored file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMedia {
    pub filename: String,
    pub url: String,
    pub size: usize,
}

/// Lowercased extension if it is on the allow-list.
pub fn allowed_extension(original_name: &str) -> AppResult<String> {
    let ext = match original_name.rsplit_once('.') {
        Some((_, ext)) => ext.to_lowercase(),
        None => String::new(),
    };
    if ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        Ok(ext)
    } else {
        Err(AppError::validation(format!(
            "File type not allowed. Allowed: {}",
            ALLOWED_EXTENSIONS.join(", ")
        )))
    }
}

pub fn content_type_for(filename: &str) -> &'static str {
    match filename.rsplit_once('.').map(|(_, e)| e) {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("mp4") => "video/mp4",
        Some("mov") => "video/quicktime",
        Some("avi") => "video/x-msvideo",
        _ => "application/octet-stream",
    }
}

pub fn is_stored_name(filename: &str) -> bool {
    STORED_NAME_REGEX.is_match(filename)
}

#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
    max_bytes: usize,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            root: root.into(),
            max_bytes,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn write(&self, filename: String, bytes: &[u8]) -> AppResult<StoredMedia> {
        tokio::fs::create_dir_all(&self.root).await?;
        tokio::fs::write(self.root.join(&filename), bytes).await?;

        Ok(StoredMedia {
            url: format!("{}/{}", PUBLIC_PREFIX, filename),
            filename,
            size: bytes.len(),
        })
    }

    /// Validates and stores a client upload.
    pub async fn save_upload(&self, original_name: &str, bytes: &[u8]) -> AppResult<StoredMedia> {
        if original_name.trim().is_empty() {
            return Err(AppError::validation("No file selected"));
        }
        let ext = allowed_extension(original_name)?;
        if bytes.is_empty() {
            return Err(AppError::validation("Empty file"));
        }
        if bytes.len() > self.max_bytes {
            return Err(AppError::validation(format!(
                "File too large. Maximum size is {} bytes",
                self.max_bytes
            )));
        }

        let filename = format!("{}.{}", Uuid::new_v4().simple(), ext);
        let stored = self.write(filename, bytes).await?;
        tracing::info!(filename = %stored.filename, size = stored.size, "media uploaded");
        Ok(stored)
    }

    /// Stores a PNG produced by the image generator or the placeholder.
    pub async fn save_generated_png(&self, bytes: &[u8]) -> AppResult<StoredMedia> {
        let id = Uuid::new_v4().simple().to_string();
        let filename = format!("generated_{}.png", &id[..8]);
        self.write(filename, bytes).await
    }

    /// Reads a stored file back. Names that could not have been produced by
    /// this store are reported as missing.
    pub async fn read(&self, filename: &str) -> AppResult<Vec<u8>> {
        if !is_stored_name(filename) {
            return Err(AppError::not_found("File not found"));
        }
        match tokio::fs::read(self.root.join(filename)).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AppError::not_found("File not found"))
            }
            Err(e) => Err(e.into()),
        }
    }
}
