//! Image upload payload and validation

use std::path::Path;

use serde::Deserialize;

use crate::error::Error;
use crate::model::TaskId;

/// Largest accepted image, in bytes.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Accepted image extensions and their MIME types.
const IMAGE_TYPES: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("bmp", "image/bmp"),
    ("webp", "image/webp"),
];

/// An image to upload for recognition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// File name sent with the upload; its extension decides the type.
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Creates an upload from in-memory bytes.
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    /// Reads an image from disk.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        Ok(Self { file_name, bytes })
    }

    /// Returns the lowercase file extension.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.file_name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
    }

    /// Returns the MIME type implied by the extension, if it is a supported image.
    pub fn mime_type(&self) -> Option<&'static str> {
        let extension = self.extension()?;
        IMAGE_TYPES
            .iter()
            .find(|(ext, _)| *ext == extension)
            .map(|(_, mime)| *mime)
    }

    /// Checks that the image has a supported type and size.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidImage`] for empty files, files over
    /// [`MAX_IMAGE_BYTES`] and unsupported extensions.
    pub fn validate(&self) -> Result<(), Error> {
        if self.mime_type().is_none() {
            let extension = self.extension().unwrap_or_default();
            return Err(Error::InvalidImage(format!(
                "Invalid file type: .{extension} (supported: png, jpg, jpeg, gif, bmp, webp)"
            )));
        }
        if self.bytes.is_empty() {
            return Err(Error::InvalidImage("Empty image file".to_string()));
        }
        if self.bytes.len() > MAX_IMAGE_BYTES {
            return Err(Error::InvalidImage(format!(
                "File too large: {} bytes (limit {MAX_IMAGE_BYTES})",
                self.bytes.len()
            )));
        }
        Ok(())
    }
}

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadResponse {
    /// The task created for the image.
    pub task_id: TaskId,
    /// Where the service stored the image.
    #[serde(default)]
    pub image_path: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
