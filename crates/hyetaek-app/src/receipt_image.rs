//! Receipt image intake.

use std::io;
use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("{file_name} is not an image ({media_type})")]
    NotAnImage {
        file_name: String,
        media_type: String,
    },
}

impl ImageError {
    /// Korean message shown as a notification.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            ImageError::Io { .. } => "이미지 파일을 읽을 수 없습니다.",
            ImageError::NotAnImage { .. } => "이미지 파일만 업로드 가능합니다 (JPG, PNG 등).",
        }
    }
}

/// A user-selected receipt image with its declared media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptImage {
    pub file_name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl ReceiptImage {
    /// Declares the media type from the file extension, then reads `path`.
    ///
    /// Non-image paths are rejected before any bytes are read.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::NotAnImage`] if the extension does not map to an
    /// `image/*` type, or [`ImageError::Io`] if the file cannot be read.
    pub fn from_path(path: &Path) -> Result<Self, ImageError> {
        let media_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        let file_name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());

        if !media_type.starts_with("image/") {
            return Err(ImageError::NotAnImage {
                file_name,
                media_type,
            });
        }

        let bytes = std::fs::read(path).map_err(|source| ImageError::Io {
            path: path.display().to_string(),
            source,
        })?;

        Ok(Self {
            file_name,
            media_type,
            bytes,
        })
    }

    /// Rejects anything whose media type is not `image/*`.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::NotAnImage`] for non-image media types.
    pub fn validate(&self) -> Result<(), ImageError> {
        if self.media_type.starts_with("image/") {
            Ok(())
        } else {
            Err(ImageError::NotAnImage {
                file_name: self.file_name.clone(),
                media_type: self.media_type.clone(),
            })
        }
    }
}
