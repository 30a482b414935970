//! Image files to base64 attachments.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::path::{Path, PathBuf};
use swarm_application::ImageAttachment;
use thiserror::Error;
use tracing::debug;

/// Largest image accepted as an attachment.
pub const MAX_IMAGE_BYTES: u64 = 20 * 1024 * 1024;

#[derive(Error, Debug)]
pub enum ImageLoadError {
    #[error("Failed to read image {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported image format: {0} (expected png, jpg, gif or webp)")]
    UnsupportedFormat(String),

    #[error("Image {path} is {size} bytes, limit is {MAX_IMAGE_BYTES}")]
    TooLarge { path: PathBuf, size: u64 },
}

/// MIME type from the file extension.
pub fn media_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

/// Read an image file and encode it as an attachment.
pub async fn load_image(path: &Path) -> Result<ImageAttachment, ImageLoadError> {
    let media_type = media_type_for(path)
        .ok_or_else(|| ImageLoadError::UnsupportedFormat(path.display().to_string()))?;

    let io_err = |source| ImageLoadError::Io {
        path: path.to_path_buf(),
        source,
    };
    let size = tokio::fs::metadata(path).await.map_err(io_err)?.len();
    if size > MAX_IMAGE_BYTES {
        return Err(ImageLoadError::TooLarge {
            path: path.to_path_buf(),
            size,
        });
    }

    let bytes = tokio::fs::read(path).await.map_err(io_err)?;
    debug!("Loaded {} ({} bytes, {})", path.display(), bytes.len(), media_type);
    Ok(ImageAttachment::new(media_type, STANDARD.encode(bytes)))
}
