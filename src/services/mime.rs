// src/services/mime.rs
use crate::errors::ResizerError;
use crate::models::{ImageDescriptor, MimeValidation};
use image::ImageReader;
use log::{debug, warn};
use std::path::Path;

pub const SUPPORTED_MIME_TYPES: [&str; 5] = [
    "image/jpeg",
    "image/pjpeg",
    "image/gif",
    "image/png",
    "image/x-png",
];

pub fn mime_extension(mime: &str) -> Option<&'static str> {
    match mime {
        "image/jpeg" | "image/pjpeg" => Some("jpg"),
        "image/gif" => Some("gif"),
        "image/png" | "image/x-png" => Some("png"),
        _ => None,
    }
}

// Header only, pixel data is not decoded.
pub fn probe_image(path: &Path) -> Result<ImageDescriptor, ResizerError> {
    let reader = ImageReader::open(path)
        .map_err(|e| ResizerError::Decode(format!("Failed to open {}: {}", path.display(), e)))?
        .with_guessed_format()
        .map_err(|e| ResizerError::Decode(format!("Failed to read {}: {}", path.display(), e)))?;

    let format = reader.format().ok_or_else(|| {
        ResizerError::Decode(format!("Could not detect image format of {}", path.display()))
    })?;

    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| ResizerError::Decode(format!("Invalid image {}: {}", path.display(), e)))?;

    if width == 0 || height == 0 {
        return Err(ResizerError::Decode(format!(
            "Image {} has no pixels",
            path.display()
        )));
    }

    Ok(ImageDescriptor {
        width,
        height,
        mime_type: format.to_mime_type().to_string(),
    })
}

/// An empty path passes. Problems are reported through
/// [`MimeValidation::error`], never as an `Err`.
pub fn validate_image_mime<S: AsRef<str>>(file: &Path, allowed: &[S]) -> MimeValidation {
    if file.as_os_str().is_empty() {
        return MimeValidation::ok();
    }

    match probe_image(file) {
        Ok(descriptor) => {
            if allowed.iter().any(|m| m.as_ref() == descriptor.mime_type) {
                debug!("{} accepted as {}", file.display(), descriptor.mime_type);
                MimeValidation::ok()
            } else {
                warn!("{} rejected: {}", file.display(), descriptor.mime_type);
                MimeValidation::rejected(format!(
                    "Image type not allowed: {}",
                    descriptor.mime_type
                ))
            }
        }
        Err(e) => {
            warn!("{}", e);
            MimeValidation::rejected("Image type could not be detected")
        }
    }
}
