// src/services/image_processor.rs
use crate::config::Config;
use crate::errors::ResizerError;
use crate::models::{MimeValidation, ReducedImages, ResizeResult, SizeLimit};
use crate::services::mime::{mime_extension, probe_image, validate_image_mime};
use crate::services::naming::{thumb_name, unique_token, with_extension};
use image::codecs::gif::GifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::imageops::FilterType;
use image::{DynamicImage, Frame, ImageReader};
use log::{debug, info, warn};
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

pub fn scale_factor(width: u32, height: u32, limit: SizeLimit) -> f64 {
    let scale_w = limit.width as f64 / width as f64;
    let scale_h = limit.height as f64 / height as f64;

    scale_w.min(scale_h)
}

// Float noise like 64.00000000000001 must not round up to a whole pixel.
const ROUNDING_SLACK: f64 = 1e-9;

// Rounds up, but never past the limit. A zero limit stays zero.
pub fn scaled_dimensions(width: u32, height: u32, scale: f64, limit: SizeLimit) -> (u32, u32) {
    let new_width = (width as f64 * scale - ROUNDING_SLACK).ceil() as u32;
    let new_height = (height as f64 * scale - ROUNDING_SLACK).ceil() as u32;

    (
        new_width.max(1).min(limit.width),
        new_height.max(1).min(limit.height),
    )
}

/// Shrinks `source` to fit `limit` and writes it to `destination` plus an
/// extension picked from the detected MIME type. `Ok(None)` means nothing was
/// written.
pub fn resize_image_reduce(
    source: &Path,
    destination: &Path,
    limit: SizeLimit,
) -> Result<Option<ResizeResult>, ResizerError> {
    let descriptor = probe_image(source)?;

    let extension = mime_extension(&descriptor.mime_type)
        .ok_or_else(|| ResizerError::UnsupportedFormat(descriptor.mime_type.clone()))?;

    if limit.width == 0 || limit.height == 0 {
        warn!(
            "Cannot fit {} into {}x{}",
            source.display(),
            limit.width,
            limit.height
        );
        return Ok(None);
    }

    let target = with_extension(destination, extension);
    let pre_existing = target.exists();
    let file_name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let scale = scale_factor(descriptor.width, descriptor.height, limit);

    if scale >= 1.0 {
        return match fs::copy(source, &target) {
            Ok(_) => {
                debug!("{} fits {}x{}, copied", source.display(), limit.width, limit.height);
                Ok(Some(ResizeResult {
                    file_name,
                    width: descriptor.width,
                    height: descriptor.height,
                }))
            }
            Err(e) => {
                warn!("Failed to copy {} to {}: {}", source.display(), target.display(), e);
                discard_partial(&target, pre_existing);
                Ok(None)
            }
        };
    }

    let (width, height) = scaled_dimensions(descriptor.width, descriptor.height, scale, limit);

    match reduce_to_file(source, &target, extension, width, height, pre_existing) {
        Ok(()) => {
            debug!(
                "{} reduced {}x{} -> {}x{}",
                source.display(),
                descriptor.width,
                descriptor.height,
                width,
                height
            );
            Ok(Some(ResizeResult {
                file_name,
                width,
                height,
            }))
        }
        Err(e) => {
            warn!("Failed to reduce {}: {}", source.display(), e);
            Ok(None)
        }
    }
}

fn reduce_to_file(
    source: &Path,
    target: &Path,
    extension: &str,
    width: u32,
    height: u32,
    pre_existing: bool,
) -> Result<(), ResizerError> {
    let img = ImageReader::open(source)?
        .with_guessed_format()?
        .decode()
        .map_err(|e| ResizerError::Decode(format!("Failed to load image: {}", e)))?;

    let resized = img.resize_exact(width, height, FilterType::Triangle);
    let canvas = if resized.color().has_alpha() {
        DynamicImage::ImageRgba8(resized.to_rgba8())
    } else {
        DynamicImage::ImageRgb8(resized.to_rgb8())
    };

    let output = encode_image(&canvas, extension)?;

    // Encoded in memory first so a failed encode never touches the disk.
    if let Err(e) = fs::write(target, &output) {
        discard_partial(target, pre_existing);
        return Err(e.into());
    }

    Ok(())
}

fn encode_image(img: &DynamicImage, extension: &str) -> Result<Vec<u8>, ResizerError> {
    let mut buf = Cursor::new(Vec::new());

    match extension {
        "jpg" => {
            let encoder = JpegEncoder::new(&mut buf);
            img.to_rgb8()
                .write_with_encoder(encoder)
                .map_err(|e| ResizerError::Encode(format!("JPEG encode failed: {}", e)))?;
        }
        "gif" => {
            let mut encoder = GifEncoder::new(&mut buf);
            encoder
                .encode_frame(Frame::new(img.to_rgba8()))
                .map_err(|e| ResizerError::Encode(format!("GIF encode failed: {}", e)))?;
        }
        "png" => {
            let encoder =
                PngEncoder::new_with_quality(&mut buf, CompressionType::Best, PngFilter::Adaptive);
            img.write_with_encoder(encoder)
                .map_err(|e| ResizerError::Encode(format!("PNG encode failed: {}", e)))?;
        }
        other => {
            return Err(ResizerError::Encode(format!("No encoder for .{}", other)));
        }
    }

    Ok(buf.into_inner())
}

// Only removes what this call wrote.
fn discard_partial(target: &Path, pre_existing: bool) {
    if !pre_existing && target.is_file() {
        if let Err(e) = fs::remove_file(target) {
            warn!("Failed to remove partial output {}: {}", target.display(), e);
        }
    }
}

pub struct ImageResizer {
    config: Config,
}

impl ImageResizer {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn destination_prefix(&self, temporary: bool) -> PathBuf {
        self.config.images_dir(temporary).join(unique_token())
    }

    /// Writes a copy of `image_path` reduced to the configured maximum size
    /// and, if `thumb` is set, a thumbnail reduced to the maximum thumbnail
    /// size next to it.
    ///
    /// Only an unsupported image type is an error. Any other failure just
    /// leaves the matching key out of the result.
    pub fn reduce_image_to_max_dimensions(
        &self,
        image_path: &Path,
        thumb: bool,
        temporary: bool,
    ) -> Result<ReducedImages, ResizerError> {
        let prefix = self.destination_prefix(temporary);
        self.reduce_into(image_path, &prefix, thumb)
    }

    // Concurrent calls must not share a prefix.
    pub fn reduce_into(
        &self,
        image_path: &Path,
        prefix: &Path,
        thumb: bool,
    ) -> Result<ReducedImages, ResizerError> {
        info!("Reducing {} into {}", image_path.display(), prefix.display());

        if let Some(dir) = prefix.parent() {
            if let Err(e) = fs::create_dir_all(dir) {
                warn!("Failed to create {}: {}", dir.display(), e);
            }
        }

        let mut reduced = ReducedImages::default();

        reduced.new = soft(
            "image",
            resize_image_reduce(image_path, prefix, self.config.image.max_size),
        )?;

        if thumb {
            let thumb_prefix = thumb_name(prefix);
            reduced.new_thumb = soft(
                "thumbnail",
                resize_image_reduce(image_path, &thumb_prefix, self.config.image.max_thumb_size),
            )?;
        }

        info!(
            "Reduced {}: image={} thumbnail={}",
            image_path.display(),
            reduced.new.is_some(),
            reduced.new_thumb.is_some()
        );

        Ok(reduced)
    }

    pub fn validate_configured(&self, file: &Path) -> MimeValidation {
        validate_image_mime(file, self.config.image.allowed_mime_types.as_slice())
    }
}

fn soft(
    step: &str,
    outcome: Result<Option<ResizeResult>, ResizerError>,
) -> Result<Option<ResizeResult>, ResizerError> {
    match outcome {
        Err(e) if !e.is_fatal() => {
            warn!("Skipping {}: {}", step, e);
            Ok(None)
        }
        other => other,
    }
}
