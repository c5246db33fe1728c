// src/lib.rs
//! Reduces uploaded images to configured maximum dimensions, writes
//! thumbnail variants next to them and checks upload MIME types.

pub mod config;
pub mod errors;
pub mod models;
pub mod services;

pub use crate::config::Config;
pub use crate::errors::ResizerError;
pub use crate::models::{ImageDescriptor, MimeValidation, ReducedImages, ResizeResult, SizeLimit};
pub use crate::services::{
    ImageResizer, probe_image, resize_image_reduce, thumb_name, validate_image_mime,
};
