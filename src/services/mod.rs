// src/services/mod.rs
pub mod image_processor;
pub mod mime;
pub mod naming;

pub use image_processor::{ImageResizer, resize_image_reduce};
pub use mime::{probe_image, validate_image_mime};
pub use naming::thumb_name;
