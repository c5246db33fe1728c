// src/models.rs
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDescriptor {
    pub width: u32,
    pub height: u32,
    pub mime_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeLimit {
    pub width: u32,
    pub height: u32,
}

impl SizeLimit {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizeResult {
    #[serde(rename = "name")]
    pub file_name: String,
    pub width: u32,
    pub height: u32,
}

// A key is only present when its step succeeded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReducedImages {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new: Option<ResizeResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_thumb: Option<ResizeResult>,
}

impl ReducedImages {
    pub fn is_empty(&self) -> bool {
        self.new.is_none() && self.new_thumb.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MimeValidation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MimeValidation {
    pub fn ok() -> Self {
        Self { error: None }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}
