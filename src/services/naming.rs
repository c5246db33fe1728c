// src/services/naming.rs
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const THUMBNAIL_SUFFIX: &str = "_thumb";

const TOKEN_PREFIX: &str = "images";

/// `a/b/c.jpg` -> `a/b/c_thumb.jpg`. A `.` or empty directory is dropped.
pub fn thumb_name(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();

    let mut file_name = path.file_stem().map(OsString::from).unwrap_or_default();
    file_name.push(THUMBNAIL_SUFFIX);
    if let Some(ext) = path.extension() {
        file_name.push(".");
        file_name.push(ext);
    }

    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() && dir != Path::new(".") => dir.join(file_name),
        _ => PathBuf::from(file_name),
    }
}

pub fn unique_token() -> String {
    format!("{}{}", TOKEN_PREFIX, Uuid::new_v4().simple())
}

// The prefix may itself contain dots.
pub fn with_extension(prefix: &Path, ext: &str) -> PathBuf {
    let mut full = prefix.as_os_str().to_owned();
    full.push(".");
    full.push(ext);
    PathBuf::from(full)
}
