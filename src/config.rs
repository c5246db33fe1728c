// src/config.rs
use crate::errors::ResizerError;
use crate::models::SizeLimit;
use crate::services::mime::SUPPORTED_MIME_TYPES;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_PATH_ENV: &str = "IMAGE_REDUCER_CONFIG";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub web_dir: PathBuf,
    pub image: ImageSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageSettings {
    pub public_images_root: String,
    pub public_images_dir: String,
    pub public_images_temp_dir: String,
    pub max_size: SizeLimit,
    pub max_thumb_size: SizeLimit,
    #[serde(default = "default_allowed_mime_types")]
    pub allowed_mime_types: Vec<String>,
}

fn default_allowed_mime_types() -> Vec<String> {
    SUPPORTED_MIME_TYPES.iter().map(|m| m.to_string()).collect()
}

impl Config {
    pub fn from_json_str(raw: &str) -> Result<Self, ResizerError> {
        let config: Config = serde_json::from_str(raw)
            .map_err(|e| ResizerError::Config(format!("Invalid configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ResizerError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ResizerError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&raw)
    }

    pub fn from_env() -> Result<Self, ResizerError> {
        let path = std::env::var(CONFIG_PATH_ENV)
            .map_err(|_| ResizerError::Config(format!("{} must be set", CONFIG_PATH_ENV)))?;
        Self::load(path)
    }

    pub fn validate(&self) -> Result<(), ResizerError> {
        for (name, limit) in [
            ("max_size", self.image.max_size),
            ("max_thumb_size", self.image.max_thumb_size),
        ] {
            if limit.width == 0 || limit.height == 0 {
                return Err(ResizerError::Config(format!(
                    "{} must be non-zero, got {}x{}",
                    name, limit.width, limit.height
                )));
            }
        }
        Ok(())
    }

    pub fn images_dir(&self, temporary: bool) -> PathBuf {
        let subdir = if temporary {
            &self.image.public_images_temp_dir
        } else {
            &self.image.public_images_dir
        };

        self.web_dir
            .join(relative(&self.image.public_images_root))
            .join(relative(subdir))
    }
}

// A leading separator would make `join` discard everything before it.
fn relative(component: &str) -> &str {
    component.trim_start_matches(['/', '\\'])
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAW: &str = r#"{
        "web_dir": "/srv/www",
        "image": {
            "public_images_root": "/upload/images",
            "public_images_dir": "/public",
            "public_images_temp_dir": "temp",
            "max_size": { "width": 1920, "height": 1080 },
            "max_thumb_size": { "width": 320, "height": 240 }
        }
    }"#;

    #[test]
    fn parses_and_defaults_allowed_types() {
        let config = Config::from_json_str(RAW).unwrap();
        assert_eq!(config.image.max_size, SizeLimit::new(1920, 1080));
        assert_eq!(config.image.max_thumb_size, SizeLimit::new(320, 240));
        assert_eq!(
            config.image.allowed_mime_types,
            vec!["image/jpeg", "image/pjpeg", "image/gif", "image/png", "image/x-png"]
        );
    }

    #[test]
    fn images_dir_joins_components() {
        let config = Config::from_json_str(RAW).unwrap();
        assert_eq!(
            config.images_dir(false),
            PathBuf::from("/srv/www/upload/images/public")
        );
        assert_eq!(
            config.images_dir(true),
            PathBuf::from("/srv/www/upload/images/temp")
        );
    }

    #[test]
    fn rejects_zero_limits() {
        let raw = RAW.replace(r#""width": 320"#, r#""width": 0"#);
        match Config::from_json_str(&raw) {
            Err(ResizerError::Config(msg)) => assert!(msg.contains("max_thumb_size")),
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            Config::from_json_str("{ not json"),
            Err(ResizerError::Config(_))
        ));
    }

    #[test]
    fn from_env_follows_variable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, RAW).unwrap();

        // Both cases in one test so nothing else races on the variable.
        unsafe { std::env::set_var(CONFIG_PATH_ENV, &path) };
        let config = Config::from_env().unwrap();
        assert_eq!(config.image.max_size, SizeLimit::new(1920, 1080));

        unsafe { std::env::remove_var(CONFIG_PATH_ENV) };
        match Config::from_env() {
            Err(ResizerError::Config(msg)) => assert!(msg.contains(CONFIG_PATH_ENV)),
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, RAW).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.web_dir, PathBuf::from("/srv/www"));
        assert!(matches!(
            Config::load(dir.path().join("missing.json")),
            Err(ResizerError::Config(_))
        ));
    }
}
