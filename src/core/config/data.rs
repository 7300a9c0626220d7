use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::gateway::gemini::{
    GeminiSettings, DEFAULT_BASE_URL, DEFAULT_IMAGE_MODEL, DEFAULT_REQUEST_TIMEOUT,
    DEFAULT_SUMMARY_MODEL,
};

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    /// Override for the Gemini API root (e.g. a proxy)
    pub base_url: Option<String>,
    /// Model used to create and refine designs
    pub image_model: Option<String>,
    /// Model used to summarize the version history
    pub summary_model: Option<String>,
    /// Directory exported designs are written to
    pub export_dir: Option<PathBuf>,
    pub request_timeout_secs: Option<u64>,
}

/// Keys accepted by `ispace set` / `ispace unset`.
pub const CONFIG_KEYS: &[&str] = &[
    "base-url",
    "image-model",
    "summary-model",
    "export-dir",
    "request-timeout-secs",
];

impl Config {
    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn image_model(&self) -> &str {
        self.image_model.as_deref().unwrap_or(DEFAULT_IMAGE_MODEL)
    }

    pub fn summary_model(&self) -> &str {
        self.summary_model.as_deref().unwrap_or(DEFAULT_SUMMARY_MODEL)
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT)
    }

    /// Configured export directory, else the user's download folder, else
    /// the working directory.
    pub fn export_dir(&self) -> PathBuf {
        if let Some(dir) = &self.export_dir {
            return dir.clone();
        }
        UserDirs::new()
            .and_then(|dirs| dirs.download_dir().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Backend settings with an optional per-run image model override.
    pub fn gemini_settings(&self, api_key: String, model_override: Option<&str>) -> GeminiSettings {
        GeminiSettings {
            base_url: self.base_url().to_string(),
            api_key,
            image_model: model_override.unwrap_or(self.image_model()).to_string(),
            summary_model: self.summary_model().to_string(),
            request_timeout: self.request_timeout(),
        }
    }

    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), String> {
        let value = value.trim();
        if value.is_empty() {
            return Err(format!("A value is required for '{key}'"));
        }
        match key {
            "base-url" => self.base_url = Some(value.to_string()),
            "image-model" => self.image_model = Some(value.to_string()),
            "summary-model" => self.summary_model = Some(value.to_string()),
            "export-dir" => self.export_dir = Some(PathBuf::from(value)),
            "request-timeout-secs" => {
                let secs = value
                    .parse::<u64>()
                    .ok()
                    .filter(|secs| *secs > 0)
                    .ok_or_else(|| format!("'{value}' is not a positive number of seconds"))?;
                self.request_timeout_secs = Some(secs);
            }
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }

    pub fn unset_value(&mut self, key: &str) -> Result<(), String> {
        match key {
            "base-url" => self.base_url = None,
            "image-model" => self.image_model = None,
            "summary-model" => self.summary_model = None,
            "export-dir" => self.export_dir = None,
            "request-timeout-secs" => self.request_timeout_secs = None,
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }

    pub fn print_all(&self) {
        println!("Current configuration:");
        let show = |key: &str, value: Option<String>, default: String| match value {
            Some(value) => println!("  {key}: {value}"),
            None => println!("  {key}: (unset, using {default})"),
        };
        show("base-url", self.base_url.clone(), DEFAULT_BASE_URL.to_string());
        show("image-model", self.image_model.clone(), DEFAULT_IMAGE_MODEL.to_string());
        show(
            "summary-model",
            self.summary_model.clone(),
            DEFAULT_SUMMARY_MODEL.to_string(),
        );
        show(
            "export-dir",
            self.export_dir.as_deref().map(path_display),
            path_display(self.export_dir()),
        );
        show(
            "request-timeout-secs",
            self.request_timeout_secs.map(|secs| secs.to_string()),
            DEFAULT_REQUEST_TIMEOUT.as_secs().to_string(),
        );
    }
}

fn unknown_key(key: &str) -> String {
    format!(
        "Unknown config key: {key} (expected one of: {})",
        CONFIG_KEYS.join(", ")
    )
}

/// Get a user-friendly display string for a path, using `~` for the home
/// directory on Unix-like systems.
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
