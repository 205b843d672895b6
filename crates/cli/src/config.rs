use std::path::{Path, PathBuf};

use gemini::GeminiConfig;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{debug, warn};

const CONFIG_FILE: &str = ".solopreneur-lens/config.json";
const DEFAULT_OUTPUT_DIR: &str = "lens-output";

/// Settings stored in `.solopreneur-lens/config.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LensConfig {
    /// Endpoint, models and narrator voice
    #[serde(default)]
    pub gemini: GeminiConfig,
    /// Where generated artifacts are written, relative to the project root
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

impl Default for LensConfig {
    fn default() -> Self {
        Self {
            gemini: GeminiConfig::default(),
            output_dir: default_output_dir(),
        }
    }
}

impl LensConfig {
    /// Read config from the project directory; missing or unreadable files
    /// fall back to defaults.
    pub async fn read(root: &Path) -> Self {
        let config_path = root.join(CONFIG_FILE);

        if !config_path.exists() {
            debug!(path = %config_path.display(), "Config file does not exist, using defaults");
            return Self::default();
        }

        match fs::read_to_string(&config_path).await {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(config) => {
                    debug!(path = %config_path.display(), "Config loaded successfully");
                    config
                }
                Err(e) => {
                    warn!(path = %config_path.display(), error = %e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                warn!(path = %config_path.display(), error = %e, "Failed to read config file, using defaults");
                Self::default()
            }
        }
    }

    /// Output directory resolved against the project root
    pub fn output_dir(&self, root: &Path) -> PathBuf {
        if self.output_dir.is_absolute() {
            self.output_dir.clone()
        } else {
            root.join(&self.output_dir)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_config_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let config = LensConfig::read(temp.path()).await;
        assert_eq!(config, LensConfig::default());
        assert_eq!(config.output_dir(temp.path()), temp.path().join("lens-output"));
    }

    #[tokio::test]
    async fn test_partial_config_keeps_defaults() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join(".solopreneur-lens")).unwrap();
        std::fs::write(
            temp.path().join(CONFIG_FILE),
            r#"{"gemini": {"voice": "Puck"}}"#,
        )
        .unwrap();

        let config = LensConfig::read(temp.path()).await;
        assert_eq!(config.gemini.voice, "Puck");
        assert_eq!(config.gemini.fast_model, GeminiConfig::default().fast_model);
        assert_eq!(config.output_dir, PathBuf::from("lens-output"));
    }

    #[tokio::test]
    async fn test_corrupt_config_uses_defaults() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join(".solopreneur-lens")).unwrap();
        std::fs::write(temp.path().join(CONFIG_FILE), "{oops").unwrap();

        assert_eq!(LensConfig::read(temp.path()).await, LensConfig::default());
    }
}
