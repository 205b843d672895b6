//! Artifact files and terminal rendering.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;
use lens_core::{RequestConfiguration, ResearchResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::debug;

pub const RESEARCH_FILE: &str = "research.json";
pub const RISK_FILE: &str = "risk.json";
pub const FINANCIALS_FILE: &str = "financials.json";

/// Research together with the configuration it was made for
#[derive(Debug, Serialize, Deserialize)]
pub struct SavedResearch {
    pub config: RequestConfiguration,
    pub research: ResearchResult,
}

/// Output directory for generated artifacts
pub struct Artifacts {
    dir: PathBuf,
}

impl Artifacts {
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    pub async fn write_bytes(&self, name: &str, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.path(name);
        fs::write(&path, bytes)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        debug!(path = %path.display(), bytes = bytes.len(), "Artifact written");
        Ok(path)
    }

    pub async fn write_json<T: Serialize>(&self, name: &str, value: &T) -> Result<PathBuf> {
        let content = serde_json::to_string_pretty(value)?;
        self.write_bytes(name, content.as_bytes()).await
    }

    pub async fn read_json<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
        let path = self.path(name);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path).await?;
        let value = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(Some(value))
    }
}

pub fn heading(text: &str) {
    println!();
    println!("{}", text.bold().cyan());
}

pub fn field(label: &str, value: impl std::fmt::Display) {
    println!("  {} {}", format!("{}:", label).bold(), value);
}

pub fn bullets(items: &[String]) {
    if items.is_empty() {
        println!("  {}", "(none)".dimmed());
    }
    for item in items {
        println!("  • {}", item);
    }
}

pub fn saved(path: &Path) {
    println!("{} {}", "Saved".green(), path.display());
}
