//! Local persistence for preferences and the strategy map.
//!
//! File structure:
//! ```text
//! .solopreneur-lens/
//! ├── solopreneur_profile.json       # stage / style / focus
//! └── solopreneur_strategy_map.json  # nodes and edges
//! ```

use std::path::{Path, PathBuf};

use lens_core::{Profile, StrategyMapData};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs;
use tracing::{debug, error, info, warn};

use crate::error::{OrchestratorError, Result};

pub const LENS_DIR: &str = ".solopreneur-lens";
pub const PROFILE_KEY: &str = "solopreneur_profile";
pub const STRATEGY_MAP_KEY: &str = "solopreneur_strategy_map";

#[derive(Debug, Clone)]
pub struct LensStore {
    root: PathBuf,
}

impl LensStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> PathBuf {
        self.root.join(LENS_DIR)
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir().join(format!("{}.json", key))
    }

    pub async fn ensure_dir(&self) -> Result<()> {
        let dir = self.dir();
        if !dir.exists() {
            fs::create_dir_all(&dir).await?;
            debug!(path = %dir.display(), "Created lens directory");
        }
        Ok(())
    }

    async fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let path = self.path(key);
        if !path.exists() {
            debug!(key, "No stored value");
            return Ok(None);
        }

        let content = fs::read_to_string(&path).await?;
        let value = serde_json::from_str(&content).map_err(|e| {
            error!(key, error = %e, "Failed to parse stored JSON");
            OrchestratorError::Serialization(format!("Failed to parse {}: {}", key, e))
        })?;
        Ok(Some(value))
    }

    async fn write<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        self.ensure_dir().await?;

        let content = serde_json::to_string_pretty(value).map_err(|e| {
            OrchestratorError::Serialization(format!("Failed to serialize {}: {}", key, e))
        })?;
        let path = self.path(key);
        fs::write(&path, content).await?;

        debug!(key, path = %path.display(), "Stored value");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let path = self.path(key);
        if path.exists() {
            fs::remove_file(&path).await?;
            info!(key, "Deleted stored value");
        }
        Ok(())
    }

    /// Saved preferences.
    ///
    /// A corrupt file is logged and read as the default profile.
    pub async fn load_profile(&self) -> Result<Option<Profile>> {
        match self.read::<Profile>(PROFILE_KEY).await {
            Ok(profile) => Ok(profile),
            Err(OrchestratorError::Serialization(message)) => {
                warn!(error = %message, "Stored profile is corrupt, using defaults");
                Ok(Some(Profile::default()))
            }
            Err(e) => Err(e),
        }
    }

    pub async fn save_profile(&self, profile: &Profile) -> Result<()> {
        self.write(PROFILE_KEY, profile).await?;
        info!(
            stage = profile.stage.as_str(),
            style = profile.style.as_str(),
            focus = profile.focus.as_str(),
            "Saved profile"
        );
        Ok(())
    }

    pub async fn delete_profile(&self) -> Result<()> {
        self.remove(PROFILE_KEY).await
    }

    /// Saved strategy map; corrupt or inconsistent files are an error
    pub async fn load_strategy_map(&self) -> Result<Option<StrategyMapData>> {
        let Some(map) = self.read::<StrategyMapData>(STRATEGY_MAP_KEY).await? else {
            return Ok(None);
        };
        map.validate()?;

        info!(nodes = map.nodes.len(), edges = map.edges.len(), "Loaded strategy map");
        Ok(Some(map))
    }

    pub async fn save_strategy_map(&self, map: &StrategyMapData) -> Result<()> {
        map.validate()?;
        self.write(STRATEGY_MAP_KEY, map).await?;

        info!(nodes = map.nodes.len(), edges = map.edges.len(), "Saved strategy map");
        Ok(())
    }

    pub async fn delete_strategy_map(&self) -> Result<()> {
        self.remove(STRATEGY_MAP_KEY).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lens_core::{BusinessFocus, BusinessStage, StrategyNode, StrategyNodeCategory, VisualStyle};
    use tempfile::TempDir;

    fn create_test_store() -> (LensStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = LensStore::new(temp_dir.path());
        (store, temp_dir)
    }

    fn node(id: &str) -> StrategyNode {
        StrategyNode {
            id: id.to_string(),
            label: id.to_uppercase(),
            category: StrategyNodeCategory::Market,
            x: 650.0,
            y: 250.0,
        }
    }

    #[tokio::test]
    async fn test_missing_files_load_as_none() {
        let (store, _temp) = create_test_store();
        assert!(store.load_profile().await.unwrap().is_none());
        assert!(store.load_strategy_map().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_profile_save_and_load() {
        let (store, _temp) = create_test_store();
        let profile = Profile {
            stage: BusinessStage::Growth,
            style: VisualStyle::TechDark,
            focus: BusinessFocus::Investors,
        };

        store.save_profile(&profile).await.unwrap();
        assert!(store.dir().join("solopreneur_profile.json").exists());
        assert_eq!(store.load_profile().await.unwrap(), Some(profile));

        store.delete_profile().await.unwrap();
        assert!(store.load_profile().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_profile_reads_as_default() {
        let (store, _temp) = create_test_store();
        store.ensure_dir().await.unwrap();
        fs::write(store.path(PROFILE_KEY), "{not json").await.unwrap();

        assert_eq!(store.load_profile().await.unwrap(), Some(Profile::default()));
    }

    #[tokio::test]
    async fn test_strategy_map_round_trip_and_corruption() {
        let (store, _temp) = create_test_store();
        let mut map = StrategyMapData::default();
        map.nodes.push(node("a"));
        map.nodes.push(node("b"));
        map.connect("a", "b", Some("feeds".into())).unwrap();

        store.save_strategy_map(&map).await.unwrap();
        assert_eq!(store.load_strategy_map().await.unwrap(), Some(map));

        fs::write(store.path(STRATEGY_MAP_KEY), "{\"nodes\": 3").await.unwrap();
        assert!(matches!(
            store.load_strategy_map().await,
            Err(OrchestratorError::Serialization(_))
        ));
    }

    #[tokio::test]
    async fn test_dangling_edge_is_rejected() {
        let (store, _temp) = create_test_store();
        store.ensure_dir().await.unwrap();
        fs::write(
            store.path(STRATEGY_MAP_KEY),
            r#"{"nodes":[],"edges":[{"from":"a","to":"b"}]}"#,
        )
        .await
        .unwrap();

        assert!(matches!(
            store.load_strategy_map().await,
            Err(OrchestratorError::Core(_))
        ));
    }
}
