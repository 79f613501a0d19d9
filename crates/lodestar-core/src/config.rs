use crate::error::{LodestarError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "config.yaml";

// ---------------------------------------------------------------------------
// ServerConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    4180
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

// ---------------------------------------------------------------------------
// DataConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Database file name, resolved relative to the home directory.
    #[serde(default = "default_data_file")]
    pub file: String,
}

fn default_data_file() -> String {
    "lodestar.redb".to_string()
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            file: default_data_file(),
        }
    }
}

// ---------------------------------------------------------------------------
// MuseConfig
// ---------------------------------------------------------------------------

/// Text-generation backend. Absent entirely when the deployment runs
/// without generated content; everything else keeps working.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MuseConfig {
    pub endpoint: String,
    #[serde(default = "default_muse_model")]
    pub model: String,
    /// Name of the environment variable holding the API key. The key
    /// itself never lives in the config file.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_muse_model() -> String {
    "muse-large".to_string()
}

fn default_api_key_env() -> String {
    "MUSE_API_KEY".to_string()
}

fn default_max_tokens() -> u32 {
    1024
}

// ---------------------------------------------------------------------------
// OfflineConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfflineConfig {
    /// Bumping this invalidates every previously cached asset on activate.
    #[serde(default = "default_cache_version")]
    pub cache_version: u32,
    /// Asset paths warmed into the cache at install.
    #[serde(default = "default_precache")]
    pub precache: Vec<String>,
    #[serde(default = "default_offline_page")]
    pub offline_page: String,
}

fn default_cache_version() -> u32 {
    1
}

fn default_precache() -> Vec<String> {
    vec![
        "/index.html".to_string(),
        "/manifest.webmanifest".to_string(),
        "/offline.html".to_string(),
    ]
}

fn default_offline_page() -> String {
    "/offline.html".to_string()
}

impl Default for OfflineConfig {
    fn default() -> Self {
        Self {
            cache_version: default_cache_version(),
            precache: default_precache(),
            offline_page: default_offline_page(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub muse: Option<MuseConfig>,
    #[serde(default)]
    pub offline: OfflineConfig,
}

fn default_version() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: 1,
            server: ServerConfig::default(),
            data: DataConfig::default(),
            muse: None,
            offline: OfflineConfig::default(),
        }
    }
}

impl Config {
    pub fn config_path(home: &Path) -> PathBuf {
        home.join(CONFIG_FILE)
    }

    /// Absolute path of the database file.
    pub fn data_path(&self, home: &Path) -> PathBuf {
        home.join(&self.data.file)
    }

    pub fn load(home: &Path) -> Result<Self> {
        let path = Self::config_path(home);
        if !path.exists() {
            return Err(LodestarError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, home: &Path) -> Result<()> {
        let path = Self::config_path(home);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    /// Resolve the API key for the muse backend, if one is configured and
    /// the named environment variable is set.
    pub fn muse_api_key(&self) -> Option<String> {
        let muse = self.muse.as_ref()?;
        std::env::var(&muse.api_key_env).ok().filter(|k| !k.is_empty())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let yaml = serde_yaml::to_string(&cfg).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.server.port, 4180);
        assert_eq!(parsed.data.file, "lodestar.redb");
        assert_eq!(parsed.version, 1);
    }

    #[test]
    fn muse_section_omitted_by_default() {
        let cfg = Config::default();
        let yaml = serde_yaml::to_string(&cfg).unwrap();
        assert!(!yaml.contains("muse"));
    }

    #[test]
    fn minimal_yaml_fills_defaults() {
        let yaml = "version: 1\n";
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.server.port, 4180);
        assert!(cfg.muse.is_none());
        assert_eq!(cfg.offline.cache_version, 1);
        assert!(cfg
            .offline
            .precache
            .contains(&"/offline.html".to_string()));
    }

    #[test]
    fn muse_section_parses_with_defaults() {
        let yaml = "muse:\n  endpoint: https://muse.example.com\n";
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        let muse = cfg.muse.unwrap();
        assert_eq!(muse.endpoint, "https://muse.example.com");
        assert_eq!(muse.model, "muse-large");
        assert_eq!(muse.api_key_env, "MUSE_API_KEY");
        assert_eq!(muse.max_tokens, 1024);
    }

    #[test]
    fn save_and_load() {
        let dir = TempDir::new().unwrap();
        let mut cfg = Config::default();
        cfg.server.port = 9999;
        cfg.save(dir.path()).unwrap();

        let loaded = Config::load(dir.path()).unwrap();
        assert_eq!(loaded.server.port, 9999);
    }

    #[test]
    fn load_without_config_is_not_initialized() {
        let dir = TempDir::new().unwrap();
        let err = Config::load(dir.path()).unwrap_err();
        assert!(matches!(err, LodestarError::NotInitialized));
    }
}
