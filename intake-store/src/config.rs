//! Configuration for the intake store and scorer

use risk_engine::WeightConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming a TOML config file
pub const CONFIG_PATH_ENV: &str = "INTAKE_CONFIG";

/// Which store backs the scorer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Process-local, lost on exit
    Memory,
    /// RocksDB under `data_dir`
    Rocksdb,
}

impl std::str::FromStr for StoreBackend {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "rocksdb" => Ok(StoreBackend::Rocksdb),
            other => Err(crate::Error::Config(format!("Unknown store backend: {}", other))),
        }
    }
}

/// Intake store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Service name
    pub service_name: String,

    /// Service version
    pub service_version: String,

    /// Store backend
    pub backend: StoreBackend,

    /// Data directory for RocksDB
    pub data_dir: PathBuf,

    /// RocksDB configuration
    pub rocksdb: RocksDBConfig,

    /// Framework weight table
    pub weights: WeightConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: "intake-scorer".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            backend: StoreBackend::Rocksdb,
            data_dir: PathBuf::from("./data/intake"),
            rocksdb: RocksDBConfig::default(),
            weights: WeightConfig::default(),
        }
    }
}

/// RocksDB configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RocksDBConfig {
    /// Write buffer size (MB)
    pub write_buffer_size_mb: usize,

    /// Max write buffers
    pub max_write_buffer_number: i32,

    /// Max background jobs (compaction + flush)
    pub max_background_jobs: i32,

    /// Enable statistics
    pub enable_statistics: bool,
}

impl Default for RocksDBConfig {
    fn default() -> Self {
        Self {
            write_buffer_size_mb: 64,
            max_write_buffer_number: 2,
            max_background_jobs: 2,
            enable_statistics: false,
        }
    }
}

impl Config {
    /// Parse from TOML text
    pub fn from_toml_str(content: &str) -> crate::Result<Self> {
        toml::from_str(content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Load from file
    pub fn from_file(path: impl AsRef<Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config::default();
        config.apply_env()?;
        Ok(config)
    }

    /// File named by `INTAKE_CONFIG` (or defaults), then env overrides
    pub fn load() -> crate::Result<Self> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Config::default(),
        };
        config.apply_env()?;
        Ok(config)
    }

    fn apply_env(&mut self) -> crate::Result<()> {
        if let Ok(data_dir) = std::env::var("INTAKE_DATA_DIR") {
            self.data_dir = PathBuf::from(data_dir);
        }

        if let Ok(backend) = std::env::var("INTAKE_STORE_BACKEND") {
            self.backend = backend.parse()?;
        }

        self.weights.apply_env()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.service_name, "intake-scorer");
        assert_eq!(config.backend, StoreBackend::Rocksdb);
        assert_eq!(config.weights, WeightConfig::default());
    }

    #[test]
    fn test_parse_partial_toml() {
        let config = Config::from_toml_str(
            r#"
            backend = "memory"

            [weights]
            nist = 0.30
            owasp = 0.20
            "#,
        )
        .unwrap();

        assert_eq!(config.backend, StoreBackend::Memory);
        assert_eq!(config.weights.nist, 0.30);
        assert_eq!(config.weights.owasp, 0.20);
        assert_eq!(config.weights.soc2, 0.20);
        assert_eq!(config.rocksdb.max_background_jobs, 2);
    }

    #[test]
    fn test_unknown_backend() {
        assert!("postgres".parse::<StoreBackend>().is_err());
        assert_eq!("RocksDB".parse::<StoreBackend>().unwrap(), StoreBackend::Rocksdb);
    }
}
