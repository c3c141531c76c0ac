//! Configuration for seed materialization

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Where and how the seed store and schema text are written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterializeConfig {
    /// Directory receiving every output file
    pub output_dir: PathBuf,
    /// Database file name inside `output_dir`
    pub database_file: String,
    /// Canonical schema text file name inside `output_dir`
    pub schema_file: String,
    /// Optional specification JSON file name inside `output_dir`
    pub snapshot_file: Option<String>,
    /// Remove an existing database before writing
    pub overwrite: bool,
}

impl Default for MaterializeConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("data"),
            database_file: "seed.db".to_string(),
            schema_file: "schema.sql".to_string(),
            snapshot_file: None,
            overwrite: false,
        }
    }
}

impl MaterializeConfig {
    /// Create a configuration writing into `output_dir` with default file names
    pub fn new(output_dir: impl AsRef<Path>) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            ..Default::default()
        }
    }

    /// Create a builder for custom configuration
    pub fn builder() -> MaterializeConfigBuilder {
        MaterializeConfigBuilder::default()
    }

    pub fn database_path(&self) -> PathBuf {
        self.output_dir.join(&self.database_file)
    }

    pub fn schema_path(&self) -> PathBuf {
        self.output_dir.join(&self.schema_file)
    }

    pub fn snapshot_path(&self) -> Option<PathBuf> {
        self.snapshot_file
            .as_ref()
            .map(|file| self.output_dir.join(file))
    }
}

/// Builder for MaterializeConfig
#[derive(Debug, Default)]
pub struct MaterializeConfigBuilder {
    config: MaterializeConfig,
}

impl MaterializeConfigBuilder {
    pub fn output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.config.output_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn database_file(mut self, file: impl Into<String>) -> Self {
        self.config.database_file = file.into();
        self
    }

    pub fn schema_file(mut self, file: impl Into<String>) -> Self {
        self.config.schema_file = file.into();
        self
    }

    /// Also write the specification JSON under this file name
    pub fn snapshot_file(mut self, file: impl Into<String>) -> Self {
        self.config.snapshot_file = Some(file.into());
        self
    }

    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.config.overwrite = overwrite;
        self
    }

    pub fn build(self) -> MaterializeConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        let config = MaterializeConfig::default();
        assert_eq!(config.database_path(), PathBuf::from("data/seed.db"));
        assert_eq!(config.schema_path(), PathBuf::from("data/schema.sql"));
        assert_eq!(config.snapshot_path(), None);
        assert!(!config.overwrite);
    }

    #[test]
    fn test_builder() {
        let config = MaterializeConfig::builder()
            .output_dir("/tmp/out")
            .database_file("app.db")
            .snapshot_file("schema.json")
            .overwrite(true)
            .build();

        assert_eq!(config.database_path(), PathBuf::from("/tmp/out/app.db"));
        assert_eq!(
            config.snapshot_path(),
            Some(PathBuf::from("/tmp/out/schema.json"))
        );
        assert!(config.overwrite);
    }
}
