//! Generator configuration.
//!
//! Controls how far value production may roam on open ranges, the precision
//! of generated decimals, and how many samples to draw.
//!
//! # Example YAML
//!
//! ```yaml
//! integer_max_range: 2147483647
//! decimal_max_range: 1000000
//! decimal_scale: 3
//! samples: 20
//! seed: 42
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Settings for building and sampling value domains.
///
/// Every field is optional in YAML; missing fields take their defaults.
///
/// # Examples
///
/// ```
/// use valuegen_domain::GeneratorConfig;
///
/// let config: GeneratorConfig = serde_yaml::from_str("samples: 3").unwrap();
/// assert_eq!(config.samples, 3);
/// assert_eq!(config.integer_max_range, i64::from(i32::MAX));
/// assert_eq!(config.decimal_scale, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Widest span of an integer domain, and how far it extends past an open bound.
    pub integer_max_range: i64,
    /// Widest span of a decimal domain, and how far it extends past an open bound.
    pub decimal_max_range: i64,
    /// Decimal places of generated decimals when no constraint declares finer ones.
    pub decimal_scale: u32,
    /// Number of values drawn per sample run.
    pub samples: usize,
    /// Seed for reproducible runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            integer_max_range: i64::from(i32::MAX),
            decimal_max_range: i64::from(i32::MAX),
            decimal_scale: 2,
            samples: 10,
            seed: None,
        }
    }
}

impl GeneratorConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::DomainError::IoError) if the file cannot be
    /// read, or [`YamlError`](crate::DomainError::YamlError) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::DomainError::IoError) if the file cannot be
    /// written, or [`YamlError`](crate::DomainError::YamlError) if
    /// serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_complete() {
        let yaml = r#"
integer_max_range: 1000
decimal_max_range: 50
decimal_scale: 4
samples: 7
seed: 99
"#;
        let config: GeneratorConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.integer_max_range, 1000);
        assert_eq!(config.decimal_max_range, 50);
        assert_eq!(config.decimal_scale, 4);
        assert_eq!(config.samples, 7);
        assert_eq!(config.seed, Some(99));
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: GeneratorConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, GeneratorConfig::default());
    }

    #[test]
    fn test_load_save_roundtrip() {
        let dir = std::env::temp_dir().join(format!("valuegen_domain_config_rt_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("generator.yml");

        let original = GeneratorConfig {
            samples: 3,
            seed: Some(7),
            ..GeneratorConfig::default()
        };
        original.save(&path).unwrap();

        let loaded = GeneratorConfig::load(&path).unwrap();
        assert_eq!(loaded, original);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_missing_file() {
        let err = GeneratorConfig::load("/nonexistent/valuegen.yml").unwrap_err();
        assert!(matches!(err, crate::DomainError::IoError(_)));
    }
}
