//! Compiler configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Default upper bound on the number of groups a filter may expand to.
pub const DEFAULT_MAX_GROUPS: usize = 256;

/// Default upper bound on how deeply a filter expression may nest.
pub const DEFAULT_MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CompilerConfig {
    /// Largest number of OR-groups a filter may expand to after distribution.
    /// Filters above the bound fail instead of being expanded.
    #[serde(default = "default_max_groups")]
    pub max_groups: usize,

    /// Deepest expression tree accepted. Checked before any recursive pass
    /// walks the tree.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    #[serde(default)]
    pub xml: XmlOptions,
}

/// Output options for the wire form.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct XmlOptions {
    /// Emit the `<?xml version="1.0"?>` declaration.
    #[serde(default = "default_declaration")]
    pub declaration: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            max_groups: DEFAULT_MAX_GROUPS,
            max_depth: DEFAULT_MAX_DEPTH,
            xml: XmlOptions::default(),
        }
    }
}

impl Default for XmlOptions {
    fn default() -> Self {
        Self {
            declaration: default_declaration(),
        }
    }
}

fn default_max_groups() -> usize {
    DEFAULT_MAX_GROUPS
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_declaration() -> bool {
    true
}

impl CompilerConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, anyhow::Error> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    pub fn from_yaml(contents: &str) -> Result<Self, anyhow::Error> {
        let config: CompilerConfig = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.max_groups == 0 {
            anyhow::bail!("max_groups must be at least 1");
        }
        if self.max_depth == 0 {
            anyhow::bail!("max_depth must be at least 1");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_defaults() {
        let config = CompilerConfig::default();
        assert_eq!(config.max_groups, 256);
        assert_eq!(config.max_depth, 256);
        assert!(config.xml.declaration);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_yaml_fills_defaults() {
        let config = CompilerConfig::from_yaml("max_groups: 16\n").unwrap();
        assert_eq!(config.max_groups, 16);
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
        assert!(config.xml.declaration);

        let config = CompilerConfig::from_yaml("xml:\n  declaration: false\n").unwrap();
        assert_eq!(config.max_groups, DEFAULT_MAX_GROUPS);
        assert!(!config.xml.declaration);
    }

    #[test]
    fn test_zero_max_groups_is_invalid() {
        let err = CompilerConfig::from_yaml("max_groups: 0\n").unwrap_err();
        assert!(err.to_string().contains("max_groups"));
    }

    #[test]
    fn test_zero_max_depth_is_invalid() {
        let err = CompilerConfig::from_yaml("max_depth: 0\n").unwrap_err();
        assert!(err.to_string().contains("max_depth"));

        let config = CompilerConfig::from_yaml("max_depth: 32\n").unwrap();
        assert_eq!(config.max_depth, 32);
    }

    #[test]
    fn test_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_groups: 8").unwrap();

        let config = CompilerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.max_groups, 8);
    }
}
