/*!
# Pipeline Configuration

Settings for vocabulary mining, abstraction and dataset assembly.
Loaded from TOML or YAML; every field has a default, so a partial file
(or no file at all) is valid.

```toml
[vocabulary]
size = 10000

[abstraction]
unique_identifiers = true

[abstraction.placeholders]
FunctionDeclaration = "@function"
FunctionExpression = "@function"
ObjectExpression = "@objectlit"

[dataset]
buckets = 10
folds = 10
max_length = 500
nominal_sample_every = 5
```
*/

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::abstraction::{default_placeholders, AbstractionSettings, PlaceholderMap};
use crate::ast::NodeType;

/// Top-level pipeline configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub vocabulary: VocabularyConfig,

    #[serde(default)]
    pub abstraction: AbstractionConfig,

    #[serde(default)]
    pub dataset: DatasetConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabularyConfig {
    /// Number of words kept by the miner
    #[serde(default = "default_vocabulary_size")]
    pub size: usize,
}

fn default_vocabulary_size() -> usize {
    10_000
}

impl Default for VocabularyConfig {
    fn default() -> Self {
        Self {
            size: default_vocabulary_size(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbstractionConfig {
    /// Number abstracted identifiers within one record
    #[serde(default = "default_true")]
    pub unique_identifiers: bool,

    /// ESTree kind name to placeholder token for depth abstraction
    #[serde(default = "default_placeholder_names")]
    pub placeholders: BTreeMap<String, String>,
}

fn default_true() -> bool {
    true
}

fn default_placeholder_names() -> BTreeMap<String, String> {
    default_placeholders()
        .into_iter()
        .map(|(kind, name)| (kind.name().to_string(), name))
        .collect()
}

impl Default for AbstractionConfig {
    fn default() -> Self {
        Self {
            unique_identifiers: true,
            placeholders: default_placeholder_names(),
        }
    }
}

impl AbstractionConfig {
    /// Resolves kind names into a placeholder map
    pub fn placeholder_map(&self) -> Result<PlaceholderMap> {
        self.placeholders
            .iter()
            .map(|(kind, name)| {
                let node_type = NodeType::from_name(kind)
                    .with_context(|| format!("Unknown node kind '{}' in placeholders", kind))?;
                Ok((node_type, name.clone()))
            })
            .collect()
    }

    pub fn settings(&self) -> Result<AbstractionSettings> {
        Ok(AbstractionSettings {
            placeholders: self.placeholder_map()?,
            unique_identifiers: self.unique_identifiers,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Number of project buckets records are spread over
    #[serde(default = "default_buckets")]
    pub buckets: usize,

    /// Number of cross-validation folds
    #[serde(default = "default_buckets")]
    pub folds: usize,

    /// Longest sequence, in tokens, kept by the length filter
    #[serde(default = "default_max_length")]
    pub max_length: usize,

    /// Keep one nominal sequence in this many
    #[serde(default = "default_nominal_sample_every")]
    pub nominal_sample_every: usize,
}

fn default_buckets() -> usize {
    10
}

fn default_max_length() -> usize {
    500
}

fn default_nominal_sample_every() -> usize {
    5
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            buckets: default_buckets(),
            folds: default_buckets(),
            max_length: default_max_length(),
            nominal_sample_every: default_nominal_sample_every(),
        }
    }
}

impl PipelineConfig {
    /// Loads a `.toml`, `.yaml` or `.yml` file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        let config: Self = match extension.as_str() {
            "yaml" | "yml" => serde_yaml::from_str(&content).with_context(|| {
                format!("Failed to parse YAML config from {}", path.display())
            })?,
            _ => toml::from_str(&content).with_context(|| {
                format!("Failed to parse TOML config from {}", path.display())
            })?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Loads `path` when given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Saves configuration as TOML
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        std::fs::write(&path, content).with_context(|| {
            format!("Failed to write config to {}", path.as_ref().display())
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.vocabulary.size == 0 {
            bail!("vocabulary.size must be greater than zero");
        }
        if self.dataset.buckets == 0 {
            bail!("dataset.buckets must be greater than zero");
        }
        if self.dataset.folds == 0 || self.dataset.folds > self.dataset.buckets {
            bail!(
                "dataset.folds must be between 1 and dataset.buckets ({})",
                self.dataset.buckets
            );
        }
        if self.dataset.max_length == 0 {
            bail!("dataset.max_length must be greater than zero");
        }
        if self.dataset.nominal_sample_every == 0 {
            bail!("dataset.nominal_sample_every must be greater than zero");
        }
        self.abstraction.placeholder_map()?;
        Ok(())
    }
}
