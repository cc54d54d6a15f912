use crate::errors::LensError;
use crate::model::Model;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub mod path_resolver;

use path_resolver::PathResolver;

pub const SUPPORTED_CONFIG_VERSION: u32 = 1;
pub const DEFAULT_CONFIG_FILE: &str = "promptlens.yaml";

/// Where the dataset lives on disk.
///
/// `data_dir` is relative to the config file (or the working directory when
/// no file is used); every other path is relative to `data_dir`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetConfig {
    #[serde(default = "default_version", alias = "configVersion")]
    pub version: u32,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_metadata")]
    pub metadata: PathBuf,
    #[serde(default = "default_images_dir")]
    pub images_dir: PathBuf,
    #[serde(default)]
    pub models: ModelTables,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelTables {
    #[serde(default = "default_gemini")]
    pub gemini: PathBuf,
    #[serde(default = "default_gpt4")]
    pub gpt4: PathBuf,
    #[serde(default = "default_llama")]
    pub llama: PathBuf,
}

impl Default for ModelTables {
    fn default() -> Self {
        Self {
            gemini: default_gemini(),
            gpt4: default_gpt4(),
            llama: default_llama(),
        }
    }
}

fn default_version() -> u32 {
    SUPPORTED_CONFIG_VERSION
}
fn default_data_dir() -> PathBuf {
    PathBuf::from("Data")
}
fn default_metadata() -> PathBuf {
    PathBuf::from("metadata.csv")
}
fn default_images_dir() -> PathBuf {
    PathBuf::from("images")
}
fn default_gemini() -> PathBuf {
    PathBuf::from(Model::Gemini.default_table_path())
}
fn default_gpt4() -> PathBuf {
    PathBuf::from(Model::Gpt4.default_table_path())
}
fn default_llama() -> PathBuf {
    PathBuf::from(Model::Llama.default_table_path())
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            version: SUPPORTED_CONFIG_VERSION,
            data_dir: default_data_dir(),
            metadata: default_metadata(),
            images_dir: default_images_dir(),
            models: ModelTables::default(),
        }
    }
}

impl DatasetConfig {
    /// Config rooted at `data_dir` with the default file layout.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.data_path(&self.metadata)
    }

    pub fn images_dir(&self) -> PathBuf {
        self.data_path(&self.images_dir)
    }

    pub fn table_path(&self, model: Model) -> PathBuf {
        let rel = match model {
            Model::Gemini => &self.models.gemini,
            Model::Gpt4 => &self.models.gpt4,
            Model::Llama => &self.models.llama,
        };
        self.data_path(rel)
    }

    fn data_path(&self, rel: &Path) -> PathBuf {
        PathResolver::from_dir(&self.data_dir).resolve(rel)
    }
}

pub fn load_config(path: &Path, strict: bool) -> Result<DatasetConfig, LensError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| LensError::Config(format!("failed to read config {}: {}", path.display(), e)))?;

    let mut ignored_keys = std::collections::BTreeSet::new();
    let deserializer = serde_yaml::Deserializer::from_str(&raw);

    let mut cfg: DatasetConfig = serde_ignored::deserialize(deserializer, |p| {
        ignored_keys.insert(p.to_string());
    })
    .map_err(|e| LensError::Config(format!("failed to parse YAML: {}", e)))?;

    let meaningful_unknowns: Vec<_> = ignored_keys
        .iter()
        .filter(|k| !k.starts_with('_') && !k.starts_with("x-"))
        .collect();

    if !meaningful_unknowns.is_empty() {
        if strict {
            return Err(LensError::Config(format!(
                "Unknown fields detected in strict mode: {:?} (file: {})",
                meaningful_unknowns,
                path.display()
            )));
        }
        tracing::warn!(
            event = "config.unknown_fields",
            fields = ?meaningful_unknowns,
            file = %path.display(),
            "ignored unknown config fields"
        );
    }

    if cfg.version != SUPPORTED_CONFIG_VERSION {
        return Err(LensError::Config(format!(
            "unsupported config version {} (supported: {})",
            cfg.version, SUPPORTED_CONFIG_VERSION
        )));
    }

    let r = PathResolver::new(path);
    cfg.data_dir = r.resolve(&cfg.data_dir);

    Ok(cfg)
}

/// Explicit path wins; otherwise `promptlens.yaml` in the working directory if
/// present; otherwise the built-in layout.
pub fn discover_config(explicit: Option<&Path>, strict: bool) -> Result<DatasetConfig, LensError> {
    match explicit {
        Some(p) => load_config(p, strict),
        None => {
            let default = Path::new(DEFAULT_CONFIG_FILE);
            if default.exists() {
                load_config(default, strict)
            } else {
                Ok(DatasetConfig::default())
            }
        }
    }
}

pub fn write_sample_config(path: &Path) -> Result<(), LensError> {
    std::fs::write(
        path,
        r#"version: 1
data_dir: Data
metadata: metadata.csv
images_dir: images
models:
  gemini: Gemini/llm_responses_combined.csv
  gpt4: GPT-4o/llm_responses_combined.csv
  llama: llama-3.2/llm_responses_combined.csv
"#,
    )
    .map_err(|e| LensError::Config(format!("failed to write sample config: {}", e)))?;
    Ok(())
}
