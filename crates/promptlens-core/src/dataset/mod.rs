use once_cell::sync::OnceCell;
use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::DatasetConfig;
use crate::errors::LensError;
use crate::model::{first_match, ImageId, MetadataRecord, Model, ModelResponseRecord};

pub mod loader;

/// One model's response table, rows in file order.
#[derive(Debug, Clone, Default)]
pub struct ResponseTable {
    pub rows: Vec<ModelResponseRecord>,
}

impl ResponseTable {
    pub fn first(&self, id: &ImageId) -> Option<&ModelResponseRecord> {
        first_match(&self.rows, id)
    }
}

/// The four tables, loaded once and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub metadata: Vec<MetadataRecord>,
    pub responses: BTreeMap<Model, ResponseTable>,
    pub images_dir: PathBuf,
}

impl Dataset {
    pub fn from_parts(
        metadata: Vec<MetadataRecord>,
        responses: BTreeMap<Model, ResponseTable>,
        images_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            metadata,
            responses,
            images_dir: images_dir.into(),
        }
    }

    /// Distinct metadata ids in order of first appearance; the selector's contents.
    pub fn ids(&self) -> Vec<ImageId> {
        let mut seen = HashSet::new();
        self.metadata
            .iter()
            .filter(|r| seen.insert(&r.id))
            .map(|r| r.id.clone())
            .collect()
    }

    pub fn metadata_for(&self, id: &ImageId) -> Option<&MetadataRecord> {
        first_match(&self.metadata, id)
    }

    pub fn table(&self, model: Model) -> Option<&ResponseTable> {
        self.responses.get(&model)
    }

    pub fn response_for(&self, model: Model, id: &ImageId) -> Option<&ModelResponseRecord> {
        self.table(model).and_then(|t| t.first(id))
    }
}

/// Reads the metadata table and all three response tables.
///
/// Any failure is a [`LensError::DataLoad`]; nothing is usable without all four.
pub fn load_data(cfg: &DatasetConfig) -> Result<Dataset, LensError> {
    let metadata_path = cfg.metadata_path();
    let metadata = loader::read_metadata(&metadata_path)?;
    tracing::info!(
        event = "dataset.table_loaded",
        table = "metadata",
        path = %metadata_path.display(),
        rows = metadata.len()
    );

    let mut responses = BTreeMap::new();
    for model in Model::ALL {
        let path = cfg.table_path(model);
        let rows = loader::read_responses(&path)?;
        tracing::info!(
            event = "dataset.table_loaded",
            table = model.label(),
            path = %path.display(),
            rows = rows.len()
        );
        responses.insert(model, ResponseTable { rows });
    }

    Ok(Dataset::from_parts(metadata, responses, cfg.images_dir()))
}

/// Loads the dataset on first use and hands out the same copy afterwards.
///
/// Clones share the cell, so one handle can be given to every session of a
/// process and the files are still read exactly once. A failed load is not
/// cached: the next call tries again.
#[derive(Debug, Clone)]
pub struct LazyDataset {
    cfg: DatasetConfig,
    cell: Arc<OnceCell<Arc<Dataset>>>,
}

impl LazyDataset {
    pub fn new(cfg: DatasetConfig) -> Self {
        Self {
            cfg,
            cell: Arc::new(OnceCell::new()),
        }
    }

    pub fn config(&self) -> &DatasetConfig {
        &self.cfg
    }

    pub fn get(&self) -> Result<Arc<Dataset>, LensError> {
        self.cell
            .get_or_try_init(|| load_data(&self.cfg).map(Arc::new))
            .map(Arc::clone)
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }
}
