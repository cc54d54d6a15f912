use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::errors::diagnostic::Diagnostic;
use crate::model::Model;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorReport {
    pub schema_version: u32,        // 1
    pub generated_at: String,       // rfc3339
    pub promptlens_version: String, // e.g. "0.1.0"
    pub platform: PlatformInfo,

    pub inputs: DoctorInputs,
    pub tables: TableSummary,
    pub images: ImageSummary,

    pub diagnostics: Vec<Diagnostic>,
    pub suggested_actions: Vec<SuggestedAction>,
    pub notes: Vec<String>,
}

impl DoctorReport {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.is_error())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformInfo {
    pub os: String,
    pub arch: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorInputs {
    pub metadata: String,
    pub images_dir: String,
    pub tables: BTreeMap<Model, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSummary {
    pub metadata_rows: u64,
    pub distinct_ids: u64,
    pub duplicate_metadata_ids: u64,
    pub models: Vec<ModelTableSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelTableSummary {
    pub model: Model,
    pub path: String,
    pub rows: u64,
    pub covered_ids: u64,
    pub duplicate_ids: u64,
    pub orphan_ids: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageSummary {
    pub referenced: u64,
    pub present: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestedAction {
    pub title: String,
    pub relates_to: Vec<String>, // diagnostic codes
}
