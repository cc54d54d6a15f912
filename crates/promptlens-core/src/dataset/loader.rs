use serde::de::DeserializeOwned;
use std::path::Path;

use crate::errors::LensError;
use crate::model::{MetadataRecord, ModelResponseRecord};

pub const METADATA_COLUMNS: &[&str] = &["id", "image_name"];

pub const RESPONSE_COLUMNS: &[&str] = &[
    "Id",
    "Title",
    "Body",
    "llm_zero_shot_title",
    "llm_zero_shot_body",
    "llm_zero_shot_combined",
    "llm_few_shot_title",
    "llm_few_shot_body",
    "llm_few_shot_combined",
    "llm_cot_title",
    "llm_cot_body",
    "llm_cot_combined",
];

/// Reads every row of a headed CSV file into `T`, preserving file order.
///
/// Columns are matched by header name; extra columns are ignored. The header
/// must name every column in `required`, even when the table has no rows.
pub fn read_table<T: DeserializeOwned>(path: &Path, required: &[&str]) -> Result<Vec<T>, LensError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .trim(csv::Trim::Headers)
        .from_path(path)
        .map_err(|e| LensError::data_load(path, e))?;

    let headers = reader
        .headers()
        .map_err(|e| LensError::data_load(path, e))?;
    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .collect();
    if !missing.is_empty() {
        return Err(LensError::data_load(
            path,
            format!("missing column {}", missing.join(", ")),
        ));
    }

    let mut rows = Vec::new();
    for (i, rec) in reader.deserialize::<T>().enumerate() {
        // header is line 1, first data row is line 2
        let row = rec.map_err(|e| LensError::data_load(path, format!("row {}: {}", i + 2, e)))?;
        rows.push(row);
    }
    Ok(rows)
}

pub fn read_metadata(path: &Path) -> Result<Vec<MetadataRecord>, LensError> {
    read_table(path, METADATA_COLUMNS)
}

pub fn read_responses(path: &Path) -> Result<Vec<ModelResponseRecord>, LensError> {
    read_table(path, RESPONSE_COLUMNS)
}
