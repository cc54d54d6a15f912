pub mod model;

use chrono::Utc;
use serde_json::json;
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::config::DatasetConfig;
use crate::dataset::Dataset;
use crate::errors::diagnostic::{codes, Diagnostic};
use crate::model::{ImageId, Keyed, Model, ORIGINAL_CONTENT_MODEL};

use model::*;

/// Ids listed per diagnostic before truncating.
const SAMPLE_IDS: usize = 10;

/// Checks the loaded tables against the assumptions resolution relies on.
///
/// Nothing here is fatal: the report lists which selections will fail
/// (`E_*`) and which will render partially (`W_*`).
pub fn doctor(dataset: &Dataset, cfg: &DatasetConfig) -> DoctorReport {
    let mut diagnostics = vec![];
    let mut notes = vec![];

    let ids = dataset.ids();
    let id_set: HashSet<&ImageId> = ids.iter().collect();

    let dup_meta = duplicates(&dataset.metadata);
    if !dup_meta.is_empty() {
        diagnostics.push(id_diagnostic(
            codes::W_DUPLICATE_ID,
            "metadata",
            "metadata rows share an id; the first row is used",
            &dup_meta,
        ));
    }

    let mut model_summaries = vec![];
    for m in Model::ALL {
        let rows = dataset.table(m).map(|t| t.rows.as_slice()).unwrap_or(&[]);
        let present: HashSet<&ImageId> = rows.iter().map(|r| r.key()).collect();

        let missing: Vec<ImageId> = ids
            .iter()
            .filter(|id| !present.contains(id))
            .cloned()
            .collect();
        let orphans: Vec<ImageId> = distinct_in_order(rows.iter().map(|r| r.key()))
            .into_iter()
            .filter(|id| !id_set.contains(id))
            .collect();
        let dups = duplicates(rows);

        if !missing.is_empty() {
            if m == ORIGINAL_CONTENT_MODEL {
                diagnostics.push(id_diagnostic(
                    codes::E_ORIGINAL_MISSING,
                    m.label(),
                    "ids have no original content and cannot be displayed",
                    &missing,
                ));
            }
            diagnostics.push(id_diagnostic(
                codes::W_MODEL_MISSING,
                m.label(),
                "ids have no response and will show as unavailable",
                &missing,
            ));
        }
        if !dups.is_empty() {
            diagnostics.push(id_diagnostic(
                codes::W_DUPLICATE_ID,
                m.label(),
                "response rows share an id; the first row is used",
                &dups,
            ));
        }
        if !orphans.is_empty() {
            diagnostics.push(id_diagnostic(
                codes::W_ORPHAN_RESPONSE,
                m.label(),
                "response ids are not in metadata and can never be selected",
                &orphans,
            ));
        }

        model_summaries.push(ModelTableSummary {
            model: m,
            path: cfg.table_path(m).display().to_string(),
            rows: rows.len() as u64,
            covered_ids: (ids.len() - missing.len()) as u64,
            duplicate_ids: dups.len() as u64,
            orphan_ids: orphans.len() as u64,
        });
    }

    // Only the image each id actually resolves to is checked.
    let mut missing_images = vec![];
    let mut present_images = 0u64;
    for id in &ids {
        if let Some(meta) = dataset.metadata_for(id) {
            if dataset.images_dir.join(&meta.image_name).is_file() {
                present_images += 1;
            } else {
                missing_images.push(id.clone());
            }
        }
    }
    if !missing_images.is_empty() {
        diagnostics.push(id_diagnostic(
            codes::W_IMAGE_MISSING,
            "images",
            "ids reference an image file that does not exist",
            &missing_images,
        ));
    }
    if !dataset.images_dir.is_dir() {
        notes.push(format!(
            "images directory {} does not exist",
            dataset.images_dir.display()
        ));
    }

    let suggested_actions = suggest_from(&diagnostics);

    DoctorReport {
        schema_version: 1,
        generated_at: Utc::now().to_rfc3339(),
        promptlens_version: env!("CARGO_PKG_VERSION").to_string(),
        platform: PlatformInfo {
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
        },
        inputs: DoctorInputs {
            metadata: cfg.metadata_path().display().to_string(),
            images_dir: dataset.images_dir.display().to_string(),
            tables: Model::ALL
                .into_iter()
                .map(|m| (m, cfg.table_path(m).display().to_string()))
                .collect::<BTreeMap<_, _>>(),
        },
        tables: TableSummary {
            metadata_rows: dataset.metadata.len() as u64,
            distinct_ids: ids.len() as u64,
            duplicate_metadata_ids: dup_meta.len() as u64,
            models: model_summaries,
        },
        images: ImageSummary {
            referenced: ids.len() as u64,
            present: present_images,
        },
        diagnostics,
        suggested_actions,
        notes,
    }
}

fn distinct_in_order<'a>(keys: impl Iterator<Item = &'a ImageId>) -> Vec<ImageId> {
    let mut seen = HashSet::new();
    keys.filter(|k| seen.insert(*k)).cloned().collect()
}

/// Ids occurring more than once, in order of first appearance.
fn duplicates<T: Keyed>(rows: &[T]) -> Vec<ImageId> {
    let mut counts: HashMap<&ImageId, usize> = HashMap::new();
    for r in rows {
        *counts.entry(r.key()).or_insert(0) += 1;
    }
    distinct_in_order(rows.iter().map(|r| r.key()))
        .into_iter()
        .filter(|id| counts.get(id).copied().unwrap_or(0) > 1)
        .collect()
}

fn id_diagnostic(code: &str, source: &str, what: &str, ids: &[ImageId]) -> Diagnostic {
    let sample: Vec<&str> = ids.iter().take(SAMPLE_IDS).map(|i| i.as_str()).collect();
    let more = ids.len().saturating_sub(SAMPLE_IDS);
    let listed = if more > 0 {
        format!("{} (+{} more)", sample.join(", "), more)
    } else {
        sample.join(", ")
    };
    Diagnostic::new(code, format!("{} {}: {}", ids.len(), what, listed))
        .with_source(source)
        .with_context(json!({ "count": ids.len(), "ids": sample }))
}

fn suggest_from(diags: &[Diagnostic]) -> Vec<SuggestedAction> {
    let has = |code: &str| diags.iter().any(|d| d.code == code);
    let mut out = vec![];

    if has(codes::E_ORIGINAL_MISSING) {
        out.push(SuggestedAction {
            title: format!(
                "Add {} rows for the listed ids, or drop them from metadata",
                ORIGINAL_CONTENT_MODEL.label()
            ),
            relates_to: vec![codes::E_ORIGINAL_MISSING.into()],
        });
    }
    if has(codes::W_IMAGE_MISSING) {
        out.push(SuggestedAction {
            title: "Copy the missing images into the images directory or fix image_name".into(),
            relates_to: vec![codes::W_IMAGE_MISSING.into()],
        });
    }
    if has(codes::W_DUPLICATE_ID) {
        out.push(SuggestedAction {
            title: "Deduplicate ids; only the first row of each id is ever shown".into(),
            relates_to: vec![codes::W_DUPLICATE_ID.into()],
        });
    }
    if has(codes::W_ORPHAN_RESPONSE) {
        out.push(SuggestedAction {
            title: "Add metadata rows for orphaned response ids".into(),
            relates_to: vec![codes::W_ORPHAN_RESPONSE.into()],
        });
    }
    out
}
