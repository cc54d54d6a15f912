use std::collections::BTreeMap;

use crate::dataset::Dataset;
use crate::errors::LensError;
use crate::model::{
    ImageId, Model, ModelPanel, OriginalContent, ResolvedRecord, Strategy, ORIGINAL_CONTENT_MODEL,
};

/// Resolves everything shown for one selected id.
///
/// Pure lookup over the loaded tables: the first matching row wins in every
/// table, the image path is `images_dir/image_name` with no existence check, and
/// a model without a row becomes [`ModelPanel::Unavailable`] instead of failing.
pub fn resolve(selected: &ImageId, dataset: &Dataset) -> Result<ResolvedRecord, LensError> {
    let meta = dataset
        .metadata_for(selected)
        .ok_or_else(|| LensError::RecordNotFound(selected.clone()))?;

    let image_path = dataset.images_dir.join(&meta.image_name);

    let original_row = dataset
        .response_for(ORIGINAL_CONTENT_MODEL, selected)
        .ok_or_else(|| LensError::OriginalContentMissing(selected.clone()))?;
    let original = OriginalContent {
        title: original_row.title.clone(),
        body: original_row.body.clone(),
    };

    let mut models = BTreeMap::new();
    for model in Model::ALL {
        let panel = match dataset.response_for(model, selected) {
            Some(row) => ModelPanel::Available {
                outputs: Strategy::ALL
                    .into_iter()
                    .map(|s| (s, row.output(s)))
                    .collect(),
            },
            None => {
                tracing::debug!(
                    event = "resolve.model_unavailable",
                    id = %selected,
                    model = model.label()
                );
                ModelPanel::Unavailable
            }
        };
        models.insert(model, panel);
    }

    Ok(ResolvedRecord {
        id: selected.clone(),
        image_path,
        original,
        models,
    })
}
