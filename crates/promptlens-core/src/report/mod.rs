use serde::{Deserialize, Serialize};

use crate::image::{decode_status, ImageStatus};
use crate::model::ResolvedRecord;

pub mod console;
pub mod json;

pub const DASHBOARD_TITLE: &str = "LLM Response Analysis Dashboard";

/// A resolved record plus the outcome of loading its image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordView {
    pub caption: String,
    pub image: ImageStatus,
    #[serde(flatten)]
    pub record: ResolvedRecord,
}

impl RecordView {
    pub fn new(record: ResolvedRecord, image: ImageStatus) -> Self {
        Self {
            caption: format!("Image ID: {}", record.id),
            image,
            record,
        }
    }

    /// Builds the view, decoding the image synchronously.
    pub fn with_image(record: ResolvedRecord) -> Self {
        let image = decode_status(&record.image_path);
        Self::new(record, image)
    }
}
