use image::{DynamicImage, GenericImageView};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::LensError;

/// Decodes the image at `path`.
///
/// Missing files, corrupt data and unsupported formats all come back as
/// [`LensError::ImageLoad`]; presenters render a placeholder for it and carry on.
pub fn load_image(path: &Path) -> Result<DynamicImage, LensError> {
    image::open(path).map_err(|e| LensError::ImageLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// What a presenter shows in the image slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum ImageStatus {
    Loaded {
        width: u32,
        height: u32,
        #[serde(skip_serializing_if = "Option::is_none")]
        format: Option<String>,
    },
    Failed {
        message: String,
    },
    /// Decoding was not requested.
    Skipped {
        path: String,
    },
}

impl ImageStatus {
    pub fn from_result(path: &Path, res: Result<DynamicImage, LensError>) -> Self {
        match res {
            Ok(img) => {
                let (width, height) = img.dimensions();
                let format = image::ImageFormat::from_path(path)
                    .ok()
                    .map(|f| format!("{:?}", f).to_lowercase());
                ImageStatus::Loaded {
                    width,
                    height,
                    format,
                }
            }
            Err(e) => {
                tracing::warn!(
                    event = "image.load_failed",
                    path = %path.display(),
                    error = %e
                );
                ImageStatus::Failed {
                    message: format!("Could not load image: {}", path.display()),
                }
            }
        }
    }

    pub fn skipped(path: &Path) -> Self {
        ImageStatus::Skipped {
            path: path.display().to_string(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, ImageStatus::Loaded { .. })
    }
}

/// Decode and summarize in one step. Never fails.
pub fn decode_status(path: &Path) -> ImageStatus {
    ImageStatus::from_result(path, load_image(path))
}
