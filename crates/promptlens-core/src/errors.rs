use std::path::PathBuf;

use crate::model::ImageId;

pub mod diagnostic;

pub use diagnostic::Diagnostic;

/// Failures surfaced by the dataset and resolution layers.
///
/// `DataLoad` and `Config` are startup failures. The remaining variants are
/// scoped to a single selection: callers report them and keep the session alive.
#[derive(Debug, thiserror::Error)]
pub enum LensError {
    #[error("failed to load {}: {reason}", path.display())]
    DataLoad { path: PathBuf, reason: String },

    #[error("record not found: no metadata row for id '{0}'")]
    RecordNotFound(ImageId),

    #[error("original content missing: Gemini table has no row for id '{0}'")]
    OriginalContentMissing(ImageId),

    #[error("could not load image {}: {reason}", path.display())]
    ImageLoad { path: PathBuf, reason: String },

    #[error("config error: {0}")]
    Config(String),
}

impl LensError {
    pub fn data_load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        LensError::DataLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Load-time errors stop startup; everything else only fails the current selection.
    pub fn is_fatal(&self) -> bool {
        matches!(self, LensError::DataLoad { .. } | LensError::Config(_))
    }

    /// Stable machine-readable code, shared by the CLI JSON output and the server.
    pub fn code(&self) -> &'static str {
        match self {
            LensError::DataLoad { .. } => diagnostic::codes::E_DATA_LOAD,
            LensError::RecordNotFound(_) => diagnostic::codes::E_RECORD_NOT_FOUND,
            LensError::OriginalContentMissing(_) => diagnostic::codes::E_ORIGINAL_MISSING,
            LensError::ImageLoad { .. } => diagnostic::codes::E_IMAGE_LOAD,
            LensError::Config(_) => diagnostic::codes::E_CFG_PARSE,
        }
    }
}
