use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use promptlens_core::config::DatasetConfig;
use promptlens_core::doctor::doctor;
use promptlens_core::image::{decode_status, ImageStatus};
use promptlens_core::model::ImageId;
use promptlens_core::report::RecordView;
use promptlens_core::{resolve, Dataset, LensError};

use crate::cache::RecordCache;
use crate::config::ServerConfig;

/// Shared by every request. The dataset is read-only; per-request state
/// (the selected id) only ever travels in `params`.
pub struct MethodContext {
    pub dataset: Arc<Dataset>,
    pub dataset_cfg: DatasetConfig,
    pub cfg: ServerConfig,
    pub cache: RecordCache,
}

impl MethodContext {
    pub fn new(dataset: Arc<Dataset>, dataset_cfg: DatasetConfig, cfg: ServerConfig) -> Self {
        let cache = RecordCache::new(cfg.cache_entries);
        Self {
            dataset,
            dataset_cfg,
            cfg,
            cache,
        }
    }
}

#[derive(Debug)]
pub enum MethodError {
    NotFound(String),
    InvalidParams(String),
    Internal(String),
    Lens(LensError),
}

impl MethodError {
    pub fn rpc_code(&self) -> i32 {
        match self {
            MethodError::NotFound(_) => -32601,
            MethodError::InvalidParams(_) => -32602,
            MethodError::Internal(_) => -32603,
            MethodError::Lens(LensError::RecordNotFound(_)) => -32004,
            MethodError::Lens(LensError::OriginalContentMissing(_)) => -32005,
            MethodError::Lens(_) => -32603,
        }
    }

    pub fn message(&self) -> String {
        match self {
            MethodError::NotFound(m) => format!("Method not found: {}", m),
            MethodError::InvalidParams(m) => m.clone(),
            MethodError::Internal(m) => format!("Internal error: {}", m),
            MethodError::Lens(e) => e.to_string(),
        }
    }

    pub fn data(&self) -> Option<Value> {
        match self {
            MethodError::Lens(e) => Some(json!({ "code": e.code() })),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for MethodError {
    fn from(e: serde_json::Error) -> Self {
        MethodError::Internal(e.to_string())
    }
}

impl From<LensError> for MethodError {
    fn from(e: LensError) -> Self {
        MethodError::Lens(e)
    }
}

pub fn list_methods() -> Vec<Value> {
    vec![
        json!({
            "name": "dataset/ids",
            "description": "Selectable image ids in first-appearance order."
        }),
        json!({
            "name": "record/resolve",
            "description": "Image, original content and every model/strategy response for one id.",
            "params": {
                "type": "object",
                "properties": { "id": { "type": ["string", "integer"] } },
                "required": ["id"]
            }
        }),
        json!({
            "name": "dataset/doctor",
            "description": "Dataset health report."
        }),
    ]
}

pub async fn handle_call(
    ctx: &MethodContext,
    method: &str,
    params: Option<&Value>,
) -> Result<Value, MethodError> {
    match method {
        "dataset/ids" => Ok(json!({ "ids": ctx.dataset.ids() })),
        "record/resolve" => {
            let id = id_param(params)?;
            let view = resolve_view(ctx, &id).await?;
            Ok(serde_json::to_value(&*view)?)
        }
        "dataset/doctor" => {
            let report = doctor(&ctx.dataset, &ctx.dataset_cfg);
            Ok(serde_json::to_value(&report)?)
        }
        "methods/list" => Ok(json!({ "methods": list_methods() })),
        _ => Err(MethodError::NotFound(method.to_string())),
    }
}

fn id_param(params: Option<&Value>) -> Result<ImageId, MethodError> {
    let raw = params
        .and_then(|p| p.get("id"))
        .ok_or_else(|| MethodError::InvalidParams("missing param: id".into()))?;
    match raw {
        Value::String(s) => Ok(ImageId::new(s)),
        Value::Number(n) => Ok(ImageId::new(&n.to_string())),
        other => Err(MethodError::InvalidParams(format!(
            "id must be a string or number, got {}",
            other
        ))),
    }
}

async fn resolve_view(ctx: &MethodContext, id: &ImageId) -> Result<Arc<RecordView>, MethodError> {
    if let Some(hit) = ctx.cache.get(id) {
        return Ok(hit);
    }

    let record = resolve(id, &ctx.dataset)?;
    let path = record.image_path.clone();
    let decode = tokio::task::spawn_blocking({
        let path = path.clone();
        move || decode_status(&path)
    });

    let image = match timeout(Duration::from_millis(ctx.cfg.image_timeout_ms), decode).await {
        Ok(Ok(status)) => status,
        Ok(Err(join_err)) => ImageStatus::Failed {
            message: format!("Could not load image: {} ({})", path.display(), join_err),
        },
        Err(_) => {
            tracing::warn!(
                event = "image_timeout",
                id = %id,
                path = %path.display(),
                timeout_ms = ctx.cfg.image_timeout_ms
            );
            // not cached: a later request may decode in time
            return Ok(Arc::new(RecordView::new(
                record,
                ImageStatus::Failed {
                    message: format!(
                        "Could not load image: {} (exceeded {}ms)",
                        path.display(),
                        ctx.cfg.image_timeout_ms
                    ),
                },
            )));
        }
    };

    let view = Arc::new(RecordView::new(record, image));
    ctx.cache.insert(id.clone(), Arc::clone(&view));
    Ok(view)
}
