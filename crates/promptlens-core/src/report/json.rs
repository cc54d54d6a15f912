use serde_json::json;

use crate::errors::LensError;
use crate::model::ImageId;

use super::RecordView;

pub fn record_value(view: &RecordView) -> serde_json::Value {
    json!({
        "schema_version": 1,
        "ok": true,
        "record": view,
    })
}

pub fn error_value(err: &LensError) -> serde_json::Value {
    json!({
        "schema_version": 1,
        "ok": false,
        "error": {
            "code": err.code(),
            "message": err.to_string(),
        }
    })
}

pub fn ids_value(ids: &[ImageId]) -> serde_json::Value {
    json!({ "ids": ids })
}
