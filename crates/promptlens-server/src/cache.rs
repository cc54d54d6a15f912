use moka::sync::Cache;
use std::sync::Arc;

use promptlens_core::model::ImageId;
use promptlens_core::report::RecordView;

/// Resolved views keyed by canonical id.
///
/// Resolution is a pure function of the loaded tables, so entries never go
/// stale for the lifetime of the process. Failed selections are not cached.
pub struct RecordCache {
    views: Cache<ImageId, Arc<RecordView>>,
}

impl RecordCache {
    pub fn new(max_entries: u64) -> Self {
        Self {
            views: Cache::new(max_entries),
        }
    }

    pub fn get(&self, id: &ImageId) -> Option<Arc<RecordView>> {
        self.views.get(id)
    }

    pub fn insert(&self, id: ImageId, view: Arc<RecordView>) {
        self.views.insert(id, view);
    }
}
