use std::env;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub max_msg_bytes: usize,
    pub image_timeout_ms: u64,
    pub cache_entries: u64,
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            max_msg_bytes: 64_000,
            image_timeout_ms: 2000,
            cache_entries: 256,
            log_level: "info".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(v) = env::var("PROMPTLENS_MAX_BYTES") {
            if let Ok(n) = v.parse() {
                cfg.max_msg_bytes = n;
            }
        }
        if let Ok(v) = env::var("PROMPTLENS_IMAGE_TIMEOUT_MS") {
            if let Ok(n) = v.parse() {
                cfg.image_timeout_ms = n;
            }
        }
        if let Ok(v) = env::var("PROMPTLENS_CACHE_ENTRIES") {
            if let Ok(n) = v.parse() {
                cfg.cache_entries = n;
            }
        }
        if let Ok(v) = env::var("PROMPTLENS_LOG") {
            cfg.log_level = v;
        }
        cfg
    }
}
