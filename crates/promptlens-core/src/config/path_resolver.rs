use std::path::{Path, PathBuf};

/// Resolves paths written in a config file relative to that file's directory.
#[derive(Clone, Debug)]
pub struct PathResolver {
    base_dir: PathBuf,
}

impl PathResolver {
    pub fn new(config_path: &Path) -> Self {
        let base_dir = config_path
            .parent()
            .unwrap_or(Path::new("."))
            .to_path_buf();
        Self { base_dir }
    }

    pub fn from_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn resolve(&self, p: &Path) -> PathBuf {
        if p.as_os_str().is_empty() || p.is_absolute() {
            return p.to_path_buf();
        }
        self.join_clean(p)
    }

    fn join_clean(&self, rel: &Path) -> PathBuf {
        let joined = self.base_dir.join(rel);

        let mut out = PathBuf::new();
        for c in joined.components() {
            use std::path::Component::*;
            match c {
                CurDir => {}
                ParentDir => {
                    out.pop();
                }
                RootDir | Prefix(_) | Normal(_) => out.push(c.as_os_str()),
            }
        }
        out
    }
}
