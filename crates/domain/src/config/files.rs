use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Which parts of the filesystem `file:` requests may read.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct FileAccessConfig {
    #[serde(default)]
    pub allowed_roots: Vec<PathBuf>,
}

impl FileAccessConfig {
    pub fn allows(&self, path: &Path) -> bool {
        self.allowed_roots.iter().any(|root| path.starts_with(root))
    }
}
