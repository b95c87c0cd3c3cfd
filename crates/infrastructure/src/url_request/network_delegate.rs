use netstack_application::ports::NetworkDelegate;
use netstack_domain::{FileAccessConfig, UrlRequest};
use std::path::Path;
use tracing::debug;

/// Grants access to files below the configured roots only.
#[derive(Debug, Clone, Default)]
pub struct PathPrefixNetworkDelegate {
    config: FileAccessConfig,
}

impl PathPrefixNetworkDelegate {
    pub fn new(config: FileAccessConfig) -> Self {
        Self { config }
    }
}

impl NetworkDelegate for PathPrefixNetworkDelegate {
    fn can_access_file(&self, request: &UrlRequest, path: &Path) -> bool {
        let allowed = self.config.allows(path);
        if !allowed {
            debug!(url = %request, path = %path.display(), "File access denied");
        }
        allowed
    }
}
