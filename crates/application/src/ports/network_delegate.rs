use netstack_domain::UrlRequest;
use std::path::Path;

/// Embedder policy consulted before any job touches local storage.
pub trait NetworkDelegate: Send + Sync {
    fn can_access_file(&self, request: &UrlRequest, path: &Path) -> bool;
}
