use std::path::{Path, PathBuf, MAIN_SEPARATOR};
use url::Url;

/// Local path named by a `file:` URL, percent-decoded.
///
/// `None` for URLs that do not name a local file, such as ones with a
/// remote host. A trailing slash in the URL is kept in the path.
pub fn file_url_to_path(url: &Url) -> Option<PathBuf> {
    if url.scheme() != "file" {
        return None;
    }
    url.to_file_path().ok()
}

/// Lexical check; the filesystem is not consulted.
pub fn ends_with_separator(path: &Path) -> bool {
    path.to_string_lossy().ends_with(MAIN_SEPARATOR)
}

/// The same URL with a `/` appended to its path.
pub fn with_trailing_slash(url: &Url) -> Url {
    let mut url = url.clone();
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
