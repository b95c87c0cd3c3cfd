use crate::NetError;
use std::fmt;
use url::Url;

/// An outgoing request as seen by protocol handlers. Only the URL matters to
/// dispatch; everything else about the request belongs to the job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlRequest {
    url: Url,
}

impl UrlRequest {
    pub fn new(url: Url) -> Self {
        Self { url }
    }

    pub fn parse(input: &str) -> Result<Self, NetError> {
        Url::parse(input)
            .map(Self::new)
            .map_err(|_| NetError::InvalidUrl)
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }
}

impl fmt::Display for UrlRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url)
    }
}
