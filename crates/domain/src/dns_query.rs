use super::RecordType;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsQuery {
    pub domain: Arc<str>,
    pub record_type: RecordType,
}

impl DnsQuery {
    pub fn new(domain: impl Into<Arc<str>>, record_type: RecordType) -> Self {
        Self {
            domain: domain.into(),
            record_type,
        }
    }

    /// True when the name ends with a dot and must not be search-expanded.
    pub fn is_fully_qualified(&self) -> bool {
        self.domain.ends_with('.')
    }

    /// Number of interior dots, as counted against `ndots`.
    pub fn label_dots(&self) -> usize {
        self.domain.trim_end_matches('.').matches('.').count()
    }
}
