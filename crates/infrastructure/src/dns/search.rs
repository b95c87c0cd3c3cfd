use hickory_proto::rr::Name;
use netstack_domain::{DnsConfig, DnsQuery};
use std::str::FromStr;
use tracing::debug;

/// Candidate names to query, in order, after applying the search list.
///
/// A fully qualified name is queried as-is. A name with at least `ndots`
/// dots is tried as-is before the suffixed forms; a shorter one after them,
/// unless it is single-label or multi-label appending is disabled.
/// Candidates that cannot be encoded as a DNS name are left out.
pub fn qnames(query: &DnsQuery, config: &DnsConfig) -> Vec<String> {
    let mut names = candidates(query, config);
    names.retain(|name| match Name::from_str(name) {
        Ok(_) => true,
        Err(e) => {
            debug!(qname = %name, error = %e, "Skipping unencodable search candidate");
            false
        }
    });
    names
}

fn candidates(query: &DnsQuery, config: &DnsConfig) -> Vec<String> {
    let hostname = query.domain.as_ref();
    if query.is_fully_qualified() || config.search.is_empty() {
        return vec![hostname.trim_end_matches('.').to_string()];
    }

    let dots = query.label_dots();
    let suffixed = || {
        config
            .search
            .iter()
            .map(|suffix| format!("{}.{}", hostname, suffix.trim_end_matches('.')))
    };

    if dots >= config.ndots as usize {
        let mut names = vec![hostname.to_string()];
        if dots == 0 || config.append_to_multi_label_name {
            names.extend(suffixed());
        }
        return names;
    }

    let mut names: Vec<String> = if dots == 0 || config.append_to_multi_label_name {
        suffixed().collect()
    } else {
        Vec::new()
    };
    names.push(hostname.to_string());
    names
}
