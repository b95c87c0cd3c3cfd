use std::net::IpAddr;

/// Orders resolved addresses by destination-selection preference.
///
/// Implementations must be deterministic and free of interior mutation so a
/// single sorter can be shared for the lifetime of the process.
pub trait AddressSorter: Send + Sync {
    fn sort(&self, addresses: &[IpAddr]) -> Vec<IpAddr>;
}
