//! Destination address selection (RFC 6724 §6)
//!
//! Implements rules 1, 2, 3, 5, 6, 8 and 9. Rules 4 (home addresses) and 7
//! (native transport) need interface data that is not available here; rule
//! 10 falls out of the stable sort.

use netstack_application::ports::AddressSorter;
use socket2::{Domain, Protocol, SockAddr, Socket, Type};
use std::cmp::Ordering;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::Arc;
use tracing::debug;

/// Source address the host would use toward a destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceAddress {
    pub address: IpAddr,
    pub deprecated: bool,
}

impl SourceAddress {
    pub fn new(address: IpAddr) -> Self {
        Self {
            address,
            deprecated: false,
        }
    }
}

/// Asks the routing layer which source address reaches `destination`.
pub trait SourceAddressLookup: Send + Sync {
    /// `None` when the destination is unreachable.
    fn source_for(&self, destination: IpAddr) -> Option<SourceAddress>;
}

/// Lets the kernel pick a route by connecting an unbound UDP socket. No
/// packet leaves the host.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemSourceLookup;

impl SourceAddressLookup for SystemSourceLookup {
    fn source_for(&self, destination: IpAddr) -> Option<SourceAddress> {
        let domain = if destination.is_ipv4() {
            Domain::IPV4
        } else {
            Domain::IPV6
        };
        let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP)).ok()?;
        let target = SockAddr::from(SocketAddr::new(destination, 80));
        if let Err(e) = socket.connect(&target) {
            debug!(destination = %destination, error = %e, "No route to destination");
            return None;
        }
        let local = socket.local_addr().ok()?.as_socket()?;
        Some(SourceAddress::new(local.ip()))
    }
}

struct PolicyEntry {
    prefix: Ipv6Addr,
    prefix_len: u32,
    precedence: u8,
    label: u8,
}

const fn policy(prefix: Ipv6Addr, prefix_len: u32, precedence: u8, label: u8) -> PolicyEntry {
    PolicyEntry {
        prefix,
        prefix_len,
        precedence,
        label,
    }
}

/// Default policy table (RFC 6724 §2.1), longest prefix first.
static POLICY_TABLE: [PolicyEntry; 9] = [
    policy(Ipv6Addr::LOCALHOST, 128, 50, 0),
    policy(Ipv6Addr::new(0, 0, 0, 0, 0, 0xffff, 0, 0), 96, 35, 4),
    policy(Ipv6Addr::UNSPECIFIED, 96, 1, 3),
    policy(Ipv6Addr::new(0x2001, 0, 0, 0, 0, 0, 0, 0), 32, 5, 5),
    policy(Ipv6Addr::new(0x2002, 0, 0, 0, 0, 0, 0, 0), 16, 30, 2),
    policy(Ipv6Addr::new(0x3ffe, 0, 0, 0, 0, 0, 0, 0), 16, 1, 12),
    policy(Ipv6Addr::new(0xfec0, 0, 0, 0, 0, 0, 0, 0), 10, 1, 11),
    policy(Ipv6Addr::new(0xfc00, 0, 0, 0, 0, 0, 0, 0), 7, 3, 13),
    policy(Ipv6Addr::UNSPECIFIED, 0, 40, 1),
];

const SCOPE_LINK_LOCAL: u8 = 0x2;
const SCOPE_SITE_LOCAL: u8 = 0x5;
const SCOPE_GLOBAL: u8 = 0xe;

fn as_ipv6(address: IpAddr) -> Ipv6Addr {
    match address {
        IpAddr::V4(v4) => v4.to_ipv6_mapped(),
        IpAddr::V6(v6) => v6,
    }
}

fn common_prefix_len(a: Ipv6Addr, b: Ipv6Addr) -> u32 {
    (u128::from(a) ^ u128::from(b)).leading_zeros()
}

fn lookup_policy(address: IpAddr) -> &'static PolicyEntry {
    let address = as_ipv6(address);
    POLICY_TABLE
        .iter()
        .find(|entry| common_prefix_len(address, entry.prefix) >= entry.prefix_len)
        .unwrap_or(&POLICY_TABLE[POLICY_TABLE.len() - 1])
}

fn scope(address: IpAddr) -> u8 {
    match address {
        IpAddr::V4(v4) => ipv4_scope(v4),
        IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
            Some(v4) => ipv4_scope(v4),
            None => ipv6_scope(v6),
        },
    }
}

fn ipv4_scope(v4: Ipv4Addr) -> u8 {
    if v4.is_loopback() || v4.is_link_local() {
        SCOPE_LINK_LOCAL
    } else {
        SCOPE_GLOBAL
    }
}

fn ipv6_scope(v6: Ipv6Addr) -> u8 {
    let segments = v6.segments();
    if v6.is_multicast() {
        (segments[0] & 0x000f) as u8
    } else if v6.is_loopback() || segments[0] & 0xffc0 == 0xfe80 {
        SCOPE_LINK_LOCAL
    } else if segments[0] & 0xffc0 == 0xfec0 {
        SCOPE_SITE_LOCAL
    } else {
        SCOPE_GLOBAL
    }
}

/// Per-destination facts the comparison rules look at.
struct Candidate {
    destination: IpAddr,
    source: Option<SourceAddress>,
    scope: u8,
    precedence: u8,
    label: u8,
}

impl Candidate {
    fn new(destination: IpAddr, source: Option<SourceAddress>) -> Self {
        let policy = lookup_policy(destination);
        Self {
            destination,
            source,
            scope: scope(destination),
            precedence: policy.precedence,
            label: policy.label,
        }
    }

    fn usable(&self) -> bool {
        self.source.is_some()
    }

    fn scope_matches(&self) -> bool {
        self.source.is_some_and(|s| scope(s.address) == self.scope)
    }

    fn source_deprecated(&self) -> bool {
        self.source.is_some_and(|s| s.deprecated)
    }

    fn label_matches(&self) -> bool {
        self.source
            .is_some_and(|s| lookup_policy(s.address).label == self.label)
    }

    /// Zero unless both destination and source are IPv6.
    fn common_prefix(&self) -> u32 {
        match (self.destination, self.source.map(|s| s.address)) {
            (IpAddr::V6(d), Some(IpAddr::V6(s))) => common_prefix_len(d, s),
            _ => 0,
        }
    }
}

/// `Less` means `a` is preferred.
fn compare(a: &Candidate, b: &Candidate) -> Ordering {
    // Rule 1: avoid unusable destinations.
    b.usable()
        .cmp(&a.usable())
        // Rule 2: prefer matching scope.
        .then_with(|| b.scope_matches().cmp(&a.scope_matches()))
        // Rule 3: avoid deprecated sources.
        .then_with(|| a.source_deprecated().cmp(&b.source_deprecated()))
        // Rule 5: prefer matching label.
        .then_with(|| b.label_matches().cmp(&a.label_matches()))
        // Rule 6: prefer higher precedence.
        .then_with(|| b.precedence.cmp(&a.precedence))
        // Rule 8: prefer smaller scope.
        .then_with(|| a.scope.cmp(&b.scope))
        // Rule 9: longest matching prefix, IPv6 pairs only.
        .then_with(|| b.common_prefix().cmp(&a.common_prefix()))
}

/// Orders destinations by RFC 6724 preference.
pub struct Rfc6724AddressSorter {
    source_lookup: Arc<dyn SourceAddressLookup>,
}

impl Rfc6724AddressSorter {
    pub fn new(source_lookup: Arc<dyn SourceAddressLookup>) -> Self {
        Self { source_lookup }
    }

    pub fn create_address_sorter() -> Arc<dyn AddressSorter> {
        Arc::new(Self::new(Arc::new(SystemSourceLookup)))
    }
}

impl AddressSorter for Rfc6724AddressSorter {
    fn sort(&self, addresses: &[IpAddr]) -> Vec<IpAddr> {
        let mut candidates: Vec<Candidate> = addresses
            .iter()
            .map(|&destination| {
                Candidate::new(destination, self.source_lookup.source_for(destination))
            })
            .collect();

        candidates.sort_by(compare);

        candidates.into_iter().map(|c| c.destination).collect()
    }
}
