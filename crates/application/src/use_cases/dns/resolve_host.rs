use crate::ports::{DnsAnswer, DnsClient, DnsTransaction, DnsTransactionFactory};
use netstack_domain::{DomainError, RecordType};
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressFamily {
    #[default]
    Any,
    Ipv4,
    Ipv6,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostResolution {
    pub hostname: Arc<str>,
    /// Addresses in destination-selection order.
    pub addresses: Vec<IpAddr>,
    pub canonical_name: Option<String>,
    pub min_ttl: Option<u32>,
}

/// Resolves a hostname to sorted addresses through the client's current
/// session. The client lock is held only long enough to grab the factory.
pub struct ResolveHostUseCase {
    client: Arc<RwLock<dyn DnsClient>>,
}

impl ResolveHostUseCase {
    pub fn new(client: Arc<RwLock<dyn DnsClient>>) -> Self {
        Self { client }
    }

    pub async fn execute(
        &self,
        hostname: &str,
        family: AddressFamily,
    ) -> Result<HostResolution, DomainError> {
        let start = Instant::now();

        let (factory, sorter) = {
            let client = self.client.read().await;
            let factory = client
                .transaction_factory()
                .ok_or(DomainError::NoConfiguration)?;
            (factory, client.address_sorter())
        };

        let answers = match family {
            AddressFamily::Ipv4 => {
                vec![Self::query(&*factory, hostname, RecordType::A)?.result().await?]
            }
            AddressFamily::Ipv6 => {
                vec![Self::query(&*factory, hostname, RecordType::AAAA)?.result().await?]
            }
            AddressFamily::Any => {
                let v4 = Self::query(&*factory, hostname, RecordType::A)?;
                let v6 = Self::query(&*factory, hostname, RecordType::AAAA)?;
                let (v4, v6) = tokio::join!(v4.result(), v6.result());
                Self::merge_families(hostname, v4, v6)?
            }
        };

        let mut addresses: Vec<IpAddr> = Vec::new();
        for address in answers.iter().flat_map(|a| a.addresses.iter()) {
            if !addresses.contains(address) {
                addresses.push(*address);
            }
        }
        let canonical_name = answers.iter().find_map(|a| a.cname.clone());
        let min_ttl = answers.iter().filter_map(|a| a.min_ttl).min();

        let addresses = sorter.sort(&addresses);

        debug!(
            domain = %hostname,
            addresses = addresses.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Host resolved"
        );

        Ok(HostResolution {
            hostname: Arc::from(hostname),
            addresses,
            canonical_name,
            min_ttl,
        })
    }

    fn query(
        factory: &dyn DnsTransactionFactory,
        hostname: &str,
        record_type: RecordType,
    ) -> Result<DnsTransaction, DomainError> {
        factory.create_transaction(hostname, record_type)
    }

    /// One family failing is fine as long as the other produced an answer.
    fn merge_families(
        hostname: &str,
        v4: Result<DnsAnswer, DomainError>,
        v6: Result<DnsAnswer, DomainError>,
    ) -> Result<Vec<DnsAnswer>, DomainError> {
        match (v4, v6) {
            (Ok(a), Ok(b)) => Ok(vec![a, b]),
            (Ok(a), Err(e)) | (Err(e), Ok(a)) => {
                debug!(domain = %hostname, error = %e, "One address family failed");
                Ok(vec![a])
            }
            (Err(e4), Err(e6)) => {
                warn!(domain = %hostname, ipv4_error = %e4, ipv6_error = %e6, "Resolution failed");
                Err(e4)
            }
        }
    }
}
