use super::{AddressSorter, DnsTransactionFactory};
use netstack_domain::{DnsConfig, DomainError};
use std::sync::Arc;

/// Owner of the current DNS session.
///
/// `set_config` replaces the session and factory; getters report `None`
/// whenever no valid configuration is active.
pub trait DnsClient: Send + Sync {
    fn set_config(&mut self, config: DnsConfig) -> Result<(), DomainError>;

    fn config(&self) -> Option<&DnsConfig>;

    fn transaction_factory(&self) -> Option<Arc<dyn DnsTransactionFactory>>;

    fn address_sorter(&self) -> Arc<dyn AddressSorter>;
}
