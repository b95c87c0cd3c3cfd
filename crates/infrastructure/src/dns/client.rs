use super::address_sorter::Rfc6724AddressSorter;
use super::rand::crypto_rand_int;
use super::session::DnsSession;
use super::socket_pool::DnsSocketPool;
use super::transaction::DnsTransactionFactoryImpl;
use super::transport::UdpSocketFactory;
use netstack_application::ports::{
    AddressSorter, ClientSocketFactory, DnsClient, DnsTransactionFactory, RandIntFn,
};
use netstack_domain::{DnsConfig, DomainError};
use std::sync::Arc;
use tracing::{info, warn};

/// Owns the session built from the current configuration.
///
/// Replacing the configuration drops the client's references to the old
/// session and factory; transactions already running keep theirs.
pub struct DnsClientImpl {
    socket_factory: Arc<dyn ClientSocketFactory>,
    rand_int: RandIntFn,
    address_sorter: Arc<dyn AddressSorter>,
    session: Option<Arc<DnsSession>>,
    factory: Option<Arc<dyn DnsTransactionFactory>>,
}

impl DnsClientImpl {
    pub fn new(
        socket_factory: Arc<dyn ClientSocketFactory>,
        rand_int: RandIntFn,
        address_sorter: Arc<dyn AddressSorter>,
    ) -> Self {
        Self {
            socket_factory,
            rand_int,
            address_sorter,
            session: None,
            factory: None,
        }
    }

    /// Client backed by OS sockets, the OS CSPRNG and the RFC 6724 sorter.
    pub fn create_client() -> Self {
        Self::new(
            Arc::new(UdpSocketFactory::new()),
            crypto_rand_int(),
            Rfc6724AddressSorter::create_address_sorter(),
        )
    }

    pub fn session(&self) -> Option<&Arc<DnsSession>> {
        self.session.as_ref()
    }
}

impl DnsClient for DnsClientImpl {
    fn set_config(&mut self, config: DnsConfig) -> Result<(), DomainError> {
        self.factory = None;
        self.session = None;

        if let Err(e) = config.validate() {
            warn!(error = %e, "Rejected DNS configuration");
            return Err(e);
        }

        let nameservers = config.nameservers.len();
        let pool = Arc::new(DnsSocketPool::new(
            Arc::clone(&self.socket_factory),
            &config.socket_pool,
        ));
        let session = Arc::new(DnsSession::new(config, pool, Arc::clone(&self.rand_int)));

        self.factory = Some(DnsTransactionFactoryImpl::create_factory(Arc::clone(
            &session,
        )));
        self.session = Some(session);

        info!(nameservers, "DNS session created");
        Ok(())
    }

    fn config(&self) -> Option<&DnsConfig> {
        self.session.as_deref().map(DnsSession::config)
    }

    fn transaction_factory(&self) -> Option<Arc<dyn DnsTransactionFactory>> {
        self.factory.clone()
    }

    fn address_sorter(&self) -> Arc<dyn AddressSorter> {
        Arc::clone(&self.address_sorter)
    }
}
