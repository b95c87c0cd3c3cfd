use netstack_application::ports::{DnsClient, NetworkDelegate};
use netstack_application::use_cases::{FetchUrlUseCase, ResolveHostUseCase};
use netstack_domain::Config;
use netstack_infrastructure::dns::DnsClientImpl;
use netstack_infrastructure::url_request::{PathPrefixNetworkDelegate, ProtocolDispatcher};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

pub struct UseCases {
    pub resolve_host: Arc<ResolveHostUseCase>,
    pub fetch_url: Arc<FetchUrlUseCase>,
}

impl UseCases {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let mut client = DnsClientImpl::create_client();
        client.set_config(config.dns.clone())?;
        let client: Arc<RwLock<dyn DnsClient>> = Arc::new(RwLock::new(client));

        let delegate: Arc<dyn NetworkDelegate> =
            Arc::new(PathPrefixNetworkDelegate::new(config.files.clone()));
        let dispatcher = Arc::new(ProtocolDispatcher::create_default());

        info!(
            file_roots = config.files.allowed_roots.len(),
            "Services initialized"
        );

        Ok(Self {
            resolve_host: Arc::new(ResolveHostUseCase::new(client)),
            fetch_url: Arc::new(FetchUrlUseCase::new(dispatcher, Some(delegate))),
        })
    }
}
