#![allow(dead_code)]
#![allow(unused_imports)]

use async_trait::async_trait;
use netstack_application::ports::{
    AddressSorter, DnsAnswer, DnsClient, DnsTransaction, DnsTransactionFactory, JobKind,
    JobOutcome, NetworkDelegate, UrlRequestJob, UrlRequestJobFactory,
};
use netstack_domain::{DnsConfig, DnsQuery, DomainError, NetError, RecordType, UrlRequest};
use std::collections::HashMap;
use std::net::IpAddr;
use std::path::Path;
use std::sync::atomic::{AtomicU16, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

pub fn answer(qname: &str, record_type: RecordType, ips: &[&str]) -> DnsAnswer {
    DnsAnswer {
        qname: Arc::from(qname),
        record_type,
        addresses: ips.iter().map(|ip| ip.parse().unwrap()).collect(),
        cname: None,
        min_ttl: Some(300),
        server: "192.0.2.53:53".parse().unwrap(),
        transaction_id: 1,
        via_tcp: false,
    }
}

/// Answers transactions from a table keyed by (hostname, record type).
#[derive(Default)]
pub struct MockTransactionFactory {
    responses: Mutex<HashMap<(String, RecordType), Result<DnsAnswer, DomainError>>>,
    next_id: AtomicU16,
    created: AtomicUsize,
}

impl MockTransactionFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_response(
        &self,
        hostname: &str,
        record_type: RecordType,
        response: Result<DnsAnswer, DomainError>,
    ) {
        self.responses
            .lock()
            .unwrap()
            .insert((hostname.to_string(), record_type), response);
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

impl DnsTransactionFactory for MockTransactionFactory {
    fn create_transaction(
        &self,
        hostname: &str,
        record_type: RecordType,
    ) -> Result<DnsTransaction, DomainError> {
        self.created.fetch_add(1, Ordering::SeqCst);
        let response = self
            .responses
            .lock()
            .unwrap()
            .get(&(hostname.to_string(), record_type))
            .cloned()
            .unwrap_or(Err(DomainError::NxDomain));

        let (tx, rx) = oneshot::channel();
        let task = tokio::spawn(async move {
            let _ = tx.send(response);
        });
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        Ok(DnsTransaction::new(
            id,
            DnsQuery::new(hostname, record_type),
            rx,
            task.abort_handle(),
        ))
    }
}

/// Sorts descending so tests can tell the sorter ran.
pub struct ReverseSorter;

impl AddressSorter for ReverseSorter {
    fn sort(&self, addresses: &[IpAddr]) -> Vec<IpAddr> {
        let mut sorted = addresses.to_vec();
        sorted.sort_by(|a, b| b.cmp(a));
        sorted
    }
}

pub struct MockDnsClient {
    config: Option<DnsConfig>,
    factory: Option<Arc<MockTransactionFactory>>,
    sorter: Arc<dyn AddressSorter>,
}

impl MockDnsClient {
    pub fn with_factory(factory: Arc<MockTransactionFactory>) -> Self {
        Self {
            config: Some(DnsConfig::with_nameservers(vec!["192.0.2.53:53"
                .parse()
                .unwrap()])),
            factory: Some(factory),
            sorter: Arc::new(ReverseSorter),
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            config: None,
            factory: None,
            sorter: Arc::new(ReverseSorter),
        }
    }
}

impl DnsClient for MockDnsClient {
    fn set_config(&mut self, config: DnsConfig) -> Result<(), DomainError> {
        config.validate()?;
        self.config = Some(config);
        Ok(())
    }

    fn config(&self) -> Option<&DnsConfig> {
        self.config.as_ref()
    }

    fn transaction_factory(&self) -> Option<Arc<dyn DnsTransactionFactory>> {
        self.factory
            .clone()
            .map(|f| f as Arc<dyn DnsTransactionFactory>)
    }

    fn address_sorter(&self) -> Arc<dyn AddressSorter> {
        Arc::clone(&self.sorter)
    }
}

/// A job that yields a canned outcome.
pub struct CannedJob {
    kind: JobKind,
    outcome: Result<JobOutcome, NetError>,
}

#[async_trait]
impl UrlRequestJob for CannedJob {
    fn kind(&self) -> JobKind {
        self.kind
    }

    async fn start(&mut self) -> Result<JobOutcome, NetError> {
        self.outcome.clone()
    }

    fn cancel(&mut self) {
        self.outcome = Err(NetError::Aborted);
    }
}

/// Job factory keyed by URL string. Unknown URLs produce `FileNotFound`.
#[derive(Default)]
pub struct MockJobFactory {
    jobs: Mutex<HashMap<String, (JobKind, Result<JobOutcome, NetError>)>>,
    pub delegate_seen: Mutex<Vec<bool>>,
}

impl MockJobFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_job(&self, url: &str, kind: JobKind, outcome: Result<JobOutcome, NetError>) {
        self.jobs
            .lock()
            .unwrap()
            .insert(url.to_string(), (kind, outcome));
    }
}

impl UrlRequestJobFactory for MockJobFactory {
    fn create_job(
        &self,
        request: &UrlRequest,
        network_delegate: Option<&dyn NetworkDelegate>,
    ) -> Box<dyn UrlRequestJob> {
        self.delegate_seen
            .lock()
            .unwrap()
            .push(network_delegate.is_some());
        let (kind, outcome) = self
            .jobs
            .lock()
            .unwrap()
            .get(request.url().as_str())
            .cloned()
            .unwrap_or((JobKind::File, Err(NetError::FileNotFound)));
        Box::new(CannedJob { kind, outcome })
    }

    fn is_handled_scheme(&self, scheme: &str) -> bool {
        scheme == "file"
    }
}

pub struct AllowAllDelegate;

impl NetworkDelegate for AllowAllDelegate {
    fn can_access_file(&self, _request: &UrlRequest, _path: &Path) -> bool {
        true
    }
}
