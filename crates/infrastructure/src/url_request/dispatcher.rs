use super::error_job::UrlRequestErrorJob;
use super::file_protocol_handler::FileProtocolHandler;
use netstack_application::ports::{
    NetworkDelegate, ProtocolHandler, UrlRequestJob, UrlRequestJobFactory,
};
use netstack_domain::{NetError, UrlRequest};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Maps URL schemes to the handler that builds their jobs.
#[derive(Default)]
pub struct ProtocolDispatcher {
    handlers: HashMap<String, Arc<dyn ProtocolHandler>>,
}

impl ProtocolDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatcher with the `file:` handler registered.
    pub fn create_default() -> Self {
        let mut dispatcher = Self::new();
        dispatcher.register("file", Arc::new(FileProtocolHandler::new()));
        dispatcher
    }

    /// Replaces any handler already registered for `scheme`.
    pub fn register(&mut self, scheme: &str, handler: Arc<dyn ProtocolHandler>) {
        self.handlers.insert(scheme.to_ascii_lowercase(), handler);
    }

    pub fn dispatch(
        &self,
        request: &UrlRequest,
        network_delegate: Option<&dyn NetworkDelegate>,
    ) -> Box<dyn UrlRequestJob> {
        match self.handlers.get(request.scheme()) {
            Some(handler) => handler.maybe_create_job(request, network_delegate),
            None => {
                debug!(url = %request, scheme = request.scheme(), "Unknown URL scheme");
                Box::new(UrlRequestErrorJob::new(NetError::UnknownUrlScheme))
            }
        }
    }
}

impl UrlRequestJobFactory for ProtocolDispatcher {
    fn create_job(
        &self,
        request: &UrlRequest,
        network_delegate: Option<&dyn NetworkDelegate>,
    ) -> Box<dyn UrlRequestJob> {
        self.dispatch(request, network_delegate)
    }

    fn is_handled_scheme(&self, scheme: &str) -> bool {
        self.handlers.contains_key(&scheme.to_ascii_lowercase())
    }
}
