pub mod dns;
pub mod url_request;

// Re-export use cases
pub use dns::{AddressFamily, HostResolution, ResolveHostUseCase};
pub use url_request::{FetchResult, FetchUrlUseCase};
