mod resolve_host;

pub use resolve_host::{AddressFamily, HostResolution, ResolveHostUseCase};
