mod fetch_url;

pub use fetch_url::{FetchResult, FetchUrlUseCase};
