pub mod error;
pub mod req_consumer;
pub mod request;
pub mod response;

pub use error::FetchError;
pub use request::{ApiHandle, ApiRequest, FetchResult};

#[cfg(test)]
pub(crate) mod testing;
