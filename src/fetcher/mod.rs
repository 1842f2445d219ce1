pub mod backoff;
pub mod client;
pub mod decode;
pub mod errors;
pub mod types;

pub use backoff::{politeness_delay, retry_delay};
pub use client::fetch;
pub use errors::FetchError;
pub use types::FetchedPage;
