// carbonly-api: Async client for the Green Web Foundation greencheck API

pub mod error;
pub mod greencheck;
pub mod transport;

pub use error::Error;
pub use greencheck::{DEFAULT_BASE_URL, GreencheckClient, GreencheckResult};
pub use transport::TransportConfig;
