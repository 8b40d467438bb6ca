//! Async connector for the EIDR registry.
//!
//! Wraps the [`eidr_query`] core with configuration, credentials, the
//! query request envelope, XML decoding and an HTTP transport.
//!
//! # Example
//!
//! ```no_run
//! use eidr_connector::{ConnectorConfig, Registry};
//!
//! # async fn run() -> Result<(), eidr_query::EidrError> {
//! let registry = Registry::from_config(&ConnectorConfig::default())?;
//! let record = registry
//!     .resolve("10.5240/5CA7-2626-3EF6-2B05-AD9C-M", "Full")
//!     .await?;
//! println!("{record}");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod credentials;
pub mod envelope;
pub mod registry;
pub mod transport;
pub mod xml;

pub use config::ConnectorConfig;
pub use credentials::Credentials;
pub use envelope::QueryOptions;
pub use registry::Registry;
pub use transport::{HttpTransport, RegistryRequest, Transport};
