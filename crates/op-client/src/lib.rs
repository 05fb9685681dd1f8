//! # op-client
//!
//! Backend collaborators for the OpenPoint connector toolkit.
//!
//! - [`RegistrySource`], [`ConnectorStore`] and [`ConnectionTester`] are the
//!   asynchronous seams the form engine talks to.
//! - [`ApiClient`] implements them against the platform REST API.
//! - [`MemoryBackend`] implements them in process memory.
//! - [`load_registry`] fetches connector types and falls back to the
//!   built-in set when the source fails.
//! - [`ConnectorService`] saves validated forms through a store.
//!
//! ```
//! use op_client::{ConnectorService, MemoryBackend};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let service = ConnectorService::connect(MemoryBackend::new()).await;
//!
//! let mut form = service.new_form("soap").unwrap();
//! form.set("name", "Billing").unwrap();
//! form.set("wsdl_url", "https://billing.example.com/service?wsdl").unwrap();
//!
//! let record = service.save(&form).await.unwrap();
//! assert_eq!(record.id.get(), 1);
//! # });
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod http;
mod memory;
mod registry;
mod service;
mod traits;

pub use config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use error::{ClientError, ClientResult, ServiceError};
pub use http::ApiClient;
pub use memory::MemoryBackend;
pub use registry::{RegistryOrigin, load_registry};
pub use service::ConnectorService;
pub use traits::{ConnectionTester, ConnectorStore, RegistrySource};
