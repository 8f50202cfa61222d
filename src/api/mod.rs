//! Catalog API access: the base transport, the authenticated pipeline that
//! decorates it, and typed resource clients on top.

pub mod client;
pub mod pipeline;
pub mod resources;
pub mod transport;
pub mod types;

pub use client::ApiClient;
pub use pipeline::Authenticated;
pub use transport::{ApiRequest, ApiResponse, FormPart, HttpTransport, RequestBody, Transport};
