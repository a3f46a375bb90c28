pub mod api;
pub mod transport;
pub mod types;

pub use api::{ApiClient, INVALID_JSON_MESSAGE, classify_response};
pub use transport::{ReqwestTransport, Transport};
pub use types::{Body, Method, RawResponse, Request, RequestOptions, TransportError, TransportResult};
