//! api-probe - ad-hoc HTTP API testing helpers.
//!
//! This crate provides:
//! - Verb wrappers (GET, POST, PUT, PATCH, DELETE, OPTIONS) that never fail and
//!   classify every request into a uniform [`Outcome`]
//! - An expectation flag (`should_fail`) that turns "this should be rejected"
//!   into a passing test
//! - Dotted-path extraction of nested response fields
//! - A [`Recorder`] that pretty-prints outcomes and prints a one-shot summary
//!
//! # Example
//!
//! ```rust,no_run
//! use api_probe::{ApiClient, Recorder, RequestOptions};
//!
//! let api = ApiClient::new().unwrap();
//! let mut recorder = Recorder::stdout();
//!
//! let [id, city] = recorder
//!     .evaluate(
//!         "fetch user",
//!         &api.get("https://jsonplaceholder.typicode.com/users/1", RequestOptions::new()),
//!         &["id", "address.city"],
//!     )
//!     .into_array();
//!
//! let missing = api.get(
//!     "https://jsonplaceholder.typicode.com/posts/999999",
//!     RequestOptions::new().should_fail(true),
//! );
//! recorder.evaluate("missing post is rejected", &missing, &[]);
//!
//! recorder.summarize("Results");
//! # let _ = (id, city);
//! ```

pub mod client;
pub mod config;
pub mod demo;
pub mod extract;
pub mod outcome;
pub mod recorder;
pub mod render;
pub mod summary;

// Re-export client types
pub use client::{
    ApiClient, Body, Method, RawResponse, ReqwestTransport, Request, RequestOptions, Transport,
    TransportError, TransportResult,
};

// Re-export outcome types
pub use outcome::{Marker, Outcome, TRANSPORT_FAILURE_STATUS};

// Re-export extraction
pub use extract::{DottedPath, ResolveError, lookup, resolve};

// Re-export recorder and reporting
pub use recorder::{Extracted, Recorder};
pub use render::Console;
pub use summary::{ResultEntry, RunSummary};
