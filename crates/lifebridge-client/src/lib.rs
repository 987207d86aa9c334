//! Async client for the LifeBridge hospital REST API.
//!
//! Layers, leaf first:
//!
//! - [`session`]: persisted bearer token and its decoded claims.
//! - [`http`]: the single configured sender; credentials are injected by a
//!   [`http::RequestInterceptor`] at send time.
//! - [`services`]: one module per entity, each a thin map from intent to a
//!   single REST call.
//! - [`views`]: UI-agnostic state machines for the list, detail and form
//!   screens. Their `begin_*`/`finish_*` halves do no I/O; the async
//!   wrappers drive both halves against a service.

// Native `async fn` in traits; futures are spelled out as `impl Future + Send`
// where they have to cross a `tokio::spawn`.
#![allow(async_fn_in_trait)]

pub mod config;
pub mod error;
pub mod http;
pub mod services;
pub mod session;
pub mod views;

pub use config::ClientConfig;
pub use error::{Error, Result};
pub use http::ApiClient;
pub use session::SessionStore;
