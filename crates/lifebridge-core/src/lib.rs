//! Core types for the LifeBridge hospital client.
//!
//! This crate is deliberately free of HTTP, storage and terminal
//! dependencies. It holds the wire data model, token claim decoding, the
//! role router and the client-side form validators. Every other crate in the
//! workspace depends on it.

pub mod claims;
pub mod error;
pub mod model;
pub mod role;
pub mod search;
pub mod validate;

pub use error::{Error, Result};
