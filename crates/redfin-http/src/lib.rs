//! Redfin HTTP - Blocking HTTP connectors for Redfin
//!
//! This crate wraps reqwest to provide the two transports the Redfin
//! client consumes: the authenticated management channel and the public
//! channel registry content is fetched through.

pub mod connector;
pub mod public;
pub mod verify;

pub use connector::HttpConnector;
pub use public::PublicHttpConnector;
pub use verify::Verify;

/// Default request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
