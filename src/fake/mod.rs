//! Synthetic endpoints of an HTTP exchange.
//!
//! # Responsibilities
//! - Normalize request descriptors (bare path or structured options)
//! - Build a request surface with pre-parsed query/body extension fields
//! - Capture the finalized response instead of writing to a socket

pub mod descriptor;
pub mod request;
pub mod response;

pub use descriptor::{is_structured, Descriptor, RequestOptions};
pub use request::FakeRequest;
pub use response::FakeResponse;
