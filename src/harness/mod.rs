//! In-process request harness.
//!
//! # Data Flow
//! ```text
//! Descriptor
//!     → FakeRequest + FakeResponse (finalize → oneshot)
//!     → Dispatch (pipeline entry point)
//!         → InjectPayload pins query/body
//!         → remaining middleware → router
//!     → FakeResponse::end → resolves Harness::request
//! ```
//!
//! # Design Decisions
//! - Installation is idempotent, keyed on the middleware's type
//! - No timeout: bounding a call is up to the caller
//! - The harness never fabricates a status; 404/405/500 come from the pipeline

pub mod dispatch;
pub mod inject;

pub use dispatch::Harness;
pub use inject::InjectPayload;
