//! Host functions callable from the frontend.
//!
//! Two calling conventions exist:
//!
//! - **Binary**: `POST /api/<name>` with an `application/msgpack` body holding
//!   the argument array. The response body is always the two-element envelope
//!   `[true, value]` or `[false, [kind, message]]` (see [`envelope`]).
//! - **Direct**: small JSON accessors held in a [`DirectRegistry`], used for
//!   capability probes that carry no binary payload.
//!
//! Registrations happen once at startup; afterwards both registries are shared
//! read-only behind an `Arc`.

pub mod direct;
pub mod envelope;
mod handler;
mod registry;

pub use direct::DirectRegistry;
pub use envelope::Envelope;
pub use handler::{GatedHandler, TypedHandler};
pub use registry::RpcRegistry;

use crate::error::rpc::HandlerFailure;

/// A binary RPC function.
///
/// `args` is the raw msgpack argument array; the returned bytes are the
/// msgpack-encoded return value, spliced into the success envelope as-is.
pub trait RpcHandler: Send + Sync {
    fn call(&self, args: &[u8]) -> Result<Vec<u8>, HandlerFailure>;
}
