//! Remote writer: best-effort inserts into the telemetry store.

pub mod transport;
pub mod writer;

#[cfg(feature = "http")]
pub mod http;

pub use transport::{Prefer, Transport, WriteError};
pub use writer::RemoteWriter;

#[cfg(feature = "http")]
pub use http::RestTransport;
