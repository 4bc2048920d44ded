//! Network layer.
//!
//! Every JSON and asset request goes through the [`Fetch`] trait so that the
//! offline cache worker can sit between callers and the network. Media
//! downloads stream through [`Transport`] instead.

pub mod fetch;
pub mod transport;

pub use fetch::{Fetch, FetchResponse, NetworkFetch};
pub use transport::{Transfer, Transport};
