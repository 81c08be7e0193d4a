//! Settlement actions client: the process-wide gRPC client a
//! received message's `actions` handle delegates to.

pub mod pb;

mod client;

pub use client::Actions;
