//! Backend contract for the map viewer: endpoint layout, wire types and the
//! `BackendClient` trait implemented per platform.

pub mod client;
pub mod error;
pub mod protocol;

pub use client::BackendClient;
pub use error::ApiError;
pub use protocol::*;
