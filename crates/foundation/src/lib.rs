pub mod geo;
pub mod parse;

// Foundation crate: small, well-tested primitives only.
pub use geo::*;
