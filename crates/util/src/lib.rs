//! roam-util - data-shape-agnostic helpers over `serde_json` trees.
//!
//! Nothing here knows about resources: these are the pieces the resource
//! machinery needs from a JSON tree (canonical bytes, order-insensitive
//! equality and hashing).

pub mod canonical;
pub mod json_equal;
pub mod json_hash;

// Re-exports for convenience
pub use json_equal::unordered_equal;
pub use json_hash::structural_hash;
