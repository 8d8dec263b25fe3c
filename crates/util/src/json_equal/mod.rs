//! JSON equality utilities.
//!
//! Snapshots compare their collections by membership, so the equality here
//! treats every array as a multiset. Object members are matched by key.

mod unordered;

pub use unordered::unordered_equal;
