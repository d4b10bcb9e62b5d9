//! Store-backed traversals.
//!
//! Both traversals are chatty: many sequential round trips against the
//! store per invocation, bounded by explicit depth/distance caps.

pub mod bfs;
pub mod sign;
