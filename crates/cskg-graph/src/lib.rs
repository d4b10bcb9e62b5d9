//! CSKG Graph Query Engine.
//!
//! Stateless structural queries over the stored graph: neighbor and degree
//! lookups, similarity, the atomic rename transaction, BFS shortest path,
//! and sign-propagating synonym/antonym traversal. Every operation is one
//! self-contained call chain against the store; traversal state (frontier,
//! visited set) lives in the call, not in the engine.

pub mod error;
pub mod queries;
pub mod rename;
pub mod traverse;

pub use error::{GraphError, GraphResult};
