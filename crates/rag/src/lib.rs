//! Client and maintenance tooling for the external RAG document store.
//!
//! The store indexes uploaded documents as chunks keyed by filename. This
//! crate only consumes its HTTP interface: [`client::RagClient`] talks to the
//! service, [`store::DocumentStore`] is the seam the cleanup runs against,
//! and [`cleanup`] removes leftovers of temporary uploads.

pub mod cleanup;
pub mod client;
pub mod error;
pub mod store;

pub use client::{RagClient, RagConfig};
pub use error::RagError;
pub use store::DocumentStore;
