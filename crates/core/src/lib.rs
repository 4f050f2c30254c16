//! Domain types and pure logic for the innovation hub.
//!
//! Nothing in this crate performs I/O. Persistence lives in `hub_db`, the
//! HTTP surface in `hub_api`.

pub mod error;
pub mod idea;
pub mod service_mapping;
pub mod types;
pub mod validation;
pub mod vote_stats;
