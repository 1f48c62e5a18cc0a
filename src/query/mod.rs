//! Query engine: column projection over a loaded table
//!
//! The only query is a projection. Every stored row is returned, in file
//! order; the caller chooses which columns and in which order.

mod projection;

pub use projection::{project, Projection};
