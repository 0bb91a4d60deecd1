//! courier-planner
//!
//! Plans delivery routes for a number of couriers by collecting pairwise
//! distances from a directions API, handing the index-encoded problem to a
//! remote optimization service, and rendering the returned routes.

pub mod traits;
pub mod catalog;
pub mod directions;
pub mod distance_matrix;
pub mod encoding;
pub mod solver;
pub mod service;
pub mod decoding;
pub mod polyline;
pub mod text;
pub mod map;
pub mod graph;
pub mod pipeline;

#[cfg(test)]
mod test_support;
