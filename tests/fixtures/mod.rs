//! Test fixtures for courier-planner.
//!
//! Provides:
//! - Prenzlauer Berg addresses with coordinates
//! - In-memory directions provider and optimization service

#![allow(dead_code)]

pub mod berlin_locations;
pub mod stubs;

pub use berlin_locations::*;
pub use stubs::*;
