//! Core seams of the courier planner.
//!
//! Both external collaborators sit behind a trait so the pipeline can run
//! against the real HTTP clients or against in-memory stubs.

use serde::{Deserialize, Serialize};

use crate::directions::DirectionsError;
use crate::solver::{JobHandle, JobStatus, RoutePlanningRequest, RoutesResult, SolverError};

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Outcome of a single origin/destination query.
#[derive(Debug, Clone, PartialEq)]
pub struct Directions {
    /// Travel distance, in the unit reported by the provider.
    pub distance: f64,
    pub origin: Option<Coordinate>,
    pub destination: Option<Coordinate>,
}

/// Provides the travel distance between two free-text addresses.
pub trait DirectionsProvider {
    fn directions(&self, origin: &str, destination: &str) -> Result<Directions, DirectionsError>;
}

/// Submit-job / fetch-result protocol of the remote optimization service.
pub trait OptimizationService {
    fn submit(&self, request: &RoutePlanningRequest) -> Result<JobHandle, SolverError>;

    fn status(&self, job: &JobHandle) -> Result<JobStatus, SolverError>;

    /// Only valid once [`OptimizationService::status`] reports success.
    fn result(&self, job: &JobHandle) -> Result<RoutesResult, SolverError>;
}
