//! Polyline representation for courier route geometries.
//!
//! Points are kept as decoded coordinates; GeoJSON's `[lng, lat]` ordering is
//! applied only when exporting.

use serde::{Deserialize, Serialize};

use crate::traits::Coordinate;

/// Ordered stop coordinates of one courier's route.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<Coordinate>,
}

impl Polyline {
    /// Creates a polyline through `points` in visiting order.
    pub fn new(points: Vec<Coordinate>) -> Self {
        Self { points }
    }

    /// Returns the stop coordinates in visiting order.
    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    /// Consumes the polyline and returns the owned coordinates.
    pub fn into_points(self) -> Vec<Coordinate> {
        self.points
    }

    /// True when the route has no stops.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Positions in GeoJSON order.
    pub fn lng_lat(&self) -> Vec<[f64; 2]> {
        self.points.iter().map(|point| [point.lng, point.lat]).collect()
    }
}
