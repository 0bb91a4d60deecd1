//! All-pairs distance collection over a [`DirectionsProvider`].

use std::collections::HashMap;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::traits::{Coordinate, DirectionsProvider};

/// Address to coordinate lookup, filled on first sighting of each address.
pub type AddressCoordinates = HashMap<String, Coordinate>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatrixError {
    #[error("at least two addresses are required, got {count}")]
    TooFewAddresses { count: usize },
}

/// Two literal addresses, `origin` preceding `destination` in the input list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AddressPair {
    pub origin: String,
    pub destination: String,
}

/// Sparse symmetric distance matrix keyed by address pairs.
///
/// Entries keep the order in which the pairs were queried.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DistanceMatrix {
    entries: Vec<(AddressPair, f64)>,
}

impl DistanceMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, origin: impl Into<String>, destination: impl Into<String>, distance: f64) {
        self.entries.push((
            AddressPair {
                origin: origin.into(),
                destination: destination.into(),
            },
            distance,
        ));
    }

    /// Distance between `a` and `b` in either orientation.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(pair, _)| {
                (pair.origin == a && pair.destination == b)
                    || (pair.origin == b && pair.destination == a)
            })
            .map(|(_, distance)| *distance)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AddressPair, f64)> {
        self.entries.iter().map(|(pair, distance)| (pair, *distance))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A pair whose query produced no distance.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedPair {
    pub pair: AddressPair,
    pub reason: String,
}

/// Everything learned while querying a set of addresses.
#[derive(Debug, Clone, Default)]
pub struct DistanceSurvey {
    pub matrix: DistanceMatrix,
    pub coordinates: AddressCoordinates,
    pub skipped: Vec<SkippedPair>,
    /// Number of provider calls issued.
    pub queries: usize,
}

impl DistanceSurvey {
    /// True when every queried pair produced a distance.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Query every unordered pair and collect distances plus coordinates.
pub fn build_distance_matrix<P>(addresses: &[String], provider: &P) -> Result<DistanceSurvey, MatrixError>
where
    P: DirectionsProvider + ?Sized,
{
    survey(addresses, provider, true)
}

/// Distance-only variant: coordinates in the responses are ignored.
pub fn build_distances<P>(addresses: &[String], provider: &P) -> Result<DistanceSurvey, MatrixError>
where
    P: DirectionsProvider + ?Sized,
{
    survey(addresses, provider, false)
}

fn survey<P>(addresses: &[String], provider: &P, with_coordinates: bool) -> Result<DistanceSurvey, MatrixError>
where
    P: DirectionsProvider + ?Sized,
{
    if addresses.len() < 2 {
        return Err(MatrixError::TooFewAddresses {
            count: addresses.len(),
        });
    }

    let mut result = DistanceSurvey::default();

    for (i, origin) in addresses.iter().enumerate() {
        for destination in &addresses[i + 1..] {
            result.queries += 1;
            match provider.directions(origin, destination) {
                Ok(directions) => {
                    debug!(%origin, %destination, distance = directions.distance, "distance found");
                    result.matrix.insert(origin.as_str(), destination.as_str(), directions.distance);
                    if with_coordinates {
                        if let Some(coordinate) = directions.origin {
                            result.coordinates.entry(origin.clone()).or_insert(coordinate);
                        }
                        if let Some(coordinate) = directions.destination {
                            result.coordinates.entry(destination.clone()).or_insert(coordinate);
                        }
                    }
                }
                Err(err) => {
                    warn!(%origin, %destination, error = %err, "skipping address pair");
                    result.skipped.push(SkippedPair {
                        pair: AddressPair {
                            origin: origin.clone(),
                            destination: destination.clone(),
                        },
                        reason: err.to_string(),
                    });
                }
            }
        }
    }

    if result.matrix.is_empty() {
        warn!(queries = result.queries, "no distances available");
    } else {
        info!(
            queries = result.queries,
            distances = result.matrix.len(),
            skipped = result.skipped.len(),
            "distance matrix built"
        );
    }

    Ok(result)
}
