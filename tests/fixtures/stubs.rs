//! In-memory stand-ins for the directions API and the optimization service.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use courier_planner::directions::DirectionsError;
use courier_planner::solver::{
    ClusterId, JobHandle, JobStatus, RouteNodes, RoutePlanningRequest, RouteRecord, RoutesResult,
    SolverError,
};
use courier_planner::traits::{Coordinate, Directions, DirectionsProvider, OptimizationService};

use super::berlin_locations::Location;

/// Answers from a fixed coordinate table; distance is the straight-line
/// kilometre estimate rounded to 0.1.
#[derive(Debug, Default)]
pub struct TableDirections {
    locations: HashMap<String, Coordinate>,
    unroutable: Vec<(String, String)>,
    pub calls: Cell<usize>,
}

impl TableDirections {
    pub fn new(locations: &[Location]) -> Self {
        Self {
            locations: locations
                .iter()
                .map(|location| (location.address.to_string(), location.coordinate()))
                .collect(),
            ..Self::default()
        }
    }

    /// Named addresses at unit spacing along a meridian.
    pub fn line(addresses: &[&str]) -> Self {
        Self {
            locations: addresses
                .iter()
                .enumerate()
                .map(|(i, address)| (address.to_string(), Coordinate::new(52.5 + i as f64 * 0.01, 13.4)))
                .collect(),
            ..Self::default()
        }
    }

    pub fn without_route(mut self, origin: &str, destination: &str) -> Self {
        self.unroutable.push((origin.to_string(), destination.to_string()));
        self
    }
}

impl DirectionsProvider for TableDirections {
    fn directions(&self, origin: &str, destination: &str) -> Result<Directions, DirectionsError> {
        self.calls.set(self.calls.get() + 1);

        let blocked = self
            .unroutable
            .iter()
            .any(|(o, d)| o == origin && d == destination);
        let (Some(from), Some(to), false) = (
            self.locations.get(origin).copied(),
            self.locations.get(destination).copied(),
            blocked,
        ) else {
            return Err(DirectionsError::NoRoute {
                status: "NOT_FOUND".to_string(),
            });
        };

        let dlat = (to.lat - from.lat) * 111.32;
        let dlng = (to.lng - from.lng) * 111.32 * from.lat.to_radians().cos();
        let km = (dlat * dlat + dlng * dlng).sqrt();

        Ok(Directions {
            distance: (km * 10.0).round() / 10.0,
            origin: Some(from),
            destination: Some(to),
        })
    }
}

/// Job service that replays a scripted status sequence, then returns a
/// canned result. The last status repeats once the script runs out.
#[derive(Debug)]
pub struct StubService {
    statuses: RefCell<Vec<JobStatus>>,
    result: RoutesResult,
    pub submitted: RefCell<Option<RoutePlanningRequest>>,
    pub polls: Cell<usize>,
}

impl StubService {
    pub fn returning(result: RoutesResult) -> Self {
        Self {
            statuses: RefCell::new(vec![JobStatus::Succeeded]),
            result,
            submitted: RefCell::new(None),
            polls: Cell::new(0),
        }
    }

    /// Clusters given as identifier lists, rendered the way the service
    /// writes them (`"[0, 1]"`).
    pub fn with_clusters(clusters: &[&[usize]]) -> Self {
        let routes_list = clusters
            .iter()
            .enumerate()
            .map(|(i, nodes)| {
                let text = nodes.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");
                RouteRecord {
                    cluster_id: ClusterId::Number(i as i64),
                    route_nodes: RouteNodes::Text(format!("[{text}]")),
                    naive_route_edges: None,
                }
            })
            .collect();
        Self::returning(RoutesResult { routes_list })
    }

    pub fn with_statuses(self, statuses: Vec<JobStatus>) -> Self {
        *self.statuses.borrow_mut() = statuses;
        self
    }
}

impl OptimizationService for StubService {
    fn submit(&self, request: &RoutePlanningRequest) -> Result<JobHandle, SolverError> {
        *self.submitted.borrow_mut() = Some(request.clone());
        Ok(JobHandle {
            id: "stub-job".to_string(),
            status: JobStatus::Pending,
        })
    }

    fn status(&self, _job: &JobHandle) -> Result<JobStatus, SolverError> {
        self.polls.set(self.polls.get() + 1);
        let mut statuses = self.statuses.borrow_mut();
        if statuses.len() > 1 {
            Ok(statuses.remove(0))
        } else {
            Ok(statuses[0])
        }
    }

    fn result(&self, _job: &JobHandle) -> Result<RoutesResult, SolverError> {
        Ok(self.result.clone())
    }
}
