//! Solver client adapter: request payload, job polling, and the route
//! records returned by the optimization service.

use std::fmt;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::encoding::EncodedWeights;
use crate::traits::OptimizationService;

#[derive(Debug, Error)]
pub enum SolverError {
    #[error("invalid solver parameters: {0}")]
    InvalidParams(String),
    #[error("could not obtain an access token: {0}")]
    Token(String),
    #[error("optimization service returned HTTP {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("job {job_id} failed on the optimization service")]
    JobFailed { job_id: String },
    #[error("job {job_id} did not finish within {waited_secs}s")]
    Timeout { job_id: String, waited_secs: u64 },
    #[error("optimization service request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Strategy the remote service uses to cluster and order the addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolverKind {
    #[serde(rename = "sim_anneal")]
    SimulatedAnnealing,
    #[serde(rename = "qa")]
    QuantumAnnealing,
}

impl fmt::Display for SolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SimulatedAnnealing => f.write_str("sim_anneal"),
            Self::QuantumAnnealing => f.write_str("qa"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverParams {
    pub solver: SolverKind,
    /// One cluster per courier.
    pub n_clusters: u32,
    pub num_sweeps_sa: u32,
    pub num_reads_sa: u32,
    pub num_reads_qa: u32,
    pub annealing_time: u32,
}

impl SolverParams {
    pub fn for_couriers(couriers: u32) -> Self {
        Self {
            solver: SolverKind::SimulatedAnnealing,
            n_clusters: couriers,
            num_sweeps_sa: 300,
            num_reads_sa: 10_000,
            num_reads_qa: 1_000,
            annealing_time: 20,
        }
    }

    #[must_use]
    pub fn with_solver(mut self, solver: SolverKind) -> Self {
        self.solver = solver;
        self
    }

    #[must_use]
    pub fn with_sweeps(mut self, num_sweeps_sa: u32) -> Self {
        self.num_sweeps_sa = num_sweeps_sa;
        self
    }

    #[must_use]
    pub fn with_annealing_reads(mut self, num_reads_sa: u32) -> Self {
        self.num_reads_sa = num_reads_sa;
        self
    }

    #[must_use]
    pub fn with_quantum_reads(mut self, num_reads_qa: u32) -> Self {
        self.num_reads_qa = num_reads_qa;
        self
    }

    #[must_use]
    pub fn with_annealing_time(mut self, annealing_time: u32) -> Self {
        self.annealing_time = annealing_time;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemData {
    pub weight_dict: EncodedWeights,
}

/// Body of the job submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePlanningRequest {
    pub data: ProblemData,
    pub params: SolverParams,
}

impl RoutePlanningRequest {
    pub fn new(weights: EncodedWeights, params: SolverParams) -> Result<Self, SolverError> {
        if params.n_clusters == 0 {
            return Err(SolverError::InvalidParams(
                "cluster count must be at least 1".to_string(),
            ));
        }
        if weights.is_empty() {
            warn!("submitting an empty weight mapping; clustering is undefined");
        }
        Ok(Self {
            data: ProblemData { weight_dict: weights },
            params,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobHandle {
    pub id: String,
    #[serde(default = "pending")]
    pub status: JobStatus,
}

fn pending() -> JobStatus {
    JobStatus::Pending
}

/// Cluster label as reported by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClusterId {
    Number(i64),
    Text(String),
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Node order of one cluster: a JSON integer array or its text rendering.
///
/// Any other JSON lands in `Other` and is rejected when the route is decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RouteNodes {
    List(Vec<i64>),
    Text(String),
    Other(Value),
}

impl Default for RouteNodes {
    fn default() -> Self {
        Self::Other(Value::Null)
    }
}

/// One naive route edge: `"(u, v)"` text or a two-element array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EdgeRecord {
    Pair([i64; 2]),
    Text(String),
    Other(Value),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRecord {
    pub cluster_id: ClusterId,
    #[serde(default)]
    pub route_nodes: RouteNodes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub naive_route_edges: Option<Vec<EdgeRecord>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutesResult {
    #[serde(default)]
    pub routes_list: Vec<RouteRecord>,
}

/// Bounded polling for job completion.
#[derive(Debug, Clone)]
pub struct PollOptions {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            timeout: Duration::from_secs(300),
        }
    }
}

/// Submit `request`, wait for the job to succeed and fetch its routes.
pub fn solve<S>(service: &S, request: &RoutePlanningRequest, poll: &PollOptions) -> Result<RoutesResult, SolverError>
where
    S: OptimizationService + ?Sized,
{
    let job = service.submit(request)?;
    info!(
        job_id = %job.id,
        solver = %request.params.solver,
        clusters = request.params.n_clusters,
        weights = request.data.weight_dict.len(),
        "job submitted"
    );

    let started = Instant::now();
    loop {
        let status = service.status(&job)?;
        match status {
            JobStatus::Succeeded => break,
            JobStatus::Failed => return Err(SolverError::JobFailed { job_id: job.id }),
            JobStatus::Pending | JobStatus::Running | JobStatus::Unknown => {
                let waited = started.elapsed();
                if waited >= poll.timeout {
                    return Err(SolverError::Timeout {
                        job_id: job.id,
                        waited_secs: waited.as_secs(),
                    });
                }
                debug!(job_id = %job.id, ?status, "job not finished");
                // Never sleep past the deadline; the next pass polls once more
                // and then reports the timeout.
                std::thread::sleep(poll.interval.min(poll.timeout - waited));
            }
        }
    }

    let result = service.result(&job)?;
    info!(job_id = %job.id, routes = result.routes_list.len(), "job result received");
    Ok(result)
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use super::*;
    use crate::encoding::EdgeKey;

    struct ScriptedService {
        statuses: RefCell<Vec<JobStatus>>,
        polls: Cell<usize>,
        result: RoutesResult,
    }

    impl ScriptedService {
        fn new(statuses: Vec<JobStatus>) -> Self {
            Self {
                statuses: RefCell::new(statuses),
                polls: Cell::new(0),
                result: RoutesResult::default(),
            }
        }
    }

    impl OptimizationService for ScriptedService {
        fn submit(&self, _request: &RoutePlanningRequest) -> Result<JobHandle, SolverError> {
            Ok(JobHandle {
                id: "job-1".to_string(),
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

    fn fast_poll(timeout: Duration) -> PollOptions {
        PollOptions {
            interval: Duration::ZERO,
            timeout,
        }
    }

    fn request() -> RoutePlanningRequest {
        let mut weights = EncodedWeights::default();
        weights.insert(EdgeKey::new(0, 1), 1.2);
        RoutePlanningRequest::new(weights, SolverParams::for_couriers(2)).expect("request")
    }

    #[test]
    fn payload_matches_service_shape() {
        let json = serde_json::to_value(request()).expect("json");
        assert_eq!(
            json,
            serde_json::json!({
                "data": { "weight_dict": { "(0, 1)": 1.2 } },
                "params": {
                    "solver": "sim_anneal",
                    "n_clusters": 2,
                    "num_sweeps_sa": 300,
                    "num_reads_sa": 10000,
                    "num_reads_qa": 1000,
                    "annealing_time": 20
                }
            })
        );
    }

    #[test]
    fn zero_clusters_rejected() {
        let err = RoutePlanningRequest::new(EncodedWeights::default(), SolverParams::for_couriers(0))
            .expect_err("zero couriers");
        assert!(matches!(err, SolverError::InvalidParams(_)));
    }

    #[test]
    fn empty_weights_still_build_a_request() {
        let request = RoutePlanningRequest::new(EncodedWeights::default(), SolverParams::for_couriers(3))
            .expect("request");
        assert!(request.data.weight_dict.is_empty());
    }

    #[test]
    fn builder_overrides_tuning_knobs() {
        let params = SolverParams::for_couriers(4)
            .with_solver(SolverKind::QuantumAnnealing)
            .with_quantum_reads(50)
            .with_annealing_time(5);
        assert_eq!(params.solver, SolverKind::QuantumAnnealing);
        assert_eq!(params.num_reads_qa, 50);
        assert_eq!(params.annealing_time, 5);
        assert_eq!(params.num_sweeps_sa, 300);
    }

    #[test]
    fn polls_until_succeeded() {
        let service = ScriptedService::new(vec![
            JobStatus::Pending,
            JobStatus::Running,
            JobStatus::Succeeded,
        ]);

        let result = solve(&service, &request(), &fast_poll(Duration::from_secs(60))).expect("solve");
        assert_eq!(service.polls.get(), 3);
        assert!(result.routes_list.is_empty());
    }

    #[test]
    fn failed_job_is_fatal() {
        let service = ScriptedService::new(vec![JobStatus::Running, JobStatus::Failed]);
        let err = solve(&service, &request(), &fast_poll(Duration::from_secs(60))).expect_err("failed");
        assert!(matches!(err, SolverError::JobFailed { job_id } if job_id == "job-1"));
    }

    #[test]
    fn stuck_job_times_out() {
        let service = ScriptedService::new(vec![JobStatus::Running]);
        let err = solve(&service, &request(), &fast_poll(Duration::ZERO)).expect_err("timeout");
        assert!(matches!(err, SolverError::Timeout { .. }));
        assert_eq!(service.polls.get(), 1);
    }

    #[test]
    fn timeout_bounds_a_long_poll_interval() {
        let service = ScriptedService::new(vec![JobStatus::Running]);
        let poll = PollOptions {
            interval: Duration::from_secs(10),
            timeout: Duration::from_millis(100),
        };

        let started = Instant::now();
        let err = solve(&service, &request(), &poll).expect_err("timeout");

        assert!(matches!(err, SolverError::Timeout { waited_secs: 0, .. }));
        assert!(started.elapsed() < Duration::from_secs(2), "waited {:?}", started.elapsed());
        assert_eq!(service.polls.get(), 2);
    }

    #[test]
    fn unrecognised_status_is_unknown() {
        let status: JobStatus = serde_json::from_str("\"CANCELLING\"").expect("status");
        assert_eq!(status, JobStatus::Unknown);
    }

    #[test]
    fn malformed_route_fields_still_deserialize() {
        let result: RoutesResult = serde_json::from_str(
            r#"{ "routes_list": [
                { "cluster_id": 0, "route_nodes": [0, 1.5], "naive_route_edges": [[0, "x"]] },
                { "cluster_id": 1 }
            ] }"#,
        )
        .expect("result");

        assert_eq!(
            result.routes_list[0].route_nodes,
            RouteNodes::Other(serde_json::json!([0, 1.5]))
        );
        assert_eq!(
            result.routes_list[0].naive_route_edges,
            Some(vec![EdgeRecord::Other(serde_json::json!([0, "x"]))])
        );
        assert_eq!(result.routes_list[1].route_nodes, RouteNodes::Other(Value::Null));
    }

    #[test]
    fn route_records_accept_both_node_shapes() {
        let result: RoutesResult = serde_json::from_str(
            r#"{ "routes_list": [
                { "cluster_id": 0, "route_nodes": "[0, 3, 1]", "naive_route_edges": ["(0, 3)", "(3, 1)"] },
                { "cluster_id": "1", "route_nodes": [2, 4] }
            ] }"#,
        )
        .expect("result");

        assert_eq!(result.routes_list[0].route_nodes, RouteNodes::Text("[0, 3, 1]".into()));
        assert_eq!(result.routes_list[1].route_nodes, RouteNodes::List(vec![2, 4]));
        assert_eq!(result.routes_list[1].cluster_id, ClusterId::Text("1".into()));
        assert!(result.routes_list[1].naive_route_edges.is_none());
    }
}
