//! One planning run: distances → encoding → remote solve → decoding.

use thiserror::Error;
use tracing::info;

use crate::decoding::{DecodeError, DecodedPlan, decode_routes};
use crate::distance_matrix::{DistanceSurvey, MatrixError, build_distance_matrix};
use crate::encoding::{AddressTable, EncodeError, EncodedWeights, encode_weights};
use crate::graph::{GraphFigure, create_graph};
use crate::map::{MapError, MapFigure, create_map};
use crate::solver::{PollOptions, RoutePlanningRequest, RoutesResult, SolverError, SolverParams, solve};
use crate::text::format_routes;
use crate::traits::{DirectionsProvider, OptimizationService};

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("courier count must be at least 1")]
    NoCouriers,
    #[error(transparent)]
    Matrix(#[from] MatrixError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Solver(#[from] SolverError),
    #[error("malformed solver response: {0}")]
    Decode(#[from] DecodeError),
}

/// User input for one run.
#[derive(Debug, Clone)]
pub struct PlanningRequest {
    pub addresses: Vec<String>,
    pub params: SolverParams,
}

impl PlanningRequest {
    pub fn new(couriers: u32, addresses: Vec<String>) -> Self {
        Self {
            addresses,
            params: SolverParams::for_couriers(couriers),
        }
    }

    #[must_use]
    pub fn with_params(mut self, params: SolverParams) -> Self {
        self.params = params;
        self
    }

    pub fn couriers(&self) -> u32 {
        self.params.n_clusters
    }
}

/// Everything a run produced, kept together for rendering.
#[derive(Debug, Clone)]
pub struct PlanOutcome {
    pub table: AddressTable,
    pub survey: DistanceSurvey,
    pub weights: EncodedWeights,
    pub result: RoutesResult,
    pub plan: DecodedPlan,
}

impl PlanOutcome {
    pub fn text(&self) -> String {
        format_routes(&self.plan.routes)
    }

    pub fn map(&self) -> Result<MapFigure, MapError> {
        create_map(&self.plan.routes, &self.survey.coordinates)
    }

    pub fn graph(&self) -> Result<GraphFigure, DecodeError> {
        create_graph(&self.weights, &self.result, &self.table)
    }

    /// Recoverable problems met along the way, as user-facing lines.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.survey.matrix.is_empty() {
            warnings.push("no distances available; routes were planned without distances".to_string());
        }
        warnings.extend(self.survey.skipped.iter().map(|skipped| {
            format!(
                "no distance between {:?} and {:?}: {}",
                skipped.pair.origin, skipped.pair.destination, skipped.reason
            )
        }));
        warnings.extend(self.plan.warnings.iter().map(ToString::to_string));
        warnings
    }
}

/// Run the whole pipeline for `request`.
pub fn plan_routes<P, S>(
    request: &PlanningRequest,
    directions: &P,
    service: &S,
    poll: &PollOptions,
) -> Result<PlanOutcome, PlanError>
where
    P: DirectionsProvider + ?Sized,
    S: OptimizationService + ?Sized,
{
    if request.couriers() == 0 {
        return Err(PlanError::NoCouriers);
    }

    let table = AddressTable::new(request.addresses.clone())?;
    info!(addresses = table.len(), couriers = request.couriers(), "planning routes");

    let survey = build_distance_matrix(table.addresses(), directions)?;
    let weights = encode_weights(&survey.matrix, &table)?;
    let solver_request = RoutePlanningRequest::new(weights.clone(), request.params.clone())?;
    let result = solve(service, &solver_request, poll)?;
    let plan = decode_routes(&result, &table, request.couriers() as usize)?;

    Ok(PlanOutcome {
        table,
        survey,
        weights,
        result,
        plan,
    })
}
