//! Turns the service's identifier routes back into addresses.

use std::collections::HashMap;

use thiserror::Error;
use tracing::warn;

use crate::encoding::{AddressTable, PairParseError, parse_id, parse_pair};
use crate::solver::{ClusterId, EdgeRecord, RouteNodes, RouteRecord, RoutesResult};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("cluster {cluster}: route nodes {text:?} are not a list of non-negative integers")]
    MalformedNodes { cluster: ClusterId, text: String },
    #[error("cluster {cluster}: identifier {id} is outside 0..{len}")]
    OutOfRange { cluster: ClusterId, id: i64, len: usize },
    #[error("cluster {cluster}: {source}")]
    MalformedEdge {
        cluster: ClusterId,
        #[source]
        source: PairParseError,
    },
}

/// Where a decoded plan does not cover the request exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoverageWarning {
    #[error("solver returned {actual} routes for {expected} couriers")]
    RouteCount { expected: usize, actual: usize },
    #[error("address {address:?} is not on any route")]
    Unassigned { address: String },
    #[error("address {address:?} appears on {count} routes")]
    AssignedRepeatedly { address: String, count: usize },
}

/// One courier's stops in visiting order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub cluster_id: ClusterId,
    pub addresses: Vec<String>,
}

/// Decoded routes in the service's cluster order plus coverage findings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedPlan {
    pub routes: Vec<Route>,
    pub warnings: Vec<CoverageWarning>,
}

impl DecodedPlan {
    pub fn address_lists(&self) -> Vec<Vec<String>> {
        self.routes.iter().map(|route| route.addresses.clone()).collect()
    }
}

/// Parse a bracketed integer list such as `"[0, 4, 2]"`.
pub fn parse_node_text(text: &str) -> Option<Vec<usize>> {
    let inner = text.trim().strip_prefix('[')?.strip_suffix(']')?;
    if inner.trim().is_empty() {
        return Some(Vec::new());
    }
    inner
        .split(',')
        .map(parse_id)
        .collect()
}

/// Validated identifier sequence of a route record.
pub fn route_ids(record: &RouteRecord, table: &AddressTable) -> Result<Vec<usize>, DecodeError> {
    let raw: Vec<i64> = match &record.route_nodes {
        RouteNodes::List(ids) => ids.clone(),
        RouteNodes::Text(text) => parse_node_text(text)
            .ok_or_else(|| DecodeError::MalformedNodes {
                cluster: record.cluster_id.clone(),
                text: text.clone(),
            })?
            .into_iter()
            .map(|id| i64::try_from(id).unwrap_or(i64::MAX))
            .collect(),
        RouteNodes::Other(value) => {
            return Err(DecodeError::MalformedNodes {
                cluster: record.cluster_id.clone(),
                text: value.to_string(),
            });
        }
    };

    raw.into_iter()
        .map(|id| checked_id(&record.cluster_id, id, table))
        .collect()
}

/// Validated naive edges of a route record, in the orientation written.
///
/// Records without edges yield an empty list.
pub fn route_edges(record: &RouteRecord, table: &AddressTable) -> Result<Vec<(usize, usize)>, DecodeError> {
    let Some(edges) = &record.naive_route_edges else {
        return Ok(Vec::new());
    };

    edges
        .iter()
        .map(|edge| {
            let (u, v) = match edge {
                EdgeRecord::Pair([u, v]) => (*u, *v),
                EdgeRecord::Text(text) => {
                    let (u, v) = parse_pair(text).map_err(|source| DecodeError::MalformedEdge {
                        cluster: record.cluster_id.clone(),
                        source,
                    })?;
                    (
                        i64::try_from(u).unwrap_or(i64::MAX),
                        i64::try_from(v).unwrap_or(i64::MAX),
                    )
                }
                EdgeRecord::Other(value) => {
                    return Err(DecodeError::MalformedEdge {
                        cluster: record.cluster_id.clone(),
                        source: PairParseError {
                            text: value.to_string(),
                        },
                    });
                }
            };
            Ok((
                checked_id(&record.cluster_id, u, table)?,
                checked_id(&record.cluster_id, v, table)?,
            ))
        })
        .collect()
}

fn checked_id(cluster: &ClusterId, id: i64, table: &AddressTable) -> Result<usize, DecodeError> {
    usize::try_from(id)
        .ok()
        .filter(|id| *id < table.len())
        .ok_or_else(|| DecodeError::OutOfRange {
            cluster: cluster.clone(),
            id,
            len: table.len(),
        })
}

/// Map every route record to addresses and check the partition.
///
/// An incomplete partition is not an error: it is reported through
/// [`DecodedPlan::warnings`].
pub fn decode_routes(result: &RoutesResult, table: &AddressTable, couriers: usize) -> Result<DecodedPlan, DecodeError> {
    let mut routes = Vec::with_capacity(result.routes_list.len());
    let mut visits: HashMap<usize, usize> = HashMap::new();

    for record in &result.routes_list {
        let ids = route_ids(record, table)?;
        let mut addresses = Vec::with_capacity(ids.len());
        for id in ids {
            *visits.entry(id).or_default() += 1;
            if let Some(address) = table.address_of(id) {
                addresses.push(address.to_string());
            }
        }
        routes.push(Route {
            cluster_id: record.cluster_id.clone(),
            addresses,
        });
    }

    let mut warnings = Vec::new();
    if routes.len() != couriers {
        warnings.push(CoverageWarning::RouteCount {
            expected: couriers,
            actual: routes.len(),
        });
    }
    for (id, address) in table.addresses().iter().enumerate() {
        match visits.get(&id).copied().unwrap_or(0) {
            0 => warnings.push(CoverageWarning::Unassigned {
                address: address.clone(),
            }),
            1 => {}
            count => warnings.push(CoverageWarning::AssignedRepeatedly {
                address: address.clone(),
                count,
            }),
        }
    }

    for warning in &warnings {
        warn!(%warning, "incomplete route partition");
    }

    Ok(DecodedPlan { routes, warnings })
}
