//! Distance-graph rendering: every queried distance as an edge, each
//! courier's naive route edges highlighted, the rest dimmed.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write;

use crate::decoding::{DecodeError, route_edges};
use crate::encoding::{AddressTable, EdgeKey, EncodedWeights};
use crate::map::PALETTE;
use crate::solver::{ClusterId, RoutesResult};

/// Route edges of one courier, split by whether the graph has them.
#[derive(Debug, Clone, PartialEq)]
pub struct CourierEdges {
    pub cluster_id: ClusterId,
    pub color: String,
    pub matched: Vec<EdgeKey>,
    /// Edges with no queried distance, or already claimed by an earlier route.
    pub unmatched: Vec<(usize, usize)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphFigure {
    labels: Vec<String>,
    weights: BTreeMap<EdgeKey, f64>,
    pub couriers: Vec<CourierEdges>,
    pub remaining: BTreeSet<EdgeKey>,
}

/// Classify every naive route edge against the distance graph.
///
/// Matching is orientation-free; a matched edge leaves the remaining pool.
pub fn create_graph(
    weights: &EncodedWeights,
    result: &RoutesResult,
    table: &AddressTable,
) -> Result<GraphFigure, DecodeError> {
    let weights: BTreeMap<EdgeKey, f64> = weights.iter().collect();
    let mut remaining: BTreeSet<EdgeKey> = weights.keys().copied().collect();
    let mut couriers = Vec::with_capacity(result.routes_list.len());

    for (i, record) in result.routes_list.iter().enumerate() {
        let mut edges = CourierEdges {
            cluster_id: record.cluster_id.clone(),
            color: PALETTE[i % PALETTE.len()].to_string(),
            matched: Vec::new(),
            unmatched: Vec::new(),
        };
        for (u, v) in route_edges(record, table)? {
            let key = EdgeKey::new(u, v);
            if remaining.remove(&key) {
                edges.matched.push(key);
            } else {
                edges.unmatched.push((u, v));
            }
        }
        couriers.push(edges);
    }

    Ok(GraphFigure {
        labels: table.addresses().to_vec(),
        weights,
        couriers,
        remaining,
    })
}

impl GraphFigure {
    /// Queried distance of an edge, if the pair was routable.
    pub fn weight(&self, key: EdgeKey) -> Option<f64> {
        self.weights.get(&key).copied()
    }

    /// Graphviz DOT rendering; lay out with `neato` or `fdp`.
    pub fn to_dot(&self) -> String {
        let mut out = String::from("graph routes {\n");
        out.push_str("  layout=neato;\n  overlap=false;\n");
        out.push_str("  node [shape=circle, width=0.8, penwidth=3, fontsize=20];\n");

        for (id, label) in self.labels.iter().enumerate() {
            let _ = writeln!(out, "  {id} [tooltip=\"{}\"];", escape(label));
        }

        for courier in &self.couriers {
            for key in &courier.matched {
                let _ = writeln!(
                    out,
                    "  {} -- {} [label=\"{}\", color=\"{}\", style=dashed, penwidth=6];",
                    key.low(),
                    key.high(),
                    self.weight(*key).unwrap_or_default(),
                    courier.color
                );
            }
        }

        for key in &self.remaining {
            let _ = writeln!(
                out,
                "  {} -- {} [label=\"{}\", color=\"#00000080\", penwidth=3];",
                key.low(),
                key.high(),
                self.weight(*key).unwrap_or_default()
            );
        }

        out.push_str("}\n");
        out
    }
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
