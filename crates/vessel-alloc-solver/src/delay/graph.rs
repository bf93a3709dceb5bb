// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use std::collections::BTreeMap;
use vessel_alloc_core::prelude::Tons;
use vessel_alloc_model::prelude::*;

/// Risk prior assumed for a port that has no delay history.
const DEFAULT_PORT_PRIOR: f64 = 0.25;

/// Delay above which the historical component of the risk prior saturates.
const DELAY_NORM_DAYS: f64 = 5.0;

/// Congestion signal carried by one node during diffusion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeFeatures {
    /// Capacity of the node relative to the largest node in the scenario.
    pub capacity_norm: f64,
    /// Current stock over maximum capacity, clamped to `0.0..=1.0`.
    pub utilization: f64,
    /// Prior belief about congestion risk at the node.
    pub risk_prior: f64,
}

impl NodeFeatures {
    #[inline]
    pub const fn new(capacity_norm: f64, utilization: f64, risk_prior: f64) -> Self {
        Self {
            capacity_norm,
            utilization,
            risk_prior,
        }
    }

    #[inline]
    fn blend_towards(self, target: Self, mixing: f64) -> Self {
        Self {
            capacity_norm: self.capacity_norm + mixing * (target.capacity_norm - self.capacity_norm),
            utilization: self.utilization + mixing * (target.utilization - self.utilization),
            risk_prior: self.risk_prior + mixing * (target.risk_prior - self.risk_prior),
        }
    }
}

/// Bipartite graph over ports and plants, linked by the discharge routes
/// between them.
///
/// Propagation blends every node towards the weighted average of its
/// neighbors so that pressure at a plant bleeds into the ports feeding it
/// and vice versa. All rounds read from a snapshot of the previous round,
/// so the result is independent of node order.
#[derive(Debug, Clone)]
pub struct CongestionGraph {
    features: Vec<NodeFeatures>,
    adjacency: Vec<Vec<(usize, f64)>>,
    port_nodes: BTreeMap<PortIdentifier, usize>,
    plant_nodes: BTreeMap<PlantIdentifier, usize>,
}

impl CongestionGraph {
    pub fn from_problem(problem: &Problem) -> Self {
        let mut port_ids: Vec<PortIdentifier> = problem.ports().iter().map(|p| p.id()).collect();
        port_ids.sort_unstable();
        let mut plant_ids: Vec<PlantIdentifier> = problem.plants().iter().map(|p| p.id()).collect();
        plant_ids.sort_unstable();

        let max_capacity = problem
            .ports()
            .iter()
            .map(|p| p.max_capacity())
            .chain(problem.plants().iter().map(|p| p.max_capacity()))
            .max()
            .unwrap_or_else(Tons::zero)
            .to_f64()
            .max(1.0);

        let mut features = Vec::with_capacity(port_ids.len() + plant_ids.len());
        let mut port_nodes = BTreeMap::new();
        let mut plant_nodes = BTreeMap::new();

        for &id in &port_ids {
            let port = problem
                .ports()
                .get(id)
                .expect("port ids were collected from the container");
            port_nodes.insert(id, features.len());
            features.push(NodeFeatures::new(
                port.max_capacity().to_f64() / max_capacity,
                port.utilization(),
                Self::port_prior(problem.history(), id),
            ));
        }
        for &id in &plant_ids {
            let plant = problem
                .plants()
                .get(id)
                .expect("plant ids were collected from the container");
            plant_nodes.insert(id, features.len());
            features.push(NodeFeatures::new(
                plant.max_capacity().to_f64() / max_capacity,
                plant.utilization(),
                // Plants have no arrival history, their prior is pure
                // inventory pressure.
                0.5 * plant.utilization(),
            ));
        }

        let mut adjacency = vec![Vec::new(); features.len()];
        let mut route_ids: Vec<RouteIdentifier> = problem.routes().iter().map(|r| r.id()).collect();
        route_ids.sort_unstable();
        for id in route_ids {
            let route = problem
                .routes()
                .get(id)
                .expect("route ids were collected from the container");
            let (Some(&p), Some(&q)) = (
                port_nodes.get(&route.port()),
                plant_nodes.get(&route.plant()),
            ) else {
                continue;
            };
            // Cheap rail links couple their endpoints more tightly.
            let weight = 1.0 / (1.0 + route.rail_cost());
            adjacency[p].push((q, weight));
            adjacency[q].push((p, weight));
        }

        Self {
            features,
            adjacency,
            port_nodes,
            plant_nodes,
        }
    }

    fn port_prior(history: &DelayHistory, port: PortIdentifier) -> f64 {
        let mut count = 0usize;
        let mut congestion = 0.0;
        let mut delay = 0.0;
        for record in history.for_port(port) {
            count += 1;
            congestion += record.congestion_level();
            delay += record.delay_days();
        }
        if count == 0 {
            return DEFAULT_PORT_PRIOR;
        }
        let n = count as f64;
        let mean_delay = (delay / n / DELAY_NORM_DAYS).min(1.0);
        (0.6 * (congestion / n) + 0.4 * mean_delay).clamp(0.0, 1.0)
    }

    /// Runs `rounds` synchronous diffusion rounds with the given mixing
    /// factor. Isolated nodes keep their features untouched.
    pub fn propagate(&mut self, rounds: usize, mixing: f64) {
        for _ in 0..rounds {
            let snapshot = self.features.clone();
            for (node, neighbors) in self.adjacency.iter().enumerate() {
                if neighbors.is_empty() {
                    continue;
                }
                let mut total_weight = 0.0;
                let mut average = NodeFeatures::new(0.0, 0.0, 0.0);
                for &(neighbor, weight) in neighbors {
                    average.capacity_norm += weight * snapshot[neighbor].capacity_norm;
                    average.utilization += weight * snapshot[neighbor].utilization;
                    average.risk_prior += weight * snapshot[neighbor].risk_prior;
                    total_weight += weight;
                }
                average.capacity_norm /= total_weight;
                average.utilization /= total_weight;
                average.risk_prior /= total_weight;
                self.features[node] = snapshot[node].blend_towards(average, mixing);
            }
        }
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.features.len()
    }

    #[inline]
    pub fn port_features(&self, port: PortIdentifier) -> Option<NodeFeatures> {
        self.port_nodes.get(&port).map(|&node| self.features[node])
    }

    #[inline]
    pub fn plant_features(&self, plant: PlantIdentifier) -> Option<NodeFeatures> {
        self.plant_nodes
            .get(&plant)
            .map(|&node| self.features[node])
    }

    /// Ports in ascending identifier order with their current features.
    pub fn ports(&self) -> impl Iterator<Item = (PortIdentifier, NodeFeatures)> + '_ {
        self.port_nodes
            .iter()
            .map(|(&id, &node)| (id, self.features[node]))
    }
}
