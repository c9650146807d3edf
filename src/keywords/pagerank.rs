//! Weighted PageRank over the co-occurrence graph
//!
//! Power iteration with dangling-node mass spread uniformly over all nodes.

use super::graph::CooccurrenceGraph;

/// Result of a PageRank computation
#[derive(Debug, Clone)]
pub struct PageRankResult {
    /// Scores for each node (indexed by node ID), summing to 1
    pub scores: Vec<f64>,
    /// Number of iterations performed
    pub iterations: usize,
    /// Final convergence delta (L1 norm)
    pub delta: f64,
    pub converged: bool,
}

impl PageRankResult {
    /// Get the score for a specific node
    pub fn score(&self, node: u32) -> f64 {
        self.scores.get(node as usize).copied().unwrap_or(0.0)
    }
}

/// One power-iteration step: every node pulls rank from its neighbours
///
/// `share[u]` is the damped fraction of `u`'s rank spread per unit of edge
/// weight; `base` is the teleport plus dangling mass each node receives.
fn pull_ranks(graph: &CooccurrenceGraph, share: &[f64], base: f64, next: &mut [f64]) {
    for (node, rank) in next.iter_mut().enumerate() {
        let incoming: f64 = graph
            .neighbors(node as u32)
            .map(|(neighbor, weight)| share[neighbor as usize] * weight)
            .sum();
        *rank = base + incoming;
    }
}

/// PageRank parameters
#[derive(Debug, Clone)]
pub struct PageRank {
    /// Damping factor (typically 0.85)
    pub damping: f64,
    pub max_iterations: usize,
    /// Convergence threshold
    pub threshold: f64,
}

impl Default for PageRank {
    fn default() -> Self {
        Self {
            damping: 0.85,
            max_iterations: 100,
            threshold: 1e-6,
        }
    }
}

impl PageRank {
    pub fn new(damping: f64, max_iterations: usize, threshold: f64) -> Self {
        Self {
            damping,
            max_iterations,
            threshold,
        }
    }

    /// Rank the nodes of `graph`
    ///
    /// Stops after `max_iterations` even when the L1 change is still above
    /// `threshold`; `converged` tells the two apart.
    pub fn run(&self, graph: &CooccurrenceGraph) -> PageRankResult {
        let n = graph.node_count();
        let mut result = PageRankResult {
            scores: vec![1.0 / n.max(1) as f64; n],
            iterations: 0,
            delta: 0.0,
            converged: true,
        };
        if n == 0 {
            result.scores.clear();
            return result;
        }

        let totals: Vec<f64> = (0..n as u32).map(|id| graph.total_weight(id)).collect();
        let dangling = graph.dangling_nodes();
        let uniform = 1.0 / n as f64;
        let mut share = vec![0.0; n];
        let mut next = vec![0.0; n];

        for iteration in 1..=self.max_iterations {
            let dangling_mass: f64 = dangling.iter().map(|&d| result.scores[d as usize]).sum();
            let base = (1.0 - self.damping + self.damping * dangling_mass) * uniform;
            for ((s, &rank), &total) in share.iter_mut().zip(&result.scores).zip(&totals) {
                *s = if total > 0.0 { self.damping * rank / total } else { 0.0 };
            }

            pull_ranks(graph, &share, base, &mut next);
            result.delta = result
                .scores
                .iter()
                .zip(&next)
                .map(|(old, new)| (old - new).abs())
                .sum();
            std::mem::swap(&mut result.scores, &mut next);
            result.iterations = iteration;

            if result.delta <= self.threshold {
                break;
            }
        }
        result.converged = result.delta <= self.threshold;

        let sum: f64 = result.scores.iter().sum();
        if sum > 0.0 {
            result.scores.iter_mut().for_each(|score| *score /= sum);
        }
        result
    }
}
