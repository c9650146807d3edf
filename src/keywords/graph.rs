//! Word co-occurrence graph
//!
//! Undirected, weighted graph over candidate words. Uses `FxHashMap` for O(1)
//! edge lookups during construction.

use rustc_hash::FxHashMap;

use super::tokenizer::Token;

/// A node of the co-occurrence graph
#[derive(Debug, Clone)]
pub struct WordNode {
    /// The word this node stands for
    pub word: String,
    /// Adjacency list: target node ID -> edge weight
    pub edges: FxHashMap<u32, f64>,
}

/// Undirected co-occurrence graph
#[derive(Debug, Default)]
pub struct CooccurrenceGraph {
    word_to_id: FxHashMap<String, u32>,
    nodes: Vec<WordNode>,
}

impl CooccurrenceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the node for `word`, returning its ID
    pub fn get_or_create_node(&mut self, word: &str) -> u32 {
        if let Some(&id) = self.word_to_id.get(word) {
            return id;
        }

        let id = self.nodes.len() as u32;
        self.word_to_id.insert(word.to_string(), id);
        self.nodes.push(WordNode {
            word: word.to_string(),
            edges: FxHashMap::default(),
        });
        id
    }

    /// Add `weight` to the edge between two nodes, in both directions
    pub fn increment_edge(&mut self, from: u32, to: u32, weight: f64) {
        if from == to {
            return;
        }

        if let Some(node) = self.nodes.get_mut(from as usize) {
            *node.edges.entry(to).or_insert(0.0) += weight;
        }
        if let Some(node) = self.nodes.get_mut(to as usize) {
            *node.edges.entry(from).or_insert(0.0) += weight;
        }
    }

    /// Build a graph linking candidate tokens that occur within `window_size`
    /// candidates of each other in the same sentence.
    ///
    /// Every candidate becomes a node, even when it has no neighbours.
    pub fn from_tokens(tokens: &[Token], window_size: usize) -> Self {
        let mut graph = Self::new();
        let candidates: Vec<&Token> = tokens.iter().filter(|t| t.is_candidate).collect();

        let mut i = 0;
        while i < candidates.len() {
            let sentence_idx = candidates[i].sentence_idx;
            let start = i;
            while i < candidates.len() && candidates[i].sentence_idx == sentence_idx {
                i += 1;
            }
            let end = i;

            for j in start..end {
                let node_j = graph.get_or_create_node(&candidates[j].text);
                for k in (j + 1)..std::cmp::min(j + window_size, end) {
                    let node_k = graph.get_or_create_node(&candidates[k].text);
                    graph.increment_edge(node_j, node_k, 1.0);
                }
            }
        }

        graph
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of undirected edges
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.edges.len()).sum::<usize>() / 2
    }

    pub fn node_id(&self, word: &str) -> Option<u32> {
        self.word_to_id.get(word).copied()
    }

    pub fn word(&self, id: u32) -> Option<&str> {
        self.nodes.get(id as usize).map(|n| n.word.as_str())
    }

    /// Neighbours of a node with their edge weights
    pub fn neighbors(&self, id: u32) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.nodes
            .get(id as usize)
            .into_iter()
            .flat_map(|n| n.edges.iter().map(|(&to, &w)| (to, w)))
    }

    /// Sum of edge weights of a node
    pub fn total_weight(&self, id: u32) -> f64 {
        self.nodes
            .get(id as usize)
            .map_or(0.0, |n| n.edges.values().sum())
    }

    /// Nodes without any edge
    pub fn dangling_nodes(&self) -> Vec<u32> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.edges.is_empty())
            .map(|(i, _)| i as u32)
            .collect()
    }
}
