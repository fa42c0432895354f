//! Flattened, non-hierarchical cluster graph consumed by clustering
//! algorithms.
//!
//! `clusters` holds every unit that participates in the benchmark; `edges`
//! maps a source unit to the ordered list of units it depends on. The
//! constructor rejects edges whose endpoints are not clusters, so a graph
//! obtained from [`NonNestedClusterGraph::new`] is always internally
//! consistent.

use crate::errors::{Error, Result};
use crate::solution_model::Node;
use im::{HashMap, HashSet, Vector};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NonNestedClusterGraph {
    clusters: HashSet<Node>,
    edges: HashMap<Node, Vector<Node>>,
}

impl NonNestedClusterGraph {
    pub fn new(clusters: HashSet<Node>, edges: HashMap<Node, Vector<Node>>) -> Result<Self> {
        for (source, targets) in &edges {
            if !clusters.contains(source) {
                return Err(Error::dangling_edge(source.name()));
            }
            for target in targets {
                if !clusters.contains(target) {
                    return Err(Error::dangling_edge(target.name()));
                }
            }
        }
        Ok(Self { clusters, edges })
    }

    pub fn clusters(&self) -> &HashSet<Node> {
        &self.clusters
    }

    pub fn edges(&self) -> &HashMap<Node, Vector<Node>> {
        &self.edges
    }

    /// Total number of directed edges across all sources
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(Vector::len).sum()
    }

    /// Drop dependency information: keep, for every source, only the first
    /// `floor(len × fraction)` entries of its edge list. Truncation rather
    /// than sampling, so a lower fraction always yields a prefix of a higher
    /// fraction's edges. The cluster set is carried over unchanged, including
    /// sources left with no outgoing edges.
    pub fn ablate_edges(&self, fraction: f64) -> Self {
        let fraction = fraction.clamp(0.0, 1.0);
        let edges = self
            .edges
            .iter()
            .map(|(source, targets)| {
                let keep = (targets.len() as f64 * fraction) as usize;
                (source.clone(), targets.take(keep.min(targets.len())))
            })
            .collect();
        Self {
            clusters: self.clusters.clone(),
            edges,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn class(name: &str) -> Node {
        Node::class(name)
    }

    fn graph_with_fanout(targets: &[&str]) -> NonNestedClusterGraph {
        let source = class("Source");
        let mut clusters = HashSet::new();
        clusters.insert(source.clone());
        let mut edge_list = Vector::new();
        for name in targets {
            let node = class(name);
            clusters.insert(node.clone());
            edge_list.push_back(node);
        }
        let mut edges = HashMap::new();
        edges.insert(source, edge_list);
        NonNestedClusterGraph::new(clusters, edges).unwrap()
    }

    #[test]
    fn constructor_rejects_unknown_edge_target() {
        let source = class("Source");
        let mut clusters = HashSet::new();
        clusters.insert(source.clone());
        let mut edges = HashMap::new();
        edges.insert(source, Vector::from(vec![class("Ghost")]));

        let err = NonNestedClusterGraph::new(clusters, edges).unwrap_err();
        assert!(matches!(err, Error::DanglingEdge { .. }));
    }

    #[test]
    fn constructor_rejects_unknown_edge_source() {
        let target = class("Target");
        let mut clusters = HashSet::new();
        clusters.insert(target.clone());
        let mut edges = HashMap::new();
        edges.insert(class("Ghost"), Vector::from(vec![target]));

        let err = NonNestedClusterGraph::new(clusters, edges).unwrap_err();
        assert!(matches!(err, Error::DanglingEdge { .. }));
    }

    #[test]
    fn ablation_at_half_keeps_first_two_of_four() {
        let graph = graph_with_fanout(&["A", "B", "C", "D"]);
        let ablated = graph.ablate_edges(0.5);

        let kept = ablated.edges().get(&class("Source")).unwrap();
        let names: Vec<&str> = kept.iter().map(Node::name).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn ablation_preserves_clusters_even_when_edges_vanish() {
        let graph = graph_with_fanout(&["A", "B"]);
        let ablated = graph.ablate_edges(0.0);

        assert_eq!(ablated.clusters(), graph.clusters());
        assert_eq!(ablated.edge_count(), 0);
    }

    #[test]
    fn full_fraction_is_identity() {
        let graph = graph_with_fanout(&["A", "B", "C"]);
        assert_eq!(graph.ablate_edges(1.0), graph);
    }

    #[test]
    fn fraction_floors_odd_counts() {
        let graph = graph_with_fanout(&["A", "B", "C"]);
        assert_eq!(graph.ablate_edges(0.5).edge_count(), 1);
    }
}
