//! In-memory test doubles for the harness.
//!
//! Real drivers parse solutions from disk and run actual clustering
//! pipelines; tests instead script a [`ScriptedDriver`] with fixed trees,
//! graphs, and scores. Strategies are identified by name only, which is all
//! the harness ever looks at.

use crate::bench::results::BenchResult;
use crate::bench::{
    BenchConfig, BenchDriver, ClusteringAlgorithm, CuttingAlgorithm, ProjectGraph,
    SimilarityMetric,
};
use crate::errors::{Error, Result};
use crate::graph::NonNestedClusterGraph;
use crate::solution_model::Node;
use anyhow::anyhow;
use im::{HashMap, HashSet, Vector};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Clustering strategy stub carrying only an id
#[derive(Clone)]
pub struct NamedClustering {
    id: String,
}

impl NamedClustering {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl ClusteringAlgorithm for NamedClustering {
    fn id(&self) -> &str {
        &self.id
    }

    fn boxed_clone(&self) -> Box<dyn ClusteringAlgorithm> {
        Box::new(self.clone())
    }
}

/// Cutting strategy stub carrying only an id
#[derive(Clone)]
pub struct NamedCutting {
    id: String,
}

impl NamedCutting {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl CuttingAlgorithm for NamedCutting {
    fn id(&self) -> &str {
        &self.id
    }

    fn boxed_clone(&self) -> Box<dyn CuttingAlgorithm> {
        Box::new(self.clone())
    }
}

/// Similarity metric stub carrying only an id
#[derive(Clone)]
pub struct NamedMetric {
    id: String,
}

impl NamedMetric {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl SimilarityMetric for NamedMetric {
    fn id(&self) -> &str {
        &self.id
    }

    fn boxed_clone(&self) -> Box<dyn SimilarityMetric> {
        Box::new(self.clone())
    }
}

/// A configuration whose three strategies all share `name`
pub fn named_config(name: &str) -> BenchConfig {
    BenchConfig::new(
        name,
        Box::new(NamedClustering::new(name)),
        Box::new(NamedCutting::new(name)),
        Box::new(NamedMetric::new(name)),
    )
}

/// A project graph with two namespaces of two classes each
pub fn two_namespace_project(name: &str) -> ProjectGraph {
    let root = Node::namespace(
        name,
        vec![
            Node::namespace("A", vec![Node::class("A.One"), Node::class("A.Two")]).unwrap(),
            Node::namespace("B", vec![Node::class("B.One"), Node::class("B.Two")]).unwrap(),
        ],
    )
    .unwrap();
    ProjectGraph {
        name: name.to_string(),
        root,
    }
}

/// The flattened view of [`two_namespace_project`]: four class clusters and
/// one cross-namespace dependency edge
pub fn two_namespace_graph() -> NonNestedClusterGraph {
    let clusters: HashSet<Node> = ["A.One", "A.Two", "B.One", "B.Two"]
        .into_iter()
        .map(Node::class)
        .collect();
    let mut edges = HashMap::new();
    edges.insert(
        Node::class("A.One"),
        Vector::from(vec![Node::class("B.One")]),
    );
    NonNestedClusterGraph::new(clusters, edges).unwrap()
}

/// A graph with one source cluster and `fanout` ordered outgoing edges
pub fn fanout_graph(fanout: usize) -> NonNestedClusterGraph {
    let source = Node::class("Source");
    let mut clusters = HashSet::new();
    clusters.insert(source.clone());
    let mut targets = Vector::new();
    for i in 0..fanout {
        let target = Node::class(format!("Target{i}"));
        clusters.insert(target.clone());
        targets.push_back(target);
    }
    let mut edges = HashMap::new();
    edges.insert(source, targets);
    NonNestedClusterGraph::new(clusters, edges).unwrap()
}

enum Scoring {
    Fixed(f64),
    Scripted(Mutex<VecDeque<f64>>),
    EdgeCount,
    Fail(String),
}

/// A [`BenchDriver`] that serves pre-built data and scripted scores while
/// counting how often it is invoked.
pub struct ScriptedDriver {
    projects: Vec<ProjectGraph>,
    tree: Option<Node>,
    flattened: Option<NonNestedClusterGraph>,
    scoring: Scoring,
    runs: AtomicUsize,
    comparisons: AtomicUsize,
    prepared: Mutex<Vec<(PathBuf, PathBuf)>>,
}

impl Default for ScriptedDriver {
    fn default() -> Self {
        Self {
            projects: Vec::new(),
            tree: None,
            flattened: None,
            scoring: Scoring::Fixed(0.5),
            runs: AtomicUsize::new(0),
            comparisons: AtomicUsize::new(0),
            prepared: Mutex::new(Vec::new()),
        }
    }
}

impl ScriptedDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_projects(mut self, projects: Vec<ProjectGraph>) -> Self {
        self.projects = projects;
        self
    }

    pub fn with_tree(mut self, tree: Node) -> Self {
        self.tree = Some(tree);
        self
    }

    /// Serve this graph from `root_namespaces` instead of deriving one
    pub fn with_flattened(mut self, graph: NonNestedClusterGraph) -> Self {
        self.flattened = Some(graph);
        self
    }

    pub fn with_fixed_score(mut self, score: f64) -> Self {
        self.scoring = Scoring::Fixed(score);
        self
    }

    /// Serve these scores one per run, in order of arrival
    pub fn with_scripted_scores(mut self, scores: &[f64]) -> Self {
        self.scoring = Scoring::Scripted(Mutex::new(scores.iter().copied().collect()));
        self
    }

    /// Score every run with the graph's total edge count
    pub fn with_edge_count_scoring(mut self) -> Self {
        self.scoring = Scoring::EdgeCount;
        self
    }

    /// Fail every run with an opaque algorithm error
    pub fn failing(mut self, message: &str) -> Self {
        self.scoring = Scoring::Fail(message.to_string());
        self
    }

    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }

    pub fn comparisons(&self) -> usize {
        self.comparisons.load(Ordering::SeqCst)
    }

    pub fn prepared(&self) -> Vec<(PathBuf, PathBuf)> {
        self.prepared.lock().unwrap().clone()
    }

    fn next_score(&self, graph: &NonNestedClusterGraph) -> Result<BenchResult> {
        match &self.scoring {
            Scoring::Fixed(score) => Ok(BenchResult::new(*score)),
            Scoring::Scripted(queue) => {
                let mut queue = queue.lock().unwrap();
                queue
                    .pop_front()
                    .map(BenchResult::new)
                    .ok_or_else(|| Error::Algorithm(anyhow!("scripted scores exhausted")))
            }
            Scoring::EdgeCount => Ok(BenchResult::new(graph.edge_count() as f64)),
            Scoring::Fail(message) => Err(Error::Algorithm(anyhow!(message.clone()))),
        }
    }

    /// Every class in the tree becomes a cluster; edges are left to
    /// [`ScriptedDriver::with_flattened`]
    fn derive_flattened(tree: &Node) -> NonNestedClusterGraph {
        fn collect(node: &Node, clusters: &mut HashSet<Node>) {
            match node {
                Node::Class(_) => {
                    clusters.insert(node.clone());
                }
                other => {
                    for child in other.children() {
                        collect(child, clusters);
                    }
                }
            }
        }

        let mut clusters = HashSet::new();
        collect(tree, &mut clusters);
        NonNestedClusterGraph::new(clusters, HashMap::new()).unwrap()
    }
}

impl BenchDriver for ScriptedDriver {
    fn project_graphs_in_folder(&self, _folder: &Path) -> Result<Vec<ProjectGraph>> {
        Ok(self.projects.clone())
    }

    fn complete_tree_with_dependencies(&self, folder: &Path) -> Result<Node> {
        self.tree
            .clone()
            .ok_or_else(|| Error::missing_data("scripted", folder))
    }

    fn root_namespaces(&self, tree: &Node) -> Result<NonNestedClusterGraph> {
        Ok(match &self.flattened {
            Some(graph) => graph.clone(),
            None => Self::derive_flattened(tree),
        })
    }

    fn run(&self, _config: &BenchConfig, graph: &NonNestedClusterGraph) -> Result<BenchResult> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        self.next_score(graph)
    }

    fn compare_algorithms(
        &self,
        _left: &dyn ClusteringAlgorithm,
        _right: &dyn ClusteringAlgorithm,
        _cutting: &dyn CuttingAlgorithm,
        _similarity: &dyn SimilarityMetric,
        graph: &NonNestedClusterGraph,
    ) -> Result<BenchResult> {
        self.comparisons.fetch_add(1, Ordering::SeqCst);
        self.next_score(graph)
    }

    fn prepare(&self, source: &Path, dest: &Path) -> Result<()> {
        self.prepared
            .lock()
            .unwrap()
            .push((source.to_path_buf(), dest.to_path_buf()));
        Ok(())
    }
}
