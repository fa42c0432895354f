//! Benchmark configurations and the seams to pluggable collaborators.
//!
//! The harness never looks inside an algorithm: clustering, cutting, and
//! similarity strategies are opaque objects identified by a stable id, and
//! everything that touches disk or ground truth goes through [`BenchDriver`].

pub mod harness;
pub mod results;

use crate::errors::Result;
use crate::graph::NonNestedClusterGraph;
use crate::solution_model::Node;
use results::BenchResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// A pluggable clustering strategy. Opaque to the harness.
pub trait ClusteringAlgorithm: Send + Sync {
    /// Stable identifier used for result grouping and labels
    fn id(&self) -> &str;

    /// Deep copy, safe for concurrent use; no state shared with the original
    fn boxed_clone(&self) -> Box<dyn ClusteringAlgorithm>;
}

/// A pluggable strategy deciding where a clustering is split into groups
pub trait CuttingAlgorithm: Send + Sync {
    fn id(&self) -> &str;
    fn boxed_clone(&self) -> Box<dyn CuttingAlgorithm>;
}

/// A pluggable metric scoring closeness between clusters or clusterings
pub trait SimilarityMetric: Send + Sync {
    fn id(&self) -> &str;
    fn boxed_clone(&self) -> Box<dyn SimilarityMetric>;
}

impl Clone for Box<dyn ClusteringAlgorithm> {
    fn clone(&self) -> Self {
        self.boxed_clone()
    }
}

impl Clone for Box<dyn CuttingAlgorithm> {
    fn clone(&self) -> Self {
        self.boxed_clone()
    }
}

impl Clone for Box<dyn SimilarityMetric> {
    fn clone(&self) -> Self {
        self.boxed_clone()
    }
}

/// One candidate pipeline under benchmark: a clustering algorithm, a cutting
/// algorithm, a similarity metric, and a display name for result rows.
pub struct BenchConfig {
    name: String,
    clustering: Box<dyn ClusteringAlgorithm>,
    cutting: Box<dyn CuttingAlgorithm>,
    similarity: Box<dyn SimilarityMetric>,
}

impl BenchConfig {
    pub fn new(
        name: impl Into<String>,
        clustering: Box<dyn ClusteringAlgorithm>,
        cutting: Box<dyn CuttingAlgorithm>,
        similarity: Box<dyn SimilarityMetric>,
    ) -> Self {
        Self {
            name: name.into(),
            clustering,
            cutting,
            similarity,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn clustering(&self) -> &dyn ClusteringAlgorithm {
        &*self.clustering
    }

    pub fn cutting(&self) -> &dyn CuttingAlgorithm {
        &*self.cutting
    }

    pub fn similarity(&self) -> &dyn SimilarityMetric {
        &*self.similarity
    }

    /// Grouping identity: the strategy triple, independent of the display name
    pub fn id(&self) -> ConfigId {
        ConfigId {
            clustering: self.clustering.id().to_string(),
            cutting: self.cutting.id().to_string(),
            similarity: self.similarity.id().to_string(),
        }
    }

    /// Clone of this configuration with `suffix` appended to the display name
    pub fn with_name_suffix(&self, suffix: &str) -> Self {
        let mut labeled = self.clone();
        labeled.name.push_str(suffix);
        labeled
    }
}

impl Clone for BenchConfig {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            clustering: self.clustering.boxed_clone(),
            cutting: self.cutting.boxed_clone(),
            similarity: self.similarity.boxed_clone(),
        }
    }
}

impl fmt::Debug for BenchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BenchConfig")
            .field("name", &self.name)
            .field("id", &self.id())
            .finish()
    }
}

/// Algorithmic identity of a configuration, used as the result-map key.
/// Deliberately excludes the display name so relabeling (e.g. an ablation
/// suffix) cannot destabilize the key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConfigId {
    pub clustering: String,
    pub cutting: String,
    pub similarity: String,
}

impl ConfigId {
    /// Synthetic identity for a paired comparison of two clustering
    /// algorithms under a shared cutting algorithm and similarity metric
    pub(crate) fn comparison(
        left: &dyn ClusteringAlgorithm,
        right: &dyn ClusteringAlgorithm,
        cutting: &dyn CuttingAlgorithm,
        similarity: &dyn SimilarityMetric,
    ) -> Self {
        Self {
            clustering: format!("{}-vs-{}", left.id(), right.id()),
            cutting: cutting.id().to_string(),
            similarity: similarity.id().to_string(),
        }
    }
}

impl fmt::Display for ConfigId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.clustering, self.cutting, self.similarity)
    }
}

/// A solution under test, used as a dictionary key throughout the results
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Repository {
    pub owner: String,
    pub name: String,
    pub solution: String,
}

impl Repository {
    pub fn new(
        owner: impl Into<String>,
        name: impl Into<String>,
        solution: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            solution: solution.into(),
        }
    }

    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// One project's parsed structural tree, dependency annotations included
#[derive(Clone, Debug)]
pub struct ProjectGraph {
    pub name: String,
    pub root: Node,
}

/// The external collaborators the harness orchestrates: discovery of parsed
/// data, flattening, and the actual clustering pipeline execution. All I/O
/// and scoring lives behind this trait.
pub trait BenchDriver: Sync {
    /// Discover parsed per-project graphs under a repository's data folder
    fn project_graphs_in_folder(&self, folder: &Path) -> Result<Vec<ProjectGraph>>;

    /// Load a repository's combined structural tree, dependency-annotated
    fn complete_tree_with_dependencies(&self, folder: &Path) -> Result<Node>;

    /// Flatten a structural tree to namespace-level clusters
    fn root_namespaces(&self, tree: &Node) -> Result<NonNestedClusterGraph>;

    /// Execute one clustering + cutting + similarity pipeline and score it
    /// against ground truth
    fn run(&self, config: &BenchConfig, graph: &NonNestedClusterGraph) -> Result<BenchResult>;

    /// Score the agreement of two clustering algorithms under an otherwise
    /// identical pipeline
    fn compare_algorithms(
        &self,
        left: &dyn ClusteringAlgorithm,
        right: &dyn ClusteringAlgorithm,
        cutting: &dyn CuttingAlgorithm,
        similarity: &dyn SimilarityMetric,
        graph: &NonNestedClusterGraph,
    ) -> Result<BenchResult>;

    /// Materialize raw repository data into the parsed-data layout
    fn prepare(&self, source: &Path, dest: &Path) -> Result<()>;
}
