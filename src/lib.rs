//! Benchmark harness for evaluating how well graph-clustering algorithms
//! recover the modular structure of a software solution from its flattened
//! dependency graph.
//!
//! The crate owns the structural node tree, the non-nested cluster graph with
//! its edge-ablation transform, the experiment orchestration (repeated runs,
//! averaging, pairwise comparison), and result aggregation. Concrete
//! clustering, cutting, and similarity algorithms plug in through the traits
//! in [`bench`], as do parsing and reporting.

pub mod bench;
pub mod config;
pub mod errors;
pub mod graph;
pub mod solution_model;
pub mod testkit;

// Re-export commonly used types
pub use crate::bench::{
    harness::BenchHarness,
    results::{BenchResult, BenchResultsEntry, ConfigScore, PerSolutionResults, ScoreRow},
    BenchConfig, BenchDriver, ClusteringAlgorithm, ConfigId, CuttingAlgorithm, ProjectGraph,
    Repository, SimilarityMetric,
};

pub use crate::config::{BenchPaths, BenchSettings};
pub use crate::errors::{Error, Result};
pub use crate::graph::NonNestedClusterGraph;
pub use crate::solution_model::{
    ClassNode, NamespaceNode, Node, NodeKind, ProjectDescriptor, ProjectNode,
};
