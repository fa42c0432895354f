//! Experiment orchestration.
//!
//! Four experiment shapes share one per-repository loop: load parsed data,
//! flatten it to a cluster graph, execute configurations `reruns_per_config`
//! times, and average. Shapes 2–4 fan the reruns out on the rayon pool and
//! join before reducing; every concurrent run gets its own cloned
//! configuration snapshot while the graph is shared read-only. A failing run
//! aborts the whole experiment, since a partial average would be worthless.

use super::results::{BenchResult, BenchResultsEntry, ConfigScore, PerSolutionResults};
use super::{BenchConfig, BenchDriver, ConfigId, Repository};
use crate::config::BenchPaths;
use crate::errors::{Error, Result};
use crate::graph::NonNestedClusterGraph;
use log::{debug, info};
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::PathBuf;

pub struct BenchHarness<D> {
    driver: D,
    paths: BenchPaths,
}

impl<D: BenchDriver> BenchHarness<D> {
    pub fn new(driver: D, paths: BenchPaths) -> Self {
        Self { driver, paths }
    }

    /// Consume the harness and hand the driver back
    pub fn into_driver(self) -> D {
        self.driver
    }

    /// Score every configuration at recovering each project's namespace
    /// structure. Projects are benchmarked one at a time, reruns run
    /// sequentially, and per-project averages are averaged again across the
    /// repository's projects.
    pub fn bench_namespace_recovery(
        &self,
        configs: &[BenchConfig],
        repos: &[Repository],
        reruns_per_config: usize,
    ) -> Result<PerSolutionResults> {
        let mut repo_scores = HashMap::new();

        for repository in repos {
            let data_folder = self.parsed_data_folder(repository)?;
            let projects = self.driver.project_graphs_in_folder(&data_folder)?;
            if projects.is_empty() {
                return Err(Error::missing_data(repository.slug(), data_folder));
            }
            debug!("{repository}: {} project graphs", projects.len());

            let mut per_project: HashMap<ConfigId, (String, Vec<BenchResultsEntry>)> =
                HashMap::new();
            for project in &projects {
                let leaf_namespaces = self.driver.root_namespaces(&project.root)?;

                for config in configs {
                    let runs = (0..reruns_per_config)
                        .map(|_| self.driver.run(config, &leaf_namespaces))
                        .collect::<Result<Vec<_>>>()?;
                    let entry =
                        BenchResultsEntry::new(project.name.clone(), BenchResult::average(runs)?);

                    per_project
                        .entry(config.id())
                        .or_insert_with(|| (config.name().to_string(), Vec::new()))
                        .1
                        .push(entry);
                }
            }

            let config_entries = per_project
                .into_iter()
                .map(|(id, (label, entries))| {
                    let result = BenchResultsEntry::average(&entries)?;
                    Ok((id, ConfigScore { label, result }))
                })
                .collect::<Result<HashMap<_, _>>>()?;
            repo_scores.insert(repository.clone(), config_entries);
        }

        info!("namespace recovery: scored {} repositories", repo_scores.len());
        Ok(PerSolutionResults::new(repo_scores, reruns_per_config))
    }

    /// Score every configuration at recovering project boundaries from one
    /// combined repository graph. Reruns execute concurrently.
    pub fn bench_project_recovery(
        &self,
        configs: &[BenchConfig],
        repos: &[Repository],
        reruns_per_config: usize,
    ) -> Result<PerSolutionResults> {
        let mut repo_scores = HashMap::new();

        for repository in repos {
            let leaf_namespaces = self.repository_graph(repository)?;

            let mut config_entries = HashMap::new();
            for config in configs {
                let result = self.rerun_concurrently(config, &leaf_namespaces, reruns_per_config)?;
                config_entries.insert(
                    config.id(),
                    ConfigScore {
                        label: config.name().to_string(),
                        result,
                    },
                );
            }
            repo_scores.insert(repository.clone(), config_entries);
        }

        info!("project recovery: scored {} repositories", repo_scores.len());
        Ok(PerSolutionResults::new(repo_scores, reruns_per_config))
    }

    /// Project recovery for a single configuration after dropping all but the
    /// leading `dependency_multiplier` fraction of every edge list. The
    /// stored label carries the percentage; the caller's config is untouched.
    pub fn bench_project_recovery_with_removed_data(
        &self,
        config: &BenchConfig,
        repos: &[Repository],
        reruns_per_config: usize,
        dependency_multiplier: f64,
    ) -> Result<PerSolutionResults> {
        let labeled = config.with_name_suffix(&format!("-{}%", dependency_multiplier * 100.0));
        let mut repo_scores = HashMap::new();

        for repository in repos {
            let leaf_namespaces = self.repository_graph(repository)?;
            let ablated = leaf_namespaces.ablate_edges(dependency_multiplier);
            debug!(
                "{repository}: {} of {} edges kept",
                ablated.edge_count(),
                leaf_namespaces.edge_count()
            );

            let result = self.rerun_concurrently(&labeled, &ablated, reruns_per_config)?;
            let config_entries = HashMap::from([(
                labeled.id(),
                ConfigScore {
                    label: labeled.name().to_string(),
                    result,
                },
            )]);
            repo_scores.insert(repository.clone(), config_entries);
        }

        Ok(PerSolutionResults::new(repo_scores, reruns_per_config))
    }

    /// Run the paired comparison of two clustering algorithms under `left`'s
    /// cutting algorithm and similarity metric, concurrently, over the
    /// un-ablated repository graph. Stored under one synthetic configuration
    /// labeled after both algorithms.
    pub fn compare_project_recovery(
        &self,
        left: &BenchConfig,
        right: &BenchConfig,
        repos: &[Repository],
        reruns_per_config: usize,
    ) -> Result<PerSolutionResults> {
        let id = ConfigId::comparison(
            left.clustering(),
            right.clustering(),
            left.cutting(),
            left.similarity(),
        );
        let label = format!("{}-vs-{}", left.clustering().id(), right.clustering().id());
        let mut repo_scores = HashMap::new();

        for repository in repos {
            let leaf_namespaces = self.repository_graph(repository)?;

            let runs = (0..reruns_per_config)
                .into_par_iter()
                .map(|_| {
                    let a = left.clone();
                    let b = right.clone();
                    self.driver.compare_algorithms(
                        a.clustering(),
                        b.clustering(),
                        a.cutting(),
                        a.similarity(),
                        &leaf_namespaces,
                    )
                })
                .collect::<Result<Vec<_>>>()?;
            let result = BenchResult::average(runs)?;

            let config_entries = HashMap::from([(
                id.clone(),
                ConfigScore {
                    label: label.clone(),
                    result,
                },
            )]);
            repo_scores.insert(repository.clone(), config_entries);
        }

        Ok(PerSolutionResults::new(repo_scores, reruns_per_config))
    }

    /// Materialize a repository's raw data into the parsed-data layout
    pub fn prepare(&self, repository: &Repository) -> Result<()> {
        self.driver.prepare(
            &self.paths.repository_location(repository),
            &self.paths.parsed_repo_location(repository),
        )
    }

    fn parsed_data_folder(&self, repository: &Repository) -> Result<PathBuf> {
        let path = self.paths.parsed_repo_location(repository);
        if path.is_dir() {
            Ok(path)
        } else {
            Err(Error::missing_data(repository.slug(), path))
        }
    }

    /// Load, flatten, and normalize one repository's combined graph through
    /// the validated constructor
    fn repository_graph(&self, repository: &Repository) -> Result<NonNestedClusterGraph> {
        let data_folder = self.parsed_data_folder(repository)?;
        let tree = self.driver.complete_tree_with_dependencies(&data_folder)?;
        let flattened = self.driver.root_namespaces(&tree)?;
        NonNestedClusterGraph::new(flattened.clusters().clone(), flattened.edges().clone())
    }

    /// Fork `reruns` independent runs of a cloned configuration snapshot,
    /// join them all, then reduce to the mean
    fn rerun_concurrently(
        &self,
        config: &BenchConfig,
        graph: &NonNestedClusterGraph,
        reruns: usize,
    ) -> Result<BenchResult> {
        let runs = (0..reruns)
            .into_par_iter()
            .map(|_| {
                let snapshot = config.clone();
                self.driver.run(&snapshot, graph)
            })
            .collect::<Result<Vec<_>>>()?;
        BenchResult::average(runs)
    }
}
