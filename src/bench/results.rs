//! Result aggregation: per-run scores, per-project entries, and the
//! read-only per-solution container the harness returns.

use super::{ConfigId, Repository};
use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Score produced by a single benchmark run
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct BenchResult {
    score: f64,
}

impl BenchResult {
    pub fn new(score: f64) -> Self {
        Self { score }
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    /// Arithmetic mean over a non-empty sequence of results.
    /// The reduction used everywhere scores are aggregated.
    pub fn average(results: impl IntoIterator<Item = BenchResult>) -> Result<BenchResult> {
        let mut sum = 0.0;
        let mut count = 0usize;
        for result in results {
            sum += result.score;
            count += 1;
        }
        if count == 0 {
            return Err(Error::EmptyReduction);
        }
        Ok(BenchResult::new(sum / count as f64))
    }
}

/// One project's averaged score within a repository
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BenchResultsEntry {
    project: String,
    result: BenchResult,
}

impl BenchResultsEntry {
    pub fn new(project: impl Into<String>, result: BenchResult) -> Self {
        Self {
            project: project.into(),
            result,
        }
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn result(&self) -> BenchResult {
        self.result
    }

    /// Mean score across per-project entries
    pub fn average<'a>(
        entries: impl IntoIterator<Item = &'a BenchResultsEntry>,
    ) -> Result<BenchResult> {
        BenchResult::average(entries.into_iter().map(|entry| entry.result))
    }
}

/// A configuration's averaged score under the display label it ran with
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ConfigScore {
    pub label: String,
    pub result: BenchResult,
}

/// Flat, serializable view of one scored (repository, configuration) pair
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScoreRow {
    pub repository: String,
    pub config: String,
    pub label: String,
    pub score: f64,
    pub reruns: usize,
}

/// The harness's sole output: for every repository, every configuration's
/// averaged score plus the rerun count behind it. Built once, then read-only.
#[derive(Clone, Debug)]
pub struct PerSolutionResults {
    scores: HashMap<Repository, HashMap<ConfigId, ConfigScore>>,
    reruns_per_config: usize,
}

impl PerSolutionResults {
    pub(crate) fn new(
        scores: HashMap<Repository, HashMap<ConfigId, ConfigScore>>,
        reruns_per_config: usize,
    ) -> Self {
        Self {
            scores,
            reruns_per_config,
        }
    }

    pub fn reruns_per_config(&self) -> usize {
        self.reruns_per_config
    }

    pub fn repositories(&self) -> impl Iterator<Item = &Repository> {
        self.scores.keys()
    }

    pub fn configs_for(&self, repository: &Repository) -> Option<&HashMap<ConfigId, ConfigScore>> {
        self.scores.get(repository)
    }

    pub fn score(&self, repository: &Repository, config: &ConfigId) -> Option<&ConfigScore> {
        self.scores.get(repository)?.get(config)
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Flat rows sorted by repository and configuration, for hand-off to the
    /// external reporting layer
    pub fn summary(&self) -> Vec<ScoreRow> {
        let mut rows: Vec<ScoreRow> = self
            .scores
            .iter()
            .flat_map(|(repository, configs)| {
                configs.iter().map(move |(config, score)| ScoreRow {
                    repository: repository.slug(),
                    config: config.to_string(),
                    label: score.label.clone(),
                    score: score.result.score(),
                    reruns: self.reruns_per_config,
                })
            })
            .collect();
        rows.sort_by(|a, b| (&a.repository, &a.config).cmp(&(&b.repository, &b.config)));
        rows
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.summary())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn average_of_known_scores() {
        let scores = [0.25, 0.5, 0.75].map(BenchResult::new);
        let average = BenchResult::average(scores).unwrap();
        assert_eq!(average.score(), 0.5);
    }

    #[test]
    fn average_of_empty_sequence_is_an_error() {
        let err = BenchResult::average(std::iter::empty()).unwrap_err();
        assert!(matches!(err, Error::EmptyReduction));
    }

    #[test]
    fn entry_average_reduces_over_projects() {
        let entries = vec![
            BenchResultsEntry::new("Core", BenchResult::new(1.0)),
            BenchResultsEntry::new("Ui", BenchResult::new(0.0)),
        ];
        let average = BenchResultsEntry::average(&entries).unwrap();
        assert_eq!(average.score(), 0.5);
    }

    #[test]
    fn summary_rows_are_sorted_and_carry_reruns() {
        let repo_b = Repository::new("acme", "b", "b.sln");
        let repo_a = Repository::new("acme", "a", "a.sln");
        let config = ConfigId {
            clustering: "wca".to_string(),
            cutting: "mql".to_string(),
            similarity: "mojo".to_string(),
        };
        let score = ConfigScore {
            label: "wca".to_string(),
            result: BenchResult::new(0.75),
        };

        let mut scores = HashMap::new();
        scores.insert(repo_b, HashMap::from([(config.clone(), score.clone())]));
        scores.insert(repo_a, HashMap::from([(config, score)]));

        let results = PerSolutionResults::new(scores, 7);
        let rows = results.summary();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].repository, "acme/a");
        assert_eq!(rows[1].repository, "acme/b");
        assert!(rows.iter().all(|row| row.reruns == 7));
    }
}
