//! Experiment settings and the on-disk layout of repositories and parsed data

use crate::bench::Repository;
use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where repository checkouts and their parsed data live
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchPaths {
    pub parsed_data_root: PathBuf,
    pub repo_root: PathBuf,
}

impl BenchPaths {
    pub fn new(parsed_data_root: impl Into<PathBuf>, repo_root: impl Into<PathBuf>) -> Self {
        Self {
            parsed_data_root: parsed_data_root.into(),
            repo_root: repo_root.into(),
        }
    }

    /// `<parsed_data_root>/<owner>/<name>`
    pub fn parsed_repo_location(&self, repository: &Repository) -> PathBuf {
        self.parsed_data_root
            .join(&repository.owner)
            .join(&repository.name)
    }

    /// `<repo_root>/<name>/<solution>`
    pub fn repository_location(&self, repository: &Repository) -> PathBuf {
        self.repo_root
            .join(&repository.name)
            .join(&repository.solution)
    }
}

impl Default for BenchPaths {
    fn default() -> Self {
        Self::new("parsed-data", "repos")
    }
}

/// A full experiment description, usually loaded from a TOML file
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchSettings {
    pub paths: BenchPaths,
    pub reruns_per_config: usize,
    pub repositories: Vec<Repository>,
}

impl Default for BenchSettings {
    fn default() -> Self {
        Self {
            paths: BenchPaths::default(),
            reruns_per_config: 10,
            repositories: Vec::new(),
        }
    }
}

impl BenchSettings {
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::configuration(e.to_string()))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn parsed_repo_location_nests_owner_and_name() {
        let paths = BenchPaths::new("/data/parsed", "/data/repos");
        let repo = Repository::new("acme", "widgets", "Widgets.sln");
        assert_eq!(
            paths.parsed_repo_location(&repo),
            PathBuf::from("/data/parsed/acme/widgets")
        );
        assert_eq!(
            paths.repository_location(&repo),
            PathBuf::from("/data/repos/widgets/Widgets.sln")
        );
    }

    #[test]
    fn settings_parse_with_defaults() {
        let settings = BenchSettings::from_toml(indoc! {r#"
            reruns_per_config = 5

            [[repositories]]
            owner = "acme"
            name = "widgets"
            solution = "Widgets.sln"
        "#})
        .unwrap();

        assert_eq!(settings.reruns_per_config, 5);
        assert_eq!(settings.paths, BenchPaths::default());
        assert_eq!(settings.repositories.len(), 1);
        assert_eq!(settings.repositories[0].slug(), "acme/widgets");
    }

    #[test]
    fn empty_settings_use_defaults() {
        let settings = BenchSettings::from_toml("").unwrap();
        assert_eq!(settings, BenchSettings::default());
    }

    #[test]
    fn malformed_settings_are_a_configuration_error() {
        let err = BenchSettings::from_toml("reruns_per_config = \"many\"").unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn settings_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bench.toml");
        std::fs::write(&path, "reruns_per_config = 3\n").unwrap();

        let settings = BenchSettings::from_file(&path).unwrap();
        assert_eq!(settings.reruns_per_config, 3);
    }
}
