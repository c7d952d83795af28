//! Engine configuration from the environment, plus fixture loading.

use std::path::{Path, PathBuf};

use deepdelve_domain::{DungeonRecord, HeroRecord};
use serde::Deserialize;

use crate::infrastructure::ports::RepoError;

pub const DEFAULT_COMMIT_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Buffered commit notices per subscriber before the slowest lags.
    pub commit_channel_capacity: usize,
    /// JSON file of hero and dungeon records to seed the store with.
    pub fixture_path: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            commit_channel_capacity: DEFAULT_COMMIT_CHANNEL_CAPACITY,
            fixture_path: None,
        }
    }
}

impl EngineConfig {
    /// Read `DEEPDELVE_*` variables; unset or unparsable values fall back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let commit_channel_capacity = lookup("DEEPDELVE_COMMIT_CHANNEL_CAPACITY")
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .filter(|capacity| *capacity > 0)
            .unwrap_or(DEFAULT_COMMIT_CHANNEL_CAPACITY);
        let fixture_path = lookup("DEEPDELVE_FIXTURE_PATH")
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .map(PathBuf::from);
        Self {
            commit_channel_capacity,
            fixture_path,
        }
    }
}

/// Load `.env.local` then `.env` from the workspace root, if present.
pub fn load_dotenv_from_repo_root() {
    let repo_root = Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}

/// Records used to seed an empty store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fixtures {
    #[serde(default)]
    pub heroes: Vec<HeroRecord>,
    #[serde(default)]
    pub dungeons: Vec<DungeonRecord>,
}

impl Fixtures {
    pub fn parse(raw: &str) -> Result<Self, RepoError> {
        serde_json::from_str(raw).map_err(RepoError::serialization)
    }

    pub async fn load(path: &Path) -> Result<Self, RepoError> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| RepoError::database("load_fixtures", e))?;
        Self::parse(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        assert_eq!(EngineConfig::from_lookup(lookup(&[])), EngineConfig::default());
    }

    #[test]
    fn reads_capacity_and_fixture_path() {
        let config = EngineConfig::from_lookup(lookup(&[
            ("DEEPDELVE_COMMIT_CHANNEL_CAPACITY", "32"),
            ("DEEPDELVE_FIXTURE_PATH", "fixtures/dev.json"),
        ]));
        assert_eq!(config.commit_channel_capacity, 32);
        assert_eq!(config.fixture_path, Some(PathBuf::from("fixtures/dev.json")));
    }

    #[test]
    fn zero_or_garbage_capacity_falls_back() {
        for raw in ["0", "lots", ""] {
            let config = EngineConfig::from_lookup(lookup(&[(
                "DEEPDELVE_COMMIT_CHANNEL_CAPACITY",
                raw,
            )]));
            assert_eq!(config.commit_channel_capacity, DEFAULT_COMMIT_CHANNEL_CAPACITY);
        }
    }

    #[test]
    fn empty_fixture_file_parses() {
        let fixtures = Fixtures::parse("{}").unwrap();
        assert!(fixtures.heroes.is_empty() && fixtures.dungeons.is_empty());
    }

    #[test]
    fn malformed_fixture_file_is_a_serialization_error() {
        let err = Fixtures::parse("{ heroes: ").unwrap_err();
        assert_eq!(err.code(), "SERIALIZATION_ERROR");
    }
}
