use crate::alphabet::Alphabet;
use crate::search::SearchBudget;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "climber.toml";

#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
#[serde(deny_unknown_fields)]
pub struct SearchSettings {
    /// Unset means no attempt limit.
    #[serde(default)]
    pub max_attempts: Option<u64>,
    /// Unset means no time limit.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    #[serde(default)]
    pub seed: Option<u64>,
    /// Symbols guesses are drawn from; the 62 alphanumerics when unset.
    #[serde(default)]
    pub alphabet: Option<String>,
}

impl SearchSettings {
    pub fn budget(&self) -> SearchBudget {
        SearchBudget {
            max_attempts: self.max_attempts,
            timeout: self.timeout_ms.map(Duration::from_millis),
        }
    }

    pub fn alphabet(&self) -> Result<Alphabet, anyhow::Error> {
        match &self.alphabet {
            Some(symbols) => Alphabet::new(symbols)
                .map_err(|e| anyhow::anyhow!("Invalid alphabet {:?} in configuration: {}", symbols, e)),
            None => Ok(Alphabet::alphanumeric()),
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
#[serde(deny_unknown_fields)]
pub struct SimulationSettings {
    #[serde(default = "default_max_length")]
    pub max_length: usize,
}

pub fn default_max_length() -> usize {
    4
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            max_length: default_max_length(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
#[serde(deny_unknown_fields)]
pub struct ClimberConfig {
    #[serde(default)]
    pub search: Option<SearchSettings>,
    #[serde(default)]
    pub simulation: Option<SimulationSettings>,
}

impl ClimberConfig {
    pub fn load_from_file(path: &Path) -> Result<Self, anyhow::Error> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file at {:?}: {}", path, e))?;

        Self::from_toml_str(&content).map_err(|e| {
            anyhow::anyhow!("Failed to parse TOML from config file {:?}: {}", path, e)
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Loads `path` when given, else `climber.toml` in the working directory if it
    /// exists, else the built-in defaults.
    pub fn resolve(path: Option<&Path>) -> Result<Self, anyhow::Error> {
        if let Some(path) = path {
            return Self::load_from_file(path);
        }
        let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
        if default_path.exists() {
            Self::load_from_file(&default_path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn search(&self) -> SearchSettings {
        self.search.clone().unwrap_or_default()
    }

    pub fn simulation(&self) -> SimulationSettings {
        self.simulation.clone().unwrap_or_default()
    }
}

impl Default for ClimberConfig {
    fn default() -> Self {
        Self {
            search: Some(SearchSettings::default()),
            simulation: Some(SimulationSettings::default()),
        }
    }
}
