use super::{
    evolution::EvolutionConfig,
    problem::ProblemConfig,
    traits::ConfigSection,
};
use crate::error::GpError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, RwLock};

/// Prefix for environment overrides, e.g. `STDGP__EVOLUTION__POPULATION_SIZE=50`
pub const ENV_PREFIX: &str = "STDGP";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub evolution: EvolutionConfig,
    pub problem: ProblemConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), GpError> {
        self.evolution.validate().map_err(section_error::<EvolutionConfig>)?;
        self.problem.validate().map_err(section_error::<ProblemConfig>)?;
        Ok(())
    }
}

fn section_error<S: ConfigSection>(err: GpError) -> GpError {
    GpError::Configuration(format!("[{}] {}", S::section_name(), err))
}

pub struct ConfigManager {
    config: Arc<RwLock<AppConfig>>,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(AppConfig::default())),
        }
    }

    /// Load a TOML file, apply `STDGP__*` environment overrides on top, validate.
    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), GpError> {
        let layered = ::config::Config::builder()
            .add_source(::config::File::from(path.as_ref()).format(::config::FileFormat::Toml))
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| GpError::Configuration(format!("Failed to read config: {}", e)))?;

        let config: AppConfig = layered
            .try_deserialize()
            .map_err(|e| GpError::Configuration(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        log::info!("loaded configuration from {}", path.as_ref().display());

        *self.config.write().map_err(|_| poisoned())? = config;
        Ok(())
    }

    pub fn load_from_str(&self, contents: &str) -> Result<(), GpError> {
        let config: AppConfig = toml::from_str(contents)
            .map_err(|e| GpError::Configuration(format!("Failed to parse config: {}", e)))?;

        config.validate()?;

        *self.config.write().map_err(|_| poisoned())? = config;
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), GpError> {
        let config = self.config.read().map_err(|_| poisoned())?;
        let toml_str = toml::to_string_pretty(&*config)
            .map_err(|e| GpError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str)?;

        Ok(())
    }

    pub fn get(&self) -> Result<AppConfig, GpError> {
        Ok(self.config.read().map_err(|_| poisoned())?.clone())
    }

    /// Apply `f` and keep the result only if it validates
    pub fn update<F>(&self, f: F) -> Result<(), GpError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut config = self.config.write().map_err(|_| poisoned())?;
        let mut candidate = config.clone();
        f(&mut candidate);
        candidate.validate()?;
        *config = candidate;
        Ok(())
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned() -> GpError {
    GpError::Configuration("Configuration lock poisoned".to_string())
}
