use super::traits::ConfigSection;
use crate::engines::generation::population::BreedingPlan;
use crate::engines::generation::selection::DoubleTournament;
use crate::error::GpError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub population_size: usize,
    pub num_generations: usize,
    pub elitism_count: usize,
    /// Deepest tree built by ramped initialisation
    pub init_depth: usize,
    /// Ceiling for subtrees grown by mutation
    pub max_depth: usize,
    /// Offspring deeper than this are discarded
    pub limit_depth: usize,
    pub selection: SelectionConfig,
    /// Reproduction events per generation slot before breeding gives up
    pub attempts_per_slot: usize,
    pub seed: Option<u64>,
}

/// Double tournament parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    pub n_dt: usize,
    pub sf: usize,
    pub sp: usize,
    /// false: fitness then size, true: size then fitness
    pub switch: bool,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            n_dt: 7,
            sf: 7,
            sp: 2,
            switch: false,
        }
    }
}

impl SelectionConfig {
    pub fn double_tournament(&self) -> Result<DoubleTournament, GpError> {
        DoubleTournament::new(self.n_dt, self.sf, self.sp, self.switch)
            .map_err(|e| GpError::Configuration(e.to_string()))
    }
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 500,
            num_generations: 100,
            elitism_count: 1,
            init_depth: 6,
            max_depth: 6,
            limit_depth: 17,
            selection: SelectionConfig::default(),
            attempts_per_slot: 100,
            seed: None,
        }
    }
}

impl EvolutionConfig {
    pub fn breeding_plan(&self) -> Result<BreedingPlan, GpError> {
        Ok(BreedingPlan {
            population_size: self.population_size,
            elitism: self.elitism_count,
            depth_limit: self.limit_depth,
            selection: self.selection.double_tournament()?,
            max_attempts: self.population_size.saturating_mul(self.attempts_per_slot),
        })
    }
}

impl ConfigSection for EvolutionConfig {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<(), GpError> {
        if self.population_size < 2 {
            return Err(GpError::Configuration(
                "Population size must be at least 2".to_string()
            ));
        }
        if self.elitism_count > self.population_size {
            return Err(GpError::Configuration(
                "Elitism count cannot exceed population size".to_string()
            ));
        }
        if self.init_depth < 1 {
            return Err(GpError::Configuration(
                "Initial depth must be at least 1".to_string()
            ));
        }
        if self.init_depth > self.limit_depth || self.max_depth > self.limit_depth {
            return Err(GpError::Configuration(
                "Initial and mutation depths must not exceed the depth limit".to_string()
            ));
        }
        if self.attempts_per_slot < 1 {
            return Err(GpError::Configuration(
                "Attempts per slot must be at least 1".to_string()
            ));
        }
        self.selection.double_tournament()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(EvolutionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_tournament_size_rejected() {
        let mut config = EvolutionConfig::default();
        config.selection.sp = 0;
        assert!(matches!(config.validate(), Err(GpError::Configuration(_))));
    }

    #[test]
    fn test_depths_must_fit_limit() {
        let mut config = EvolutionConfig::default();
        config.max_depth = config.limit_depth + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_breeding_plan_carries_selection() {
        let config = EvolutionConfig::default();
        let plan = config.breeding_plan().unwrap();
        assert_eq!(plan.selection.n_dt(), 7);
        assert_eq!(plan.depth_limit, 17);
        assert_eq!(plan.max_attempts, 500 * 100);
    }
}
