use crate::config::AppConfig;
use crate::engines::evaluation::{rank_population, Dataset};
use crate::engines::generation::{
    individual::{Candidate, RunSettings},
    population::{next_generation, ramped_half_and_half, BreedingPlan},
};
use crate::error::GpError;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

pub trait ProgressCallback {
    fn on_generation_start(&mut self, generation: usize);
    fn on_generation_complete(&mut self, generation: usize, best_fitness: f64, best_size: usize);
}

/// Best candidate of the final generation
#[derive(Debug, Clone)]
pub struct EvolutionOutcome {
    pub best: Candidate,
    pub best_fitness: f64,
    pub generations: usize,
}

/// Drives the generational loop: initialise, rank, breed, repeat
pub struct EvolutionEngine {
    settings: Arc<RunSettings>,
    plan: BreedingPlan,
    population_size: usize,
    generations: usize,
    init_depth: usize,
    rng: StdRng,
}

impl EvolutionEngine {
    pub fn new(config: &AppConfig) -> Result<Self, GpError> {
        config.validate()?;

        let rng = match config.evolution.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            settings: config.problem.run_settings(config.evolution.max_depth),
            plan: config.evolution.breeding_plan()?,
            population_size: config.evolution.population_size,
            generations: config.evolution.num_generations,
            init_depth: config.evolution.init_depth,
            rng,
        })
    }

    pub fn settings(&self) -> &Arc<RunSettings> {
        &self.settings
    }

    /// Run the evolution process
    pub fn run<C: ProgressCallback>(
        &mut self,
        data: &Dataset,
        mut callback: C,
    ) -> Result<EvolutionOutcome, GpError> {
        let mut population = ramped_half_and_half(
            &mut self.rng,
            &self.settings,
            self.population_size,
            self.init_depth,
        )?;
        let mut fitness = rank_population(&mut population, data);

        for generation in 0..self.generations {
            callback.on_generation_start(generation);

            population = next_generation(&mut self.rng, &mut population, &self.plan)?;
            fitness = rank_population(&mut population, data);

            let best_size = population.first().map(|c| c.size()).unwrap_or(0);
            let best_fitness = fitness.first().copied().unwrap_or(f64::NAN);
            callback.on_generation_complete(generation, best_fitness, best_size);
        }

        let (best, best_fitness) = population
            .into_iter()
            .zip(fitness)
            .next()
            .ok_or_else(|| GpError::Generation("Population is empty".to_string()))?;

        Ok(EvolutionOutcome {
            best,
            best_fitness,
            generations: self.generations,
        })
    }
}
