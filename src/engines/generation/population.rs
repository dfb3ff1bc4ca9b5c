use crate::engines::generation::individual::{Candidate, RunSettings};
use crate::engines::generation::operators::{discard_deep, get_offspring};
use crate::engines::generation::random::RandomSource;
use crate::engines::generation::selection::{get_elite, DoubleTournament};
use crate::engines::generation::tree::Tree;
use crate::error::{GpError, Result};
use std::collections::HashSet;
use std::sync::Arc;

/// Fresh draws allowed per slot before a duplicate tree is accepted
const UNIQUE_RETRIES: usize = 10;

/// Ramped half-and-half initialisation: depths cycle through `1..=init_depth`,
/// alternating full and grow trees. Duplicate renderings are redrawn a few
/// times before being accepted.
pub fn ramped_half_and_half<R: RandomSource + ?Sized>(
    rng: &mut R,
    settings: &Arc<RunSettings>,
    size: usize,
    init_depth: usize,
) -> Result<Vec<Candidate>> {
    if init_depth < 1 {
        return Err(GpError::InvalidArgument(
            "Initial depth must be at least 1".to_string(),
        ));
    }

    let mut population = Vec::with_capacity(size);
    let mut seen = HashSet::new();

    for slot in 0..size {
        let depth = 1 + slot % init_depth;
        let use_full = (slot / init_depth) % 2 == 0;

        let mut tree = build(rng, settings, depth, use_full)?;
        let mut retries = 0;
        while seen.contains(&tree.to_string()) && retries < UNIQUE_RETRIES {
            tree = build(rng, settings, depth, use_full)?;
            retries += 1;
        }

        seen.insert(tree.to_string());
        population.push(Candidate::new(Arc::clone(settings), tree));
    }

    log::debug!("initialised {} candidates ({} distinct)", population.len(), seen.len());
    Ok(population)
}

fn build<R: RandomSource + ?Sized>(
    rng: &mut R,
    settings: &RunSettings,
    depth: usize,
    use_full: bool,
) -> Result<Tree> {
    if use_full {
        Tree::full(rng, &settings.operators, &settings.terminals, depth)
    } else {
        Tree::grow(rng, &settings.operators, &settings.terminals, depth)
    }
}

/// How one generation is bred from the last
#[derive(Debug, Clone)]
pub struct BreedingPlan {
    pub population_size: usize,
    pub elitism: usize,
    pub depth_limit: usize,
    pub selection: DoubleTournament,
    /// Reproduction events allowed before giving up on filling the generation
    pub max_attempts: usize,
}

/// Elite copies first, then offspring that pass the depth filter until the
/// generation is full. `population` must be sorted best first; the trees of
/// chosen parents are edited in place along the way.
pub fn next_generation<R: RandomSource + ?Sized>(
    rng: &mut R,
    population: &mut [Candidate],
    plan: &BreedingPlan,
) -> Result<Vec<Candidate>> {
    let mut next: Vec<Candidate> = get_elite(population, plan.elitism).to_vec();
    let mut attempts = 0;

    while next.len() < plan.population_size {
        if attempts >= plan.max_attempts {
            return Err(GpError::Generation(format!(
                "Only {} of {} candidates survived the depth limit after {} reproduction events",
                next.len(),
                plan.population_size,
                attempts
            )));
        }
        attempts += 1;

        let offspring = get_offspring(rng, population, &plan.selection)?;
        next.extend(discard_deep(offspring, plan.depth_limit));
    }

    next.truncate(plan.population_size);
    log::debug!("bred generation of {} in {} reproduction events", next.len(), attempts);
    Ok(next)
}
