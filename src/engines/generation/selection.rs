//! Rank-based selection over a population sorted best first.
//!
//! Every selector relies on position being the fitness rank: index 0 is the
//! best candidate. Nothing here checks that ordering.

use crate::engines::generation::individual::TreeShape;
use crate::engines::generation::random::RandomSource;
use crate::error::{GpError, Result};

fn check_sample(len: usize, n: usize, what: &str) -> Result<()> {
    if len == 0 {
        return Err(GpError::InvalidArgument(format!(
            "{}: population is empty",
            what
        )));
    }
    if n < 1 {
        return Err(GpError::InvalidArgument(format!(
            "{}: sample size must be at least 1",
            what
        )));
    }
    Ok(())
}

/// Draw `n` positions in `0..len` and keep the smallest
fn tournament_index<R: RandomSource + ?Sized>(rng: &mut R, len: usize, n: usize) -> Result<usize> {
    check_sample(len, n, "tournament")?;
    let mut best = rng.draw_index(0, len - 1);
    for _ in 1..n {
        best = best.min(rng.draw_index(0, len - 1));
    }
    Ok(best)
}

/// Draw `n` positions in `0..len` and keep the one with the smallest size;
/// a later draw only wins on a strictly smaller size.
fn parsimony_index<R, F>(rng: &mut R, len: usize, n: usize, size_of: F) -> Result<usize>
where
    R: RandomSource + ?Sized,
    F: Fn(usize) -> usize,
{
    check_sample(len, n, "parsimony tournament")?;
    let mut winner = rng.draw_index(0, len - 1);
    let mut winner_size = size_of(winner);
    for _ in 1..n {
        let drawn = rng.draw_index(0, len - 1);
        let size = size_of(drawn);
        if size < winner_size {
            winner = drawn;
            winner_size = size;
        }
    }
    Ok(winner)
}

/// Tournament selection: best rank among `n` draws with replacement
pub fn tournament<'a, R, C>(rng: &mut R, population: &'a [C], n: usize) -> Result<&'a C>
where
    R: RandomSource + ?Sized,
{
    let index = tournament_index(rng, population.len(), n)?;
    Ok(&population[index])
}

/// Parsimony tournament: smallest candidate among `n` draws, earliest draw
/// wins ties. Returns the winner together with the index that was drawn for it.
pub fn parsimony_tournament<'a, R, C>(rng: &mut R, population: &'a [C], n: usize) -> Result<(&'a C, usize)>
where
    R: RandomSource + ?Sized,
    C: TreeShape,
{
    let index = parsimony_index(rng, population.len(), n, |i| population[i].size_metric())?;
    Ok((&population[index], index))
}

/// Which pressure a double tournament applies first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositionOrder {
    /// Fitness tournaments fill the pool, a parsimony tournament picks from it
    FitnessThenSize,
    /// Parsimony tournaments fill the pool, re-sorted by drawn index, a fitness
    /// tournament picks from it
    SizeThenFitness,
}

impl CompositionOrder {
    /// `false` is fitness-then-size, `true` is size-then-fitness
    pub fn from_switch(switch: bool) -> Self {
        if switch {
            CompositionOrder::SizeThenFitness
        } else {
            CompositionOrder::FitnessThenSize
        }
    }
}

/// Double tournament: a fitness tournament and a parsimony tournament
/// composed in a configurable order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoubleTournament {
    n_dt: usize,
    sf: usize,
    sp: usize,
    order: CompositionOrder,
}

impl DoubleTournament {
    /// `n_dt` is the inner tournament size, `sf` the fitness pool size and
    /// `sp` the parsimony pool size. All must be at least 1.
    pub fn new(n_dt: usize, sf: usize, sp: usize, switch: bool) -> Result<Self> {
        for (name, value) in [("n_dt", n_dt), ("sf", sf), ("sp", sp)] {
            if value < 1 {
                return Err(GpError::InvalidArgument(format!(
                    "Double tournament {} must be at least 1",
                    name
                )));
            }
        }
        Ok(Self {
            n_dt,
            sf,
            sp,
            order: CompositionOrder::from_switch(switch),
        })
    }

    pub fn n_dt(&self) -> usize {
        self.n_dt
    }

    pub fn sf(&self) -> usize {
        self.sf
    }

    pub fn sp(&self) -> usize {
        self.sp
    }

    pub fn order(&self) -> CompositionOrder {
        self.order
    }

    /// Population index of the winner
    pub fn select_index<R, C>(&self, rng: &mut R, population: &[C]) -> Result<usize>
    where
        R: RandomSource + ?Sized,
        C: TreeShape,
    {
        check_sample(population.len(), 1, "double tournament")?;

        let winner = match self.order {
            CompositionOrder::FitnessThenSize => {
                let pool = (0..self.sf)
                    .map(|_| tournament_index(rng, population.len(), self.n_dt))
                    .collect::<Result<Vec<usize>>>()?;
                let pick = parsimony_index(rng, pool.len(), self.sp, |i| {
                    population[pool[i]].size_metric()
                })?;
                pool[pick]
            }
            CompositionOrder::SizeThenFitness => {
                let mut pool = (0..self.sp)
                    .map(|_| {
                        parsimony_index(rng, population.len(), self.n_dt, |i| {
                            population[i].size_metric()
                        })
                    })
                    .collect::<Result<Vec<usize>>>()?;
                // Lower drawn index is better fitness, so pool position becomes the rank
                pool.sort();
                let pick = tournament_index(rng, pool.len(), self.sf)?;
                pool[pick]
            }
        };

        log::trace!("double tournament ({:?}) picked index {}", self.order, winner);
        Ok(winner)
    }

    pub fn select<'a, R, C>(&self, rng: &mut R, population: &'a [C]) -> Result<&'a C>
    where
        R: RandomSource + ?Sized,
        C: TreeShape,
    {
        let index = self.select_index(rng, population)?;
        Ok(&population[index])
    }
}

/// The `n` best candidates, clamped to the population length
pub fn get_elite<C>(population: &[C], n: usize) -> &[C] {
    &population[..n.min(population.len())]
}
