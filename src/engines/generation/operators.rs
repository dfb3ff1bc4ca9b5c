use crate::engines::generation::individual::{Candidate, TreeShape};
use crate::engines::generation::random::RandomSource;
use crate::engines::generation::selection::DoubleTournament;
use crate::engines::generation::tree::Tree;
use crate::error::{GpError, Result};
use std::sync::Arc;

/// One reproduction event: crossover or mutation with even odds.
/// Offspring are returned unfiltered; run `discard_deep` over them.
pub fn get_offspring<R: RandomSource + ?Sized>(
    rng: &mut R,
    population: &mut [Candidate],
    selection: &DoubleTournament,
) -> Result<Vec<Candidate>> {
    if rng.draw_unit() < 0.5 {
        subtree_crossover(rng, population, selection)
    } else {
        subtree_mutation(rng, population, selection)
    }
}

/// Subtree crossover: picks two parents, swaps a random node of each in place
/// and returns copies of both swapped trees as two new candidates.
///
/// Both offspring take the first parent's run settings. When the same
/// candidate is drawn twice the swap happens inside that one tree; if one of
/// the two chosen nodes contains the other the tree is left as it was.
pub fn subtree_crossover<R: RandomSource + ?Sized>(
    rng: &mut R,
    population: &mut [Candidate],
    selection: &DoubleTournament,
) -> Result<Vec<Candidate>> {
    let first = selection.select_index(rng, population)?;
    let second = selection.select_index(rng, population)?;
    let settings = Arc::clone(population[first].settings());

    if first == second {
        let parent = population[first].tree_mut();
        let a = parent.random_node(rng);
        let b = parent.random_node(rng);
        let swapped = parent.swap_within(a, b);
        log::trace!("crossover within index {} (swapped: {})", first, swapped);

        let child = Candidate::from_root(Arc::clone(&settings), population[first].tree());
        let twin = Candidate::from_root(settings, population[first].tree());
        return Ok(vec![child, twin]);
    }

    let (left, right) = pair_mut(population, first, second)?;
    let a = left.tree().random_node(rng);
    let b = right.tree().random_node(rng);
    Tree::swap_between(left.tree_mut(), a, right.tree_mut(), b);
    log::trace!("crossover between indices {} and {}", first, second);

    Ok(vec![
        Candidate::from_root(Arc::clone(&settings), left.tree()),
        Candidate::from_root(settings, right.tree()),
    ])
}

/// Subtree mutation: replaces a random node of one parent, in place, with a
/// freshly grown subtree and returns a copy of the result.
pub fn subtree_mutation<R: RandomSource + ?Sized>(
    rng: &mut R,
    population: &mut [Candidate],
    selection: &DoubleTournament,
) -> Result<Vec<Candidate>> {
    let index = selection.select_index(rng, population)?;
    let parent = &mut population[index];
    let settings = Arc::clone(parent.settings());

    let at = parent.tree().random_node(rng);
    let fresh = Tree::grow(rng, &settings.operators, &settings.terminals, settings.max_depth)?;
    log::trace!(
        "mutation at index {} grafts {} nodes (depth {})",
        index,
        fresh.size(),
        fresh.depth()
    );
    parent.tree_mut().replace_subtree(at, &fresh);

    Ok(vec![Candidate::from_root(settings, parent.tree())])
}

/// Keeps entries no deeper than `limit`, in order
pub fn discard_deep<C: TreeShape>(population: Vec<C>, limit: usize) -> Vec<C> {
    let before = population.len();
    let kept: Vec<C> = population
        .into_iter()
        .filter(|candidate| candidate.depth() <= limit)
        .collect();
    if kept.len() < before {
        log::debug!("discarded {} offspring deeper than {}", before - kept.len(), limit);
    }
    kept
}

fn pair_mut<T>(items: &mut [T], a: usize, b: usize) -> Result<(&mut T, &mut T)> {
    if a == b || a >= items.len() || b >= items.len() {
        return Err(GpError::InvalidArgument(format!(
            "Cannot borrow positions {} and {} of {} at once",
            a,
            b,
            items.len()
        )));
    }
    if a < b {
        let (low, high) = items.split_at_mut(b);
        Ok((&mut low[a], &mut high[0]))
    } else {
        let (low, high) = items.split_at_mut(a);
        Ok((&mut high[0], &mut low[b]))
    }
}
