//! Selection and variation for tree-based genetic programming.
//!
//! Populations are slices of [`Candidate`]s sorted best first. Selectors pick
//! by rank and by size, the genetic operators recombine or regrow subtrees of
//! the chosen parents in place, and every draw comes from one caller-supplied
//! [`RandomSource`] so a seeded run replays exactly.

pub mod config;
pub mod engines;
pub mod error;
pub mod types;

pub use engines::generation::{
    discard_deep, get_elite, get_offspring, parsimony_tournament, subtree_crossover,
    subtree_mutation, tournament, Candidate, DoubleTournament, RandomSource, RunSettings, Tree,
    TreeShape,
};
pub use error::{GpError, Result};
