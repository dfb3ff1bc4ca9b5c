pub mod random;
pub mod tree;
pub mod individual;
pub mod selection;
pub mod operators;
pub mod population;
pub mod evolution_engine;
pub mod progress;

pub use random::RandomSource;
pub use tree::{NodeId, Tree};
pub use individual::{Candidate, RunSettings, TreeShape};
pub use selection::{get_elite, parsimony_tournament, tournament, CompositionOrder, DoubleTournament};
pub use operators::{discard_deep, get_offspring, subtree_crossover, subtree_mutation};
pub use population::{next_generation, ramped_half_and_half, BreedingPlan};
pub use evolution_engine::{EvolutionEngine, EvolutionOutcome, ProgressCallback};
pub use progress::{ConsoleProgressCallback, FitnessHistory};
