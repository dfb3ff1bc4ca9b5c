pub mod fitness;

pub use fitness::{evaluate, rank_population, Dataset};
