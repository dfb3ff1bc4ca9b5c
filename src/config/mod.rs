pub mod traits;
pub mod evolution;
pub mod problem;
pub mod manager;

pub use manager::{ConfigManager, AppConfig};
pub use evolution::{EvolutionConfig, SelectionConfig};
pub use problem::ProblemConfig;
