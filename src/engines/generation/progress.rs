use super::evolution_engine::ProgressCallback;

/// Reports each generation through the `log` facade
pub struct ConsoleProgressCallback;

impl ProgressCallback for ConsoleProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        log::debug!("Generation {} starting...", generation + 1);
    }

    fn on_generation_complete(&mut self, generation: usize, best_fitness: f64, best_size: usize) {
        log::info!(
            "Generation {} complete. Best fitness: {:.4}, best size: {}",
            generation + 1, best_fitness, best_size
        );
    }
}

/// Keeps the best fitness of every generation, in order
#[derive(Debug, Default)]
pub struct FitnessHistory {
    pub best_per_generation: Vec<f64>,
}

impl ProgressCallback for &mut FitnessHistory {
    fn on_generation_start(&mut self, _generation: usize) {}

    fn on_generation_complete(&mut self, _generation: usize, best_fitness: f64, _best_size: usize) {
        self.best_per_generation.push(best_fitness);
    }
}
