use anyhow::Context;
use stdgp::config::ConfigManager;
use stdgp::engines::evaluation::Dataset;
use stdgp::engines::generation::{ConsoleProgressCallback, EvolutionEngine};
use std::env;

/// Symbolic regression target: x0^2 + x0 + 1 plus the squares of any further inputs
fn synthetic_dataset(width: usize) -> anyhow::Result<Dataset> {
    let width = width.max(1);
    let mut samples = Vec::new();
    let mut targets = Vec::new();

    for i in 0..50 {
        let row: Vec<f64> = (0..width)
            .map(|j| (i as f64) * 0.1 - 2.5 + j as f64 * 0.3)
            .collect();
        let target = row[0] * row[0] + row[0] + 1.0 + row[1..].iter().map(|v| v * v).sum::<f64>();
        samples.push(row);
        targets.push(target);
    }

    Ok(Dataset::new(samples, targets)?)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let manager = ConfigManager::new();
    if let Some(path) = env::args().nth(1) {
        manager
            .load_from_file(&path)
            .with_context(|| format!("loading {}", path))?;
    }
    let config = manager.get()?;

    let data = synthetic_dataset(config.problem.input_width())?;
    let mut engine = EvolutionEngine::new(&config)?;

    log::info!(
        "evolving {} candidates for {} generations ({} fitness)",
        config.evolution.population_size,
        config.evolution.num_generations,
        config.problem.model_name
    );

    let outcome = engine.run(&data, ConsoleProgressCallback)?;

    log::info!(
        "best after {} generations: {} (fitness {:.6}, size {}, depth {})",
        outcome.generations,
        outcome.best,
        outcome.best_fitness,
        outcome.best.size(),
        outcome.best.depth()
    );

    Ok(())
}
