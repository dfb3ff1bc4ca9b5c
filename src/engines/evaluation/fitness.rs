use crate::engines::generation::individual::Candidate;
use crate::error::{GpError, Result};
use crate::types::FitnessKind;
use std::cmp::Ordering;

/// Input rows and their expected outputs
#[derive(Debug, Clone)]
pub struct Dataset {
    samples: Vec<Vec<f64>>,
    targets: Vec<f64>,
}

impl Dataset {
    pub fn new(samples: Vec<Vec<f64>>, targets: Vec<f64>) -> Result<Self> {
        if samples.len() != targets.len() {
            return Err(GpError::InvalidArgument(format!(
                "Dataset has {} samples but {} targets",
                samples.len(),
                targets.len()
            )));
        }
        if samples.is_empty() {
            return Err(GpError::InvalidArgument("Dataset is empty".to_string()));
        }
        Ok(Self { samples, targets })
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[Vec<f64>] {
        &self.samples
    }

    pub fn targets(&self) -> &[f64] {
        &self.targets
    }
}

/// Score one candidate with its run's fitness kind
pub fn evaluate(candidate: &Candidate, dataset: &Dataset) -> f64 {
    let outputs = dataset.samples().iter().map(|s| candidate.tree().evaluate(s));
    let n = dataset.len() as f64;

    match candidate.settings().fitness_kind {
        FitnessKind::Rmse => {
            let squared: f64 = outputs
                .zip(dataset.targets())
                .map(|(out, target)| (out - target).powi(2))
                .sum();
            (squared / n).sqrt()
        }
        FitnessKind::Accuracy => {
            // Threshold classifier: class 1 when the output reaches 0.5
            let hits = outputs
                .zip(dataset.targets())
                .filter(|(out, target)| {
                    let predicted = if *out >= 0.5 { 1.0 } else { 0.0 };
                    (predicted - target.round()).abs() < f64::EPSILON
                })
                .count();
            hits as f64 / n
        }
    }
}

/// Evaluate and sort best first, returning fitness values aligned with the
/// new order. NaN scores rank last.
pub fn rank_population(population: &mut Vec<Candidate>, dataset: &Dataset) -> Vec<f64> {
    let mut scored: Vec<(Candidate, f64)> = population
        .drain(..)
        .map(|candidate| {
            let kind = candidate.settings().fitness_kind;
            let score = evaluate(&candidate, dataset);
            let score = if score.is_nan() { kind.worst() } else { score };
            (candidate, score)
        })
        .collect();

    scored.sort_by(|(a, fa), (_, fb)| {
        let kind = a.settings().fitness_kind;
        if kind.is_better(*fa, *fb) {
            Ordering::Less
        } else if kind.is_better(*fb, *fa) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    });

    let mut fitness = Vec::with_capacity(scored.len());
    for (candidate, score) in scored {
        population.push(candidate);
        fitness.push(score);
    }
    fitness
}
