use super::traits::ConfigSection;
use crate::engines::generation::individual::RunSettings;
use crate::error::GpError;
use crate::types::{FitnessKind, Operator, Terminal};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Symbol sets and tags shared by every candidate of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProblemConfig {
    pub operators: Vec<Operator>,
    pub terminals: Vec<Terminal>,
    pub model_name: String,
    pub fitness_kind: FitnessKind,
}

impl Default for ProblemConfig {
    fn default() -> Self {
        Self {
            operators: vec![Operator::Add, Operator::Sub, Operator::Mul, Operator::Div],
            terminals: vec![Terminal::Variable(0), Terminal::Constant(1.0)],
            model_name: "SymbolicRegression".to_string(),
            fitness_kind: FitnessKind::Rmse,
        }
    }
}

impl ProblemConfig {
    /// Build the shared settings; `max_depth` is the mutation growth ceiling
    pub fn run_settings(&self, max_depth: usize) -> Arc<RunSettings> {
        Arc::new(RunSettings {
            operators: self.operators.clone(),
            terminals: self.terminals.clone(),
            max_depth,
            model_name: self.model_name.clone(),
            fitness_kind: self.fitness_kind,
        })
    }

    /// Number of input columns the terminals read
    pub fn input_width(&self) -> usize {
        self.terminals
            .iter()
            .filter_map(|t| match t {
                Terminal::Variable(i) => Some(i + 1),
                Terminal::Constant(_) => None,
            })
            .max()
            .unwrap_or(0)
    }
}

impl ConfigSection for ProblemConfig {
    fn section_name() -> &'static str {
        "problem"
    }

    fn validate(&self) -> Result<(), GpError> {
        if self.terminals.is_empty() {
            return Err(GpError::Configuration(
                "At least one terminal is required".to_string()
            ));
        }
        if self.model_name.trim().is_empty() {
            return Err(GpError::Configuration(
                "Model name must not be empty".to_string()
            ));
        }
        Ok(())
    }
}
