use std::collections::VecDeque;
use stdgp::RandomSource;

/// Replays fixed draw sequences in order
#[derive(Debug, Default)]
pub struct ScriptedSource {
    indices: VecDeque<usize>,
    units: VecDeque<f64>,
}

#[allow(dead_code)]
impl ScriptedSource {
    pub fn new(indices: &[usize]) -> Self {
        Self {
            indices: indices.iter().copied().collect(),
            units: VecDeque::new(),
        }
    }

    pub fn with_units(mut self, units: &[f64]) -> Self {
        self.units = units.iter().copied().collect();
        self
    }

    pub fn is_exhausted(&self) -> bool {
        self.indices.is_empty() && self.units.is_empty()
    }
}

impl RandomSource for ScriptedSource {
    fn draw_index(&mut self, low: usize, high: usize) -> usize {
        let value = self.indices.pop_front().expect("index script exhausted");
        assert!(
            (low..=high).contains(&value),
            "scripted draw {} outside {}..={}",
            value,
            low,
            high
        );
        value
    }

    fn draw_unit(&mut self) -> f64 {
        self.units.pop_front().expect("unit script exhausted")
    }
}

/// Draws that make `Tree::random_node` land on preorder position `target`
/// of a tree with `size` nodes
#[allow(dead_code)]
pub fn pick_node(target: usize, size: usize) -> Vec<usize> {
    (0..size)
        .map(|k| if k == 0 || k == target { 0 } else { 1 })
        .collect()
}
