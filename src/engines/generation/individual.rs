use crate::engines::generation::tree::Tree;
use crate::types::{FitnessKind, Operator, Terminal};
use std::fmt;
use std::sync::Arc;

/// Run-level settings, built once and shared by every candidate of a run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub operators: Vec<Operator>,
    pub terminals: Vec<Terminal>,
    pub max_depth: usize,
    pub model_name: String,
    pub fitness_kind: FitnessKind,
}

/// What the selectors and the depth filter need to know about a population entry
pub trait TreeShape {
    /// Parsimony measure; smaller is preferred
    fn size_metric(&self) -> usize;

    fn depth(&self) -> usize;
}

/// One program tree plus a handle on the run settings
#[derive(Debug, Clone)]
pub struct Candidate {
    tree: Tree,
    settings: Arc<RunSettings>,
}

impl Candidate {
    pub fn new(settings: Arc<RunSettings>, tree: Tree) -> Self {
        Self { tree, settings }
    }

    /// Fresh candidate holding a deep copy of `root`
    pub fn from_root(settings: Arc<RunSettings>, root: &Tree) -> Self {
        Self {
            tree: root.subtree(root.root()),
            settings,
        }
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    pub fn settings(&self) -> &Arc<RunSettings> {
        &self.settings
    }

    pub fn size(&self) -> usize {
        self.tree.size()
    }

    pub fn depth(&self) -> usize {
        self.tree.depth()
    }
}

impl TreeShape for Candidate {
    fn size_metric(&self) -> usize {
        self.tree.size()
    }

    fn depth(&self) -> usize {
        self.tree.depth()
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tree)
    }
}
