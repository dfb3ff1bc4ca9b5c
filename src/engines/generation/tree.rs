use crate::engines::generation::random::RandomSource;
use crate::error::{GpError, Result};
use crate::types::{Operator, Symbol, Terminal};
use std::fmt;

/// Index of a node inside one tree's arena.
///
/// Ids are only meaningful for the tree that produced them and only until the
/// next structural edit of that tree (`replace_subtree`, `swap_between` may
/// compact the arena).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct Node {
    symbol: Symbol,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Program tree stored as an arena of nodes.
///
/// Every node knows its parent, so a node can be cut out and replaced without
/// walking down from the root. Grafting leaves the old subtree's slots behind
/// as dead entries; the arena compacts itself once dead slots outnumber live
/// nodes. `size` is the live node count and is kept up to date on every edit.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
    root: NodeId,
    size: usize,
}

impl Tree {
    /// Single-leaf tree
    pub fn leaf(terminal: Terminal) -> Self {
        Self {
            nodes: vec![Node {
                symbol: Symbol::Leaf(terminal),
                parent: None,
                children: Vec::new(),
            }],
            root: NodeId(0),
            size: 1,
        }
    }

    /// Tree with `op` at the root over copies of `children`
    pub fn branch(op: Operator, children: &[Tree]) -> Result<Self> {
        if children.len() != op.arity() {
            return Err(GpError::InvalidArgument(format!(
                "Operator {} expects {} children, got {}",
                op,
                op.arity(),
                children.len()
            )));
        }

        let mut tree = Self {
            nodes: vec![Node {
                symbol: Symbol::Op(op),
                parent: None,
                children: Vec::with_capacity(children.len()),
            }],
            root: NodeId(0),
            size: 1,
        };

        for child in children {
            let id = child.copy_into(child.root, &mut tree.nodes, Some(NodeId(0)));
            tree.nodes[0].children.push(id);
            tree.size += child.size;
        }

        Ok(tree)
    }

    /// Grow method: below the ceiling each node is an operator or a terminal
    /// with even odds; at the ceiling it is always a terminal.
    /// The result has depth <= `max_depth`.
    pub fn grow<R: RandomSource + ?Sized>(
        rng: &mut R,
        operators: &[Operator],
        terminals: &[Terminal],
        max_depth: usize,
    ) -> Result<Self> {
        Self::generate(rng, operators, terminals, max_depth, false)
    }

    /// Full method: operators all the way down to `max_depth`, terminals only there.
    pub fn full<R: RandomSource + ?Sized>(
        rng: &mut R,
        operators: &[Operator],
        terminals: &[Terminal],
        max_depth: usize,
    ) -> Result<Self> {
        Self::generate(rng, operators, terminals, max_depth, true)
    }

    fn generate<R: RandomSource + ?Sized>(
        rng: &mut R,
        operators: &[Operator],
        terminals: &[Terminal],
        max_depth: usize,
        full: bool,
    ) -> Result<Self> {
        if terminals.is_empty() {
            return Err(GpError::InvalidArgument(
                "Tree generation needs at least one terminal".to_string(),
            ));
        }

        let mut nodes: Vec<Node> = Vec::new();
        // (parent, remaining depth), popped in preorder
        let mut pending: Vec<(Option<NodeId>, usize)> = vec![(None, max_depth)];

        while let Some((parent, remaining)) = pending.pop() {
            let id = NodeId(nodes.len());
            let branch = remaining > 0 && !operators.is_empty() && (full || rng.draw_unit() < 0.5);

            let symbol = if branch {
                Symbol::Op(operators[rng.draw_index(0, operators.len() - 1)])
            } else {
                Symbol::Leaf(terminals[rng.draw_index(0, terminals.len() - 1)])
            };

            nodes.push(Node {
                symbol,
                parent,
                children: Vec::with_capacity(symbol.arity()),
            });
            if let Some(p) = parent {
                nodes[p.0].children.push(id);
            }

            for _ in 0..symbol.arity() {
                pending.push((Some(id), remaining - 1));
            }
        }

        let size = nodes.len();
        Ok(Self {
            nodes,
            root: NodeId(0),
            size,
        })
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Live node count
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn symbol(&self, id: NodeId) -> Symbol {
        self.nodes[id.0].symbol
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Live node ids in preorder, root first
    pub fn node_ids(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.size);
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.nodes[id.0].children.iter().rev().copied());
        }
        order
    }

    /// Longest root-to-leaf path, counted in edges
    pub fn depth(&self) -> usize {
        self.subtree_depth(self.root)
    }

    pub fn subtree_depth(&self, id: NodeId) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(id, 0usize)];
        while let Some((node, level)) = stack.pop() {
            deepest = deepest.max(level);
            for &child in &self.nodes[node.0].children {
                stack.push((child, level + 1));
            }
        }
        deepest
    }

    pub fn subtree_size(&self, id: NodeId) -> usize {
        let mut count = 0;
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(self.nodes[node.0].children.iter().copied());
        }
        count
    }

    /// True when `ancestor` lies on the path from `node` up to the root.
    /// A node counts as its own ancestor.
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes[id.0].parent;
        }
        false
    }

    /// Uniform pick over every live node, root included.
    ///
    /// Single-pass reservoir sampling over an explicit stack: the k-th visited
    /// node replaces the current pick when `draw_index(0, k - 1)` is 0, so the
    /// source sees exactly one draw per node.
    pub fn random_node<R: RandomSource + ?Sized>(&self, rng: &mut R) -> NodeId {
        let mut chosen = self.root;
        let mut seen = 0;
        let mut stack = vec![self.root];

        while let Some(id) = stack.pop() {
            seen += 1;
            if rng.draw_index(0, seen - 1) == 0 {
                chosen = id;
            }
            stack.extend(self.nodes[id.0].children.iter().rev().copied());
        }

        chosen
    }

    /// Compact deep copy of the subtree rooted at `id`
    pub fn subtree(&self, id: NodeId) -> Tree {
        let mut nodes = Vec::with_capacity(self.subtree_size(id));
        let root = self.copy_into(id, &mut nodes, None);
        let size = nodes.len();
        Tree { nodes, root, size }
    }

    /// Put a copy of `replacement` where `at` was. Replacing the root
    /// reassigns the root index.
    pub fn replace_subtree(&mut self, at: NodeId, replacement: &Tree) {
        let removed = self.subtree_size(at);
        let parent = self.nodes[at.0].parent;
        let grafted = replacement.copy_into(replacement.root, &mut self.nodes, parent);

        match parent {
            Some(p) => {
                if let Some(slot) = self.nodes[p.0].children.iter().position(|&c| c == at) {
                    self.nodes[p.0].children[slot] = grafted;
                }
            }
            None => self.root = grafted,
        }

        self.nodes[at.0].parent = None;
        self.size = self.size - removed + replacement.size;
        self.compact_if_sparse();
    }

    /// Exchange two disjoint subtrees of this tree by relinking their parent
    /// slots. Returns false and leaves the tree untouched when one node is an
    /// ancestor of (or equal to) the other, which includes any swap involving
    /// the root.
    pub fn swap_within(&mut self, a: NodeId, b: NodeId) -> bool {
        if self.is_ancestor(a, b) || self.is_ancestor(b, a) {
            return false;
        }

        let (Some(parent_a), Some(parent_b)) = (self.nodes[a.0].parent, self.nodes[b.0].parent) else {
            return false;
        };
        let slot_a = self.nodes[parent_a.0].children.iter().position(|&c| c == a);
        let slot_b = self.nodes[parent_b.0].children.iter().position(|&c| c == b);
        let (Some(slot_a), Some(slot_b)) = (slot_a, slot_b) else {
            return false;
        };

        self.nodes[parent_a.0].children[slot_a] = b;
        self.nodes[parent_b.0].children[slot_b] = a;
        self.nodes[a.0].parent = Some(parent_b);
        self.nodes[b.0].parent = Some(parent_a);
        true
    }

    /// Exchange the subtree at `a` in `left` with the subtree at `b` in
    /// `right`. Either node may be a root.
    pub fn swap_between(left: &mut Tree, a: NodeId, right: &mut Tree, b: NodeId) {
        let from_left = left.subtree(a);
        let from_right = right.subtree(b);
        left.replace_subtree(a, &from_right);
        right.replace_subtree(b, &from_left);
    }

    /// Evaluate on one sample
    pub fn evaluate(&self, sample: &[f64]) -> f64 {
        self.evaluate_node(self.root, sample)
    }

    fn evaluate_node(&self, id: NodeId, sample: &[f64]) -> f64 {
        let node = &self.nodes[id.0];
        match node.symbol {
            Symbol::Leaf(terminal) => terminal.value(sample),
            Symbol::Op(op) => {
                let args: Vec<f64> = node
                    .children
                    .iter()
                    .map(|&child| self.evaluate_node(child, sample))
                    .collect();
                op.apply(&args)
            }
        }
    }

    /// Copy the subtree at `from` onto the end of `dst`. The copied root gets
    /// `parent` as its parent link but is not registered in that parent's
    /// child list; the caller wires that slot.
    fn copy_into(&self, from: NodeId, dst: &mut Vec<Node>, parent: Option<NodeId>) -> NodeId {
        let top = NodeId(dst.len());
        let mut stack = vec![(from, parent)];

        while let Some((src, parent)) = stack.pop() {
            let id = NodeId(dst.len());
            let node = &self.nodes[src.0];
            dst.push(Node {
                symbol: node.symbol,
                parent,
                children: Vec::with_capacity(node.children.len()),
            });
            if id != top {
                if let Some(p) = parent {
                    dst[p.0].children.push(id);
                }
            }
            for &child in node.children.iter().rev() {
                stack.push((child, Some(id)));
            }
        }

        top
    }

    fn compact_if_sparse(&mut self) {
        if self.nodes.len() > 2 * self.size {
            *self = self.subtree(self.root);
        }
    }

    /// Arena slots in use, dead ones included
    pub fn arena_len(&self) -> usize {
        self.nodes.len()
    }

    fn write_node(&self, f: &mut fmt::Formatter<'_>, id: NodeId) -> fmt::Result {
        let node = &self.nodes[id.0];
        match node.symbol {
            Symbol::Leaf(terminal) => write!(f, "{}", terminal),
            Symbol::Op(op) if op.is_infix() => {
                write!(f, "( ")?;
                self.write_node(f, node.children[0])?;
                write!(f, " {} ", op)?;
                self.write_node(f, node.children[1])?;
                write!(f, " )")
            }
            Symbol::Op(op) => {
                write!(f, "{}( ", op)?;
                for (i, &child) in node.children.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    self.write_node(f, child)?;
                }
                write!(f, " )")
            }
        }
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_node(f, self.root)
    }
}
