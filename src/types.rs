use crate::error::GpError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Internal-node symbol. Arity is fixed per operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Operator {
    Add,
    Sub,
    Mul,
    /// Protected division: a zero divisor yields 1.0
    Div,
    Max,
    Min,
    Neg,
}

impl Operator {
    pub fn arity(&self) -> usize {
        match self {
            Operator::Neg => 1,
            _ => 2,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "*",
            Operator::Div => "/",
            Operator::Max => "max",
            Operator::Min => "min",
            Operator::Neg => "neg",
        }
    }

    /// Apply to already-evaluated arguments. `args.len()` must equal `arity()`.
    pub fn apply(&self, args: &[f64]) -> f64 {
        match self {
            Operator::Add => args[0] + args[1],
            Operator::Sub => args[0] - args[1],
            Operator::Mul => args[0] * args[1],
            Operator::Div => {
                if args[1].abs() < f64::EPSILON {
                    1.0
                } else {
                    args[0] / args[1]
                }
            }
            Operator::Max => args[0].max(args[1]),
            Operator::Min => args[0].min(args[1]),
            Operator::Neg => -args[0],
        }
    }

    /// Infix operators render as `( a + b )`, the rest as `max( a, b )`.
    pub fn is_infix(&self) -> bool {
        matches!(self, Operator::Add | Operator::Sub | Operator::Mul | Operator::Div)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Operator {
    type Err = GpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "+" => Ok(Operator::Add),
            "-" => Ok(Operator::Sub),
            "*" => Ok(Operator::Mul),
            "/" => Ok(Operator::Div),
            "max" => Ok(Operator::Max),
            "min" => Ok(Operator::Min),
            "neg" => Ok(Operator::Neg),
            other => Err(GpError::InvalidSymbol(format!("Unknown operator: {}", other))),
        }
    }
}

impl TryFrom<String> for Operator {
    type Error = GpError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        op.symbol().to_string()
    }
}

/// Leaf symbol: an input variable `x<i>` or a numeric constant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Terminal {
    Variable(usize),
    Constant(f64),
}

impl Terminal {
    pub fn value(&self, sample: &[f64]) -> f64 {
        match self {
            // Missing inputs read as zero rather than panicking mid-evaluation
            Terminal::Variable(i) => sample.get(*i).copied().unwrap_or(0.0),
            Terminal::Constant(c) => *c,
        }
    }
}

impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Terminal::Variable(i) => write!(f, "x{}", i),
            Terminal::Constant(c) => write!(f, "{}", c),
        }
    }
}

impl FromStr for Terminal {
    type Err = GpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(index) = s.strip_prefix('x') {
            return index
                .parse::<usize>()
                .map(Terminal::Variable)
                .map_err(|_| GpError::InvalidSymbol(format!("Bad variable terminal: {}", s)));
        }
        s.parse::<f64>()
            .map(Terminal::Constant)
            .map_err(|_| GpError::InvalidSymbol(format!("Unknown terminal: {}", s)))
    }
}

impl TryFrom<String> for Terminal {
    type Error = GpError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Terminal> for String {
    fn from(t: Terminal) -> Self {
        t.to_string()
    }
}

/// What a tree node holds
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Symbol {
    Op(Operator),
    Leaf(Terminal),
}

impl Symbol {
    pub fn arity(&self) -> usize {
        match self {
            Symbol::Op(op) => op.arity(),
            Symbol::Leaf(_) => 0,
        }
    }
}

/// How a candidate's raw output is scored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FitnessKind {
    /// Root mean squared error, lower is better
    Rmse,
    /// Share of samples whose thresholded output matches the class label, higher is better
    Accuracy,
}

impl FitnessKind {
    /// True when `a` ranks strictly ahead of `b`
    pub fn is_better(&self, a: f64, b: f64) -> bool {
        match self {
            FitnessKind::Rmse => a < b,
            FitnessKind::Accuracy => a > b,
        }
    }

    /// The value every real score beats
    pub fn worst(&self) -> f64 {
        match self {
            FitnessKind::Rmse => f64::INFINITY,
            FitnessKind::Accuracy => f64::NEG_INFINITY,
        }
    }
}
