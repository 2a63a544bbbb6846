#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use tracing::debug;

use crate::types::GradingResult;

/// A single deduction rule over a grading snapshot.
///
/// Strategies are pure: they read the result and return a non-negative
/// deduction. They never see each other's output, so their sum is
/// independent of registration order.
pub trait PenaltyStrategy {
    /// Short label used in logs.
    fn name(&self) -> &'static str;

    /// Deduction to apply for `result`; must be non-negative.
    fn deduction(&self, result: &GradingResult) -> f64;
}

/// Deducts a flat amount when the submission failed to compile.
#[derive(Debug, Clone, Copy)]
pub struct CompilationFailurePenalty {
    /// Points removed on a compilation failure.
    pub amount: f64,
}

impl PenaltyStrategy for CompilationFailurePenalty {
    fn name(&self) -> &'static str {
        "compilation failure"
    }

    fn deduction(&self, result: &GradingResult) -> f64 {
        if result.compilation_error { self.amount } else { 0.0 }
    }
}

/// Deducts a flat amount when file or class naming broke the hand-in rules.
#[derive(Debug, Clone, Copy)]
pub struct NamingPenalty {
    /// Points removed for incorrect naming.
    pub amount: f64,
}

impl PenaltyStrategy for NamingPenalty {
    fn name(&self) -> &'static str {
        "incorrect naming"
    }

    fn deduction(&self, result: &GradingResult) -> f64 {
        if result.naming_correct { 0.0 } else { self.amount }
    }
}

/// Deducts a flat amount when the submitted folder hierarchy is wrong.
#[derive(Debug, Clone, Copy)]
pub struct HierarchyPenalty {
    /// Points removed for a wrong folder hierarchy.
    pub amount: f64,
}

impl PenaltyStrategy for HierarchyPenalty {
    fn name(&self) -> &'static str {
        "improper hierarchy"
    }

    fn deduction(&self, result: &GradingResult) -> f64 {
        if result.proper_hierarchy { 0.0 } else { self.amount }
    }
}

/// Deducts a flat amount when required file headers are missing.
#[derive(Debug, Clone, Copy)]
pub struct MissingHeaderPenalty {
    /// Points removed for missing headers.
    pub amount: f64,
}

impl PenaltyStrategy for MissingHeaderPenalty {
    fn name(&self) -> &'static str {
        "missing headers"
    }

    fn deduction(&self, result: &GradingResult) -> f64 {
        if result.has_headers { 0.0 } else { self.amount }
    }
}

/// Final outcome of the single-stage penalty model. A terminal value,
/// never mutated after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedScore {
    /// Score before any deduction.
    pub raw_score:       f64,
    /// Sum of every registered strategy's deduction.
    pub total_deduction: f64,
    /// `max(0, raw_score - total_deduction)`.
    pub final_score:     f64,
}

/// Applies every registered strategy to grading snapshots.
#[derive(Default)]
pub struct PenaltyEngine {
    /// Registered strategies, in registration order.
    strategies: Vec<Box<dyn PenaltyStrategy>>,
}

impl PenaltyEngine {
    /// Creates an engine with no strategies registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a strategy; absent strategies are a no-op.
    pub fn register(&mut self, strategy: Option<Box<dyn PenaltyStrategy>>) {
        if let Some(strategy) = strategy {
            self.strategies.push(strategy);
        }
    }

    /// Number of registered strategies.
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// True when no strategies are registered.
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Sums every strategy's deduction and clamps the final score at zero.
    pub fn process(&self, result: &GradingResult) -> ProcessedScore {
        let mut total_deduction = 0.0;
        for strategy in &self.strategies {
            let deduction = strategy.deduction(result).max(0.0);
            if deduction > 0.0 {
                debug!("{}: -{deduction}", strategy.name());
            }
            total_deduction += deduction;
        }

        ProcessedScore {
            raw_score: result.raw_score,
            total_deduction,
            final_score: (result.raw_score - total_deduction).max(0.0),
        }
    }
}
