use tally::{
    GradingResult, PenaltyEngine,
    penalty::{CompilationFailurePenalty, HierarchyPenalty, MissingHeaderPenalty, NamingPenalty},
};

fn clean_result(raw: f64) -> GradingResult {
    GradingResult::builder().raw_score(raw).max_score(10.0).build()
}

#[test]
fn empty_registry_deducts_nothing() {
    let engine = PenaltyEngine::new();
    let result = GradingResult::builder()
        .raw_score(7.5)
        .max_score(10.0)
        .compilation_error(true)
        .has_headers(false)
        .build();

    let processed = engine.process(&result);
    assert_eq!(processed.total_deduction, 0.0);
    assert_eq!(processed.final_score, 7.5);
}

#[test]
fn registering_absent_strategy_is_a_no_op() {
    let mut engine = PenaltyEngine::new();
    engine.register(None);
    assert!(engine.is_empty());

    engine.register(Some(Box::new(NamingPenalty { amount: 2.0 })));
    assert_eq!(engine.len(), 1);
}

#[test]
fn deductions_sum_and_clamp_at_zero() {
    let mut engine = PenaltyEngine::new();
    engine.register(Some(Box::new(CompilationFailurePenalty { amount: 8.0 })));
    engine.register(Some(Box::new(MissingHeaderPenalty { amount: 5.0 })));

    let result = GradingResult::builder()
        .raw_score(10.0)
        .max_score(10.0)
        .compilation_error(true)
        .has_headers(false)
        .build();

    let processed = engine.process(&result);
    assert_eq!(processed.raw_score, 10.0);
    assert_eq!(processed.total_deduction, 13.0);
    assert_eq!(processed.final_score, 0.0);
}

#[test]
fn strategies_only_fire_on_their_flag() {
    let mut engine = PenaltyEngine::new();
    engine.register(Some(Box::new(NamingPenalty { amount: 2.0 })));
    engine.register(Some(Box::new(HierarchyPenalty { amount: 3.0 })));

    let processed = engine.process(&clean_result(6.0));
    assert_eq!(processed.total_deduction, 0.0);
    assert_eq!(processed.final_score, 6.0);
}

#[test]
fn final_score_invariant_holds() {
    let mut engine = PenaltyEngine::new();
    engine.register(Some(Box::new(CompilationFailurePenalty { amount: 4.0 })));

    for raw in [0.0, 2.0, 4.0, 10.0] {
        let result = GradingResult::builder()
            .raw_score(raw)
            .max_score(10.0)
            .compilation_error(true)
            .build();
        let processed = engine.process(&result);
        assert_eq!(
            processed.final_score,
            (processed.raw_score - processed.total_deduction).max(0.0)
        );
        assert!(processed.final_score >= 0.0);
    }
}
