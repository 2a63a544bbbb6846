use tally::{
    GradeCalculator, PenaltyTable, QuestionResult,
    calculator::AuditReport,
};

fn question(raw: f64, structural: bool, header: bool, compilation: bool) -> QuestionResult {
    QuestionResult {
        raw_score:         raw,
        structural_error:  structural,
        header_error:      header,
        compilation_error: compilation,
    }
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn compounding_is_not_additive() {
    let mut audit = AuditReport::default();
    let subtotal =
        GradeCalculator::question_subtotal(&question(100.0, true, true, false), &mut audit);
    // 100 * 0.8 * 0.8, not 100 - 20 - 20
    assert!(approx(subtotal, 64.0), "got {subtotal}");
}

#[test]
fn all_three_defects_compound_to_thirty_two() {
    let mut audit = AuditReport::default();
    let subtotal =
        GradeCalculator::question_subtotal(&question(100.0, true, true, true), &mut audit);
    assert!(approx(subtotal, 32.0), "got {subtotal}");
    assert_eq!(audit.lines().len(), 3);
}

#[test]
fn clean_question_keeps_raw_score_exactly() {
    let mut audit = AuditReport::default();
    let subtotal =
        GradeCalculator::question_subtotal(&question(87.5, false, false, false), &mut audit);
    assert_eq!(subtotal, 87.5);
    assert!(audit.lines().is_empty());
}

#[test]
fn external_adjustments_apply_once_after_aggregation() {
    let table = PenaltyTable::from_lines(["#s1,-5,late submission"]);
    let calculator = GradeCalculator::new(table);

    let (grade, audit) = calculator
        .grade_submission(
            "s1",
            &[question(10.0, false, false, false), question(20.0, false, false, false)],
        )
        .expect("grade submission");

    assert!(approx(grade, 25.0), "got {grade}");
    let report = audit.to_string();
    assert!(report.contains("late submission"));
    assert!(report.contains("Final grade: 25.00"));
}

#[test]
fn student_without_records_is_unaffected() {
    let table = PenaltyTable::from_lines(["someone.else,-50,unrelated"]);
    let calculator = GradeCalculator::new(table);

    let (grade, audit) = calculator
        .grade_submission("s1", &[question(12.5, false, false, false)])
        .expect("grade submission");

    assert!(approx(grade, 12.5));
    assert!(audit.to_string().contains("No external penalties found"));
}

#[test]
fn large_deduction_clamps_to_exactly_zero() {
    let table = PenaltyTable::from_lines(["s2,-100,catastrophic lateness"]);
    let calculator = GradeCalculator::new(table);

    let (grade, _) = calculator
        .grade_submission("s2", &[question(10.0, false, false, false)])
        .expect("grade submission");

    assert_eq!(grade, 0.0);
}

#[test]
fn lookup_is_marker_and_case_insensitive() {
    let table = PenaltyTable::from_lines(["#Alice.2022,-5,late"]);
    let calculator = GradeCalculator::new(table);

    for id in ["alice.2022", "ALICE.2022"] {
        let (grade, _) = calculator
            .grade_submission(id, &[question(10.0, false, false, false)])
            .expect("grade submission");
        assert!(approx(grade, 5.0), "lookup failed for {id}");
    }
}

#[test]
fn contract_violations_abort_before_any_work() {
    let calculator = GradeCalculator::new(PenaltyTable::default());
    assert!(
        calculator
            .grade_submission("", &[question(1.0, false, false, false)])
            .is_err()
    );
    assert!(calculator.grade_submission("s1", &[]).is_err());
}

#[test]
fn audit_reports_do_not_leak_between_calls() {
    let table = PenaltyTable::from_lines(["s1,-5,late"]);
    let calculator = GradeCalculator::new(table);
    let questions = [question(10.0, false, false, false)];

    let (_, first) = calculator.grade_submission("s1", &questions).expect("first call");
    let (_, second) = calculator.grade_submission("s2", &questions).expect("second call");

    assert!(first.to_string().contains("late"));
    assert!(!second.to_string().contains("late"));
    assert!(second.to_string().contains("No external penalties found"));
}

#[test]
fn per_question_audit_shows_running_subtotals() {
    let table = PenaltyTable::default();
    let calculator = GradeCalculator::new(table);

    let (grade, audit) = calculator
        .grade_submission("s1", &[question(100.0, true, true, false)])
        .expect("grade submission");

    assert!(approx(grade, 64.0));
    let report = audit.to_string();
    assert!(report.contains("structural error: -20.00 (subtotal 80.00)"));
    assert!(report.contains("header error: -16.00 (subtotal 64.00)"));
}
