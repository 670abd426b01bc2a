use sgpa::{Catalog, SgpaEngine, grade_point};

fn first_semester() -> SgpaEngine {
    let mut engine = SgpaEngine::default();
    engine.select_subject("Engineering Mathematics I");
    engine.select_subject("Communication Skills");
    engine.set_mark("Engineering Mathematics I", "95");
    engine.set_mark("Communication Skills", "60");
    engine
}

#[test]
fn grade_point_thresholds() {
    assert_eq!(grade_point(90.0).value(), 10);
    assert_eq!(grade_point(89.99).value(), 9);
    assert_eq!(grade_point(39.99).value(), 0);
    assert_eq!(grade_point(40.0).value(), 4);
}

#[test]
fn weighted_average_of_two_subjects() {
    let mut engine = first_semester();
    let sgpa = engine.calculate_sgpa();
    assert_eq!(sgpa.value(), 8.71);
    assert_eq!(sgpa.to_string(), "8.71");

    let report = engine.build_report().expect("report after calculation");
    let points = report
        .rows
        .iter()
        .map(|r| r.grade_point.value())
        .collect::<Vec<_>>();
    assert_eq!(points, vec![10, 7]);
}

#[test]
fn empty_selection_yields_zero() {
    let mut engine = SgpaEngine::default();
    let sgpa = engine.calculate_sgpa();
    assert_eq!(sgpa.value(), 0.0);
    assert!(!sgpa.value().is_nan());
    assert_eq!(sgpa.to_string(), "0.00");
}

#[test]
fn missing_and_invalid_marks_count_as_zero() {
    let mut engine = SgpaEngine::default();
    engine.select_subject("Engineering Physics");
    engine.select_subject("Engineering Chemistry");
    engine.set_mark("Engineering Physics", "not a number");
    // (0 * 3 + 0 * 3) / 6
    assert_eq!(engine.calculate_sgpa().value(), 0.0);

    engine.set_mark("Engineering Chemistry", "100");
    // (0 * 3 + 10 * 3) / 6
    assert_eq!(engine.calculate_sgpa().value(), 5.0);

    let report = engine.build_report().unwrap();
    assert_eq!(report.rows[0].mark, 0.0);
    assert_eq!(report.rows[0].grade_point.value(), 0);
}

#[test]
fn remove_is_idempotent_and_drops_the_mark() {
    let mut engine = first_semester();
    engine.remove_subject("Communication Skills");
    assert_eq!(engine.mark("Communication Skills"), None);
    assert_eq!(engine.selection(), ["Engineering Mathematics I".to_string()]);

    let selection = engine.selection().to_vec();
    engine.remove_subject("Communication Skills");
    assert_eq!(engine.selection(), selection.as_slice());
    assert_eq!(engine.mark("Communication Skills"), None);
    assert_eq!(engine.mark("Engineering Mathematics I"), Some(95.0));
}

#[test]
fn reselecting_after_removal_starts_without_a_mark() {
    let mut engine = first_semester();
    engine.remove_subject("Communication Skills");
    assert!(engine.select_subject("Communication Skills"));
    assert_eq!(engine.mark("Communication Skills"), None);
}

#[test]
fn duplicates_are_ignored() {
    let mut engine = SgpaEngine::default();
    let known = engine.known_subjects().len();
    assert!(!engine.add_known_subject("Engineering Physics"));
    assert!(!engine.add_known_subject(""));
    assert_eq!(engine.known_subjects().len(), known);

    assert!(engine.add_known_subject("Data Structures"));
    assert_eq!(engine.known_subjects().len(), known + 1);
    assert_eq!(engine.known_subjects().credits("Data Structures"), 3);

    assert!(engine.select_subject("Data Structures"));
    assert!(!engine.select_subject("Data Structures"));
    assert_eq!(engine.selection(), ["Data Structures".to_string()]);
}

#[test]
fn sgpa_is_a_snapshot() {
    let mut engine = first_semester();
    engine.calculate_sgpa();
    engine.set_mark("Communication Skills", "95");
    assert_eq!(engine.sgpa().unwrap().value(), 8.71);
    assert_eq!(engine.build_report().unwrap().sgpa.value(), 8.71);

    assert_eq!(engine.calculate_sgpa().value(), 10.0);
}

#[test]
fn report_requires_a_calculation() {
    let mut engine = first_semester();
    assert!(engine.build_report().is_none());
    engine.calculate_sgpa();
    assert!(engine.build_report().is_some());
}

#[test]
fn report_follows_selection_order() {
    let mut engine = SgpaEngine::default();
    for name in ["Engineering Physics", "Electrical Engineering", "Engineering Mechanics"] {
        engine.select_subject(name);
    }
    engine.set_semester(3).unwrap();
    engine.calculate_sgpa();
    let report = engine.build_report().unwrap();
    let names = report
        .rows
        .iter()
        .map(|r| r.subject.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, ["Engineering Physics", "Electrical Engineering", "Engineering Mechanics"]);
    assert_eq!(report.semester, 3);
}

#[test]
fn engines_do_not_share_catalogs() {
    let mut a = SgpaEngine::default();
    let b = SgpaEngine::default();
    a.add_known_subject_with_credits("Robotics", 5);
    assert!(a.known_subjects().contains("Robotics"));
    assert!(!b.known_subjects().contains("Robotics"));
    assert_eq!(b.known_subjects(), &Catalog::default());
}
