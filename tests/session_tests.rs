use std::{fs, io::Cursor};

use sgpa::{
    CalculatorConfig, Catalog, Subject,
    session::{Command, Outcome, Session},
};
use uuid::Uuid;

fn run(config: &CalculatorConfig, script: &str) -> (Session, String) {
    let mut session = Session::new(config);
    let mut output = Vec::new();
    session
        .run(Cursor::new(script.as_bytes()), &mut output)
        .expect("session runs");
    (session, String::from_utf8(output).expect("utf-8 output"))
}

#[test]
fn scripted_session_calculates() {
    let script = "\
semester 2
select Engineering Mathematics I
select \"Communication Skills\"
mark Engineering Mathematics I = 95
mark Communication Skills = 60
calc
";
    let (session, output) = run(&CalculatorConfig::default(), script);
    assert!(output.contains("Semester 2"));
    assert!(output.contains("Selected `Engineering Mathematics I`"));
    assert!(output.lines().any(|l| l == "SGPA: 8.71"));
    assert_eq!(session.engine().sgpa().unwrap().value(), 8.71);
    assert_eq!(session.engine().semester(), 2);
}

#[test]
fn unknown_commands_do_not_stop_the_session() {
    let (session, output) = run(
        &CalculatorConfig::default(),
        "dance\n# comment\n\nselect Engineering Physics\n",
    );
    assert!(output.contains("Could not understand `dance`"));
    assert!(session.engine().is_selected("Engineering Physics"));
}

#[test]
fn quit_stops_reading() {
    let (session, _) = run(
        &CalculatorConfig::default(),
        "select Engineering Physics\nquit\nselect Engineering Chemistry\n",
    );
    assert!(session.engine().is_selected("Engineering Physics"));
    assert!(!session.engine().is_selected("Engineering Chemistry"));
}

#[test]
fn new_subjects_can_be_selected() {
    let (session, output) = run(
        &CalculatorConfig::default(),
        "select Data Structures\nnew Data Structures credits 4\nselect Data Structures\n",
    );
    assert!(output.contains("`Data Structures` is not a known subject"));
    assert!(output.contains("Added `Data Structures` (4 credits)"));
    assert!(session.engine().is_selected("Data Structures"));
}

#[test]
fn invalid_semester_is_reported() {
    let (session, output) = run(&CalculatorConfig::default(), "semester 9\n");
    assert!(output.contains("Semester 9 is out of range"));
    assert_eq!(session.engine().semester(), 1);
}

#[test]
fn export_is_gated_on_calculation() {
    let mut session = Session::new(&CalculatorConfig::default());
    let outcome = session.execute(Command::Export(None)).unwrap();
    assert_eq!(
        outcome,
        Outcome::Continue("Calculate the SGPA before exporting.".to_string())
    );
}

#[test]
fn export_uses_the_configured_path() {
    let path = std::env::temp_dir().join(format!("sgpa-session-{}.pdf", Uuid::new_v4()));
    let config = CalculatorConfig::builder().report_path(path.clone()).build();

    let script = "select Engineering Physics\nmark Engineering Physics = 70\ncalc\nexport\n";
    let (_, output) = run(&config, script);
    assert!(output.contains("Wrote"));
    assert!(fs::read(&path).unwrap().starts_with(b"%PDF"));

    let _ = fs::remove_file(path);
}

#[test]
fn available_lists_unselected_subjects() {
    let config = CalculatorConfig::builder()
        .catalog(Catalog::from_subjects([Subject::new("Art", 2), Subject::new("Music", 3)]))
        .build();
    let mut session = Session::new(&config);
    session.execute(Command::Select("Art".into())).unwrap();
    let outcome = session.execute(Command::Available).unwrap();
    assert_eq!(outcome, Outcome::Continue("Music".to_string()));
}

#[test]
fn show_lists_selection_with_marks() {
    let (_, output) = run(
        &CalculatorConfig::default(),
        "select Engineering Physics\nmark Engineering Physics = 72.5\nshow\n",
    );
    assert!(output.contains("Credits"));
    assert!(output.contains("72.5"));
}

#[test]
fn remove_reports_unselected_subjects() {
    let mut session = Session::new(&CalculatorConfig::default());
    let outcome = session
        .execute(Command::Remove("Engineering Physics".into()))
        .unwrap();
    assert_eq!(
        outcome,
        Outcome::Continue("`Engineering Physics` is not selected".to_string())
    );

    session
        .execute(Command::Select("Engineering Physics".into()))
        .unwrap();
    let outcome = session
        .execute(Command::Remove("Engineering Physics".into()))
        .unwrap();
    assert_eq!(outcome, Outcome::Continue("Removed `Engineering Physics`".to_string()));
    assert!(session.engine().selection().is_empty());
}
