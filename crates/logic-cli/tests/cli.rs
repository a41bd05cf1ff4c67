use assert_cmd::Command;
use assert_fs::TempDir;
use assert_fs::prelude::*;
use serde_json::{Value, json};
use std::error::Error;
use std::path::PathBuf;
use std::process::Output;

type TestResult = Result<(), Box<dyn Error>>;

const BRANCHING: &str = include_str!("../../logic-spec/tests/fixtures/branching_survey.json");
const CYCLIC: &str = include_str!("../../logic-spec/tests/fixtures/cyclic_rules.json");

fn write_file(dir: &TempDir, name: &str, contents: &str) -> Result<PathBuf, Box<dyn Error>> {
    let file = dir.child(name);
    file.write_str(contents)?;
    Ok(file.path().to_path_buf())
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn validate_accepts_branching_survey() -> TestResult {
    let dir = TempDir::new()?;
    let survey = write_file(&dir, "survey.json", BRANCHING)?;
    let output = Command::cargo_bin("survey-logic")?
        .arg("validate")
        .arg("--survey")
        .arg(&survey)
        .output()?;
    assert!(output.status.success());
    assert!(stdout_of(&output).contains("Validation result: valid"));
    Ok(())
}

#[test]
fn validate_rejects_cycle() -> TestResult {
    let dir = TempDir::new()?;
    let survey = write_file(&dir, "survey.json", CYCLIC)?;
    let output = Command::cargo_bin("survey-logic")?
        .arg("validate")
        .arg("--survey")
        .arg(&survey)
        .output()?;
    assert!(!output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.contains("Validation result: invalid"));
    assert!(stdout.contains("circular reference detected: Q1 -> Q2 -> Q3 -> Q1"));
    Ok(())
}

#[test]
fn next_follows_promoter_jump() -> TestResult {
    let dir = TempDir::new()?;
    let survey = write_file(&dir, "survey.json", BRANCHING)?;
    let answers = write_file(&dir, "answers.json", r#"{"q4": 10}"#)?;
    let output = Command::cargo_bin("survey-logic")?
        .args(["next", "--current", "q4", "--survey"])
        .arg(&survey)
        .arg("--answers")
        .arg(&answers)
        .output()?;
    assert!(output.status.success());
    assert_eq!(stdout_of(&output).trim(), "Next question: q5");
    Ok(())
}

#[test]
fn walk_stops_at_env_step_limit() -> TestResult {
    let dir = TempDir::new()?;
    let survey = write_file(&dir, "survey.json", CYCLIC)?;
    let answers = write_file(&dir, "answers.json", r#"{"Q1":"a","Q2":"b","Q3":"c"}"#)?;
    let output = Command::cargo_bin("survey-logic")?
        .env("SURVEY_LOGIC_MAX_STEPS", "5")
        .arg("walk")
        .arg("--survey")
        .arg(&survey)
        .arg("--answers")
        .arg(&answers)
        .output()?;
    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("exceeded 5 steps"));
    Ok(())
}

#[test]
fn max_steps_flag_overrides_env() -> TestResult {
    let dir = TempDir::new()?;
    let survey = write_file(&dir, "survey.json", BRANCHING)?;
    let output = Command::cargo_bin("survey-logic")?
        .env("SURVEY_LOGIC_MAX_STEPS", "1")
        .args(["walk", "--max-steps", "50", "--survey"])
        .arg(&survey)
        .output()?;
    assert!(output.status.success(), "{}", stderr_of(&output));
    assert!(stdout_of(&output).starts_with("Path: q1"));
    Ok(())
}

#[test]
fn evaluate_prints_json_view() -> TestResult {
    let dir = TempDir::new()?;
    let survey = write_file(&dir, "survey.json", BRANCHING)?;
    let answers = write_file(&dir, "answers.json", r#"{"q1": "yes"}"#)?;
    let output = Command::cargo_bin("survey-logic")?
        .args(["evaluate", "--format", "json", "--current", "q1", "--survey"])
        .arg(&survey)
        .arg("--answers")
        .arg(&answers)
        .output()?;
    assert!(output.status.success());
    let value: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(value["hidden_question_ids"], json!(["q3"]));
    assert_eq!(value["next_question_id"], "q2");
    Ok(())
}

#[test]
fn operators_lists_numeric_comparisons() -> TestResult {
    let output = Command::cargo_bin("survey-logic")?
        .args(["operators", "nps"])
        .output()?;
    assert!(output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.contains("Operators for nps:"));
    assert!(stdout.contains("greater_than"));
    assert!(!stdout.contains("contains"));
    Ok(())
}

#[test]
fn run_walks_survey_from_stdin() -> TestResult {
    let dir = TempDir::new()?;
    let survey = write_file(&dir, "survey.json", BRANCHING)?;
    let output = Command::cargo_bin("survey-logic")?
        .arg("run")
        .arg("--survey")
        .arg(&survey)
        .write_stdin("yes\nshoes\n10\nthanks\n")
        .output()?;
    assert!(output.status.success(), "{}", stderr_of(&output));
    let stdout = stdout_of(&output);
    assert!(stdout.contains("Survey: Customer Feedback"));
    assert!(stdout.contains("Path: q1 -> q2 -> q4 -> q5"));
    assert!(!stdout.contains("Why not?"));
    Ok(())
}

#[test]
fn run_aborts_on_exit() -> TestResult {
    let dir = TempDir::new()?;
    let survey = write_file(&dir, "survey.json", BRANCHING)?;
    let output = Command::cargo_bin("survey-logic")?
        .arg("run")
        .arg("--survey")
        .arg(&survey)
        .write_stdin("exit\n")
        .output()?;
    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("survey aborted by user"));
    Ok(())
}
