use logic_spec::{
    LogicAction, LogicOperator, LogicRule, Question, QuestionType, SurveySpec, check_rules,
    validate,
};

fn fixture(name: &str) -> &'static str {
    match name {
        "branching_survey" => include_str!("../tests/fixtures/branching_survey.json"),
        "cyclic_rules" => include_str!("../tests/fixtures/cyclic_rules.json"),
        _ => panic!("unknown fixture {}", name),
    }
}

fn load(name: &str) -> SurveySpec {
    serde_json::from_str(fixture(name)).expect("deserialize")
}

fn questions(ids: &[&str]) -> Vec<Question> {
    ids.iter()
        .zip(1..)
        .map(|(id, order)| Question::new(*id, order, QuestionType::SingleChoice))
        .collect()
}

fn jump(id: &str, source: &str, target: &str) -> LogicRule {
    LogicRule {
        id: id.into(),
        question_id: source.into(),
        source_question_id: source.into(),
        target_question_id: Some(target.into()),
        operator: LogicOperator::Equals,
        condition_value: "go".into(),
        action: LogicAction::JumpTo,
        priority: 0,
    }
}

#[test]
fn well_formed_fixture_is_valid() {
    let spec = load("branching_survey");
    let result = validate(&spec.rules, &spec.questions);
    assert!(result.is_valid);
    assert!(result.errors.is_empty());
    assert!(check_rules(&spec.rules).is_empty());
}

#[test]
fn two_cycle_names_both_questions() {
    let result = validate(
        &[jump("r1", "A", "B"), jump("r2", "B", "A")],
        &questions(&["A", "B"]),
    );
    assert!(!result.is_valid);
    let cycle = result
        .errors
        .iter()
        .find(|error| error.starts_with("circular reference"))
        .expect("cycle error");
    assert!(cycle.contains('A') && cycle.contains('B'));
}

#[test]
fn three_cycle_names_all_questions() {
    let spec = load("cyclic_rules");
    let result = validate(&spec.rules, &spec.questions);
    assert_eq!(
        result.errors,
        vec!["circular reference detected: Q1 -> Q2 -> Q3 -> Q1"]
    );
}

#[test]
fn every_self_reference_is_flagged() {
    let rules = vec![jump("r1", "A", "A"), jump("r2", "B", "B")];
    let result = validate(&rules, &questions(&["A", "B"]));
    for id in ["r1", "r2"] {
        assert!(
            result
                .errors
                .iter()
                .any(|error| error.starts_with(&format!("rule {id}:"))
                    && error.contains("cannot reference itself")),
            "missing self-reference error for {id}"
        );
    }
}

#[test]
fn duplicate_messages_are_collapsed() {
    let rules = vec![jump("r1", "A", "B"), jump("r1", "A", "B"), jump("r2", "B", "A")];
    let result = validate(&rules, &questions(&["A", "B"]));
    let cycles = result
        .errors
        .iter()
        .filter(|error| error.starts_with("circular reference"))
        .count();
    assert_eq!(cycles, 1);
}

#[test]
fn validator_does_not_touch_rules() {
    let rules = vec![jump("r1", "A", "ghost")];
    let before = rules.clone();
    let result = validate(&rules, &questions(&["A"]));
    assert_eq!(result.errors, vec!["rule r1: target question ghost not found"]);
    assert_eq!(rules, before);
}

#[test]
fn long_jump_chains_are_searched_without_recursion() {
    const LENGTH: usize = 60_000;
    let ids: Vec<String> = (0..=LENGTH).map(|n| format!("q{n}")).collect();
    let survey: Vec<Question> = ids
        .iter()
        .zip(1..)
        .map(|(id, order)| Question::new(id.as_str(), order, QuestionType::Text))
        .collect();
    let mut rules: Vec<LogicRule> = ids
        .windows(2)
        .enumerate()
        .map(|(n, pair)| jump(&format!("r{n}"), &pair[0], &pair[1]))
        .collect();

    let result = validate(&rules, &survey);
    assert!(result.is_valid, "{:?}", result.errors.first());

    rules.push(jump("back", &ids[LENGTH], &ids[0]));
    let result = validate(&rules, &survey);
    assert_eq!(result.errors.len(), 1);
    let cycle = &result.errors[0];
    assert!(cycle.starts_with("circular reference detected: q0 -> q1 -> q2"));
    assert!(cycle.ends_with(&format!("{} -> q0", ids[LENGTH])));
}
