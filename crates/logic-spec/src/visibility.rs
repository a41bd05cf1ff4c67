use std::collections::BTreeMap;

use crate::answers::AnswerSet;
use crate::condition::evaluate;
use crate::spec::question::{Question, QuestionId, ordered};
use crate::spec::rule::{LogicAction, LogicRule};

pub type VisibilityMap = BTreeMap<QuestionId, bool>;

/// Rules grouped by the question whose visibility they govern.
///
/// Built per call; never keep one across respondents.
pub(crate) fn group_by_question(rules: &[LogicRule]) -> BTreeMap<&str, Vec<&LogicRule>> {
    let mut grouped: BTreeMap<&str, Vec<&LogicRule>> = BTreeMap::new();
    for rule in rules {
        grouped
            .entry(rule.question_id.as_str())
            .or_default()
            .push(rule);
    }
    grouped
}

/// Visibility of every question, keyed by id.
///
/// Priority plays no part here: any triggered Hide rule hides the question,
/// otherwise at least one Show rule must hold when Show rules exist. This is
/// an override/OR combination, unlike the first-match scan in navigation.
pub fn resolve_visibility(
    questions: &[Question],
    rules: &[LogicRule],
    answers: &AnswerSet,
) -> VisibilityMap {
    let grouped = group_by_question(rules);
    questions
        .iter()
        .map(|question| {
            let visible = grouped
                .get(question.id.as_str())
                .is_none_or(|governing| is_visible(governing, answers));
            (question.id.clone(), visible)
        })
        .collect()
}

/// Ids of the currently visible questions, in survey order.
pub fn visible_questions(
    questions: &[Question],
    rules: &[LogicRule],
    answers: &AnswerSet,
) -> Vec<QuestionId> {
    let visibility = resolve_visibility(questions, rules, answers);
    ordered(questions)
        .into_iter()
        .filter(|question| visibility.get(&question.id).copied().unwrap_or(true))
        .map(|question| question.id.clone())
        .collect()
}

fn is_visible(governing: &[&LogicRule], answers: &AnswerSet) -> bool {
    let holds = |rule: &LogicRule| evaluate(rule, answers.get(&rule.source_question_id));

    if governing
        .iter()
        .any(|rule| rule.action == LogicAction::Hide && holds(*rule))
    {
        return false;
    }

    let mut show_rules = governing
        .iter()
        .filter(|rule| rule.action == LogicAction::Show)
        .peekable();
    if show_rules.peek().is_none() {
        return true;
    }
    show_rules.any(|rule| holds(*rule))
}
