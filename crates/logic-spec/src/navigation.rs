use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::answers::AnswerSet;
use crate::condition::evaluate;
use crate::spec::question::{Question, QuestionId};
use crate::spec::rule::{LogicAction, LogicRule};
use crate::visibility::visible_questions;

/// Where the respondent goes after the current question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NextStep {
    Question(QuestionId),
    EndOfSurvey,
}

impl NextStep {
    pub fn question_id(&self) -> Option<&str> {
        match self {
            NextStep::Question(id) => Some(id),
            NextStep::EndOfSurvey => None,
        }
    }

    pub fn is_end(&self) -> bool {
        matches!(self, NextStep::EndOfSurvey)
    }
}

/// Rules matching `filter`, stably sorted by ascending priority.
fn by_priority<'a>(
    rules: &'a [LogicRule],
    filter: impl Fn(&LogicRule) -> bool,
) -> Vec<&'a LogicRule> {
    let mut selected: Vec<&LogicRule> = rules.iter().filter(|rule| filter(rule)).collect();
    selected.sort_by_key(|rule| rule.priority);
    selected
}

/// Resolves the question that follows `current`.
///
/// Jump and end rules sourced on `current` are scanned by priority and the
/// first whose condition holds wins. A jump target is returned as-is, without
/// checking its visibility. Otherwise the next visible question in survey
/// order is returned; a `current` that is last or not visible ends the survey.
pub fn next_question(
    questions: &[Question],
    rules: &[LogicRule],
    current: &str,
    answers: &AnswerSet,
) -> NextStep {
    let answer = answers.get(current);
    let triggered = by_priority(rules, |rule| {
        rule.source_question_id == current && rule.action.is_navigation()
    })
    .into_iter()
    .find(|rule| evaluate(rule, answer));

    if let Some(rule) = triggered {
        match (rule.action, &rule.target_question_id) {
            (LogicAction::EndSurvey, _) => {
                debug!(rule = %rule.id, current, "end_survey rule matched");
                return NextStep::EndOfSurvey;
            }
            (LogicAction::JumpTo, Some(target)) => {
                debug!(rule = %rule.id, current, target = %target, "jump rule matched");
                return NextStep::Question(target.clone());
            }
            _ => {
                debug!(rule = %rule.id, current, "jump rule has no target; falling through");
            }
        }
    }

    let visible = visible_questions(questions, rules, answers);
    visible
        .iter()
        .position(|id| id == current)
        .and_then(|index| visible.get(index + 1))
        .map(|id| NextStep::Question(id.clone()))
        .unwrap_or(NextStep::EndOfSurvey)
}

/// Returns true when any end-survey rule in the whole rule set holds.
///
/// The scan is not scoped to the current position: an answer given early in
/// the survey ends it whenever this is asked.
pub fn should_end_survey(rules: &[LogicRule], answers: &AnswerSet) -> bool {
    by_priority(rules, |rule| rule.action == LogicAction::EndSurvey)
        .into_iter()
        .any(|rule| evaluate(rule, answers.get(&rule.source_question_id)))
}
