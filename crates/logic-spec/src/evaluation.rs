use serde::{Deserialize, Serialize};

use crate::answers::AnswerSet;
use crate::navigation::{NextStep, next_question, should_end_survey};
use crate::spec::question::{Question, QuestionId, ordered};
use crate::spec::rule::LogicRule;
use crate::visibility::visible_questions;

/// Everything a renderer needs for one step, computed in a single pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogicEvaluation {
    pub visible_question_ids: Vec<QuestionId>,
    pub hidden_question_ids: Vec<QuestionId>,
    /// Only present when a current question was supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<NextStep>,
    pub should_end_survey: bool,
}

pub fn evaluate_logic(
    questions: &[Question],
    rules: &[LogicRule],
    answers: &AnswerSet,
    current: Option<&str>,
) -> LogicEvaluation {
    let visible_question_ids = visible_questions(questions, rules, answers);
    let hidden_question_ids = ordered(questions)
        .into_iter()
        .filter(|question| !visible_question_ids.contains(&question.id))
        .map(|question| question.id.clone())
        .collect();

    LogicEvaluation {
        visible_question_ids,
        hidden_question_ids,
        next: current.map(|current| next_question(questions, rules, current, answers)),
        should_end_survey: should_end_survey(rules, answers),
    }
}
