use serde_json::{Value, json};

use crate::evaluation::LogicEvaluation;
use crate::navigation::NextStep;
use crate::spec::question::{Question, ordered};

/// Status labels returned by the renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStatus {
    /// A further question is pending.
    NeedInput,
    /// Navigation reached the end of the survey.
    Complete,
}

impl RenderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderStatus::NeedInput => "need_input",
            RenderStatus::Complete => "complete",
        }
    }

    pub fn from_evaluation(evaluation: &LogicEvaluation) -> Self {
        match &evaluation.next {
            Some(NextStep::Question(_)) => RenderStatus::NeedInput,
            Some(NextStep::EndOfSurvey) => RenderStatus::Complete,
            None if evaluation.should_end_survey => RenderStatus::Complete,
            None => RenderStatus::NeedInput,
        }
    }
}

/// Render an evaluation as a structured JSON value.
pub fn render_json(evaluation: &LogicEvaluation) -> Value {
    json!({
        "status": RenderStatus::from_evaluation(evaluation).as_str(),
        "visible_question_ids": evaluation.visible_question_ids,
        "hidden_question_ids": evaluation.hidden_question_ids,
        "next_question_id": evaluation.next.as_ref().and_then(NextStep::question_id),
        "end_of_survey": evaluation.next.as_ref().is_some_and(NextStep::is_end),
        "should_end_survey": evaluation.should_end_survey,
    })
}

/// Render an evaluation as human-friendly text.
pub fn render_text(evaluation: &LogicEvaluation, questions: &[Question]) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "Status: {} ({} visible, {} hidden)",
        RenderStatus::from_evaluation(evaluation).as_str(),
        evaluation.visible_question_ids.len(),
        evaluation.hidden_question_ids.len()
    ));

    match &evaluation.next {
        Some(NextStep::Question(id)) => lines.push(format!("Next question: {}", id)),
        Some(NextStep::EndOfSurvey) => lines.push("Next question: end of survey".to_string()),
        None => {}
    }
    if evaluation.should_end_survey {
        lines.push("An end-survey rule is triggered.".to_string());
    }

    lines.push("Questions:".to_string());
    for question in ordered(questions) {
        let marker = if evaluation.visible_question_ids.contains(&question.id) {
            "visible"
        } else {
            "hidden"
        };
        lines.push(format!(
            " - {} ({}) [{}]",
            question.id,
            question.display_title(),
            marker
        ));
    }

    lines.join("\n")
}
