use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::spec::question::{Question, QuestionId, QuestionType, ordered};
use crate::spec::rule::{LogicAction, LogicOperator, LogicRule};

/// A question as drawn in the builder's logic diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LogicNode {
    pub id: QuestionId,
    pub title: String,
    pub order: i32,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    /// Some rule governs this question.
    pub has_logic: bool,
    /// Some rule reads this question's answer.
    pub is_conditional: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LogicEdge {
    pub id: String,
    pub source_id: QuestionId,
    pub target_id: QuestionId,
    pub operator: LogicOperator,
    pub condition_value: String,
    pub action: LogicAction,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LogicMap {
    pub nodes: Vec<LogicNode>,
    pub edges: Vec<LogicEdge>,
}

pub fn build_logic_map(questions: &[Question], rules: &[LogicRule]) -> LogicMap {
    let governed: BTreeSet<&str> = rules.iter().map(|rule| rule.question_id.as_str()).collect();
    let sources: BTreeSet<&str> = rules
        .iter()
        .map(|rule| rule.source_question_id.as_str())
        .collect();

    let nodes = ordered(questions)
        .into_iter()
        .map(|question| LogicNode {
            id: question.id.clone(),
            title: question.display_title().to_string(),
            order: question.order,
            kind: question.kind,
            has_logic: governed.contains(question.id.as_str()),
            is_conditional: sources.contains(question.id.as_str()),
        })
        .collect();

    let edges = rules
        .iter()
        .map(|rule| {
            let target_id = match (&rule.action, &rule.target_question_id) {
                (LogicAction::JumpTo, Some(target)) => target.clone(),
                _ => rule.question_id.clone(),
            };
            LogicEdge {
                id: rule.id.clone(),
                source_id: rule.source_question_id.clone(),
                target_id,
                operator: rule.operator,
                condition_value: rule.condition_value.clone(),
                action: rule.action,
                label: edge_label(rule),
            }
        })
        .collect();

    LogicMap { nodes, edges }
}

/// e.g. `= 'yes' -> Jump to` or `is empty -> Hide`.
pub fn edge_label(rule: &LogicRule) -> String {
    let value = if rule.operator.requires_value() {
        format!(" '{}'", rule.condition_value)
    } else {
        String::new()
    };
    format!(
        "{}{} -> {}",
        rule.operator.symbol(),
        value,
        rule.action.label()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(action: LogicAction, operator: LogicOperator, target: Option<&str>) -> LogicRule {
        LogicRule {
            id: "r1".into(),
            question_id: "q3".into(),
            source_question_id: "q1".into(),
            target_question_id: target.map(str::to_string),
            operator,
            condition_value: "yes".into(),
            action,
            priority: 0,
        }
    }

    #[test]
    fn jump_edges_point_at_target() {
        let questions = vec![
            Question::new("q1", 1, QuestionType::YesNo).with_title("Continue?"),
            Question::new("q2", 2, QuestionType::Text),
            Question::new("q3", 3, QuestionType::Text),
        ];
        let map = build_logic_map(
            &questions,
            &[rule(LogicAction::JumpTo, LogicOperator::Equals, Some("q2"))],
        );
        assert_eq!(map.edges[0].target_id, "q2");
        assert_eq!(map.edges[0].label, "= 'yes' -> Jump to");
        assert_eq!(map.nodes[0].title, "Continue?");
        assert!(map.nodes[0].is_conditional);
        assert!(map.nodes[2].has_logic);
        assert!(!map.nodes[1].has_logic);
    }

    #[test]
    fn visibility_edges_point_at_governed_question() {
        let map = build_logic_map(&[], &[rule(LogicAction::Hide, LogicOperator::IsEmpty, None)]);
        assert_eq!(map.edges[0].target_id, "q3");
        assert_eq!(map.edges[0].label, "is empty -> Hide");
    }
}
