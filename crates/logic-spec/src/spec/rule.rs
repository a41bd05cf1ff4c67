use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::spec::question::QuestionId;

/// Comparison applied to the source question's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum LogicOperator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    GreaterThan,
    LessThan,
    GreaterOrEqual,
    LessOrEqual,
    IsEmpty,
    IsNotEmpty,
    IsAnswered,
    IsNotAnswered,
}

impl LogicOperator {
    /// Presence operators ignore the condition value; everything else needs one.
    pub fn requires_value(&self) -> bool {
        !matches!(
            self,
            LogicOperator::IsEmpty
                | LogicOperator::IsNotEmpty
                | LogicOperator::IsAnswered
                | LogicOperator::IsNotAnswered
        )
    }

    /// Short label used in logic-map edges.
    pub fn symbol(&self) -> &'static str {
        match self {
            LogicOperator::Equals => "=",
            LogicOperator::NotEquals => "≠",
            LogicOperator::Contains => "contains",
            LogicOperator::NotContains => "not contains",
            LogicOperator::GreaterThan => ">",
            LogicOperator::LessThan => "<",
            LogicOperator::GreaterOrEqual => "≥",
            LogicOperator::LessOrEqual => "≤",
            LogicOperator::IsEmpty => "is empty",
            LogicOperator::IsNotEmpty => "is not empty",
            LogicOperator::IsAnswered => "is answered",
            LogicOperator::IsNotAnswered => "is not answered",
        }
    }
}

/// Effect of a rule whose condition holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum LogicAction {
    Show,
    Hide,
    JumpTo,
    EndSurvey,
}

impl LogicAction {
    pub fn label(&self) -> &'static str {
        match self {
            LogicAction::Show => "Show",
            LogicAction::Hide => "Hide",
            LogicAction::JumpTo => "Jump to",
            LogicAction::EndSurvey => "End Survey",
        }
    }

    /// Jump and end actions drive navigation; show and hide drive visibility.
    pub fn is_navigation(&self) -> bool {
        matches!(self, LogicAction::JumpTo | LogicAction::EndSurvey)
    }
}

/// Builder-side problems with a single rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("question id must not be empty")]
    QuestionIdEmpty,
    #[error("source question id must not be empty")]
    SourceQuestionIdEmpty,
    #[error("jump_to rules require a target question")]
    TargetRequiredForJump,
    #[error("operator {0:?} requires a condition value")]
    ConditionValueRequired(LogicOperator),
    #[error("priority must not be negative (got {0})")]
    NegativePriority(i32),
}

/// A conditional branching or visibility directive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LogicRule {
    pub id: String,
    /// Question whose visibility this rule governs.
    pub question_id: QuestionId,
    /// Question whose answer is tested.
    pub source_question_id: QuestionId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_question_id: Option<QuestionId>,
    pub operator: LogicOperator,
    #[serde(default)]
    pub condition_value: String,
    pub action: LogicAction,
    /// Lower evaluates first.
    #[serde(default)]
    pub priority: i32,
}

impl LogicRule {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        question_id: impl Into<QuestionId>,
        source_question_id: impl Into<QuestionId>,
        operator: LogicOperator,
        condition_value: impl Into<String>,
        action: LogicAction,
        target_question_id: Option<QuestionId>,
        priority: i32,
    ) -> Result<Self, RuleError> {
        let rule = Self {
            id: id.into(),
            question_id: question_id.into(),
            source_question_id: source_question_id.into(),
            target_question_id,
            operator,
            condition_value: condition_value.into(),
            action,
            priority,
        };
        rule.check()?;
        Ok(rule)
    }

    pub fn check(&self) -> Result<(), RuleError> {
        if self.question_id.trim().is_empty() {
            return Err(RuleError::QuestionIdEmpty);
        }
        if self.source_question_id.trim().is_empty() {
            return Err(RuleError::SourceQuestionIdEmpty);
        }
        if self.action == LogicAction::JumpTo && self.target_question_id.is_none() {
            return Err(RuleError::TargetRequiredForJump);
        }
        if self.operator.requires_value() && self.condition_value.trim().is_empty() {
            return Err(RuleError::ConditionValueRequired(self.operator));
        }
        if self.priority < 0 {
            return Err(RuleError::NegativePriority(self.priority));
        }
        Ok(())
    }

    /// Changes the action; only jumps keep a target.
    pub fn set_action(
        &mut self,
        action: LogicAction,
        target_question_id: Option<QuestionId>,
    ) -> Result<(), RuleError> {
        if action == LogicAction::JumpTo && target_question_id.is_none() {
            return Err(RuleError::TargetRequiredForJump);
        }
        self.action = action;
        self.target_question_id = if action == LogicAction::JumpTo {
            target_question_id
        } else {
            None
        };
        Ok(())
    }
}

/// Runs [`LogicRule::check`] over every rule and collects the failures.
pub fn check_rules(rules: &[LogicRule]) -> Vec<String> {
    rules
        .iter()
        .filter_map(|rule| {
            rule.check()
                .err()
                .map(|err| format!("rule {}: {}", rule.id, err))
        })
        .collect()
}

/// Reassigns priorities `0..n` following `ordered_ids`.
///
/// Rules missing from `ordered_ids` are placed after the listed ones, keeping
/// their previous relative order.
pub fn reorder_priorities(rules: &mut [LogicRule], ordered_ids: &[String]) {
    let rank = |rule: &LogicRule| {
        ordered_ids
            .iter()
            .position(|id| *id == rule.id)
            .unwrap_or(ordered_ids.len())
    };
    rules.sort_by_key(|rule| (rank(rule), rule.priority));
    for (index, rule) in rules.iter_mut().enumerate() {
        rule.priority = i32::try_from(index).unwrap_or(i32::MAX);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jump(id: &str, priority: i32) -> LogicRule {
        LogicRule {
            id: id.into(),
            question_id: "q1".into(),
            source_question_id: "q1".into(),
            target_question_id: Some("q3".into()),
            operator: LogicOperator::Equals,
            condition_value: "yes".into(),
            action: LogicAction::JumpTo,
            priority,
        }
    }

    #[test]
    fn new_rejects_jump_without_target() {
        let err = LogicRule::new(
            "r1",
            "q2",
            "q1",
            LogicOperator::Equals,
            "yes",
            LogicAction::JumpTo,
            None,
            0,
        )
        .unwrap_err();
        assert_eq!(err, RuleError::TargetRequiredForJump);
    }

    #[test]
    fn presence_operators_accept_blank_value() {
        let rule = LogicRule::new(
            "r1",
            "q2",
            "q1",
            LogicOperator::IsAnswered,
            "",
            LogicAction::Show,
            None,
            0,
        );
        assert!(rule.is_ok());

        let err = LogicRule::new(
            "r2",
            "q2",
            "q1",
            LogicOperator::Contains,
            "  ",
            LogicAction::Show,
            None,
            0,
        )
        .unwrap_err();
        assert_eq!(
            err,
            RuleError::ConditionValueRequired(LogicOperator::Contains)
        );
    }

    #[test]
    fn set_action_drops_target_for_non_jump() {
        let mut rule = jump("r1", 0);
        rule.set_action(LogicAction::EndSurvey, Some("q9".into()))
            .expect("end survey needs no target");
        assert_eq!(rule.target_question_id, None);
    }

    #[test]
    fn check_rules_reports_each_failure() {
        let mut bad = jump("r2", -1);
        bad.condition_value.clear();
        let errors = check_rules(&[jump("r1", 0), bad, jump("r3", -4)]);
        assert_eq!(errors.len(), 2);
        assert!(errors[0].starts_with("rule r2:"));
        assert!(errors[1].contains("negative"));
    }

    #[test]
    fn reorder_follows_given_ids() {
        let mut rules = vec![jump("a", 0), jump("b", 1), jump("c", 2)];
        reorder_priorities(&mut rules, &["c".to_string(), "a".to_string()]);
        let order: Vec<_> = rules
            .iter()
            .map(|rule| (rule.id.as_str(), rule.priority))
            .collect();
        assert_eq!(order, vec![("c", 0), ("a", 1), ("b", 2)]);
    }
}
