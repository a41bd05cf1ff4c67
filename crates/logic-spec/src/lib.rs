#![allow(missing_docs)]

pub mod answers;
pub mod condition;
pub mod evaluation;
pub mod logic_map;
pub mod navigation;
pub mod operators;
pub mod progress;
pub mod render;
pub mod spec;
pub mod validate;
pub mod visibility;

pub use answers::{AnswerSet, ValidationResult};
pub use condition::evaluate;
pub use evaluation::{LogicEvaluation, evaluate_logic};
pub use logic_map::{LogicEdge, LogicMap, LogicNode, build_logic_map};
pub use navigation::{NextStep, next_question, should_end_survey};
pub use operators::{allowed_operators, is_allowed};
pub use progress::{DEFAULT_MAX_STEPS, NavigationSession, SessionError, walk};
pub use render::{RenderStatus, render_json, render_text};
pub use spec::{
    LogicAction, LogicOperator, LogicRule, Question, QuestionId, QuestionType, RuleError,
    SurveySpec, check_rules, reorder_priorities,
};
pub use validate::validate;
pub use visibility::{VisibilityMap, resolve_visibility, visible_questions};
