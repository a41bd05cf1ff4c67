pub mod question;
pub mod rule;
pub mod survey;

pub use question::{Question, QuestionId, QuestionType, ordered};
pub use rule::{LogicAction, LogicOperator, LogicRule, RuleError, check_rules, reorder_priorities};
pub use survey::SurveySpec;
