//! Which operators the rule builder offers for each question type.
//!
//! Presentation data only; evaluation accepts any operator on any answer.

use crate::spec::question::QuestionType;
use crate::spec::rule::LogicOperator::{self, *};

const PRESENCE: &[LogicOperator] = &[IsAnswered, IsNotAnswered, IsEmpty, IsNotEmpty];

const TEXTUAL: &[LogicOperator] = &[
    Equals,
    NotEquals,
    Contains,
    NotContains,
    IsAnswered,
    IsNotAnswered,
    IsEmpty,
    IsNotEmpty,
];

const NUMERIC: &[LogicOperator] = &[
    Equals,
    NotEquals,
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
    IsAnswered,
    IsNotAnswered,
    IsEmpty,
    IsNotEmpty,
];

const TEMPORAL: &[LogicOperator] = &[
    Equals,
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
    IsAnswered,
    IsNotAnswered,
    IsEmpty,
    IsNotEmpty,
];

pub fn allowed_operators(kind: QuestionType) -> &'static [LogicOperator] {
    match kind {
        QuestionType::SingleChoice
        | QuestionType::MultipleChoice
        | QuestionType::Dropdown
        | QuestionType::Checkbox
        | QuestionType::YesNo
        | QuestionType::Text
        | QuestionType::LongText
        | QuestionType::ShortText
        | QuestionType::Email => TEXTUAL,
        QuestionType::Rating | QuestionType::Scale | QuestionType::Nps | QuestionType::Number => {
            NUMERIC
        }
        QuestionType::Date | QuestionType::DateTime => TEMPORAL,
        QuestionType::Matrix
        | QuestionType::FileUpload
        | QuestionType::Phone
        | QuestionType::Url
        | QuestionType::Ranking => PRESENCE,
    }
}

pub fn is_allowed(kind: QuestionType, operator: LogicOperator) -> bool {
    allowed_operators(kind).contains(&operator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_types_have_no_ordering() {
        assert!(is_allowed(QuestionType::Text, Contains));
        assert!(!is_allowed(QuestionType::Text, GreaterThan));
    }

    #[test]
    fn scales_and_dates_allow_ordering() {
        for kind in [QuestionType::Scale, QuestionType::Nps, QuestionType::Date] {
            assert!(is_allowed(kind, LessOrEqual), "{kind:?}");
        }
        assert!(!is_allowed(QuestionType::Date, NotEquals));
    }

    #[test]
    fn every_type_allows_presence_checks() {
        for kind in [QuestionType::Matrix, QuestionType::Email, QuestionType::Rating] {
            for operator in PRESENCE {
                assert!(is_allowed(kind, *operator));
            }
        }
    }
}
