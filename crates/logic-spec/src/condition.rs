use std::cmp::Ordering;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::spec::rule::{LogicOperator, LogicRule};

/// Evaluates one rule's predicate against one (possibly absent) answer.
///
/// All comparisons ignore case. Ordering operators compare numerically when
/// both sides parse as decimals and fall back to an ordinal string comparison
/// otherwise, where an absent answer sorts before any value.
pub fn evaluate(rule: &LogicRule, answer: Option<&str>) -> bool {
    evaluate_operator(rule.operator, &rule.condition_value, answer)
}

pub fn evaluate_operator(operator: LogicOperator, condition: &str, answer: Option<&str>) -> bool {
    match operator {
        LogicOperator::Equals => equals(answer, condition),
        LogicOperator::NotEquals => !equals(answer, condition),
        LogicOperator::Contains => contains(answer, condition),
        LogicOperator::NotContains => !contains(answer, condition),
        LogicOperator::GreaterThan => compare(answer, condition) == Ordering::Greater,
        LogicOperator::LessThan => compare(answer, condition) == Ordering::Less,
        LogicOperator::GreaterOrEqual => compare(answer, condition) != Ordering::Less,
        LogicOperator::LessOrEqual => compare(answer, condition) != Ordering::Greater,
        LogicOperator::IsEmpty | LogicOperator::IsNotAnswered => is_blank(answer),
        LogicOperator::IsNotEmpty | LogicOperator::IsAnswered => !is_blank(answer),
    }
}

fn fold(text: &str) -> String {
    text.to_uppercase()
}

fn equals(answer: Option<&str>, condition: &str) -> bool {
    answer.is_some_and(|answer| fold(answer) == fold(condition))
}

fn contains(answer: Option<&str>, condition: &str) -> bool {
    answer.is_some_and(|answer| fold(answer).contains(&fold(condition)))
}

fn is_blank(answer: Option<&str>) -> bool {
    answer.is_none_or(|answer| answer.trim().is_empty())
}

/// Plain decimal notation only; exponents and out-of-range values fall back
/// to text comparison.
fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str(text.trim()).ok()
}

fn compare(answer: Option<&str>, condition: &str) -> Ordering {
    if let Some(left) = answer.and_then(parse_decimal)
        && let Some(right) = parse_decimal(condition)
    {
        return left.cmp(&right);
    }
    match answer {
        Some(answer) => fold(answer).cmp(&fold(condition)),
        None => Ordering::Less,
    }
}
