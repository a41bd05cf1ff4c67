use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Snapshot of respondent answers keyed by question id.
///
/// Values are always strings; `None` marks a question that is present but
/// unanswered. The engine only reads this map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, Value>",
    into = "BTreeMap<String, Option<String>>"
)]
pub struct AnswerSet {
    answers: BTreeMap<String, Option<String>>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, question_id: impl Into<String>, value: impl Into<String>) {
        self.answers.insert(question_id.into(), Some(value.into()));
    }

    pub fn clear(&mut self, question_id: impl Into<String>) {
        self.answers.insert(question_id.into(), None);
    }

    /// Answer for the question, or `None` when absent or unanswered.
    pub fn get(&self, question_id: &str) -> Option<&str> {
        self.answers.get(question_id).and_then(|value| value.as_deref())
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.answers
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_deref()))
    }
}

impl<K, V> FromIterator<(K, V)> for AnswerSet
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let answers = iter
            .into_iter()
            .map(|(key, value)| (key.into(), Some(value.into())))
            .collect();
        Self { answers }
    }
}

impl From<BTreeMap<String, Value>> for AnswerSet {
    fn from(raw: BTreeMap<String, Value>) -> Self {
        let answers = raw
            .into_iter()
            .map(|(key, value)| (key, answer_text(&value)))
            .collect();
        Self { answers }
    }
}

impl From<AnswerSet> for BTreeMap<String, Option<String>> {
    fn from(set: AnswerSet) -> Self {
        set.answers
    }
}

/// Normalises a JSON answer to the string form the evaluator compares.
fn answer_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(num) => Some(num.to_string()),
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(answer_text)
                .collect::<Vec<_>>()
                .join(","),
        ),
        other => Some(other.to_string()),
    }
}

/// Outcome of rule-graph validation. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    /// Distinct messages in discovery order.
    #[serde(default)]
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn from_errors(errors: Vec<String>) -> Self {
        let mut distinct: Vec<String> = Vec::with_capacity(errors.len());
        for error in errors {
            if !distinct.contains(&error) {
                distinct.push(error);
            }
        }
        Self {
            is_valid: distinct.is_empty(),
            errors: distinct,
        }
    }
}
