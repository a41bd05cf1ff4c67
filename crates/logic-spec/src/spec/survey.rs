use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::spec::question::Question;
use crate::spec::rule::LogicRule;

/// Questions and rules of one survey, as loaded by callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SurveySpec {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub questions: Vec<Question>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<LogicRule>,
}

impl SurveySpec {
    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|question| question.id == id)
    }
}
