use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Identifier shared by questions and rules.
pub type QuestionId = String;

/// Supported question kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    SingleChoice,
    MultipleChoice,
    Text,
    LongText,
    Rating,
    Scale,
    Matrix,
    Date,
    DateTime,
    FileUpload,
    YesNo,
    Dropdown,
    Nps,
    Checkbox,
    Number,
    ShortText,
    Email,
    Phone,
    Url,
    Ranking,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::SingleChoice => "single_choice",
            QuestionType::MultipleChoice => "multiple_choice",
            QuestionType::Text => "text",
            QuestionType::LongText => "long_text",
            QuestionType::Rating => "rating",
            QuestionType::Scale => "scale",
            QuestionType::Matrix => "matrix",
            QuestionType::Date => "date",
            QuestionType::DateTime => "date_time",
            QuestionType::FileUpload => "file_upload",
            QuestionType::YesNo => "yes_no",
            QuestionType::Dropdown => "dropdown",
            QuestionType::Nps => "nps",
            QuestionType::Checkbox => "checkbox",
            QuestionType::Number => "number",
            QuestionType::ShortText => "short_text",
            QuestionType::Email => "email",
            QuestionType::Phone => "phone",
            QuestionType::Url => "url",
            QuestionType::Ranking => "ranking",
        }
    }
}

/// A single survey question as seen by the logic engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Question {
    pub id: QuestionId,
    /// Position within the survey; unique per survey.
    pub order: i32,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Question {
    pub fn new(id: impl Into<QuestionId>, order: i32, kind: QuestionType) -> Self {
        Self {
            id: id.into(),
            order,
            kind,
            title: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Title for display, falling back to the identifier.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.id)
    }
}

/// Returns the questions sorted by `order`; ties keep their input order.
pub fn ordered(questions: &[Question]) -> Vec<&Question> {
    let mut sorted: Vec<&Question> = questions.iter().collect();
    sorted.sort_by_key(|question| question.order);
    sorted
}
