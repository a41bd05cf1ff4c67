use logic_spec::{AnswerSet, Question, QuestionType};

/// Controls which bits of state the runner prints.
#[derive(Copy, Clone, Eq, PartialEq)]
pub enum Verbosity {
    /// Clean output: question prompts only.
    Clean,
    /// Verbose output: visible questions and end-rule status.
    Verbose,
}

impl Verbosity {
    pub fn from_verbose(verbose: bool) -> Self {
        if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Clean
        }
    }

    pub fn is_verbose(&self) -> bool {
        matches!(self, Verbosity::Verbose)
    }
}

/// Prints prompts and progress while a respondent walks the survey.
pub struct WizardPresenter {
    verbosity: Verbosity,
    header_printed: bool,
}

impl WizardPresenter {
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            header_printed: false,
        }
    }

    pub fn show_header(&mut self, title: &str) {
        if self.header_printed {
            return;
        }
        println!("Survey: {}", title);
        self.header_printed = true;
    }

    pub fn show_status(&self, visible: &[String], should_end: bool) {
        if !self.verbosity.is_verbose() {
            return;
        }
        println!("Visible questions: {}", visible.join(", "));
        if should_end {
            println!("An end-survey rule is triggered by the current answers.");
        }
    }

    pub fn show_prompt(&self, prompt: &PromptContext) {
        let mut line = format!("{}. {}", prompt.index, prompt.title);
        if let Some(hint) = &prompt.hint {
            line.push(' ');
            line.push_str(hint);
        }
        println!("{}", line);
    }

    pub fn show_completion(&self, answers: &AnswerSet, path: &[String]) {
        println!("Done ✅");
        println!("Path: {}", path.join(" -> "));
        if self.verbosity.is_verbose() {
            for (question_id, value) in answers.iter() {
                println!("  {} = {}", question_id, value.unwrap_or("<blank>"));
            }
        }
    }
}

/// Context used to format a single prompt.
pub struct PromptContext {
    pub index: usize,
    pub title: String,
    pub hint: Option<String>,
}

impl PromptContext {
    pub fn new(question: &Question, index: usize) -> Self {
        Self {
            index: index.max(1),
            title: question.display_title().to_string(),
            hint: hint_for(question.kind),
        }
    }
}

fn hint_for(kind: QuestionType) -> Option<String> {
    let hint = match kind {
        QuestionType::YesNo => "(yes/no)",
        QuestionType::Nps => "(0-10)",
        QuestionType::Rating | QuestionType::Scale | QuestionType::Number => "(number)",
        QuestionType::Date => "(YYYY-MM-DD)",
        QuestionType::DateTime => "(YYYY-MM-DDThh:mm)",
        QuestionType::MultipleChoice | QuestionType::Checkbox | QuestionType::Ranking => {
            "(comma separated)"
        }
        _ => return None,
    };
    Some(hint.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_uses_title_and_hint() {
        let question = Question::new("q1", 1, QuestionType::Nps).with_title("Recommend us?");
        let prompt = PromptContext::new(&question, 0);
        assert_eq!(prompt.index, 1);
        assert_eq!(prompt.title, "Recommend us?");
        assert_eq!(prompt.hint.as_deref(), Some("(0-10)"));
    }

    #[test]
    fn free_text_has_no_hint() {
        let question = Question::new("q1", 1, QuestionType::LongText);
        assert!(PromptContext::new(&question, 3).hint.is_none());
        assert_eq!(PromptContext::new(&question, 3).title, "q1");
    }
}
