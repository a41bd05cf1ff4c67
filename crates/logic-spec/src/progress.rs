use thiserror::Error;
use tracing::{debug, warn};

use crate::answers::AnswerSet;
use crate::navigation::{NextStep, next_question};
use crate::spec::question::{Question, QuestionId};
use crate::spec::rule::LogicRule;
use crate::visibility::visible_questions;

/// Step budget used when the caller configures none.
pub const DEFAULT_MAX_STEPS: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("navigation exceeded {limit} steps; the rule graph may contain a cycle")]
    StepLimitExceeded { limit: usize },
    #[error("session has not been started")]
    NotStarted,
    #[error("survey already ended")]
    Finished,
}

/// Per-respondent navigation state.
///
/// The engine has no cycle guard of its own, so every advance counts against
/// `max_steps` and the session refuses to move once the budget is spent.
#[derive(Debug, Clone)]
pub struct NavigationSession {
    max_steps: usize,
    steps_taken: usize,
    current: Option<QuestionId>,
    finished: bool,
    path: Vec<QuestionId>,
}

impl Default for NavigationSession {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_STEPS)
    }
}

impl NavigationSession {
    pub fn new(max_steps: usize) -> Self {
        Self {
            max_steps,
            steps_taken: 0,
            current: None,
            finished: false,
            path: Vec::new(),
        }
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn steps_taken(&self) -> usize {
        self.steps_taken
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Questions presented so far, in order.
    pub fn path(&self) -> &[QuestionId] {
        &self.path
    }

    /// Positions the session on the first visible question.
    pub fn start(
        &mut self,
        questions: &[Question],
        rules: &[LogicRule],
        answers: &AnswerSet,
    ) -> NextStep {
        self.steps_taken = 0;
        self.path.clear();
        let first = visible_questions(questions, rules, answers)
            .into_iter()
            .next()
            .map(NextStep::Question)
            .unwrap_or(NextStep::EndOfSurvey);
        self.apply(&first);
        first
    }

    pub fn advance(
        &mut self,
        questions: &[Question],
        rules: &[LogicRule],
        answers: &AnswerSet,
    ) -> Result<NextStep, SessionError> {
        if self.finished {
            return Err(SessionError::Finished);
        }
        let current = self.current.as_deref().ok_or(SessionError::NotStarted)?;
        if self.steps_taken >= self.max_steps {
            warn!(
                limit = self.max_steps,
                current, "navigation step limit reached"
            );
            return Err(SessionError::StepLimitExceeded {
                limit: self.max_steps,
            });
        }

        let next = next_question(questions, rules, current, answers);
        self.steps_taken += 1;
        debug!(step = self.steps_taken, from = current, to = ?next, "advanced");
        self.apply(&next);
        Ok(next)
    }

    fn apply(&mut self, step: &NextStep) {
        match step {
            NextStep::Question(id) => {
                self.current = Some(id.clone());
                self.finished = false;
                self.path.push(id.clone());
            }
            NextStep::EndOfSurvey => {
                self.current = None;
                self.finished = true;
            }
        }
    }
}

/// Follows navigation from the first visible question to the end for a fixed
/// answer snapshot, returning the questions presented.
pub fn walk(
    questions: &[Question],
    rules: &[LogicRule],
    answers: &AnswerSet,
    max_steps: usize,
) -> Result<Vec<QuestionId>, SessionError> {
    let mut session = NavigationSession::new(max_steps);
    let mut step = session.start(questions, rules, answers);
    while !step.is_end() {
        step = session.advance(questions, rules, answers)?;
    }
    Ok(session.path)
}
