use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use thiserror::Error;
use tracing::debug;

use logic_spec::{
    AnswerSet, DEFAULT_MAX_STEPS, QuestionType, SessionError, SurveySpec, allowed_operators,
    build_logic_map, check_rules, evaluate_logic, next_question, render_json, validate,
    visible_questions, walk as walk_path,
};

const DEFAULT_SURVEY: &str = include_str!("../../logic-spec/tests/fixtures/branching_survey.json");

#[derive(Debug, Error)]
enum ComponentError {
    #[error("failed to parse config/{0}")]
    ConfigParse(#[source] serde_json::Error),
    #[error("survey '{0}' is not available")]
    SurveyUnavailable(String),
    #[error("question '{0}' is not part of the survey")]
    UnknownQuestion(String),
    #[error("unknown question type '{0}'")]
    UnknownQuestionType(String),
    #[error("json encode error: {0}")]
    JsonEncode(#[source] serde_json::Error),
    #[error("navigation failed: {0}")]
    Session(#[from] SessionError),
}

#[derive(Debug, Deserialize, Serialize, Default)]
struct ComponentConfig {
    #[serde(default)]
    survey_json: Option<String>,
    #[serde(default)]
    max_steps: Option<usize>,
}

fn parse_config(config_json: &str) -> Result<ComponentConfig, ComponentError> {
    if config_json.trim().is_empty() {
        Ok(ComponentConfig::default())
    } else {
        serde_json::from_str(config_json).map_err(ComponentError::ConfigParse)
    }
}

fn load_survey(config: &ComponentConfig) -> Result<SurveySpec, ComponentError> {
    let survey_json = config.survey_json.as_deref().unwrap_or(DEFAULT_SURVEY);
    serde_json::from_str(survey_json).map_err(ComponentError::ConfigParse)
}

fn ensure_survey(survey_id: &str, config_json: &str) -> Result<SurveySpec, ComponentError> {
    let survey = load_survey(&parse_config(config_json)?)?;
    if survey.id != survey_id {
        Err(ComponentError::SurveyUnavailable(survey_id.to_string()))
    } else {
        Ok(survey)
    }
}

fn ensure_question(survey: &SurveySpec, question_id: &str) -> Result<(), ComponentError> {
    match survey.question(question_id) {
        Some(_) => Ok(()),
        None => Err(ComponentError::UnknownQuestion(question_id.to_string())),
    }
}

fn parse_answers(answers_json: &str) -> AnswerSet {
    serde_json::from_str(answers_json).unwrap_or_default()
}

fn respond(result: Result<Value, ComponentError>) -> String {
    match result {
        Ok(value) => serde_json::to_string(&value).unwrap_or_else(|error| {
            json!({"error": format!("json encode: {}", error)}).to_string()
        }),
        Err(err) => json!({ "error": err.to_string() }).to_string(),
    }
}

pub fn describe(survey_id: &str, config_json: &str) -> String {
    respond(
        ensure_survey(survey_id, config_json)
            .and_then(|survey| serde_json::to_value(survey).map_err(ComponentError::JsonEncode)),
    )
}

/// Combined visibility and navigation view; `current_question_id` may be empty.
pub fn evaluate(
    survey_id: &str,
    config_json: &str,
    answers_json: &str,
    current_question_id: &str,
) -> String {
    respond(ensure_survey(survey_id, config_json).and_then(|survey| {
        let current = Some(current_question_id).filter(|id| !id.trim().is_empty());
        if let Some(current) = current {
            ensure_question(&survey, current)?;
        }
        let answers = parse_answers(answers_json);
        let evaluation = evaluate_logic(&survey.questions, &survey.rules, &answers, current);
        Ok(render_json(&evaluation))
    }))
}

pub fn visible(survey_id: &str, config_json: &str, answers_json: &str) -> String {
    respond(ensure_survey(survey_id, config_json).map(|survey| {
        let answers = parse_answers(answers_json);
        json!({
            "visible_question_ids": visible_questions(&survey.questions, &survey.rules, &answers),
        })
    }))
}

pub fn next(
    survey_id: &str,
    config_json: &str,
    current_question_id: &str,
    answers_json: &str,
) -> String {
    respond(ensure_survey(survey_id, config_json).and_then(|survey| {
        ensure_question(&survey, current_question_id)?;
        let answers = parse_answers(answers_json);
        let step = next_question(&survey.questions, &survey.rules, current_question_id, &answers);
        debug!(survey = %survey.id, current = current_question_id, ?step, "next resolved");
        Ok(json!({
            "status": if step.is_end() { "complete" } else { "need_input" },
            "next_question_id": step.question_id(),
        }))
    }))
}

/// Graph validation plus per-rule builder checks for the configured survey.
pub fn validate_rules(survey_id: &str, config_json: &str) -> String {
    respond(ensure_survey(survey_id, config_json).and_then(|survey| {
        let result = validate(&survey.rules, &survey.questions);
        let mut value = serde_json::to_value(&result).map_err(ComponentError::JsonEncode)?;
        if let Some(map) = value.as_object_mut() {
            map.insert("rule_errors".into(), json!(check_rules(&survey.rules)));
        }
        Ok(value)
    }))
}

pub fn logic_map(survey_id: &str, config_json: &str) -> String {
    respond(ensure_survey(survey_id, config_json).and_then(|survey| {
        serde_json::to_value(build_logic_map(&survey.questions, &survey.rules))
            .map_err(ComponentError::JsonEncode)
    }))
}

pub fn operators(question_type: &str) -> String {
    respond(
        serde_json::from_value::<QuestionType>(Value::String(question_type.to_string()))
            .map_err(|_| ComponentError::UnknownQuestionType(question_type.to_string()))
            .and_then(|kind| {
                let operators = allowed_operators(kind)
                    .iter()
                    .map(|operator| -> Result<Value, ComponentError> {
                        let mut map = Map::new();
                        map.insert(
                            "operator".into(),
                            serde_json::to_value(operator).map_err(ComponentError::JsonEncode)?,
                        );
                        map.insert("symbol".into(), Value::String(operator.symbol().into()));
                        map.insert("requires_value".into(), Value::Bool(operator.requires_value()));
                        Ok(Value::Object(map))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(json!({ "type": kind.as_str(), "operators": operators }))
            }),
    )
}

/// Preview traversal for a fixed answer snapshot, bounded by `max_steps`.
pub fn walk(survey_id: &str, config_json: &str, answers_json: &str) -> String {
    respond(parse_config(config_json).and_then(|config| {
        let survey = ensure_survey(survey_id, config_json)?;
        let answers = parse_answers(answers_json);
        let limit = config.max_steps.unwrap_or(DEFAULT_MAX_STEPS);
        let path = walk_path(&survey.questions, &survey.rules, &answers, limit)?;
        let steps = path.len();
        Ok(json!({ "path": path, "steps": steps }))
    }))
}
