mod wizard;

use clap::{Parser, Subcommand, ValueEnum};
use component_logic::{logic_map as component_logic_map, operators as component_operators};
use logic_spec::{
    AnswerSet, DEFAULT_MAX_STEPS, NavigationSession, NextStep, SurveySpec, ValidationResult,
    check_rules, evaluate_logic, next_question, render_json, render_text, should_end_survey,
    validate, visible_questions, walk,
};
use serde_json::{Value, json};
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wizard::{PromptContext, Verbosity, WizardPresenter};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

const MAX_STEPS_ENV: &str = "SURVEY_LOGIC_MAX_STEPS";

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Survey branching logic CLI",
    long_about = "Evaluates visibility and navigation for a survey, validates rule graphs, and runs surveys interactively"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Show visible/hidden questions, the next question and the end-survey flag.
    Evaluate {
        /// Path to the survey JSON (questions and rules).
        #[arg(long, value_name = "SURVEY")]
        survey: PathBuf,
        /// Optional JSON file containing the answers collected so far.
        #[arg(long, value_name = "ANSWERS")]
        answers: Option<PathBuf>,
        /// Question the respondent is currently on.
        #[arg(long, value_name = "QUESTION")]
        current: Option<String>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Resolve the question that follows the current one.
    Next {
        #[arg(long, value_name = "SURVEY")]
        survey: PathBuf,
        #[arg(long, value_name = "ANSWERS")]
        answers: Option<PathBuf>,
        #[arg(long, value_name = "QUESTION")]
        current: String,
    },
    /// Follow navigation from the first question to the end for fixed answers.
    Walk {
        #[arg(long, value_name = "SURVEY")]
        survey: PathBuf,
        #[arg(long, value_name = "ANSWERS")]
        answers: Option<PathBuf>,
        /// Step budget (defaults to SURVEY_LOGIC_MAX_STEPS or 500).
        #[arg(long)]
        max_steps: Option<usize>,
    },
    /// Answer the survey interactively, one visible question at a time.
    Run {
        #[arg(long, value_name = "SURVEY")]
        survey: PathBuf,
        /// Optional JSON file with answers to pre-fill.
        #[arg(long, value_name = "ANSWERS")]
        answers: Option<PathBuf>,
        #[arg(long)]
        max_steps: Option<usize>,
        /// Show visible questions and end-rule status after each answer.
        #[arg(long, alias = "debug")]
        verbose: bool,
    },
    /// Check the rule graph for cycles, self references and unknown questions.
    Validate {
        #[arg(long, value_name = "SURVEY")]
        survey: PathBuf,
    },
    /// Print the logic map (nodes and labelled edges) as JSON.
    Map {
        #[arg(long, value_name = "SURVEY")]
        survey: PathBuf,
    },
    /// List the operators the rule builder offers for a question type.
    Operators {
        /// Question type, e.g. `nps` or `single_choice`.
        #[arg(value_name = "TYPE")]
        question_type: String,
    },
    /// Print the JSON schema of the survey document.
    Schema,
}

fn main() -> CliResult<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Evaluate {
            survey,
            answers,
            current,
            format,
        } => run_evaluate(survey, answers, current, format),
        Command::Next {
            survey,
            answers,
            current,
        } => run_next(survey, answers, current),
        Command::Walk {
            survey,
            answers,
            max_steps,
        } => run_walk(survey, answers, max_steps),
        Command::Run {
            survey,
            answers,
            max_steps,
            verbose,
        } => run_interactive(survey, answers, max_steps, verbose),
        Command::Validate { survey } => run_validate(survey),
        Command::Map { survey } => run_map(survey),
        Command::Operators { question_type } => run_operators(&question_type),
        Command::Schema => {
            let schema = schemars::schema_for!(SurveySpec);
            println!("{}", serde_json::to_string_pretty(&schema)?);
            Ok(())
        }
    }
}

fn load_survey(path: &Path) -> CliResult<SurveySpec> {
    let contents = fs::read_to_string(path)?;
    let survey: SurveySpec = serde_json::from_str(&contents)?;
    debug!(
        path = %path.display(),
        questions = survey.questions.len(),
        rules = survey.rules.len(),
        "survey loaded"
    );
    Ok(survey)
}

fn load_answers(path: Option<&Path>) -> CliResult<AnswerSet> {
    match path {
        Some(path) => {
            let contents = fs::read_to_string(path)?;
            Ok(serde_json::from_str(&contents)?)
        }
        None => Ok(AnswerSet::new()),
    }
}

fn ensure_question(survey: &SurveySpec, question_id: &str) -> CliResult<()> {
    if survey.question(question_id).is_none() {
        return Err(format!("question '{}' is not part of survey '{}'", question_id, survey.id).into());
    }
    Ok(())
}

/// Flag value, then `SURVEY_LOGIC_MAX_STEPS`, then the built-in default.
fn resolve_max_steps(flag: Option<usize>) -> CliResult<usize> {
    if let Some(limit) = flag {
        return Ok(limit);
    }
    match env::var(MAX_STEPS_ENV) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<usize>()
            .map_err(|_| format!("{} must be a positive integer, got '{}'", MAX_STEPS_ENV, raw).into()),
        _ => Ok(DEFAULT_MAX_STEPS),
    }
}

fn run_evaluate(
    survey_path: PathBuf,
    answers_path: Option<PathBuf>,
    current: Option<String>,
    format: OutputFormat,
) -> CliResult<()> {
    let survey = load_survey(&survey_path)?;
    let answers = load_answers(answers_path.as_deref())?;
    if let Some(current) = &current {
        ensure_question(&survey, current)?;
    }

    let evaluation = evaluate_logic(
        &survey.questions,
        &survey.rules,
        &answers,
        current.as_deref(),
    );
    match format {
        OutputFormat::Text => println!("{}", render_text(&evaluation, &survey.questions)),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&render_json(&evaluation))?)
        }
    }
    Ok(())
}

fn run_next(survey_path: PathBuf, answers_path: Option<PathBuf>, current: String) -> CliResult<()> {
    let survey = load_survey(&survey_path)?;
    let answers = load_answers(answers_path.as_deref())?;
    ensure_question(&survey, &current)?;

    match next_question(&survey.questions, &survey.rules, &current, &answers) {
        NextStep::Question(id) => println!("Next question: {}", id),
        NextStep::EndOfSurvey => println!("Next question: end of survey"),
    }
    Ok(())
}

fn run_walk(
    survey_path: PathBuf,
    answers_path: Option<PathBuf>,
    max_steps: Option<usize>,
) -> CliResult<()> {
    let survey = load_survey(&survey_path)?;
    let answers = load_answers(answers_path.as_deref())?;
    let limit = resolve_max_steps(max_steps)?;

    let path = walk(&survey.questions, &survey.rules, &answers, limit)
        .map_err(|err| format!("walk failed: {}", err))?;
    println!("Path: {}", path.join(" -> "));
    Ok(())
}

fn run_interactive(
    survey_path: PathBuf,
    answers_path: Option<PathBuf>,
    max_steps: Option<usize>,
    verbose: bool,
) -> CliResult<()> {
    let survey = load_survey(&survey_path)?;
    let mut answers = load_answers(answers_path.as_deref())?;
    let mut session = NavigationSession::new(resolve_max_steps(max_steps)?);
    let mut presenter = WizardPresenter::new(Verbosity::from_verbose(verbose));
    presenter.show_header(&survey.title);

    let mut step = session.start(&survey.questions, &survey.rules, &answers);
    while let NextStep::Question(question_id) = step {
        let question = survey
            .question(&question_id)
            .ok_or_else(|| format!("navigation returned unknown question '{}'", question_id))?;
        presenter.show_prompt(&PromptContext::new(question, session.path().len()));

        let raw = prompt_answer()?;
        if raw.eq_ignore_ascii_case("exit") {
            return Err("survey aborted by user".into());
        }
        if raw.is_empty() {
            answers.clear(question_id.as_str());
        } else {
            answers.insert(question_id.as_str(), raw);
        }

        presenter.show_status(
            &visible_questions(&survey.questions, &survey.rules, &answers),
            should_end_survey(&survey.rules, &answers),
        );
        step = session
            .advance(&survey.questions, &survey.rules, &answers)
            .map_err(|err| format!("navigation stopped: {}", err))?;
    }

    presenter.show_completion(&answers, session.path());
    Ok(())
}

fn prompt_answer() -> CliResult<String> {
    print!("> ");
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        return Err("input closed before the survey ended".into());
    }
    Ok(line.trim().to_string())
}

fn run_validate(survey_path: PathBuf) -> CliResult<()> {
    let survey = load_survey(&survey_path)?;
    let result = validate(&survey.rules, &survey.questions);
    let rule_errors = check_rules(&survey.rules);

    println!(
        "Validation result: {}",
        if result.is_valid && rule_errors.is_empty() {
            "valid"
        } else {
            "invalid"
        }
    );
    describe_validation(&result, &rule_errors);

    if result.is_valid && rule_errors.is_empty() {
        Ok(())
    } else {
        Err("validation failed".into())
    }
}

fn describe_validation(result: &ValidationResult, rule_errors: &[String]) {
    if !result.errors.is_empty() {
        println!("Graph errors:");
        for error in &result.errors {
            println!("  - {}", error);
        }
    }
    if !rule_errors.is_empty() {
        println!("Rule errors:");
        for error in rule_errors {
            println!("  - {}", error);
        }
    }
}

fn run_map(survey_path: PathBuf) -> CliResult<()> {
    let contents = fs::read_to_string(&survey_path)?;
    let survey: Value = serde_json::from_str(&contents)?;
    let survey_id = survey
        .get("id")
        .and_then(Value::as_str)
        .ok_or("survey is missing an id")?;
    let config_json = json!({ "survey_json": contents }).to_string();
    let map = parse_component_result(&component_logic_map(survey_id, &config_json))?;
    println!("{}", serde_json::to_string_pretty(&map)?);
    Ok(())
}

fn run_operators(question_type: &str) -> CliResult<()> {
    let response = parse_component_result(&component_operators(question_type))?;
    let operators = response["operators"]
        .as_array()
        .ok_or("operator table missing")?;
    println!("Operators for {}:", question_type);
    for entry in operators {
        let name = entry["operator"].as_str().unwrap_or_default();
        let symbol = entry["symbol"].as_str().unwrap_or_default();
        if entry["requires_value"].as_bool().unwrap_or(false) {
            println!("  {} ({}) <value>", name, symbol);
        } else {
            println!("  {} ({})", name, symbol);
        }
    }
    Ok(())
}

fn parse_component_result(response: &str) -> CliResult<Value> {
    let value: Value = serde_json::from_str(response)?;
    if let Some(error) = value.get("error").and_then(Value::as_str) {
        Err(error.into())
    } else {
        Ok(value)
    }
}
