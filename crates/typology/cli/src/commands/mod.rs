//! Subcommands and the session plumbing they share

pub mod inspect;
pub mod resume;
pub mod run;

use crate::error::{CliError, CliResult};
use crate::output::{self, OutputFormat};
use colored::Colorize;
use serde::Serialize;
use std::io::BufRead;
use std::path::{Path as FsPath, PathBuf};
use std::sync::Arc;
use tabled::Tabled;
use typology_engine::{NormalizedConfig, TypologyEngine};
use typology_types::*;

/// Global options every subcommand needs
pub struct Context {
    pub config_dir: PathBuf,
    pub format: OutputFormat,
    pub locale: String,
}

impl Context {
    pub fn load_config(&self) -> CliResult<Arc<NormalizedConfig>> {
        let config = NormalizedConfig::from_dir(&self.config_dir)?;
        tracing::debug!(dir = %self.config_dir.display(), stages = config.stages().len(), "Configuration loaded");
        Ok(Arc::new(config))
    }
}

// ── Answers ──────────────────────────────────────────────────────────

/// Parse a comma-separated answer list such as `2,0,agree,-1`
pub fn parse_answers(raw: &str) -> CliResult<Vec<Answer>> {
    raw.split(',')
        .map(str::trim)
        .map(|token| {
            if token.is_empty() {
                Err(CliError::InvalidArgument(format!(
                    "empty answer in '{}'",
                    raw
                )))
            } else {
                Ok(Answer::from_token(token))
            }
        })
        .collect()
}

/// Scripted answers when given, otherwise one answer per stdin line
pub fn answer_source(answers: Option<&str>) -> CliResult<AnswerSource<std::io::StdinLock<'static>>> {
    Ok(match answers {
        Some(raw) => AnswerSource::Scripted(parse_answers(raw)?.into_iter()),
        None => AnswerSource::Interactive(std::io::stdin().lock()),
    })
}

/// Where answers come from
pub enum AnswerSource<R> {
    /// A fixed list given on the command line
    Scripted(std::vec::IntoIter<Answer>),
    /// One answer per line, prompting with each question
    Interactive(R),
}

impl<R: BufRead> AnswerSource<R> {
    fn next_answer(&mut self, question: &QuestionView, ctx: &Context) -> CliResult<Option<Answer>> {
        match self {
            Self::Scripted(answers) => Ok(answers.next()),
            Self::Interactive(reader) => {
                if ctx.format == OutputFormat::Table {
                    print_question(question, ctx);
                }
                let mut line = String::new();
                if reader.read_line(&mut line)? == 0 {
                    return Ok(None);
                }
                let token = line.trim();
                if token.is_empty() {
                    return Err(CliError::InvalidArgument("empty answer".into()));
                }
                Ok(Some(Answer::from_token(token)))
            }
        }
    }
}

fn print_question(question: &QuestionView, ctx: &Context) {
    let text = question
        .text
        .resolve(&ctx.locale)
        .unwrap_or(question.id.as_str());
    println!(
        "{} {} {}",
        format!("[{}]", question.meta.total_answered + 1).dimmed(),
        format!("{}:", question.dimension).yellow(),
        text
    );
}

// ── Session driving ──────────────────────────────────────────────────

/// What a run produced, for display or for the next invocation
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub questions_answered: u32,
    pub stages: Vec<StageResult>,
    pub path: Path,
    pub base_summary: Option<BaseSummary>,
    pub finished: bool,
    pub final_category: Option<CategoryEntry>,
    pub pending_question: Option<QuestionView>,
}

/// Feed answers into the engine until it finishes or the source runs dry
pub fn drive<R: BufRead>(
    engine: &mut TypologyEngine,
    mut source: AnswerSource<R>,
    ctx: &Context,
) -> CliResult<Vec<StageResult>> {
    let mut stages = Vec::new();
    while let Some(question) = engine.current_question().cloned() {
        let Some(answer) = source.next_answer(&question, ctx)? else {
            break;
        };
        let outcome = engine.answer(answer)?;
        if let Some(result) = outcome.stage_result {
            stages.push(result);
        }
    }
    Ok(stages)
}

pub fn report(engine: &TypologyEngine, stages: Vec<StageResult>) -> RunReport {
    RunReport {
        questions_answered: engine.state().total_answered,
        stages,
        path: engine.path().clone(),
        base_summary: engine.base_summary(),
        finished: engine.is_finished(),
        final_category: engine.final_category().cloned(),
        pending_question: engine.current_question().cloned(),
    }
}

/// Stage result as a table row
#[derive(Tabled)]
struct StageRow {
    #[tabled(rename = "Stage")]
    stage: String,
    #[tabled(rename = "Dimension")]
    dimension: String,
    #[tabled(rename = "Pole")]
    pole: String,
    #[tabled(rename = "Forced")]
    forced: String,
}

impl From<&StageResult> for StageRow {
    fn from(result: &StageResult) -> Self {
        Self {
            stage: result.stage_id.to_string(),
            dimension: result.dimension.to_string(),
            pole: result.pole.to_string(),
            forced: if result.forced { "yes".into() } else { "no".into() },
        }
    }
}

pub fn print_report(report: &RunReport, ctx: &Context) -> CliResult<()> {
    if ctx.format != OutputFormat::Table {
        return output::print_single(report, ctx.format);
    }

    println!();
    output::heading("Classification");
    println!("  Questions answered: {}", report.questions_answered);
    if !report.stages.is_empty() {
        let rows: Vec<StageRow> = report.stages.iter().map(StageRow::from).collect();
        println!("{}", tabled::Table::new(rows));
    }

    match (&report.final_category, report.finished) {
        (Some(category), _) => {
            let name = category.name().unwrap_or_default();
            output::print_success(&format!(
                "Category: {} {}",
                category.id.as_str().bold().green(),
                name
            ));
        }
        (None, true) => output::print_warning("Could not determine a category for this path"),
        (None, false) => {
            if let Some(question) = &report.pending_question {
                output::print_warning(&format!(
                    "Run incomplete, waiting on question {} ({})",
                    question.id, question.stage_id
                ));
            }
        }
    }
    if let Some(summary) = &report.base_summary {
        println!(
            "  Base summary: {} / {} / {}",
            summary.rationality, summary.base, summary.orientation
        );
    }
    Ok(())
}

// ── State files ──────────────────────────────────────────────────────

pub fn load_state(path: &FsPath) -> CliResult<Option<EngineState>> {
    if !path.exists() {
        return Ok(None);
    }
    let text = std::fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&text)?))
}

pub fn save_state(path: &FsPath, state: &EngineState) -> CliResult<()> {
    std::fs::write(path, serde_json::to_string_pretty(state)?)?;
    tracing::debug!(path = %path.display(), "Session state saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_answers() {
        let answers = parse_answers("2, agree,-1").unwrap();
        assert_eq!(
            answers,
            vec![Answer::from("2"), Answer::from("agree"), Answer::from("-1")]
        );
    }

    #[test]
    fn test_parse_answers_rejects_empty_token() {
        assert!(matches!(
            parse_answers("1,,2"),
            Err(CliError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_state_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        assert!(load_state(&path).unwrap().is_none());

        let state = EngineState {
            started: true,
            total_answered: 2,
            ..EngineState::default()
        };
        save_state(&path, &state).unwrap();
        assert_eq!(load_state(&path).unwrap(), Some(state));
    }
}
