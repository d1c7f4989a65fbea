//! Configuration inspection commands

use super::Context;
use crate::error::{CliError, CliResult};
use crate::output::{self, OutputFormat};
use clap::Subcommand;
use colored::Colorize;
use serde::Serialize;
use tabled::Tabled;
use typology_types::*;

/// Inspect subcommands
#[derive(Subcommand)]
pub enum InspectCommands {
    /// Check that the configuration can drive a run
    Validate,

    /// List the stages of the graph
    Stages,

    /// List the questions a stage asks, in the order they are served
    Questions {
        /// Stage ID
        stage: String,
    },

    /// List the category catalog
    Categories,

    /// Show the merged flow configuration
    Flow,
}

/// Execute inspect command
pub fn execute(command: InspectCommands, ctx: &Context) -> CliResult<()> {
    match command {
        InspectCommands::Validate => validate(ctx),
        InspectCommands::Stages => list_stages(ctx),
        InspectCommands::Questions { stage } => list_questions(&stage, ctx),
        InspectCommands::Categories => list_categories(ctx),
        InspectCommands::Flow => show_flow(ctx),
    }
}

fn validate(ctx: &Context) -> CliResult<()> {
    let config = ctx.load_config()?;
    config.validate()?;

    let summary = serde_json::json!({
        "valid": true,
        "stages": config.stages().len(),
        "categories": config.catalog().len(),
        "answerOptions": config.answer_scale().len(),
    });
    match ctx.format {
        OutputFormat::Table => {
            output::print_success(&format!(
                "Configuration is valid: {} stages, {} categories, {} answer options",
                config.stages().len(),
                config.catalog().len(),
                config.answer_scale().len()
            ));
            if config.answer_scale().is_empty() {
                output::print_warning("Answer scale is empty, only numeric answers will be accepted");
            }
            Ok(())
        }
        format => output::print_single(&summary, format),
    }
}

/// Stage info for display
#[derive(Serialize, Tabled)]
struct StageInfo {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Dimension")]
    dimension: String,
    #[tabled(rename = "Poles")]
    poles: String,
    #[tabled(rename = "Questions")]
    questions: usize,
    #[tabled(rename = "Routes")]
    routes: String,
}

fn list_stages(ctx: &Context) -> CliResult<()> {
    let config = ctx.load_config()?;
    let rows = config
        .stages()
        .iter()
        .map(|stage| StageInfo {
            id: stage.id.to_string(),
            kind: format!("{:?}", stage.kind).to_lowercase(),
            dimension: stage
                .dimension
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| "-".into()),
            poles: join(stage.poles.iter()),
            questions: config.question_count(stage),
            routes: describe_routes(stage),
        })
        .collect();
    output::print_rows::<StageInfo>(rows, ctx.format)
}

fn describe_routes(stage: &Stage) -> String {
    let mut routes: Vec<String> = stage
        .next
        .iter()
        .map(|(pole, target)| format!("{} -> {}", pole, target))
        .collect();
    if !stage.next_by_context.is_empty() {
        let context = stage
            .context_dimension
            .as_ref()
            .map(Dimension::key)
            .unwrap_or("?");
        routes.push(format!(
            "{} context routes on {}",
            stage.next_by_context.len(),
            context
        ));
    }
    if routes.is_empty() {
        "-".into()
    } else {
        routes.join(", ")
    }
}

/// Question info for display
#[derive(Serialize, Tabled)]
struct QuestionInfo {
    #[tabled(rename = "Pole")]
    pole: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Text")]
    text: String,
}

fn list_questions(stage_id: &str, ctx: &Context) -> CliResult<()> {
    let config = ctx.load_config()?;
    let stage = config
        .stage(&StageId::new(stage_id))
        .ok_or_else(|| CliError::InvalidArgument(format!("unknown stage '{}'", stage_id)))?;

    let rows = stage
        .poles
        .iter()
        .flat_map(|pole| config.questions_for(stage, pole))
        .map(|q| QuestionInfo {
            pole: q.pole.to_string(),
            id: q.id.to_string(),
            priority: q
                .priority
                .map(|p| p.to_string())
                .unwrap_or_else(|| "-".into()),
            text: q.text.resolve(&ctx.locale).unwrap_or_default().to_string(),
        })
        .collect();
    output::print_rows::<QuestionInfo>(rows, ctx.format)
}

/// Category info for display
#[derive(Serialize, Tabled)]
struct CategoryInfo {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Leading")]
    leading: String,
    #[tabled(rename = "Creative")]
    creative: String,
    #[tabled(rename = "Rationality")]
    rationality: String,
    #[tabled(rename = "Name")]
    name: String,
}

fn list_categories(ctx: &Context) -> CliResult<()> {
    let config = ctx.load_config()?;
    let rows = config
        .catalog()
        .iter()
        .map(|entry| CategoryInfo {
            id: entry.id.to_string(),
            leading: entry.leading.code.clone(),
            creative: entry
                .creative
                .as_ref()
                .map(|c| c.code.clone())
                .unwrap_or_else(|| "-".into()),
            rationality: entry.rationality.to_string(),
            name: entry.name().unwrap_or_default().to_string(),
        })
        .collect();
    output::print_rows::<CategoryInfo>(rows, ctx.format)
}

fn show_flow(ctx: &Context) -> CliResult<()> {
    let config = ctx.load_config()?;
    let flow = config.flow();
    match ctx.format {
        OutputFormat::Table => {
            output::heading("Flow Configuration");
            println!("  Initial questions per pole: {}", flow.initial_questions_per_pole);
            println!("  Extra questions per pole:   {}", flow.extra_questions_per_pole);
            println!("  Max questions per pole:     {}", flow.max_questions_per_pole);
            println!("  Decision threshold:         {}", flow.decision_threshold);
            println!(
                "  Resume stages:              {} / {}",
                flow.resume_stages.rational.as_str().yellow(),
                flow.resume_stages.irrational.as_str().yellow()
            );
            Ok(())
        }
        format => output::print_single(flow, format),
    }
}

fn join<T: std::fmt::Display>(items: impl Iterator<Item = T>) -> String {
    items.map(|i| i.to_string()).collect::<Vec<_>>().join(", ")
}
