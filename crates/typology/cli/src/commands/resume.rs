//! Resume a second phase from a stored base summary

use super::{answer_source, drive, print_report, report, save_state, Context};
use crate::error::CliResult;
use clap::Args;
use std::path::PathBuf;
use typology_engine::TypologyEngine;
use typology_types::BaseSummary;

#[derive(Args)]
pub struct ResumeArgs {
    /// Rationality pole (rational, irrational)
    #[arg(long)]
    pub rationality: String,

    /// Base function pole (N, S, T, F)
    #[arg(long)]
    pub base: String,

    /// Orientation pole (e, i)
    #[arg(long)]
    pub orientation: String,

    /// Comma-separated answers (scores or answer ids); read from stdin when omitted
    #[arg(short, long, allow_hyphen_values = true)]
    pub answers: Option<String>,

    /// Write the session state here afterwards, for `run --state`
    #[arg(short, long)]
    pub state: Option<PathBuf>,
}

/// Execute resume command
pub fn execute(args: ResumeArgs, ctx: &Context) -> CliResult<()> {
    let mut engine = TypologyEngine::new(ctx.load_config()?);
    let summary = BaseSummary::new(args.rationality, args.base, args.orientation);
    let outcome = engine.start_from_base_summary(summary)?;

    let mut stages = Vec::new();
    stages.extend(outcome.stage_result);
    stages.extend(drive(&mut engine, answer_source(args.answers.as_deref())?, ctx)?);

    if let Some(path) = &args.state {
        save_state(path, engine.state())?;
    }
    print_report(&report(&engine, stages), ctx)
}
