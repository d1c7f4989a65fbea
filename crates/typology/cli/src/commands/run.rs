//! Run a classification from the first stage

use super::{answer_source, drive, load_state, print_report, report, save_state, Context};
use crate::error::CliResult;
use clap::Args;
use std::path::PathBuf;
use typology_engine::TypologyEngine;

#[derive(Args)]
pub struct RunArgs {
    /// Comma-separated answers (scores or answer ids); read from stdin when omitted
    #[arg(short, long, allow_hyphen_values = true)]
    pub answers: Option<String>,

    /// Session file: an unfinished session stored here is continued (a
    /// finished one is replaced by a new run), and the state after this
    /// invocation is written back
    #[arg(short, long)]
    pub state: Option<PathBuf>,
}

/// Execute run command
pub fn execute(args: RunArgs, ctx: &Context) -> CliResult<()> {
    let config = ctx.load_config()?;
    let stored = match &args.state {
        Some(path) => load_state(path)?,
        None => None,
    };

    let mut engine = match stored {
        Some(state) if state.is_active() => {
            tracing::info!(answered = state.total_answered, "Continuing stored session");
            TypologyEngine::from_state(config, state)
        }
        _ => {
            let mut engine = TypologyEngine::new(config);
            engine.start()?;
            engine
        }
    };

    let stages = drive(&mut engine, answer_source(args.answers.as_deref())?, ctx)?;
    if let Some(path) = &args.state {
        save_state(path, engine.state())?;
    }
    print_report(&report(&engine, stages), ctx)
}
