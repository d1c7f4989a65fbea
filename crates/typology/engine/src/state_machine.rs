//! Stage state machine
//!
//! [`transition`] is a pure function from the current [`EngineState`]
//! and an [`EngineEvent`] to the next state and the step's outcome. The
//! input state is never modified, so a failed event leaves the caller's
//! state exactly as it was.

use crate::branching::BranchResolver;
use crate::category_resolver::CategoryResolver;
use crate::decision_resolver::DecisionResolver;
use crate::normalizer::NormalizedConfig;
use crate::question_selector::QuestionSelector;
use typology_types::*;

/// Inputs that drive a run
#[derive(Clone, Debug, PartialEq)]
pub enum EngineEvent {
    /// Begin a fresh run at the initial stage
    Start,
    /// Answer the current question
    Answer(Answer),
    /// Discard all run state
    Reset,
    /// Begin a second phase from three already-decided reserved dimensions
    ResumeFromBase(BaseSummary),
}

/// Apply one event
pub fn transition(
    config: &NormalizedConfig,
    state: &EngineState,
    event: EngineEvent,
) -> TypologyResult<(EngineState, StepOutcome)> {
    match event {
        EngineEvent::Start => start(config),
        EngineEvent::Answer(answer) => answer_current(config, state, &answer),
        EngineEvent::Reset => Ok((EngineState::default(), StepOutcome::default())),
        EngineEvent::ResumeFromBase(summary) => resume(config, summary),
    }
}

fn start(config: &NormalizedConfig) -> TypologyResult<(EngineState, StepOutcome)> {
    config.validate()?;
    let initial = config
        .initial_stage()
        .ok_or_else(|| TypologyError::configuration("stage graph has no question-asking stage"))?;

    tracing::info!(stage = %initial.id, "Starting classification run");
    let mut next = EngineState {
        started: true,
        ..EngineState::default()
    };
    let outcome = advance_to(config, &mut next, Some(initial.id.clone()));
    Ok((next, outcome))
}

fn resume(
    config: &NormalizedConfig,
    summary: BaseSummary,
) -> TypologyResult<(EngineState, StepOutcome)> {
    config.validate()?;
    let target = BranchResolver::new().resume_target(config, &summary);

    tracing::info!(
        rationality = %summary.rationality,
        base = %summary.base,
        orientation = %summary.orientation,
        target = ?target.as_ref().map(StageId::as_str),
        "Resuming from base summary"
    );
    let mut next = EngineState {
        started: true,
        path: Path::from_base_summary(&summary),
        ..EngineState::default()
    };
    let outcome = advance_to(config, &mut next, target);
    Ok((next, outcome))
}

fn answer_current(
    config: &NormalizedConfig,
    state: &EngineState,
    answer: &Answer,
) -> TypologyResult<(EngineState, StepOutcome)> {
    if !state.started {
        return Err(TypologyError::invalid_state("answer() called before start()"));
    }
    if state.finished {
        return Ok((
            state.clone(),
            StepOutcome::completed(state.final_category.clone()),
        ));
    }
    let question = state
        .current_question
        .as_ref()
        .ok_or_else(|| TypologyError::invalid_state("no question is awaiting an answer"))?;
    let stage = config.stage(&question.stage_id).ok_or_else(|| {
        TypologyError::invalid_state(format!("unknown current stage '{}'", question.stage_id))
    })?;
    let score = config.resolve_answer(answer)?;

    let mut next = state.clone();
    next.total_answered += 1;
    let stage_state = next.stage_states.entry(stage.id.clone()).or_default();
    if !stage_state.record_answer(&question.id, &question.pole, score) {
        return Err(TypologyError::invalid_state(format!(
            "question '{}' was already answered in stage '{}'",
            question.id, stage.id
        )));
    }
    tracing::debug!(
        stage = %stage.id,
        question = %question.id,
        pole = %question.pole,
        score,
        "Answer recorded"
    );

    let decision = DecisionResolver::new().evaluate(stage, stage_state, config.flow());
    if decision.decided {
        let outcome = complete_stage(config, &mut next, stage, decision.result_pole, false);
        return Ok((next, outcome));
    }

    let selector = QuestionSelector::new();
    let follow_up = selector
        .select_next(config, stage, stage_state)
        .and_then(|q| selector.view(stage, q, next.total_answered));
    match follow_up {
        Some(view) => {
            next.current_question = Some(view.clone());
            Ok((next, StepOutcome::question(view)))
        }
        None => {
            let pole = next
                .stage_state(&stage.id)
                .and_then(|s| DecisionResolver::new().forced_pole(stage, s));
            tracing::info!(stage = %stage.id, pole = ?pole.as_ref().map(PoleId::as_str), "Questions exhausted, forcing decision");
            let outcome = complete_stage(config, &mut next, stage, pole, true);
            Ok((next, outcome))
        }
    }
}

/// Close `stage` on `pole`, record it into the path and move on
fn complete_stage(
    config: &NormalizedConfig,
    state: &mut EngineState,
    stage: &Stage,
    pole: Option<PoleId>,
    forced: bool,
) -> StepOutcome {
    if let Some(stage_state) = state.stage_states.get_mut(&stage.id) {
        stage_state.close(pole.clone());
    }

    let stage_result = match (&stage.dimension, &pole) {
        (Some(dimension), Some(pole)) => {
            state.path.set(dimension, pole.clone());
            Some(StageResult {
                stage_id: stage.id.clone(),
                dimension: dimension.clone(),
                pole: pole.clone(),
                forced,
            })
        }
        _ => None,
    };
    tracing::info!(
        stage = %stage.id,
        pole = ?pole.as_ref().map(PoleId::as_str),
        forced,
        "Stage closed"
    );

    let next_stage = BranchResolver::new().resolve_next_stage(stage, pole.as_ref(), &state.path);
    let mut outcome = advance_to(config, state, next_stage);
    outcome.stage_completed = true;
    outcome.stage_result = stage_result;
    outcome
}

/// Enter `next_stage` and serve its first question, or finalize when
/// there is nowhere left to go
fn advance_to(
    config: &NormalizedConfig,
    state: &mut EngineState,
    next_stage: Option<StageId>,
) -> StepOutcome {
    let stage = match next_stage.as_ref().map(|id| (id, config.stage(id))) {
        Some((_, Some(stage))) if stage.is_standard() => stage,
        Some((id, None)) => {
            tracing::warn!(stage = %id, "Next stage is not configured, finalizing");
            return finalize(config, state);
        }
        _ => return finalize(config, state),
    };

    let selector = QuestionSelector::new();
    let fresh = StageState::new();
    let first = selector
        .select_next(config, stage, &fresh)
        .and_then(|q| selector.view(stage, q, state.total_answered));

    match first {
        Some(view) => {
            tracing::debug!(stage = %stage.id, question = %view.id, "Entered stage");
            state.current_stage_id = Some(stage.id.clone());
            state.stage_states.insert(stage.id.clone(), fresh);
            state.current_question = Some(view.clone());
            StepOutcome::question(view)
        }
        None => {
            tracing::warn!(stage = %stage.id, "Stage has no usable questions, finalizing");
            finalize(config, state)
        }
    }
}

fn finalize(config: &NormalizedConfig, state: &mut EngineState) -> StepOutcome {
    state.current_question = None;
    state.current_stage_id = None;
    state.finished = true;
    state.final_category = CategoryResolver::new().resolve(&state.path, config.catalog());

    tracing::info!(
        total_answered = state.total_answered,
        category = ?state.final_category.as_ref().map(|c| c.id.as_str()),
        "Classification run finished"
    );
    StepOutcome::completed(state.final_category.clone())
}
