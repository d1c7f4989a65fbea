//! Decision resolver: adaptive stopping rule for a stage
//!
//! A two-pole stage stays open until both poles have received the
//! initial number of questions. From then on it closes as soon as the
//! score difference reaches the threshold. Once both poles hit the
//! per-pole ceiling it closes regardless, on the sign of the difference.
//! An exact tie always goes to the first declared pole.

use typology_types::*;

/// Verdict on a stage
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Decision {
    pub decided: bool,
    pub result_pole: Option<PoleId>,
}

impl Decision {
    pub fn open() -> Self {
        Self::default()
    }

    pub fn closed(result_pole: Option<PoleId>) -> Self {
        Self {
            decided: true,
            result_pole,
        }
    }
}

/// Evaluates accumulated stage evidence against the flow configuration
pub struct DecisionResolver;

impl DecisionResolver {
    pub fn new() -> Self {
        Self
    }

    /// Decide whether the stage can close. Never mutates state.
    pub fn evaluate(&self, stage: &Stage, state: &StageState, flow: &FlowConfig) -> Decision {
        let (p1, p2) = match stage.poles.as_slice() {
            [] => return Decision::closed(None),
            [only] => return Decision::closed(Some(only.clone())),
            [p1, p2, ..] => (p1, p2),
        };

        let diff = state.score(p1).saturating_sub(state.score(p2));
        let at_ceiling = state.count(p1) >= flow.max_questions_per_pole
            && state.count(p2) >= flow.max_questions_per_pole;
        let minimum_met = state.count(p1) >= flow.initial_questions_per_pole
            && state.count(p2) >= flow.initial_questions_per_pole;

        if !minimum_met && !at_ceiling {
            return Decision::open();
        }
        if diff.unsigned_abs() >= u64::from(flow.decision_threshold) || at_ceiling {
            return Decision::closed(Some(pick(p1, p2, diff).clone()));
        }
        Decision::open()
    }

    /// The pole a stage closes on when its questions run out before the
    /// threshold is met
    pub fn forced_pole(&self, stage: &Stage, state: &StageState) -> Option<PoleId> {
        match stage.poles.as_slice() {
            [] => None,
            [only] => Some(only.clone()),
            [p1, p2, ..] => {
                let diff = state.score(p1).saturating_sub(state.score(p2));
                Some(pick(p1, p2, diff).clone())
            }
        }
    }
}

impl Default for DecisionResolver {
    fn default() -> Self {
        Self::new()
    }
}

fn pick<'a>(p1: &'a PoleId, p2: &'a PoleId, diff: i64) -> &'a PoleId {
    if diff < 0 {
        p2
    } else {
        p1
    }
}
