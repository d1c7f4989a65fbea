//! Run state: per-stage counters, the decided path, and what a step returns
//!
//! Everything here is plain data. The engine produces a new [`EngineState`]
//! for every event; callers may serialize it between calls to keep a
//! session alive outside the process.

use crate::{
    CategoryEntry, Dimension, LocalizedText, PoleId, QuestionId, QuestionSetId, StageId,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// ── Stage state ──────────────────────────────────────────────────────

/// Accumulated evidence for one stage
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageState {
    /// Cumulative score per pole
    pub scores: BTreeMap<PoleId, i64>,
    /// Questions answered per pole
    pub counts: BTreeMap<PoleId, u32>,
    pub asked_questions: BTreeSet<QuestionId>,
    pub total_asked: u32,
    pub decided: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_pole: Option<PoleId>,
}

impl StageState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self, pole: &PoleId) -> i64 {
        self.scores.get(pole).copied().unwrap_or(0)
    }

    pub fn count(&self, pole: &PoleId) -> u32 {
        self.counts.get(pole).copied().unwrap_or(0)
    }

    pub fn was_asked(&self, question: &QuestionId) -> bool {
        self.asked_questions.contains(question)
    }

    /// Record an answered question. Returns `false` (and changes nothing)
    /// if the question was already answered in this stage.
    pub fn record_answer(&mut self, question: &QuestionId, pole: &PoleId, score: i32) -> bool {
        if !self.asked_questions.insert(question.clone()) {
            return false;
        }
        let total = self.scores.entry(pole.clone()).or_insert(0);
        *total = total.saturating_add(i64::from(score));
        *self.counts.entry(pole.clone()).or_insert(0) += 1;
        self.total_asked += 1;
        true
    }

    pub fn close(&mut self, pole: Option<PoleId>) {
        self.decided = true;
        self.result_pole = pole;
    }
}

// ── Path ─────────────────────────────────────────────────────────────

/// The three reserved dimensions needed to resume a second phase
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseSummary {
    pub rationality: PoleId,
    pub base: PoleId,
    pub orientation: PoleId,
}

impl BaseSummary {
    pub fn new(
        rationality: impl Into<String>,
        base: impl Into<String>,
        orientation: impl Into<String>,
    ) -> Self {
        Self {
            rationality: PoleId::new(rationality),
            base: PoleId::new(base),
            orientation: PoleId::new(orientation),
        }
    }
}

/// Decided poles keyed by dimension
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Path {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rationality: Option<PoleId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<PoleId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation: Option<PoleId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creative: Option<PoleId>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom: BTreeMap<String, PoleId>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the reserved slots from a stored base summary
    pub fn from_base_summary(summary: &BaseSummary) -> Self {
        Self {
            rationality: Some(summary.rationality.clone()),
            base: Some(summary.base.clone()),
            orientation: Some(summary.orientation.clone()),
            ..Self::default()
        }
    }

    pub fn get(&self, dimension: &Dimension) -> Option<&PoleId> {
        match dimension {
            Dimension::Rationality => self.rationality.as_ref(),
            Dimension::BaseFunction => self.base.as_ref(),
            Dimension::Orientation => self.orientation.as_ref(),
            Dimension::CreativeFunction => self.creative.as_ref(),
            Dimension::Custom(key) => self.custom.get(key),
        }
    }

    pub fn set(&mut self, dimension: &Dimension, pole: PoleId) {
        match dimension {
            Dimension::Rationality => self.rationality = Some(pole),
            Dimension::BaseFunction => self.base = Some(pole),
            Dimension::Orientation => self.orientation = Some(pole),
            Dimension::CreativeFunction => self.creative = Some(pole),
            Dimension::Custom(key) => {
                self.custom.insert(key.clone(), pole);
            }
        }
    }

    /// The base summary, once all three reserved slots are decided
    pub fn base_summary(&self) -> Option<BaseSummary> {
        Some(BaseSummary {
            rationality: self.rationality.clone()?,
            base: self.base.clone()?,
            orientation: self.orientation.clone()?,
        })
    }

    /// Number of decided dimensions
    pub fn len(&self) -> usize {
        [&self.rationality, &self.base, &self.orientation, &self.creative]
            .iter()
            .filter(|slot| slot.is_some())
            .count()
            + self.custom.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ── Question view ────────────────────────────────────────────────────

/// Progress information shown alongside a question
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionMeta {
    pub total_answered: u32,
}

/// A question ready to be rendered
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    pub id: QuestionId,
    pub text: LocalizedText,
    pub pole: PoleId,
    pub stage_id: StageId,
    pub dimension: Dimension,
    pub question_set_id: QuestionSetId,
    pub meta: QuestionMeta,
}

// ── Step outcome ─────────────────────────────────────────────────────

/// A stage that closed during a step
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageResult {
    pub stage_id: StageId,
    pub dimension: Dimension,
    pub pole: PoleId,
    /// Closed because questions ran out before the threshold was met
    pub forced: bool,
}

/// What a single engine step returns to the caller
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepOutcome {
    pub question: Option<QuestionView>,
    pub stage_completed: bool,
    pub stage_result: Option<StageResult>,
    pub test_completed: bool,
    /// `None` on a completed run means the classification is unresolved
    pub final_category: Option<CategoryEntry>,
}

impl StepOutcome {
    pub fn question(question: QuestionView) -> Self {
        Self {
            question: Some(question),
            ..Self::default()
        }
    }

    pub fn completed(final_category: Option<CategoryEntry>) -> Self {
        Self {
            test_completed: true,
            final_category,
            ..Self::default()
        }
    }

    pub fn is_unresolved(&self) -> bool {
        self.test_completed && self.final_category.is_none()
    }
}

// ── Engine state ─────────────────────────────────────────────────────

/// Complete state of one classification run
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineState {
    pub started: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_stage_id: Option<StageId>,
    #[serde(default)]
    pub stage_states: BTreeMap<StageId, StageState>,
    #[serde(default)]
    pub path: Path,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_question: Option<QuestionView>,
    pub finished: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_category: Option<CategoryEntry>,
    pub total_answered: u32,
}

impl EngineState {
    pub fn new() -> Self {
        Self::default()
    }

    /// A run is active between `start()` and completion
    pub fn is_active(&self) -> bool {
        self.started && !self.finished
    }

    pub fn stage_state(&self, stage_id: &StageId) -> Option<&StageState> {
        self.stage_states.get(stage_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_answer_rejects_duplicates() {
        let mut state = StageState::new();
        let pole = PoleId::new("A");
        assert!(state.record_answer(&QuestionId::new("q1"), &pole, 2));
        assert!(!state.record_answer(&QuestionId::new("q1"), &pole, 2));
        assert_eq!(state.score(&pole), 2);
        assert_eq!(state.count(&pole), 1);
        assert_eq!(state.total_asked, 1);
        assert_eq!(state.count(&PoleId::new("B")), 0);
    }

    #[test]
    fn test_scores_accumulate_past_i32() {
        let mut state = StageState::new();
        let pole = PoleId::new("A");
        state.record_answer(&QuestionId::new("q1"), &pole, i32::MAX);
        state.record_answer(&QuestionId::new("q2"), &pole, i32::MAX);
        assert_eq!(state.score(&pole), 2 * i64::from(i32::MAX));

        state.record_answer(&QuestionId::new("q3"), &pole, i32::MIN);
        assert_eq!(state.score(&pole), i64::from(i32::MAX) - 1);
    }

    #[test]
    fn test_path_reserved_and_custom_slots() {
        let mut path = Path::new();
        path.set(&Dimension::Rationality, PoleId::new("rational"));
        path.set(&Dimension::Custom("temperament".into()), PoleId::new("calm"));

        assert_eq!(path.get(&Dimension::Rationality), Some(&PoleId::new("rational")));
        assert_eq!(
            path.get(&Dimension::Custom("temperament".into())),
            Some(&PoleId::new("calm"))
        );
        assert_eq!(path.len(), 2);
        assert!(path.base_summary().is_none());
    }

    #[test]
    fn test_base_summary_round_trip_through_path() {
        let summary = BaseSummary::new("irrational", "N", "i");
        let path = Path::from_base_summary(&summary);
        assert_eq!(path.base_summary(), Some(summary));
        assert!(path.creative.is_none());
    }

    #[test]
    fn test_step_outcome_unresolved() {
        assert!(StepOutcome::completed(None).is_unresolved());
        assert!(!StepOutcome::default().is_unresolved());
    }

    #[test]
    fn test_engine_state_serializes_camel_case() {
        let state = EngineState {
            started: true,
            total_answered: 3,
            ..EngineState::default()
        };
        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(value["totalAnswered"], serde_json::json!(3));
        assert!(state.is_active());

        let back: EngineState = serde_json::from_value(value).unwrap();
        assert_eq!(back, state);
    }
}
