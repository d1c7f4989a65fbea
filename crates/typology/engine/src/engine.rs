//! Mutable engine wrapper for one session
//!
//! `TypologyEngine` holds a shared, immutable [`NormalizedConfig`] and the
//! run's [`EngineState`]. Every call goes through
//! [`transition`](crate::state_machine::transition); the stored state is
//! replaced only when the transition succeeds.

use crate::normalizer::NormalizedConfig;
use crate::state_machine::{transition, EngineEvent};
use std::sync::Arc;
use typology_types::*;

/// Classification engine for a single session
#[derive(Clone, Debug)]
pub struct TypologyEngine {
    config: Arc<NormalizedConfig>,
    state: EngineState,
}

impl TypologyEngine {
    /// Create an idle engine over a shared configuration
    pub fn new(config: Arc<NormalizedConfig>) -> Self {
        Self {
            config,
            state: EngineState::default(),
        }
    }

    /// Normalize the documents and create an engine over them
    pub fn from_documents(documents: ConfigDocuments) -> Self {
        Self::new(Arc::new(NormalizedConfig::from_documents(documents)))
    }

    /// Continue a session whose state was stored by the caller
    pub fn from_state(config: Arc<NormalizedConfig>, state: EngineState) -> Self {
        Self { config, state }
    }

    // ── Actions ──────────────────────────────────────────────────────

    /// Begin a fresh run and return its first question
    pub fn start(&mut self) -> TypologyResult<Option<QuestionView>> {
        let outcome = self.apply(EngineEvent::Start)?;
        Ok(outcome.question)
    }

    /// Answer the current question with a score or an answer-scale id
    pub fn answer(&mut self, answer: impl Into<Answer>) -> TypologyResult<StepOutcome> {
        self.apply(EngineEvent::Answer(answer.into()))
    }

    /// Discard all run state
    pub fn reset(&mut self) {
        self.state = EngineState::default();
    }

    /// Begin a second phase from a stored base summary
    pub fn start_from_base_summary(&mut self, summary: BaseSummary) -> TypologyResult<StepOutcome> {
        self.apply(EngineEvent::ResumeFromBase(summary))
    }

    fn apply(&mut self, event: EngineEvent) -> TypologyResult<StepOutcome> {
        let (state, outcome) = transition(&self.config, &self.state, event)?;
        self.state = state;
        Ok(outcome)
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// The three reserved dimensions, once all are decided
    pub fn base_summary(&self) -> Option<BaseSummary> {
        self.state.path.base_summary()
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    /// Take the state out, e.g. to store it between requests
    pub fn into_state(self) -> EngineState {
        self.state
    }

    pub fn current_question(&self) -> Option<&QuestionView> {
        self.state.current_question.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.state.finished
    }

    pub fn final_category(&self) -> Option<&CategoryEntry> {
        self.state.final_category.as_ref()
    }

    pub fn path(&self) -> &Path {
        &self.state.path
    }

    pub fn config(&self) -> &Arc<NormalizedConfig> {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn make_engine() -> TypologyEngine {
        TypologyEngine::from_documents(ConfigDocuments {
            answer_scale: serde_json::json!([]),
            question_sets: BTreeMap::from([(
                QuestionSetId::new("ab"),
                QuestionSetDocument::new()
                    .with_questions("A", vec![QuestionEntry::new("a1", "?")])
                    .with_questions("B", vec![QuestionEntry::new("b1", "?")]),
            )]),
            stage_graph: StageGraph::new(vec![Stage::new(
                "ab",
                Dimension::Custom("ab".into()),
                &["A", "B"],
            )
            .with_question_set("ab")]),
            categories: BTreeMap::new(),
        })
    }

    #[test]
    fn test_failed_answer_keeps_state() {
        let mut engine = make_engine();
        engine.start().unwrap();
        let before = engine.state().clone();
        assert!(engine.answer("unknown").is_err());
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn test_session_survives_serialization() {
        let mut engine = make_engine();
        engine.start().unwrap();
        engine.answer(1).unwrap();

        let stored = serde_json::to_string(engine.state()).unwrap();
        let config = engine.config().clone();
        let mut restored = TypologyEngine::from_state(config, serde_json::from_str(&stored).unwrap());

        assert_eq!(restored.current_question(), engine.current_question());
        let outcome = restored.answer(0).unwrap();
        assert!(outcome.test_completed);
        assert_eq!(restored.path().custom.get("ab"), Some(&PoleId::new("A")));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut engine = make_engine();
        engine.start().unwrap();
        engine.answer(1).unwrap();
        engine.reset();
        assert_eq!(engine.state(), &EngineState::default());
        assert!(engine.current_question().is_none());
        assert!(engine.base_summary().is_none());
    }
}
