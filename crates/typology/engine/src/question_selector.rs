//! Question selector: picks the next question for the active stage
//!
//! Poles are balanced: the pole with the fewest answers is served first,
//! declaration order breaking ties. Within a pole, questions come in
//! priority order and none is asked twice in the same stage.

use crate::normalizer::NormalizedConfig;
use typology_types::*;

/// Picks the next question for a stage
pub struct QuestionSelector;

impl QuestionSelector {
    pub fn new() -> Self {
        Self
    }

    /// The next unasked question, or `None` when every pole that is still
    /// under the ceiling has run out of questions.
    pub fn select_next<'a>(
        &self,
        config: &'a NormalizedConfig,
        stage: &Stage,
        state: &StageState,
    ) -> Option<&'a Question> {
        let max = config.flow().max_questions_per_pole;

        let mut candidates: Vec<(u32, usize, &PoleId)> = stage
            .poles
            .iter()
            .enumerate()
            .map(|(position, pole)| (state.count(pole), position, pole))
            .filter(|(count, _, _)| *count < max)
            .collect();
        candidates.sort_by_key(|(count, position, _)| (*count, *position));

        candidates.into_iter().find_map(|(_, _, pole)| {
            config
                .questions_for(stage, pole)
                .iter()
                .find(|q| !state.was_asked(&q.id))
        })
    }

    /// Render a question for the caller
    pub fn view(
        &self,
        stage: &Stage,
        question: &Question,
        total_answered: u32,
    ) -> Option<QuestionView> {
        Some(QuestionView {
            id: question.id.clone(),
            text: question.text.clone(),
            pole: question.pole.clone(),
            stage_id: stage.id.clone(),
            dimension: stage.dimension.clone()?,
            question_set_id: stage.question_set_id.clone()?,
            meta: QuestionMeta { total_answered },
        })
    }
}

impl Default for QuestionSelector {
    fn default() -> Self {
        Self::new()
    }
}
