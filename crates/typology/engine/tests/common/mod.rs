//! Shared fixtures: the socionics configuration shipped in `fixtures/`

#![allow(dead_code)]

use std::sync::Arc;
use typology_engine::{NormalizedConfig, TypologyEngine};
use typology_types::*;

pub const ANSWER_SCALE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../../../fixtures/socionics/answer_scale.json"
));
pub const QUESTION_SETS: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../../../fixtures/socionics/question_sets.json"
));
pub const STAGE_GRAPH: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../../../fixtures/socionics/stage_graph.json"
));
pub const CATEGORIES: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../../../fixtures/socionics/categories.json"
));

/// Answers that favour the first pole of every stage
pub const FIRST_POLE: [i32; 4] = [2, 0, 2, 0];
/// Answers that favour the second pole of every stage
pub const SECOND_POLE: [i32; 4] = [0, 2, 0, 2];

pub fn documents() -> ConfigDocuments {
    ConfigDocuments::from_json_strs(ANSWER_SCALE, QUESTION_SETS, STAGE_GRAPH, CATEGORIES)
        .expect("fixtures parse")
}

pub fn config() -> Arc<NormalizedConfig> {
    Arc::new(NormalizedConfig::from_documents(documents()))
}

pub fn engine() -> TypologyEngine {
    TypologyEngine::new(config())
}

/// Feed answers until the run completes or the answers run out
pub fn answer_all(engine: &mut TypologyEngine, answers: &[i32]) -> Vec<StepOutcome> {
    let mut outcomes = Vec::new();
    for &answer in answers {
        let outcome = engine.answer(answer).expect("answer accepted");
        let done = outcome.test_completed;
        outcomes.push(outcome);
        if done {
            break;
        }
    }
    outcomes
}

/// The same four-answer block repeated for `stages` stages
pub fn repeat(block: [i32; 4], stages: usize) -> Vec<i32> {
    block.iter().copied().cycle().take(block.len() * stages).collect()
}
