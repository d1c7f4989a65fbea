//! The four configuration documents the engine is built from

use crate::{CategoryEntry, CategoryId, QuestionSetDocument, QuestionSetId, StageGraph, TypologyResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

pub const ANSWER_SCALE_FILE: &str = "answer_scale.json";
pub const QUESTION_SETS_FILE: &str = "question_sets.json";
pub const STAGE_GRAPH_FILE: &str = "stage_graph.json";
pub const CATEGORIES_FILE: &str = "categories.json";

/// Raw configuration as supplied by the surrounding application.
///
/// The answer scale stays an untyped JSON value because it arrives in
/// more than one shape; normalization decides what it means.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDocuments {
    pub answer_scale: Value,
    pub question_sets: BTreeMap<QuestionSetId, QuestionSetDocument>,
    pub stage_graph: StageGraph,
    pub categories: BTreeMap<CategoryId, CategoryEntry>,
}

impl ConfigDocuments {
    /// Parse the four documents from JSON text
    pub fn from_json_strs(
        answer_scale: &str,
        question_sets: &str,
        stage_graph: &str,
        categories: &str,
    ) -> TypologyResult<Self> {
        Ok(Self {
            answer_scale: serde_json::from_str(answer_scale)?,
            question_sets: serde_json::from_str(question_sets)?,
            stage_graph: serde_json::from_str(stage_graph)?,
            categories: serde_json::from_str(categories)?,
        })
    }

    /// Load `answer_scale.json`, `question_sets.json`, `stage_graph.json`
    /// and `categories.json` from one directory
    pub fn from_dir(dir: impl AsRef<Path>) -> TypologyResult<Self> {
        let dir = dir.as_ref();
        let read = |name: &str| std::fs::read_to_string(dir.join(name));
        Self::from_json_strs(
            &read(ANSWER_SCALE_FILE)?,
            &read(QUESTION_SETS_FILE)?,
            &read(STAGE_GRAPH_FILE)?,
            &read(CATEGORIES_FILE)?,
        )
    }
}
