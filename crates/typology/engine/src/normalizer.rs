//! Configuration normalizer: turns the four documents into lookup tables
//!
//! The resulting [`NormalizedConfig`] is immutable and meant to be shared
//! (behind an `Arc`) by any number of engine instances.

use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};
use typology_types::*;

/// Questions of one set, grouped by pole and sorted by priority
pub type QuestionIndex = BTreeMap<PoleId, Vec<Question>>;

/// Normalize the answer scale, accepting a flat list or a locale map.
///
/// Returns an empty list when neither shape is recognized; the missing
/// scale then surfaces at the first `answer()` that needs it.
pub fn normalize_answer_scale(raw: &Value) -> Vec<AnswerOption> {
    match AnswerScale::from_value(raw) {
        Ok(scale) => scale.options().to_vec(),
        Err(e) => {
            tracing::warn!(error = %e, "Answer scale not recognized, using an empty scale");
            Vec::new()
        }
    }
}

/// Like [`normalize_answer_scale`], preferring the given locale
pub fn normalize_answer_scale_for_locale(raw: &Value, locale: &str) -> Vec<AnswerOption> {
    match AnswerScale::from_value_for_locale(raw, locale) {
        Ok(scale) => scale.options().to_vec(),
        Err(e) => {
            tracing::warn!(locale, error = %e, "Answer scale locale not available");
            normalize_answer_scale(raw)
        }
    }
}

/// Map stage ids to their position in the graph. The first stage wins
/// when ids repeat; validation reports the duplicate.
pub fn index_stages_by_id(stages: &[Stage]) -> HashMap<StageId, usize> {
    let mut index = HashMap::with_capacity(stages.len());
    for (position, stage) in stages.iter().enumerate() {
        index.entry(stage.id.clone()).or_insert(position);
    }
    index
}

/// Bind each question to its pole and stable-sort every pole's list by
/// ascending priority, questions without a priority last.
pub fn index_questions_by_priority(set: &QuestionSetDocument) -> QuestionIndex {
    set.questions
        .iter()
        .map(|(pole, entries)| {
            let mut questions: Vec<Question> = entries
                .iter()
                .cloned()
                .map(|entry| entry.into_question(pole.clone()))
                .collect();
            questions.sort_by_key(|q| (q.priority.is_none(), q.priority));
            (pole.clone(), questions)
        })
        .collect()
}

/// Shallow merge of stage-graph overrides onto the defaults
pub fn merge_flow_config(defaults: &FlowConfig, overrides: &FlowConfigOverrides) -> FlowConfig {
    FlowConfig {
        initial_questions_per_pole: overrides
            .initial_questions_per_pole
            .unwrap_or(defaults.initial_questions_per_pole),
        extra_questions_per_pole: overrides
            .extra_questions_per_pole
            .unwrap_or(defaults.extra_questions_per_pole),
        max_questions_per_pole: overrides
            .max_questions_per_pole
            .unwrap_or(defaults.max_questions_per_pole),
        decision_threshold: overrides
            .decision_threshold
            .unwrap_or(defaults.decision_threshold),
        resume_stages: overrides
            .resume_stages
            .clone()
            .unwrap_or_else(|| defaults.resume_stages.clone()),
    }
}

// ── Normalized configuration ─────────────────────────────────────────

/// Immutable lookup tables derived from [`ConfigDocuments`]
#[derive(Clone, Debug)]
pub struct NormalizedConfig {
    answer_scale: AnswerScale,
    stages: Vec<Stage>,
    stage_index: HashMap<StageId, usize>,
    questions: HashMap<QuestionSetId, QuestionIndex>,
    flow: FlowConfig,
    /// Catalog entries in ascending id order
    catalog: Vec<CategoryEntry>,
}

impl NormalizedConfig {
    /// Normalize the documents. Structural problems of the stage graph are
    /// not reported here but by [`NormalizedConfig::validate`], which the
    /// engine runs on every `start()`.
    pub fn from_documents(documents: ConfigDocuments) -> Self {
        let ConfigDocuments {
            answer_scale,
            question_sets,
            stage_graph,
            categories,
        } = documents;

        let answer_scale = AnswerScale::from_options(normalize_answer_scale(&answer_scale));
        let stage_index = index_stages_by_id(&stage_graph.stages);
        let questions = question_sets
            .iter()
            .map(|(id, set)| (id.clone(), index_questions_by_priority(set)))
            .collect();
        let flow = merge_flow_config(&FlowConfig::default(), &stage_graph.config);
        let catalog = categories
            .into_iter()
            .map(|(id, mut entry)| {
                if entry.id.is_empty() {
                    entry.id = id;
                }
                entry
            })
            .collect();

        Self {
            answer_scale,
            stages: stage_graph.stages,
            stage_index,
            questions,
            flow,
            catalog,
        }
    }

    /// Load and normalize the documents stored in one directory
    pub fn from_dir(dir: impl AsRef<std::path::Path>) -> TypologyResult<Self> {
        Ok(Self::from_documents(ConfigDocuments::from_dir(dir)?))
    }

    pub fn answer_scale(&self) -> &AnswerScale {
        &self.answer_scale
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn stage(&self, id: &StageId) -> Option<&Stage> {
        self.stage_index.get(id).and_then(|&i| self.stages.get(i))
    }

    pub fn flow(&self) -> &FlowConfig {
        &self.flow
    }

    pub fn catalog(&self) -> &[CategoryEntry] {
        &self.catalog
    }

    /// The first question-asking stage in declaration order
    pub fn initial_stage(&self) -> Option<&Stage> {
        self.stages.iter().find(|s| s.is_standard())
    }

    /// Priority-ordered questions a stage may ask for one pole
    pub fn questions_for(&self, stage: &Stage, pole: &PoleId) -> &[Question] {
        stage
            .question_set_id
            .as_ref()
            .and_then(|set| self.questions.get(set))
            .and_then(|index| index.get(pole))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of questions a stage can draw on across its poles
    pub fn question_count(&self, stage: &Stage) -> usize {
        stage
            .poles
            .iter()
            .map(|pole| self.questions_for(stage, pole).len())
            .sum()
    }

    /// Turn an answer into a score.
    ///
    /// Ids are looked up in the answer scale first; an id that is not on
    /// the scale but parses as an integer is taken as a score.
    pub fn resolve_answer(&self, answer: &Answer) -> TypologyResult<i32> {
        match answer {
            Answer::Score(score) => Ok(*score),
            Answer::Id(id) => {
                if let Some(score) = self.answer_scale.score_for(id) {
                    return Ok(score);
                }
                if let Ok(score) = id.trim().parse::<i32>() {
                    return Ok(score);
                }
                if self.answer_scale.is_empty() {
                    return Err(TypologyError::configuration(format!(
                        "answer scale is empty, cannot resolve answer '{}'",
                        id
                    )));
                }
                Err(TypologyError::InvalidAnswer { answer: id.clone() })
            }
        }
    }

    /// Check that the stage graph can drive a run
    pub fn validate(&self) -> TypologyResult<()> {
        if self.stages.is_empty() {
            return Err(TypologyError::configuration("stage graph has no stages"));
        }
        if self.initial_stage().is_none() {
            return Err(TypologyError::configuration(
                "stage graph has no question-asking stage",
            ));
        }
        if self.flow.max_questions_per_pole == 0 {
            return Err(TypologyError::configuration(
                "maxQuestionsPerPole must be at least 1",
            ));
        }

        let mut seen = HashSet::new();
        for stage in &self.stages {
            if !seen.insert(&stage.id) {
                return Err(TypologyError::configuration(format!(
                    "duplicate stage id '{}'",
                    stage.id
                )));
            }

            if let Some(target) = stage.targets().find(|t| !self.stage_index.contains_key(*t)) {
                return Err(TypologyError::configuration(format!(
                    "stage '{}' routes to unknown stage '{}'",
                    stage.id, target
                )));
            }

            if !stage.is_standard() {
                continue;
            }
            if stage.dimension.is_none() {
                return Err(TypologyError::configuration(format!(
                    "stage '{}' has no dimension",
                    stage.id
                )));
            }
            match &stage.question_set_id {
                Some(set) if !self.questions.contains_key(set) => {
                    return Err(TypologyError::configuration(format!(
                        "stage '{}' references unknown question set '{}'",
                        stage.id, set
                    )));
                }
                Some(_) => {}
                None => {
                    tracing::warn!(stage = %stage.id, "Stage has no question set, entering it finalizes the run");
                }
            }
            if stage.poles.len() > 2 {
                tracing::warn!(
                    stage = %stage.id,
                    poles = stage.poles.len(),
                    "Stage declares more than two poles, only the first two are compared"
                );
            }
        }

        let flow = &self.flow;
        if flow.initial_questions_per_pole + flow.extra_questions_per_pole
            > flow.max_questions_per_pole
        {
            tracing::warn!(
                initial = flow.initial_questions_per_pole,
                extra = flow.extra_questions_per_pole,
                max = flow.max_questions_per_pole,
                "initial + extra questions per pole exceed the per-pole ceiling"
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_documents() -> ConfigDocuments {
        ConfigDocuments {
            answer_scale: json!([{"id": "agree", "score": 1}, {"id": "disagree", "score": -1}]),
            question_sets: BTreeMap::from([(
                QuestionSetId::new("rationality"),
                QuestionSetDocument::new()
                    .with_questions("rational", vec![QuestionEntry::new("r1", "Plan ahead?")])
                    .with_questions("irrational", vec![QuestionEntry::new("i1", "Go with the flow?")]),
            )]),
            stage_graph: StageGraph::new(vec![
                Stage::new("rationality", Dimension::Rationality, &["rational", "irrational"])
                    .with_question_set("rationality")
                    .with_next("*", "done"),
                Stage::terminal("done"),
            ]),
            categories: BTreeMap::new(),
        }
    }

    #[test]
    fn test_normalize_both_answer_scale_shapes() {
        let flat = json!([{"id": "a", "score": 2}, {"id": "b", "score": -2}]);
        let nested = json!({"en": {"options": [{"id": "a", "score": 2}, {"id": "b", "score": -2}]}});
        assert_eq!(normalize_answer_scale(&flat), normalize_answer_scale(&nested));
        assert_eq!(normalize_answer_scale(&flat).len(), 2);
    }

    #[test]
    fn test_normalize_unrecognized_scale_is_empty() {
        assert!(normalize_answer_scale(&json!(42)).is_empty());
        assert!(normalize_answer_scale(&json!({"en": {}})).is_empty());
    }

    #[test]
    fn test_normalize_for_locale_falls_back() {
        let nested = json!({
            "en": {"options": [{"id": "a", "score": 1}]},
            "ru": {"options": [{"id": "a", "score": 1}, {"id": "b", "score": 0}]}
        });
        assert_eq!(normalize_answer_scale_for_locale(&nested, "ru").len(), 2);
        assert_eq!(normalize_answer_scale_for_locale(&nested, "de").len(), 1);
    }

    #[test]
    fn test_index_questions_by_priority() {
        let set = QuestionSetDocument::new().with_questions(
            "T",
            vec![
                QuestionEntry::new("none_a", "no priority"),
                QuestionEntry::new("p2", "second").with_priority(2),
                QuestionEntry::new("none_b", "no priority either"),
                QuestionEntry::new("p1", "first").with_priority(1),
                QuestionEntry::new("p2b", "second, later").with_priority(2),
            ],
        );
        let index = index_questions_by_priority(&set);
        let ids: Vec<_> = index[&PoleId::new("T")]
            .iter()
            .map(|q| q.id.as_str())
            .collect();
        assert_eq!(ids, vec!["p1", "p2", "p2b", "none_a", "none_b"]);
        assert!(index[&PoleId::new("T")].iter().all(|q| q.pole == PoleId::new("T")));
    }

    #[test]
    fn test_index_stages_by_id_keeps_first() {
        let stages = vec![
            Stage::terminal("a"),
            Stage::terminal("b"),
            Stage::terminal("a"),
        ];
        let index = index_stages_by_id(&stages);
        assert_eq!(index[&StageId::new("a")], 0);
        assert_eq!(index[&StageId::new("b")], 1);
    }

    #[test]
    fn test_merge_flow_config() {
        let merged = merge_flow_config(
            &FlowConfig::default(),
            &FlowConfigOverrides {
                max_questions_per_pole: Some(4),
                decision_threshold: Some(5),
                ..FlowConfigOverrides::default()
            },
        );
        assert_eq!(merged.initial_questions_per_pole, 2);
        assert_eq!(merged.extra_questions_per_pole, 2);
        assert_eq!(merged.max_questions_per_pole, 4);
        assert_eq!(merged.decision_threshold, 5);

        let defaults = merge_flow_config(&FlowConfig::default(), &FlowConfigOverrides::default());
        assert_eq!(defaults, FlowConfig::default());
    }

    #[test]
    fn test_from_documents() {
        let config = NormalizedConfig::from_documents(make_documents());
        assert!(config.validate().is_ok());
        assert_eq!(config.initial_stage().unwrap().id, StageId::new("rationality"));
        let stage = config.stage(&StageId::new("rationality")).unwrap();
        assert_eq!(config.question_count(stage), 2);
        assert_eq!(config.questions_for(stage, &PoleId::new("missing")).len(), 0);
    }

    #[test]
    fn test_catalog_ids_filled_from_keys() {
        let mut docs = make_documents();
        docs.categories.insert(
            CategoryId::new("LIE"),
            CategoryEntry::new("", "Te", Rationality::Rational),
        );
        let config = NormalizedConfig::from_documents(docs);
        assert_eq!(config.catalog()[0].id, CategoryId::new("LIE"));
    }

    #[test]
    fn test_resolve_answer() {
        let config = NormalizedConfig::from_documents(make_documents());
        assert_eq!(config.resolve_answer(&Answer::Score(-3)).unwrap(), -3);
        assert_eq!(config.resolve_answer(&Answer::from("agree")).unwrap(), 1);
        assert_eq!(config.resolve_answer(&Answer::from("2")).unwrap(), 2);
        assert!(matches!(
            config.resolve_answer(&Answer::from("maybe")),
            Err(TypologyError::InvalidAnswer { .. })
        ));
    }

    #[test]
    fn test_numeric_scale_ids_win_over_integer_parse() {
        let mut docs = make_documents();
        docs.answer_scale = json!([{"id": 1, "score": 2}, {"id": 2, "score": 0}]);
        let config = NormalizedConfig::from_documents(docs);
        assert_eq!(config.resolve_answer(&Answer::from_token("1")).unwrap(), 2);
        assert_eq!(config.resolve_answer(&Answer::from_token("2")).unwrap(), 0);
        assert_eq!(config.resolve_answer(&Answer::from_token("-1")).unwrap(), -1);
    }

    #[test]
    fn test_resolve_answer_with_empty_scale() {
        let mut docs = make_documents();
        docs.answer_scale = json!("not a scale");
        let config = NormalizedConfig::from_documents(docs);
        assert_eq!(config.resolve_answer(&Answer::from("1")).unwrap(), 1);
        assert!(matches!(
            config.resolve_answer(&Answer::from("agree")),
            Err(TypologyError::Configuration(_))
        ));
    }

    #[test]
    fn test_validate_empty_graph() {
        let mut docs = make_documents();
        docs.stage_graph.stages.clear();
        let config = NormalizedConfig::from_documents(docs);
        assert!(matches!(config.validate(), Err(TypologyError::Configuration(_))));
    }

    #[test]
    fn test_validate_only_terminal_stages() {
        let mut docs = make_documents();
        docs.stage_graph.stages = vec![Stage::terminal("done")];
        let config = NormalizedConfig::from_documents(docs);
        assert!(matches!(config.validate(), Err(TypologyError::Configuration(_))));
    }

    #[test]
    fn test_validate_unknown_target() {
        let mut docs = make_documents();
        docs.stage_graph.stages[0] = docs.stage_graph.stages[0]
            .clone()
            .with_next("rational", "nowhere");
        let config = NormalizedConfig::from_documents(docs);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("nowhere"));
    }

    #[test]
    fn test_validate_duplicate_stage() {
        let mut docs = make_documents();
        docs.stage_graph.stages.push(Stage::terminal("done"));
        let config = NormalizedConfig::from_documents(docs);
        assert!(config.validate().unwrap_err().to_string().contains("duplicate"));
    }

    #[test]
    fn test_validate_unknown_question_set() {
        let mut docs = make_documents();
        docs.question_sets.clear();
        let config = NormalizedConfig::from_documents(docs);
        assert!(matches!(config.validate(), Err(TypologyError::Configuration(_))));
    }

    #[test]
    fn test_validate_zero_ceiling() {
        let mut docs = make_documents();
        docs.stage_graph.config.max_questions_per_pole = Some(0);
        let config = NormalizedConfig::from_documents(docs);
        assert!(matches!(config.validate(), Err(TypologyError::Configuration(_))));
    }
}
