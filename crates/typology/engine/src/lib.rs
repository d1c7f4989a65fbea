//! Adaptive, staged personality-classification engine
//!
//! The engine walks a configured stage graph. Each stage decides one
//! dimension by asking questions, scoring answers per pole and closing
//! once enough evidence has accumulated. The decided poles form a path,
//! which is finally looked up in the category catalog.
//!
//! # Architecture
//!
//! - [`NormalizedConfig`]: lookup tables built once from the four
//!   configuration documents, shared read-only across sessions
//! - [`QuestionSelector`]: next unasked question, balanced across poles
//! - [`DecisionResolver`]: adaptive stopping rule for a stage
//! - [`BranchResolver`]: which stage follows a closed one
//! - [`CategoryResolver`]: leading function synthesis and catalog lookup
//! - [`transition`]: the pure state machine tying these together
//! - [`TypologyEngine`]: a mutable per-session wrapper around it
//!
//! # Example
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use typology_engine::TypologyEngine;
//! use typology_types::*;
//!
//! let documents = ConfigDocuments {
//!     answer_scale: serde_json::json!([{"id": "yes", "score": 2}, {"id": "no", "score": 0}]),
//!     question_sets: BTreeMap::from([(
//!         QuestionSetId::new("rationality"),
//!         QuestionSetDocument::new()
//!             .with_questions("rational", vec![QuestionEntry::new("r1", "Plan ahead?")])
//!             .with_questions("irrational", vec![QuestionEntry::new("i1", "Improvise?")]),
//!     )]),
//!     stage_graph: StageGraph::new(vec![
//!         Stage::new("rationality", Dimension::Rationality, &["rational", "irrational"])
//!             .with_question_set("rationality"),
//!     ]),
//!     categories: BTreeMap::new(),
//! };
//!
//! let mut engine = TypologyEngine::from_documents(documents);
//! let first = engine.start().unwrap().unwrap();
//! assert_eq!(first.id.as_str(), "r1");
//!
//! engine.answer("yes").unwrap();
//! let outcome = engine.answer("no").unwrap();
//! assert!(outcome.test_completed);
//! assert_eq!(engine.path().rationality.as_ref().map(|p| p.as_str()), Some("rational"));
//! ```

#![deny(unsafe_code)]

pub mod branching;
pub mod category_resolver;
pub mod decision_resolver;
pub mod engine;
pub mod normalizer;
pub mod question_selector;
pub mod state_machine;

// Re-export main types
pub use branching::BranchResolver;
pub use category_resolver::CategoryResolver;
pub use decision_resolver::{Decision, DecisionResolver};
pub use engine::TypologyEngine;
pub use normalizer::{
    index_questions_by_priority, index_stages_by_id, merge_flow_config, normalize_answer_scale,
    normalize_answer_scale_for_locale, NormalizedConfig, QuestionIndex,
};
pub use question_selector::QuestionSelector;
pub use state_machine::{transition, EngineEvent};
