//! Stages, the stage graph and flow configuration
//!
//! A stage resolves exactly one dimension by asking questions from its
//! question set. When it closes, the decided pole selects the next stage:
//!
//! - `nextByContext` routes on a pair (value of an already-decided
//!   `contextDimension`, this stage's pole) and wins when it matches
//! - otherwise `next[pole]`, falling back to `next["*"]`
//! - no match ends the run

use crate::{Dimension, PoleId, QuestionSetId, StageId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Key in `next` that matches any decided pole
pub const WILDCARD_POLE: &str = "*";

// ── Stage kind ───────────────────────────────────────────────────────

/// Role of a stage in the graph
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageKind {
    /// Asks questions and decides its dimension
    #[default]
    Standard,
    /// Reaching this stage ends the run
    Terminal,
    /// Entry point used only when resuming from a base summary; never asks questions
    Resume,
}

// ── Context routes ───────────────────────────────────────────────────

/// One context-dependent route: `(context, pole) -> next`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextRule {
    /// Value of the stage's context dimension, already decided in the path
    pub context: PoleId,
    /// This stage's decided pole
    pub pole: PoleId,
    pub next: StageId,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ContextRoutesRepr {
    Rules(Vec<ContextRule>),
    /// Legacy `{"<context>_<pole>": "<next>"}` form
    Keyed(BTreeMap<String, StageId>),
}

/// Context-dependent routes keyed by `(context value, decided pole)`
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ContextRoutesRepr", into = "Vec<ContextRule>")]
pub struct ContextRoutes {
    routes: BTreeMap<(PoleId, PoleId), StageId>,
}

impl ContextRoutes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, context: PoleId, pole: PoleId, next: StageId) {
        self.routes.insert((context, pole), next);
    }

    pub fn get(&self, context: &PoleId, pole: &PoleId) -> Option<&StageId> {
        self.routes.get(&(context.clone(), pole.clone()))
    }

    pub fn targets(&self) -> impl Iterator<Item = &StageId> {
        self.routes.values()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl TryFrom<ContextRoutesRepr> for ContextRoutes {
    type Error = String;

    fn try_from(repr: ContextRoutesRepr) -> Result<Self, Self::Error> {
        let mut routes = Self::new();
        match repr {
            ContextRoutesRepr::Rules(rules) => {
                for rule in rules {
                    routes.insert(rule.context, rule.pole, rule.next);
                }
            }
            ContextRoutesRepr::Keyed(keyed) => {
                for (key, next) in keyed {
                    let (context, pole) = split_context_key(&key)?;
                    routes.insert(context, pole, next);
                }
            }
        }
        Ok(routes)
    }
}

impl From<ContextRoutes> for Vec<ContextRule> {
    fn from(routes: ContextRoutes) -> Self {
        routes
            .routes
            .into_iter()
            .map(|((context, pole), next)| ContextRule {
                context,
                pole,
                next,
            })
            .collect()
    }
}

/// Split a legacy `"<context>_<pole>"` key. Exactly one underscore is
/// required, otherwise the split point is ambiguous.
fn split_context_key(key: &str) -> Result<(PoleId, PoleId), String> {
    let mut parts = key.split('_');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(context), Some(pole), None) if !context.is_empty() && !pole.is_empty() => {
            Ok((PoleId::new(context), PoleId::new(pole)))
        }
        _ => Err(format!(
            "context route key '{}' must have the form '<context>_<pole>'",
            key
        )),
    }
}

// ── Stage ────────────────────────────────────────────────────────────

/// A node of the stage graph
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stage {
    pub id: StageId,
    /// The axis this stage decides; terminal and resume stages may omit it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimension: Option<Dimension>,
    /// Poles in declaration order; the order breaks ties
    #[serde(default)]
    pub poles: Vec<PoleId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_set_id: Option<QuestionSetId>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub next: BTreeMap<String, StageId>,
    #[serde(default, skip_serializing_if = "ContextRoutes::is_empty")]
    pub next_by_context: ContextRoutes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_dimension: Option<Dimension>,
    #[serde(default, rename = "type")]
    pub kind: StageKind,
}

impl Stage {
    /// Create a question-asking stage
    pub fn new(id: impl Into<String>, dimension: Dimension, poles: &[&str]) -> Self {
        Self {
            id: StageId::new(id),
            dimension: Some(dimension),
            poles: poles.iter().map(|p| PoleId::new(*p)).collect(),
            question_set_id: None,
            next: BTreeMap::new(),
            next_by_context: ContextRoutes::new(),
            context_dimension: None,
            kind: StageKind::Standard,
        }
    }

    /// Create a terminal stage
    pub fn terminal(id: impl Into<String>) -> Self {
        Self {
            id: StageId::new(id),
            dimension: None,
            poles: Vec::new(),
            question_set_id: None,
            next: BTreeMap::new(),
            next_by_context: ContextRoutes::new(),
            context_dimension: None,
            kind: StageKind::Terminal,
        }
    }

    /// Create a resume entry stage routing on `(base, orientation)`
    pub fn resume(id: impl Into<String>) -> Self {
        Self {
            kind: StageKind::Resume,
            context_dimension: Some(Dimension::BaseFunction),
            ..Self::terminal(id)
        }
    }

    pub fn with_question_set(mut self, question_set_id: impl Into<String>) -> Self {
        self.question_set_id = Some(QuestionSetId::new(question_set_id));
        self
    }

    pub fn with_next(mut self, pole: impl Into<String>, target: impl Into<String>) -> Self {
        self.next.insert(pole.into(), StageId::new(target));
        self
    }

    pub fn with_context_dimension(mut self, dimension: Dimension) -> Self {
        self.context_dimension = Some(dimension);
        self
    }

    pub fn with_context_route(
        mut self,
        context: impl Into<String>,
        pole: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        self.next_by_context.insert(
            PoleId::new(context),
            PoleId::new(pole),
            StageId::new(target),
        );
        self
    }

    pub fn is_terminal(&self) -> bool {
        self.kind == StageKind::Terminal
    }

    pub fn is_resume(&self) -> bool {
        self.kind == StageKind::Resume
    }

    /// Whether the stage asks questions
    pub fn is_standard(&self) -> bool {
        self.kind == StageKind::Standard
    }

    /// Every stage id this stage can route to
    pub fn targets(&self) -> impl Iterator<Item = &StageId> {
        self.next.values().chain(self.next_by_context.targets())
    }
}

// ── Flow configuration ───────────────────────────────────────────────

/// The two resume entry stages, chosen by the rationality pole
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeStages {
    pub rational: StageId,
    pub irrational: StageId,
}

impl Default for ResumeStages {
    fn default() -> Self {
        Self {
            rational: StageId::new("resume_rational"),
            irrational: StageId::new("resume_irrational"),
        }
    }
}

/// Stopping-rule parameters shared by every stage
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowConfig {
    /// Questions each pole must receive before a stage may close
    pub initial_questions_per_pole: u32,
    /// Follow-up allowance per pole once the initial round is inconclusive
    pub extra_questions_per_pole: u32,
    /// Hard ceiling per pole; reaching it on both poles forces a decision
    pub max_questions_per_pole: u32,
    /// Score difference that closes a stage early
    pub decision_threshold: u32,
    pub resume_stages: ResumeStages,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            initial_questions_per_pole: 2,
            extra_questions_per_pole: 2,
            max_questions_per_pole: 6,
            decision_threshold: 3,
            resume_stages: ResumeStages::default(),
        }
    }
}

/// Partial flow configuration as written in the stage graph
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowConfigOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_questions_per_pole: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_questions_per_pole: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_questions_per_pole: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision_threshold: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_stages: Option<ResumeStages>,
}

/// The stage-graph document
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StageGraph {
    #[serde(default)]
    pub stages: Vec<Stage>,
    #[serde(default)]
    pub config: FlowConfigOverrides,
}

impl StageGraph {
    pub fn new(stages: Vec<Stage>) -> Self {
        Self {
            stages,
            config: FlowConfigOverrides::default(),
        }
    }

    pub fn with_config(mut self, config: FlowConfigOverrides) -> Self {
        self.config = config;
        self
    }
}
