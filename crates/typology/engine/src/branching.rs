//! Branching between stages
//!
//! A closed stage routes on its decided pole. Context routes look at a
//! dimension decided earlier in the run and take precedence over the
//! plain `next` table.

use crate::normalizer::NormalizedConfig;
use typology_types::*;

/// Resolves the stage that follows a closed stage
pub struct BranchResolver;

impl BranchResolver {
    pub fn new() -> Self {
        Self
    }

    /// Next stage id for `stage` closing on `pole`, or `None` to finish
    pub fn resolve_next_stage(
        &self,
        stage: &Stage,
        pole: Option<&PoleId>,
        path: &Path,
    ) -> Option<StageId> {
        if let Some(pole) = pole {
            if let Some(target) = self.context_route(stage, pole, path) {
                return Some(target.clone());
            }
            if let Some(target) = stage.next.get(pole.as_str()) {
                return Some(target.clone());
            }
        }
        stage.next.get(WILDCARD_POLE).cloned()
    }

    fn context_route<'a>(&self, stage: &'a Stage, pole: &PoleId, path: &Path) -> Option<&'a StageId> {
        let dimension = stage.context_dimension.as_ref()?;
        let context = path.get(dimension)?;
        stage.next_by_context.get(context, pole)
    }

    /// Where a resumed run continues: the rationality pole picks one of
    /// the two resume stages, whose context routes are keyed by
    /// `(base, orientation)`.
    pub fn resume_target(&self, config: &NormalizedConfig, summary: &BaseSummary) -> Option<StageId> {
        let resume_stages = &config.flow().resume_stages;
        let resume_id = match Rationality::from_pole(summary.rationality.as_str())? {
            Rationality::Rational => &resume_stages.rational,
            Rationality::Irrational => &resume_stages.irrational,
        };
        let Some(stage) = config.stage(resume_id) else {
            tracing::warn!(stage = %resume_id, "Resume stage is not configured");
            return None;
        };
        stage
            .next_by_context
            .get(&summary.base, &summary.orientation)
            .cloned()
    }
}

impl Default for BranchResolver {
    fn default() -> Self {
        Self::new()
    }
}
