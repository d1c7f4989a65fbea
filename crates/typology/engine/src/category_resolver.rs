//! Path and category resolution
//!
//! The leading function is synthesized from the three reserved
//! dimensions. The catalog is then scanned in id order for an entry with
//! that leading code and rationality, narrowed by the creative function
//! when the run decided one.

use typology_types::*;

/// Looks up the final category for a decided path
pub struct CategoryResolver;

impl CategoryResolver {
    pub fn new() -> Self {
        Self
    }

    /// The leading function code for a path, if the three reserved
    /// dimensions are decided and consistent
    pub fn leading_code(&self, path: &Path) -> Option<FunctionCode> {
        let rationality = Rationality::from_pole(path.rationality.as_ref()?.as_str())?;
        let base = BaseFunction::from_pole(path.base.as_ref()?.as_str())?;
        let orientation = Orientation::from_pole(path.orientation.as_ref()?.as_str())?;
        leading_code(rationality, base, orientation)
    }

    /// First catalog entry matching the path. `None` is an unresolved
    /// classification, not an error.
    pub fn resolve(&self, path: &Path, catalog: &[CategoryEntry]) -> Option<CategoryEntry> {
        let Some(leading) = self.leading_code(path) else {
            tracing::info!(?path, "Path does not determine a leading function");
            return None;
        };
        let rationality = Rationality::from_pole(path.rationality.as_ref()?.as_str())?;
        let creative = path.creative.as_ref().map(PoleId::as_str);

        let found = catalog
            .iter()
            .filter(|entry| entry.rationality == rationality && leading.matches(&entry.leading.code))
            .find(|entry| match creative {
                Some(code) => entry
                    .creative
                    .as_ref()
                    .is_some_and(|c| c.code.eq_ignore_ascii_case(code)),
                None => true,
            })
            .cloned();

        match &found {
            Some(entry) => {
                tracing::info!(category = %entry.id, leading = %leading, "Category resolved")
            }
            None => {
                tracing::info!(leading = %leading, creative = ?creative, "No category matches the path")
            }
        }
        found
    }
}

impl Default for CategoryResolver {
    fn default() -> Self {
        Self::new()
    }
}
