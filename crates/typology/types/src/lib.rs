//! Typology domain types
//!
//! Plain data shared by the classification engine and its callers:
//!
//! - identifiers ([`StageId`], [`PoleId`], [`QuestionId`], ...)
//! - dimensions and the typed poles of the reserved axes ([`Dimension`],
//!   [`Rationality`], [`BaseFunction`], [`Orientation`], [`FunctionCode`])
//! - configuration documents: answer scale, question sets, stage graph,
//!   category catalog ([`ConfigDocuments`])
//! - run state and step results ([`EngineState`], [`StepOutcome`])
//! - the error taxonomy ([`TypologyError`])
//!
//! Behaviour lives in `typology-engine`.

#![deny(unsafe_code)]

mod catalog;
mod dimension;
mod documents;
mod error;
mod ids;
mod question;
mod stage;
mod state;

pub use catalog::*;
pub use dimension::*;
pub use documents::*;
pub use error::*;
pub use ids::*;
pub use question::*;
pub use stage::*;
pub use state::*;
