//! Shared pipeline data model.
//!
//! Each pipeline stage (see the crate root docs) consumes the previous
//! stage's output by value or by reference and produces a new, immutable
//! value of its own. The types here are the ones shared across more than
//! one stage; stage-specific outputs (`LineFeatures`, `LabeledLine`,
//! `SequenceLabelingResult`) live next to the stage that produces them.

mod label;
mod line;
mod result;

pub use label::Label;
pub use line::{
    AnnotatedLine, ContentLine, NormalizedEmail, ReconstructedDocument, ReconstructedLine,
    WhitespaceMap,
};
pub use result::{AssembledBody, ExtractionError, ExtractionResult, ExtractionStats, Marginals};
