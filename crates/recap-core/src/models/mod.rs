//! Domain models.

mod analysis;
mod media;

pub use analysis::AnalysisResult;
pub use media::{MediaKind, MediaRecord, NewMediaRecord};
