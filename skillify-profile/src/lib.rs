//! Skillify Profile - Rendering skill badges into a profile README
//!
//! Turns aggregated usage into badge markup, splices it into the marked
//! region of the profile document and commits the result atomically.

pub mod document;
pub mod markup;
pub mod patcher;
pub mod pipeline;

pub use document::ProfileDocument;
pub use markup::{Badge, BadgeRenderer};
pub use patcher::{patch, DocumentRegion, RegionState, SectionMarkers};
pub use pipeline::{update_profile, PipelineReport, SkillsPipeline};
