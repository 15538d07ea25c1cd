//! besmin pipeline - directory-tree-to-directory-tree builds.
//!
//! The pipeline walks an input tree, syntax-checks every eligible source
//! file, and emits a minified, format-converted mirror of the tree per
//! selected module format:
//!
//! - [`paths`] - pure output path mapping and eligibility
//! - [`walk`] - deterministic source discovery
//! - [`validate`] - the read-only syntax gate
//! - [`build`] - per-file transform, minify and write
//! - [`report`] - typed per-run outcome collection
//!
//! Both [`validate::Validator`] and [`build::Builder`] are generic over the
//! engine traits from `besmin-transform`, so failure-isolation behavior is
//! covered by tests with stub engines and the OXC engine plugs in unchanged.

pub mod build;
pub mod error;
pub mod paths;
pub mod report;
pub mod validate;
pub mod walk;

pub use build::Builder;
pub use error::ProcessingError;
pub use report::{
    BuildEntry, BuildReport, BuildRun, BuildStatus, FormatRun, ValidationEntry, ValidationOutcome,
    ValidationReport,
};
pub use validate::Validator;
pub use walk::discover_sources;
