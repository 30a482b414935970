//! Text-to-project pipeline: file maps, validation and deployment requests.

pub mod archetype;
pub mod deployment;
pub mod file_map;
pub mod outcome;
pub mod references;
pub mod validator;

pub use archetype::{ProjectArchetype, RequiredFile};
pub use deployment::{DeploymentReceipt, DeploymentRequest};
pub use file_map::{FileMap, ValidatedFiles};
pub use outcome::{MissingReference, ValidationFailure, ValidationOutcome};
pub use validator::FileValidator;
