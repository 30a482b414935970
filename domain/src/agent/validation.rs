//! Output validation strategy plugged into the agent execution loop.

use crate::project::file_map::ValidatedFiles;
use crate::project::outcome::ValidationFailure;

/// Validates parsed code before it is scored.
///
/// `Ok(Some(files))` attaches validated files to the output, `Ok(None)`
/// accepts the output without files, and `Err` rejects it with feedback for
/// the next attempt.
pub trait OutputValidator: Send + Sync {
    fn validate(&self, code: &str) -> Result<Option<ValidatedFiles>, ValidationFailure>;
}

/// Accepts everything; used by roles that do not produce files.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoValidation;

impl OutputValidator for NoValidation {
    fn validate(&self, _code: &str) -> Result<Option<ValidatedFiles>, ValidationFailure> {
        Ok(None)
    }
}
